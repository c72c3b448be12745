use std::path::Path;

use log::debug;

use crate::models::ImageRecord;
use crate::utils::VerifyError;

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            IMAGE_EXTENSIONS.iter().any(|known| *known == ext)
        })
        .unwrap_or(false)
}

/// Recursively collect image files under `dir` into [`ImageRecord`]s. Entries
/// are visited in name order so the batch sequence (and with it the
/// first-seen tie-break) is stable across platforms.
pub fn scan_images(dir: &Path) -> Result<Vec<ImageRecord>, VerifyError> {
    let mut records = Vec::new();
    walk(dir, &mut records)?;
    Ok(records)
}

fn walk(dir: &Path, records: &mut Vec<ImageRecord>) -> Result<(), VerifyError> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            walk(&path, records)?;
        } else if is_image(&path) {
            let filename = entry.file_name().to_string_lossy().to_string();
            let record = ImageRecord::new(&filename, path);
            debug!(
                "Image {} mapped to base serial {}",
                record.filename, record.base_id
            );
            records.push(record);
        }
    }
    Ok(())
}
