use std::fs::File;
use std::path::Path;

use chrono::Utc;
use log::info;
use tempfile::TempDir;

use crate::utils::VerifyError;

/// Request-scoped working directory for one batch. Each request gets its own
/// uniquely named directory, removed on drop, so concurrent requests never
/// share staging state.
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    pub fn new() -> Result<Self, VerifyError> {
        let prefix = format!("veridoc-{}-", Utc::now().format("%Y%m%d%H%M%S"));
        let dir = TempDir::with_prefix(&prefix)
            .map_err(|e| VerifyError::Staging(e.to_string()))?;
        Ok(StagingArea { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Unpack an uploaded zip batch into the staging directory.
    pub fn unpack_zip(&self, archive_path: &Path) -> Result<(), VerifyError> {
        let file = File::open(archive_path)?;
        let mut archive =
            zip::ZipArchive::new(file).map_err(|e| VerifyError::Staging(e.to_string()))?;
        archive
            .extract(self.dir.path())
            .map_err(|e| VerifyError::Staging(e.to_string()))?;
        info!(
            "Extracted {} entries to {}",
            archive.len(),
            self.dir.path().display()
        );
        Ok(())
    }
}
