use std::collections::HashMap;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use log::{debug, info};
use rust_xlsxwriter::Workbook;

use crate::models::{audit_columns, AuditRow, GroundTruthRow, GroundTruthTable};
use crate::utils::VerifyError;

/// Cell text with the normalizations the pipeline expects: trimmed strings,
/// whole floats rendered without a trailing `.0`, blanks and errors as "".
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// Load the ground-truth table from the first worksheet. The header row names
/// the columns; a missing `SrNo` column is an input error.
pub fn load_ground_truth(path: &Path) -> Result<GroundTruthTable, VerifyError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| VerifyError::Excel(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| VerifyError::Excel("workbook has no worksheets".to_string()))?
        .map_err(|e| VerifyError::Excel(e.to_string()))?;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .ok_or_else(|| VerifyError::GroundTruth("ground-truth sheet is empty".to_string()))?
        .iter()
        .map(|cell| cell_to_string(cell))
        .collect();
    debug!("Loaded ground-truth columns: {:?}", header);

    if !header.iter().any(|h| h == GroundTruthTable::KEY_COLUMN) {
        return Err(VerifyError::GroundTruth(format!(
            "ground-truth sheet must have a '{}' column",
            GroundTruthTable::KEY_COLUMN
        )));
    }

    let mut records = Vec::new();
    for row in rows {
        let mut values = HashMap::new();
        for (column, cell) in header.iter().zip(row.iter()) {
            if !column.is_empty() {
                values.insert(column.clone(), cell_to_string(cell));
            }
        }
        records.push(GroundTruthRow::new(values));
    }
    info!("Loaded {} ground-truth rows", records.len());
    Ok(GroundTruthTable::new(records))
}

/// Write the audit rows to one worksheet, header first, columns in the fixed
/// schema order. Numeric-looking cells are written as numbers.
pub fn write_audit(path: &Path, rows: &[AuditRow]) -> Result<(), VerifyError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, column) in audit_columns().iter().enumerate() {
        worksheet
            .write_string(0, col as u16, column.as_str())
            .map_err(|e| VerifyError::Excel(e.to_string()))?;
    }

    for (row_index, row) in rows.iter().enumerate() {
        for (col, (_, value)) in row.cells.iter().enumerate() {
            let r = (row_index + 1) as u32;
            let c = col as u16;
            if let Ok(number) = value.parse::<f64>() {
                worksheet
                    .write_number(r, c, number)
                    .map_err(|e| VerifyError::Excel(e.to_string()))?;
            } else {
                worksheet
                    .write_string(r, c, value.as_str())
                    .map_err(|e| VerifyError::Excel(e.to_string()))?;
            }
        }
    }

    workbook
        .save(path)
        .map_err(|e| VerifyError::Excel(e.to_string()))?;
    info!("Saved {} audit rows to {}", rows.len(), path.display());
    Ok(())
}
