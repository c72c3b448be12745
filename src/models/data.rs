use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Comparison semantics requested from the similarity service for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Address,
    Numeric,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Address => "address",
            FieldType::Numeric => "numeric",
        }
    }
}

/// The scored columns, in deterministic output order. Every match-score column,
/// audit column and notification field derives from this list.
pub const TRACKED_FIELDS: [(&str, FieldType); 11] = [
    ("House Flat Number", FieldType::Address),
    ("Town", FieldType::Address),
    ("Street Road Name", FieldType::Address),
    ("City", FieldType::Address),
    ("Country", FieldType::Address),
    ("PINCODE", FieldType::Numeric),
    ("Premise Building Name", FieldType::Address),
    ("Landmark", FieldType::Address),
    ("State", FieldType::Address),
    ("Name", FieldType::Text),
    ("UID", FieldType::Numeric),
];

/// One image from the batch. Grouping is a pure function of the filename:
/// `serial_label` is the stem, `base_id` the prefix before the first `_`.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub filename: String,
    pub path: PathBuf,
    pub serial_label: String,
    pub base_id: String,
}

impl ImageRecord {
    pub fn new(filename: &str, path: PathBuf) -> Self {
        let stem = match filename.rsplit_once('.') {
            Some((stem, _)) => stem,
            None => filename,
        };
        let serial_label = stem.trim().to_string();
        let base_id = serial_label
            .split('_')
            .next()
            .unwrap_or(serial_label.as_str())
            .to_string();
        ImageRecord {
            filename: filename.to_string(),
            path,
            serial_label,
            base_id,
        }
    }
}

/// One ground-truth record: field name -> cell value, blanks normalized to "".
#[derive(Debug, Clone, Default)]
pub struct GroundTruthRow {
    values: HashMap<String, String>,
}

impl GroundTruthRow {
    pub fn new(values: HashMap<String, String>) -> Self {
        GroundTruthRow { values }
    }

    pub fn field(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }
}

/// The ground-truth table keyed by the `SrNo` column. Lookup scans rows in
/// sheet order and the first match wins, so duplicate serials shadow later rows.
#[derive(Debug, Default)]
pub struct GroundTruthTable {
    rows: Vec<GroundTruthRow>,
}

impl GroundTruthTable {
    pub const KEY_COLUMN: &'static str = "SrNo";

    pub fn new(rows: Vec<GroundTruthRow>) -> Self {
        GroundTruthTable { rows }
    }

    pub fn lookup(&self, base_id: &str) -> Option<&GroundTruthRow> {
        self.rows
            .iter()
            .find(|row| row.field(Self::KEY_COLUMN) == base_id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Fields read off one document image. Empty string means the field could not
/// be extracted; only a missing Name disqualifies the image from scoring.
#[derive(Debug, Clone, Default)]
pub struct ExtractedFields {
    pub name: String,
    pub uid: String,
    pub address: String,
    pub house_flat_number: String,
    pub town: String,
    pub street_road_name: String,
    pub city: String,
    pub country: String,
    pub pincode: String,
    pub premise_building_name: String,
    pub landmark: String,
    pub state: String,
}

impl ExtractedFields {
    /// Value for one of the tracked columns.
    pub fn tracked(&self, field: &str) -> &str {
        match field {
            "House Flat Number" => &self.house_flat_number,
            "Town" => &self.town,
            "Street Road Name" => &self.street_road_name,
            "City" => &self.city,
            "Country" => &self.country,
            "PINCODE" => &self.pincode,
            "Premise Building Name" => &self.premise_building_name,
            "Landmark" => &self.landmark,
            "State" => &self.state,
            "Name" => &self.name,
            "UID" => &self.uid,
            _ => "",
        }
    }
}

/// Per-field similarity scores for one image against one ground-truth row.
#[derive(Debug, Clone, Default)]
pub struct MatchScoreSet {
    scores: HashMap<String, f64>,
    pub overall: f64,
}

impl MatchScoreSet {
    pub fn new(scores: HashMap<String, f64>, overall: f64) -> Self {
        MatchScoreSet { scores, overall }
    }

    pub fn field_score(&self, field: &str) -> f64 {
        self.scores.get(field).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.scores.contains_key(field)
    }
}

/// Best-scoring member of one image group.
#[derive(Debug, Clone)]
pub struct GroupResult {
    pub base_id: String,
    pub files: Vec<String>,
    pub fields: ExtractedFields,
    pub scores: MatchScoreSet,
    pub classification: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Verified,
    Rejected,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Status::Verified => write!(f, "Verified"),
            Status::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Terminal decision for one group. `overridden` records that the
/// classification label, not the score, dictated the outcome.
#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    pub status: Status,
    pub remark: String,
    pub document_type: String,
    pub score: f64,
    pub overridden: bool,
}

/// One entry of the API response list.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponseEntry {
    pub file: String,
    pub status: Status,
    pub document_type: String,
    pub final_remark: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// One row of the audit workbook: (column, value) pairs in the fixed column
/// order given by [`audit_columns`].
#[derive(Debug, Clone)]
pub struct AuditRow {
    pub cells: Vec<(String, String)>,
}

impl AuditRow {
    pub fn get(&self, column: &str) -> &str {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }
}

/// The audit workbook column schema. Built from [`TRACKED_FIELDS`] so the
/// ground-truth and match-score columns cannot drift from the scored set.
pub fn audit_columns() -> Vec<String> {
    let mut columns = vec![
        "SrNo".to_string(),
        "File".to_string(),
        "Status".to_string(),
    ];
    for (field, _) in TRACKED_FIELDS.iter() {
        columns.push(field.to_string());
    }
    for (field, _) in TRACKED_FIELDS.iter() {
        columns.push(format!("{} Match Score", field));
    }
    columns.extend(
        [
            "Extracted Name",
            "Extracted UID",
            "Extracted Address",
            "Overall Match",
            "Final Remarks",
            "Document Type",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    columns
}

/// Flattened record forwarded to the downstream notification sink.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationEntry {
    pub name: String,
    pub uid: String,
    pub address: String,
    pub final_remark: String,
    pub document_type: String,
}

/// Everything one batch run produces: the API response list and the audit rows,
/// row-for-row derived from the same group results.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub responses: Vec<ApiResponseEntry>,
    pub audit_rows: Vec<AuditRow>,
}

impl BatchOutcome {
    pub fn notification_payload(&self) -> Vec<NotificationEntry> {
        self.audit_rows
            .iter()
            .map(|row| NotificationEntry {
                name: row.get("Extracted Name").to_string(),
                uid: row.get("Extracted UID").to_string(),
                address: row.get("Extracted Address").to_string(),
                final_remark: row.get("Final Remarks").to_string(),
                document_type: row.get("Document Type").to_string(),
            })
            .collect()
    }
}
