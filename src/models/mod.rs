pub mod config;
pub mod data;

pub use config::{Config, DecisionPolicy, RetryPolicy};
pub use data::{
    audit_columns, ApiResponseEntry, AuditRow, BatchOutcome, ExtractedFields, FieldType,
    GroundTruthRow, GroundTruthTable, GroupResult, ImageRecord, MatchScoreSet, NotificationEntry,
    Status, VerificationOutcome, TRACKED_FIELDS,
};
