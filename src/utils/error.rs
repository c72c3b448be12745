use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Ground truth error: {0}")]
    GroundTruth(String),
    #[error("Staging error: {0}")]
    Staging(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Workbook error: {0}")]
    Excel(String),
    #[error("Extraction error: {0}")]
    Extraction(String),
    #[error("Similarity service error: {0}")]
    Similarity(String),
    #[error("Notification error: {0}")]
    Notification(String),
}
