use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AdqError {
    #[error("invalid number '{text}'")]
    MalformedNumeric { text: String },

    #[error("failed to read table {path}: {reason}")]
    TableLoad { path: PathBuf, reason: String },

    #[error("failed to read spreadsheet {path}: {reason}")]
    Spreadsheet { path: PathBuf, reason: String },

    #[error("spreadsheet {path} has no '{column}' column")]
    MissingColumn { path: PathBuf, column: String },

    #[error("unknown standard quantity unit '{code}' for drug code {drug_code}")]
    UnknownSquCode { drug_code: String, code: String },

    #[error("failed to load configuration from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
