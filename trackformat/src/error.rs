use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("IO error")]
    Io(#[from] io::Error),
    #[error("JSON error")]
    Json(#[from] serde_json::Error),
    #[error("CSV error")]
    Csv(#[from] csv::Error),
    #[error("File '{}' not found", .0.display())]
    NotFound(PathBuf),
    #[error("Unsupported ownship format '{0}'. Use 'json' or 'csv'")]
    UnsupportedOwnshipFormat(String),
    #[error("Invalid timestamp '{0}'")]
    Timestamp(String),
    #[error("Invalid track data payload '{0}'")]
    Data(String),
}
