use analytik_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Source is missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, IngestError>;
