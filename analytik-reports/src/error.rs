use analytik_ingest::IngestError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to load sales table: {0}")]
    Ingest(#[from] IngestError),

    #[error("No sales table is loaded and no loader is configured")]
    NotLoaded,
}
