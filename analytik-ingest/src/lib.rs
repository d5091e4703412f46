//! analytik-ingest: loading a sales table from CSV and exporting filtered projections.

pub mod cells;
pub mod error;
pub mod export;
pub mod schema;
pub mod table;

pub use cells::{DEFAULT_DATE_FORMATS, DecimalMark, MAX_AMOUNT_UNITS};
pub use error::IngestError;
pub use export::{DEFAULT_EXPORT_FILE, ExportOptions, export_csv};
pub use schema::{ColumnNames, SourceSchema};
pub use table::{LoadDiagnostics, LoadOptions, SourceTable};
