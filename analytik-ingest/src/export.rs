//! CSV projection of a filtered record set.
//!
//! Output is UTF-8 with a header row and no index column. Original columns are
//! written in their source order; the derived period columns are optional.

use analytik_core::TransactionRecord;

use crate::error::{IngestError, Result};
use crate::table::SourceTable;

pub const DEFAULT_EXPORT_FILE: &str = "reporte_comercial.csv";

pub const PERIOD_COLUMNS: [&str; 3] = ["year", "month_number", "month_name"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Append `year`, `month_number` and `month_name`
    pub include_period_columns: bool,
}

/// Serialize `records` (usually a filtered subset of `table.records`).
pub fn export_csv(
    table: &SourceTable,
    records: &[TransactionRecord],
    options: ExportOptions,
) -> Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new().from_writer(Vec::new());

    let mut header: Vec<&str> = table.headers.iter().map(String::as_str).collect();
    if options.include_period_columns {
        header.extend(PERIOD_COLUMNS);
    }
    wtr.write_record(&header)?;

    let width = table.headers.len();
    for record in records {
        let source = table.source_row(record).unwrap_or_default();
        let mut row: Vec<String> = (0..width)
            .map(|i| source.get(i).cloned().unwrap_or_default())
            .collect();
        if options.include_period_columns {
            row.push(record.year().to_string());
            row.push(record.month_number().to_string());
            row.push(record.month_name().to_string());
        }
        wtr.write_record(&row)?;
    }

    wtr.into_inner()
        .map_err(|e| IngestError::Io(e.into_error()))
}
