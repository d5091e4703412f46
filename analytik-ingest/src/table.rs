//! Loaded source table: raw cells plus the typed records derived from them.

use analytik_core::{MonthCalendar, TransactionRecord};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::cells::{DEFAULT_DATE_FORMATS, DecimalMark, parse_amount, parse_document_date};
use crate::error::Result;
use crate::schema::{ColumnNames, SourceSchema};

/// How a source file is read into a [`SourceTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub columns: ColumnNames,
    pub calendar: MonthCalendar,
    pub date_formats: Vec<String>,
    pub decimal_mark: DecimalMark,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            calendar: MonthCalendar::default(),
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
            decimal_mark: DecimalMark::default(),
        }
    }
}

/// Row counts from a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadDiagnostics {
    pub total_rows: usize,
    /// Rows excluded because the document date did not parse
    pub dropped_dates: usize,
    /// Rows excluded because the amount cell was not numeric or out of range
    pub dropped_amounts: usize,
    /// Kept rows with cells that were not valid UTF-8, decoded lossily
    pub lossy_rows: usize,
}

impl LoadDiagnostics {
    pub fn kept_rows(&self) -> usize {
        self.total_rows - self.dropped_dates - self.dropped_amounts
    }
}

/// Immutable result of a load. `rows` keeps every source row (dropped ones
/// included) so `TransactionRecord::source_index` can address its cells.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub records: Vec<TransactionRecord>,
    pub diagnostics: LoadDiagnostics,
    pub calendar: MonthCalendar,
}

impl SourceTable {
    /// Read CSV with a header row. Header names are trimmed before the schema
    /// is resolved. Cells that are not valid UTF-8 (Latin-1 exports) are
    /// decoded lossily instead of failing the load.
    pub fn from_csv_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers: Vec<String> = rdr
            .byte_headers()?
            .iter()
            .map(|h| String::from_utf8_lossy(h).trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let schema = SourceSchema::resolve(&headers, &options.columns)?;

        let mut rows = Vec::new();
        let mut lossy_rows = 0;
        for result in rdr.byte_records() {
            let record = result?;
            if std::str::from_utf8(record.as_slice()).is_err() {
                lossy_rows += 1;
            }
            rows.push(
                record
                    .iter()
                    .map(|c| String::from_utf8_lossy(c).into_owned())
                    .collect::<Vec<_>>(),
            );
        }

        let mut table = Self::from_rows(headers, rows, schema, options)?;
        table.diagnostics.lossy_rows = lossy_rows;
        if lossy_rows > 0 {
            warn!(rows = lossy_rows, "cells with invalid UTF-8 were decoded lossily");
        }
        Ok(table)
    }

    pub fn from_csv_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let table = Self::from_csv_reader(file, options)?;
        info!(
            path = %path.as_ref().display(),
            rows = table.records.len(),
            "loaded sales table"
        );
        Ok(table)
    }

    fn from_rows(
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        schema: SourceSchema,
        options: &LoadOptions,
    ) -> Result<Self> {
        let mut diagnostics = LoadDiagnostics {
            total_rows: rows.len(),
            ..LoadDiagnostics::default()
        };
        let mut records = Vec::with_capacity(rows.len());

        for (i, row) in rows.iter().enumerate() {
            let cell = move |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");

            let Some(date) = parse_document_date(cell(schema.document_date), &options.date_formats)
            else {
                diagnostics.dropped_dates += 1;
                continue;
            };

            let Some(amount) = parse_amount(cell(schema.amount), options.decimal_mark).value() else {
                diagnostics.dropped_amounts += 1;
                continue;
            };

            let mut record = TransactionRecord::new(amount, date, &options.calendar)?
                .with_source_index(i)
                .with_customer(cell(schema.customer).trim());
            if let Some(seller) = schema.seller {
                record = record.with_seller(cell(seller).trim());
            }
            records.push(record);
        }

        if diagnostics.dropped_dates > 0 || diagnostics.dropped_amounts > 0 {
            warn!(
                dropped_dates = diagnostics.dropped_dates,
                dropped_amounts = diagnostics.dropped_amounts,
                total = diagnostics.total_rows,
                "rows excluded from analysis"
            );
        }

        Ok(Self {
            headers,
            rows,
            records,
            diagnostics,
            calendar: options.calendar.clone(),
        })
    }

    /// Raw cells of the row a record came from.
    pub fn source_row(&self, record: &TransactionRecord) -> Option<&[String]> {
        self.rows.get(record.source_index).map(Vec::as_slice)
    }
}
