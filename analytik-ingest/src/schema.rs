//! Column identifiers and their resolution against a source header row.

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// Names of the source columns the engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub amount: String,
    pub customer: String,
    pub seller: String,
    pub document_date: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            amount: "amount".to_string(),
            customer: "customerName".to_string(),
            seller: "sellerName".to_string(),
            document_date: "documentDate".to_string(),
        }
    }
}

impl ColumnNames {
    /// Column names of the invoicing export ("ventas" table).
    pub fn spanish() -> Self {
        Self {
            amount: "Monto Neto".to_string(),
            customer: "Razon Social".to_string(),
            seller: "Vendedor".to_string(),
            document_date: "Fecha Docto".to_string(),
        }
    }
}

/// Positions of the known columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSchema {
    pub amount: usize,
    pub customer: usize,
    pub document_date: usize,
    /// The seller column is optional
    pub seller: Option<usize>,
}

impl SourceSchema {
    /// Resolve against already-trimmed headers. Every missing required column
    /// is reported, not just the first.
    pub fn resolve(headers: &[String], names: &ColumnNames) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let amount = find(&names.amount);
        let customer = find(&names.customer);
        let document_date = find(&names.document_date);

        match (amount, customer, document_date) {
            (Some(amount), Some(customer), Some(document_date)) => Ok(Self {
                amount,
                customer,
                document_date,
                seller: find(&names.seller),
            }),
            _ => {
                let missing = [
                    (amount, &names.amount),
                    (customer, &names.customer),
                    (document_date, &names.document_date),
                ]
                .into_iter()
                .filter(|(idx, _)| idx.is_none())
                .map(|(_, name)| name.clone())
                .collect();
                Err(IngestError::Schema { missing })
            }
        }
    }
}
