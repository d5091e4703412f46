//! Transaction records: one typed row of the sales table.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::period::{MonthCalendar, Period};

/// A sales transaction with its derived period fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Row position in the loaded source table
    pub source_index: usize,
    /// Net amount of the document
    pub amount: Decimal,
    /// `None` when the source cell is blank
    pub customer_name: Option<String>,
    /// `None` when blank or when the source has no seller column
    pub seller_name: Option<String>,
    pub document_date: NaiveDate,
    /// Derived from `document_date` at load time
    pub period: Period,
}

impl TransactionRecord {
    /// Create a record and derive its period from `calendar`.
    pub fn new(
        amount: Decimal,
        document_date: NaiveDate,
        calendar: &MonthCalendar,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            source_index: 0,
            amount,
            customer_name: None,
            seller_name: None,
            document_date,
            period: calendar.label(document_date)?,
        })
    }

    pub fn with_source_index(mut self, index: usize) -> Self {
        self.source_index = index;
        self
    }

    pub fn with_customer(mut self, name: impl Into<String>) -> Self {
        self.customer_name = non_blank(name.into());
        self
    }

    pub fn with_seller(mut self, name: impl Into<String>) -> Self {
        self.seller_name = non_blank(name.into());
        self
    }

    pub fn year(&self) -> i32 {
        self.period.year
    }

    pub fn month_number(&self) -> u32 {
        self.period.month_number
    }

    pub fn month_name(&self) -> &str {
        &self.period.month_name
    }
}

fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}
