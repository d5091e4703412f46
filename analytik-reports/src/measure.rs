//! Grouping keys and summed measures shared by the aggregators.

use analytik_core::TransactionRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Numeric field summed by an aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Measure {
    #[default]
    #[serde(rename = "amount")]
    Amount,
    /// Each record contributes 1
    #[serde(rename = "transaction-count")]
    TransactionCount,
}

impl Measure {
    pub fn value(self, record: &TransactionRecord) -> Decimal {
        match self {
            Measure::Amount => record.amount,
            Measure::TransactionCount => Decimal::ONE,
        }
    }
}

/// Entity a ranking groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKey {
    #[serde(rename = "customer")]
    Customer,
    #[serde(rename = "seller")]
    Seller,
}

impl EntityKey {
    /// `None` for records where the entity is missing.
    pub fn of(self, record: &TransactionRecord) -> Option<&str> {
        match self {
            EntityKey::Customer => record.customer_name.as_deref(),
            EntityKey::Seller => record.seller_name.as_deref(),
        }
    }
}
