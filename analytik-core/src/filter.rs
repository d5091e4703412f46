//! Inclusion filters over the transaction table.
//!
//! An empty set means "no constraint" for that field. A record must pass every
//! field (AND across fields, OR within a field's set).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::period::MonthCalendar;
use crate::record::TransactionRecord;

pub const TOP_N_MIN: usize = 3;
pub const TOP_N_MAX: usize = 30;
pub const TOP_N_DEFAULT: usize = 10;

/// The user's current filter selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub sellers: BTreeSet<String>,
    pub customers: BTreeSet<String>,
    pub years: BTreeSet<i32>,
    pub months: BTreeSet<String>,
    /// Bounded to [TOP_N_MIN, TOP_N_MAX] by `with_top_n`
    pub top_n: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            sellers: BTreeSet::new(),
            customers: BTreeSet::new(),
            years: BTreeSet::new(),
            months: BTreeSet::new(),
            top_n: TOP_N_DEFAULT,
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every month of `calendar` selected, which is what the dashboard starts with.
    pub fn all_months(calendar: &MonthCalendar) -> Self {
        Self::new().with_months(calendar.names().iter().cloned())
    }

    pub fn with_sellers<I, S>(mut self, sellers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sellers = sellers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_customers<I, S>(mut self, customers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.customers = customers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_years(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.years = years.into_iter().collect();
        self
    }

    pub fn with_months<I, S>(mut self, months: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.months = months.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = n.clamp(TOP_N_MIN, TOP_N_MAX);
        self
    }

    /// Per-field membership rule.
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        matches_optional(&self.sellers, record.seller_name.as_deref())
            && matches_optional(&self.customers, record.customer_name.as_deref())
            && (self.years.is_empty() || self.years.contains(&record.year()))
            && (self.months.is_empty() || self.months.contains(record.month_name()))
    }
}

fn matches_optional(set: &BTreeSet<String>, value: Option<&str>) -> bool {
    if set.is_empty() {
        return true;
    }
    value.is_some_and(|v| set.contains(v))
}

/// Applies a [`FilterState`] to a slice of records.
pub struct FilterEngine;

impl FilterEngine {
    /// Surviving records in their original relative order. The input is untouched.
    pub fn apply(records: &[TransactionRecord], state: &FilterState) -> Vec<TransactionRecord> {
        records
            .iter()
            .filter(|r| state.matches(r))
            .cloned()
            .collect()
    }
}

/// The values a filter surface can offer for selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// First-seen order
    pub sellers: Vec<String>,
    /// First-seen order
    pub customers: Vec<String>,
    /// Ascending
    pub years: Vec<i32>,
    /// Calendar order
    pub months: Vec<String>,
}

impl FilterOptions {
    pub fn from_records(records: &[TransactionRecord], calendar: &MonthCalendar) -> Self {
        let years: BTreeSet<i32> = records.iter().map(|r| r.year()).collect();
        Self {
            sellers: unique_in_order(records.iter().filter_map(|r| r.seller_name.as_deref())),
            customers: unique_in_order(records.iter().filter_map(|r| r.customer_name.as_deref())),
            years: years.into_iter().collect(),
            months: calendar.names().to_vec(),
        }
    }
}

fn unique_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for v in values {
        if seen.insert(v) {
            out.push(v.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn rec(i: usize, y: i32, m: u32, customer: &str, seller: &str) -> TransactionRecord {
        TransactionRecord::new(
            dec!(100),
            NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
            &MonthCalendar::spanish(),
        )
        .unwrap()
        .with_source_index(i)
        .with_customer(customer)
        .with_seller(seller)
    }

    fn sample() -> Vec<TransactionRecord> {
        vec![
            rec(0, 2023, 1, "Alfa", "Ana"),
            rec(1, 2023, 3, "Beta", "Luis"),
            rec(2, 2024, 3, "Alfa", "Luis"),
            rec(3, 2024, 6, "Gamma", ""),
            rec(4, 2024, 6, "Beta", "Ana"),
        ]
    }

    fn indices(rs: &[TransactionRecord]) -> Vec<usize> {
        rs.iter().map(|r| r.source_index).collect()
    }

    #[test]
    fn test_empty_filter_passes_everything() {
        let records = sample();
        let out = FilterEngine::apply(&records, &FilterState::new());
        assert_eq!(out, records);
    }

    #[test]
    fn test_and_across_fields_or_within() {
        let records = sample();
        let state = FilterState::new()
            .with_customers(["Alfa", "Beta"])
            .with_years([2024]);
        let out = FilterEngine::apply(&records, &state);
        assert_eq!(indices(&out), vec![2, 4]);
    }

    #[test]
    fn test_month_filter_by_name() {
        let records = sample();
        let state = FilterState::new().with_months(["Marzo"]);
        assert_eq!(indices(&FilterEngine::apply(&records, &state)), vec![1, 2]);
    }

    #[test]
    fn test_missing_seller_never_matches_seller_filter() {
        let records = sample();
        let state = FilterState::new().with_sellers(["Ana", "Luis"]);
        let out = FilterEngine::apply(&records, &state);
        assert_eq!(indices(&out), vec![0, 1, 2, 4]);
    }

    #[test]
    fn test_all_months_is_no_constraint_for_present_data() {
        let records = sample();
        let state = FilterState::all_months(&MonthCalendar::spanish());
        assert_eq!(FilterEngine::apply(&records, &state).len(), records.len());
    }

    #[test]
    fn test_filtered_output_is_ordered_subset() {
        let records = sample();
        let state = FilterState::new().with_sellers(["Luis"]).with_months(["Marzo", "Junio"]);
        let out = FilterEngine::apply(&records, &state);
        for w in out.windows(2) {
            assert!(w[0].source_index < w[1].source_index);
        }
        for r in &out {
            assert!(records.contains(r));
            assert!(state.matches(r));
        }
    }

    #[test]
    fn test_top_n_is_clamped() {
        assert_eq!(FilterState::new().with_top_n(1).top_n, TOP_N_MIN);
        assert_eq!(FilterState::new().with_top_n(99).top_n, TOP_N_MAX);
        assert_eq!(FilterState::new().with_top_n(12).top_n, 12);
    }

    #[test]
    fn test_filter_options() {
        let records = sample();
        let opts = FilterOptions::from_records(&records, &MonthCalendar::spanish());
        assert_eq!(opts.sellers, vec!["Ana", "Luis"]);
        assert_eq!(opts.customers, vec!["Alfa", "Beta", "Gamma"]);
        assert_eq!(opts.years, vec![2023, 2024]);
        assert_eq!(opts.months.len(), 12);
        assert_eq!(opts.months[0], "Enero");
    }
}
