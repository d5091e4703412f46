//! Current vs prior period comparison.
//!
//! The current period is the latest year present after filtering and the prior
//! period is the next lower year that is actually present. Missing years in
//! between are skipped, so 2023 compares against 2021 when 2022 has no rows.

use analytik_core::TransactionRecord;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Comparative KPIs for the two latest periods of a filtered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparativePeriodResult {
    /// `None` when nothing survived filtering
    pub current_period: Option<i32>,
    /// `None` with fewer than two distinct periods
    pub prior_period: Option<i32>,
    pub current_revenue: Decimal,
    pub prior_revenue: Decimal,
    pub current_customer_count: usize,
    pub prior_customer_count: usize,
    pub current_ticket: Decimal,
    pub prior_ticket: Decimal,
    pub revenue_delta_pct: Option<Decimal>,
    pub customer_delta_pct: Option<Decimal>,
    pub ticket_delta_pct: Option<Decimal>,
}

impl ComparativePeriodResult {
    pub fn empty() -> Self {
        Self {
            current_period: None,
            prior_period: None,
            current_revenue: Decimal::ZERO,
            prior_revenue: Decimal::ZERO,
            current_customer_count: 0,
            prior_customer_count: 0,
            current_ticket: Decimal::ZERO,
            prior_ticket: Decimal::ZERO,
            revenue_delta_pct: None,
            customer_delta_pct: None,
            ticket_delta_pct: None,
        }
    }

    pub fn has_comparison(&self) -> bool {
        self.prior_period.is_some()
    }
}

impl Default for ComparativePeriodResult {
    fn default() -> Self {
        Self::empty()
    }
}

/// Revenue, customers and ticket of one period.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PeriodTotals {
    revenue: Decimal,
    customers: usize,
    ticket: Decimal,
}

impl PeriodTotals {
    fn for_year(records: &[TransactionRecord], year: i32) -> Self {
        let mut revenue = Decimal::ZERO;
        let mut customers = HashSet::new();
        for r in records.iter().filter(|r| r.year() == year) {
            revenue = revenue.saturating_add(r.amount);
            if let Some(c) = r.customer_name.as_deref() {
                customers.insert(c);
            }
        }
        let customers = customers.len();
        let ticket = if customers == 0 {
            Decimal::ZERO
        } else {
            revenue
                .checked_div(Decimal::from(customers))
                .unwrap_or(Decimal::ZERO)
        };
        Self { revenue, customers, ticket }
    }
}

/// Stateless calculator for [`ComparativePeriodResult`].
pub struct ComparativeKpi;

impl ComparativeKpi {
    pub fn compute(records: &[TransactionRecord]) -> ComparativePeriodResult {
        let years: BTreeSet<i32> = records.iter().map(|r| r.year()).collect();
        let mut latest = years.iter().rev();

        let Some(&current) = latest.next() else {
            return ComparativePeriodResult::empty();
        };
        let cur = PeriodTotals::for_year(records, current);

        let mut result = ComparativePeriodResult {
            current_period: Some(current),
            current_revenue: cur.revenue,
            current_customer_count: cur.customers,
            current_ticket: cur.ticket,
            ..ComparativePeriodResult::empty()
        };

        if let Some(&prior) = latest.next() {
            let prev = PeriodTotals::for_year(records, prior);
            result.prior_period = Some(prior);
            result.prior_revenue = prev.revenue;
            result.prior_customer_count = prev.customers;
            result.prior_ticket = prev.ticket;
            result.revenue_delta_pct = delta_pct(cur.revenue, prev.revenue);
            result.customer_delta_pct =
                delta_pct(Decimal::from(cur.customers), Decimal::from(prev.customers));
            result.ticket_delta_pct = delta_pct(cur.ticket, prev.ticket);
        }

        result
    }
}

/// Percentage change from `prior` to `current`, one decimal, half away from zero.
/// `None` when `prior` is zero.
pub fn delta_pct(current: Decimal, prior: Decimal) -> Option<Decimal> {
    if prior.is_zero() {
        return None;
    }
    current
        .checked_sub(prior)?
        .checked_div(prior)?
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|d| d.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytik_core::MonthCalendar;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn rec(year: i32, customer: &str, amount: Decimal) -> TransactionRecord {
        TransactionRecord::new(
            amount,
            NaiveDate::from_ymd_opt(year, 5, 10).unwrap(),
            &MonthCalendar::spanish(),
        )
        .unwrap()
        .with_customer(customer)
    }

    #[test]
    fn test_empty_input() {
        let r = ComparativeKpi::compute(&[]);
        assert_eq!(r, ComparativePeriodResult::empty());
        assert_eq!(r.current_period, None);
    }

    #[test]
    fn test_single_year_has_no_comparison() {
        let records = vec![rec(2024, "A", dec!(100)), rec(2024, "B", dec!(50)), rec(2024, "A", dec!(30))];
        let r = ComparativeKpi::compute(&records);
        assert_eq!(r.current_period, Some(2024));
        assert_eq!(r.prior_period, None);
        assert_eq!(r.current_revenue, dec!(180));
        assert_eq!(r.current_customer_count, 2);
        assert_eq!(r.current_ticket, dec!(90));
        assert_eq!(r.revenue_delta_pct, None);
        assert_eq!(r.customer_delta_pct, None);
        assert_eq!(r.ticket_delta_pct, None);
        assert!(!r.has_comparison());
    }

    #[test]
    fn test_gap_year_is_skipped() {
        let records = vec![rec(2021, "A", dec!(100)), rec(2023, "A", dec!(80))];
        let r = ComparativeKpi::compute(&records);
        assert_eq!(r.current_period, Some(2023));
        assert_eq!(r.prior_period, Some(2021));
        assert_eq!(r.revenue_delta_pct, Some(dec!(-20.0)));
    }

    #[test]
    fn test_latest_two_years_are_compared() {
        let records = vec![
            rec(2022, "A", dec!(1000)),
            rec(2023, "A", dec!(100)),
            rec(2023, "B", dec!(100)),
            rec(2024, "A", dec!(150)),
            rec(2024, "B", dec!(150)),
            rec(2024, "C", dec!(150)),
        ];
        let r = ComparativeKpi::compute(&records);
        assert_eq!(r.current_period, Some(2024));
        assert_eq!(r.prior_period, Some(2023));
        assert_eq!(r.current_revenue, dec!(450));
        assert_eq!(r.prior_revenue, dec!(200));
        assert_eq!(r.revenue_delta_pct, Some(dec!(125.0)));
        assert_eq!(r.customer_delta_pct, Some(dec!(50.0)));
        assert_eq!(r.current_ticket, dec!(150));
        assert_eq!(r.prior_ticket, dec!(100));
        assert_eq!(r.ticket_delta_pct, Some(dec!(50.0)));
    }

    #[test]
    fn test_zero_prior_revenue_yields_null_delta() {
        let records = vec![rec(2023, "A", dec!(0)), rec(2024, "A", dec!(500))];
        let r = ComparativeKpi::compute(&records);
        assert_eq!(r.prior_revenue, dec!(0));
        assert_eq!(r.revenue_delta_pct, None);
        assert_eq!(r.ticket_delta_pct, None);
        assert_eq!(r.customer_delta_pct, Some(dec!(0.0)));
    }

    #[test]
    fn test_missing_customers_are_not_counted() {
        let records = vec![rec(2024, "", dec!(100)), rec(2024, "A", dec!(100))];
        let r = ComparativeKpi::compute(&records);
        assert_eq!(r.current_customer_count, 1);
        assert_eq!(r.current_ticket, dec!(200));

        let only_missing = vec![rec(2024, "", dec!(100))];
        let r = ComparativeKpi::compute(&only_missing);
        assert_eq!(r.current_customer_count, 0);
        assert_eq!(r.current_ticket, dec!(0));
    }

    #[test]
    fn test_delta_pct_rounding() {
        assert_eq!(delta_pct(dec!(80), dec!(100)), Some(dec!(-20.0)));
        assert_eq!(delta_pct(dec!(80), dec!(0)), None);
        assert_eq!(delta_pct(dec!(100.25), dec!(100)), Some(dec!(0.3)));
        assert_eq!(delta_pct(dec!(99.75), dec!(100)), Some(dec!(-0.3)));
        assert_eq!(delta_pct(dec!(2), dec!(3)), Some(dec!(-33.3)));
        assert_eq!(delta_pct(Decimal::MAX, Decimal::MIN), None);
    }

    #[test]
    fn test_huge_amounts_saturate_instead_of_panicking() {
        let records = vec![
            rec(2023, "A", dec!(1)),
            rec(2024, "A", Decimal::MAX),
            rec(2024, "B", Decimal::MAX),
        ];
        let r = ComparativeKpi::compute(&records);
        assert_eq!(r.current_revenue, Decimal::MAX);
        assert_eq!(r.current_customer_count, 2);
        assert!(r.revenue_delta_pct.is_none());
    }
}
