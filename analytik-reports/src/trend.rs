//! Monthly trend series with period labels and peak detection.

use analytik_core::TransactionRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::measure::Measure;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub year: i32,
    pub month_number: u32,
    /// Month name, suffixed with the year when the series spans several years
    pub label: String,
    pub total_amount: Decimal,
}

/// Chronologically ordered monthly totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub points: Vec<TrendPoint>,
    /// Largest total, earliest point on ties; `None` iff `points` is empty
    pub peak: Option<TrendPoint>,
}

impl TrendSeries {
    pub fn monthly(records: &[TransactionRecord], measure: Measure) -> Self {
        let mut groups: HashMap<(i32, u32), (&str, Decimal)> = HashMap::new();
        for r in records {
            let entry = groups
                .entry((r.year(), r.month_number()))
                .or_insert((r.month_name(), Decimal::ZERO));
            entry.1 = entry.1.saturating_add(measure.value(r));
        }

        let years: BTreeSet<i32> = groups.keys().map(|(y, _)| *y).collect();
        let single_year = years.len() == 1;

        let mut keyed: Vec<_> = groups.into_iter().collect();
        keyed.sort_by_key(|((year, month), _)| chrono_key(*year, *month));

        let points: Vec<TrendPoint> = keyed
            .into_iter()
            .map(|((year, month_number), (month_name, total_amount))| TrendPoint {
                year,
                month_number,
                label: if single_year {
                    month_name.to_string()
                } else {
                    format!("{month_name} {year}")
                },
                total_amount,
            })
            .collect();

        let peak = points
            .iter()
            .fold(None::<&TrendPoint>, |best, p| match best {
                Some(b) if b.total_amount >= p.total_amount => Some(b),
                _ => Some(p),
            })
            .cloned();

        Self { points, peak }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Sort key only; never exposed on a point.
fn chrono_key(year: i32, month: u32) -> i64 {
    i64::from(year) * 12 + i64::from(month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytik_core::MonthCalendar;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn rec(y: i32, m: u32, amount: Decimal) -> TransactionRecord {
        TransactionRecord::new(
            amount,
            NaiveDate::from_ymd_opt(y, m, 10).unwrap(),
            &MonthCalendar::spanish(),
        )
        .unwrap()
    }

    #[test]
    fn test_single_year_labels_and_order() {
        let records = vec![rec(2024, 6, dec!(300)), rec(2024, 3, dec!(100)), rec(2024, 6, dec!(50))];
        let s = TrendSeries::monthly(&records, Measure::Amount);
        let labels: Vec<_> = s.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Marzo", "Junio"]);
        assert_eq!(s.points[1].total_amount, dec!(350));
        assert_eq!(s.peak.as_ref().unwrap().label, "Junio");
    }

    #[test]
    fn test_multi_year_labels_are_suffixed() {
        let records = vec![rec(2024, 1, dec!(10)), rec(2023, 12, dec!(20))];
        let s = TrendSeries::monthly(&records, Measure::Amount);
        let labels: Vec<_> = s.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Diciembre 2023", "Enero 2024"]);
    }

    #[test]
    fn test_peak_tie_goes_to_earliest() {
        let records = vec![rec(2024, 5, dec!(100)), rec(2024, 2, dec!(100)), rec(2024, 3, dec!(40))];
        let s = TrendSeries::monthly(&records, Measure::Amount);
        let peak = s.peak.unwrap();
        assert_eq!(peak.month_number, 2);
        assert_eq!(peak.total_amount, dec!(100));
    }

    #[test]
    fn test_empty_series() {
        let s = TrendSeries::monthly(&[], Measure::Amount);
        assert!(s.is_empty());
        assert_eq!(s.peak, None);
    }

    #[test]
    fn test_count_measure() {
        let records = vec![rec(2024, 1, dec!(10)), rec(2024, 1, dec!(20)), rec(2024, 2, dec!(5))];
        let s = TrendSeries::monthly(&records, Measure::TransactionCount);
        assert_eq!(s.points[0].total_amount, dec!(2));
        assert_eq!(s.points[1].total_amount, dec!(1));
    }

    #[test]
    fn test_month_total_saturates() {
        let records = vec![rec(2024, 1, Decimal::MAX), rec(2024, 1, Decimal::MAX)];
        let s = TrendSeries::monthly(&records, Measure::Amount);
        assert_eq!(s.points[0].total_amount, Decimal::MAX);
        assert_eq!(s.peak.unwrap().total_amount, Decimal::MAX);
    }
}
