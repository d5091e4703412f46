//! Cell-level parsing for amounts and document dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::LazyLock;

/// Currency symbols and whitespace.
static AMOUNT_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s$€£]").expect("static regex"));

/// Largest accepted amount magnitude. Keeps sums over any realistic row
/// count inside `Decimal` range.
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000_000_000;

/// Which character separates the decimal part of an amount. The other one
/// of `.` / `,` is read as a thousands separator and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecimalMark {
    /// `1,234.50`
    #[default]
    Point,
    /// `1.234,50`
    Comma,
}

pub const DEFAULT_DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d/%m/%Y %H:%M:%S",
];

/// Outcome of reading an amount cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountCell {
    Value(Decimal),
    /// Blank cell, counts as zero
    Blank,
    Invalid,
}

impl AmountCell {
    pub fn value(self) -> Option<Decimal> {
        match self {
            AmountCell::Value(d) => Some(d),
            AmountCell::Blank => Some(Decimal::ZERO),
            AmountCell::Invalid => None,
        }
    }
}

/// Amounts beyond [`MAX_AMOUNT_UNITS`] in magnitude are `Invalid`.
pub fn parse_amount(s: &str, mark: DecimalMark) -> AmountCell {
    let s = s.trim();
    if s.is_empty() {
        return AmountCell::Blank;
    }
    let cleaned = AMOUNT_NOISE.replace_all(s, "");
    let cleaned = match mark {
        DecimalMark::Point => cleaned.replace(',', ""),
        DecimalMark::Comma => cleaned.replace('.', "").replace(',', "."),
    };
    let Ok(d) = Decimal::from_str(&cleaned).or_else(|_| Decimal::from_scientific(&cleaned)) else {
        return AmountCell::Invalid;
    };
    if d.abs() > Decimal::from(MAX_AMOUNT_UNITS) {
        return AmountCell::Invalid;
    }
    AmountCell::Value(d)
}

/// Parse a date cell, truncating any time component to the calendar date.
/// Formats are tried in order; RFC 3339 is always accepted last.
pub fn parse_document_date<S: AsRef<str>>(s: &str, formats: &[S]) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in formats {
        let fmt = fmt.as_ref();
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount_plain_and_formatted() {
        let p = DecimalMark::Point;
        assert_eq!(parse_amount("1500", p), AmountCell::Value(dec!(1500)));
        assert_eq!(parse_amount(" -15.25 ", p), AmountCell::Value(dec!(-15.25)));
        assert_eq!(parse_amount("$1,234,567.89", p), AmountCell::Value(dec!(1234567.89)));
        assert_eq!(parse_amount("1.5e3", p), AmountCell::Value(dec!(1500)));
    }

    #[test]
    fn test_parse_amount_decimal_comma() {
        let c = DecimalMark::Comma;
        assert_eq!(parse_amount("1.234", c), AmountCell::Value(dec!(1234)));
        assert_eq!(parse_amount("$ 1.234.567", c), AmountCell::Value(dec!(1234567)));
        assert_eq!(parse_amount("-15,25", c), AmountCell::Value(dec!(-15.25)));
        assert_eq!(parse_amount("1.234", DecimalMark::Point), AmountCell::Value(dec!(1.234)));
    }

    #[test]
    fn test_parse_amount_blank_and_invalid() {
        let p = DecimalMark::Point;
        assert_eq!(parse_amount("  ", p), AmountCell::Blank);
        assert_eq!(parse_amount("", p).value(), Some(Decimal::ZERO));
        assert_eq!(parse_amount("n/a", p), AmountCell::Invalid);
        assert_eq!(parse_amount("n/a", p).value(), None);
    }

    #[test]
    fn test_parse_amount_rejects_huge_magnitudes() {
        let p = DecimalMark::Point;
        assert_eq!(parse_amount("5e28", p), AmountCell::Invalid);
        assert_eq!(parse_amount("-5e28", p), AmountCell::Invalid);
        assert_eq!(parse_amount("1e18", p), AmountCell::Value(dec!(1000000000000000000)));
        assert_eq!(parse_amount("1000000000000000001", p), AmountCell::Invalid);
    }

    #[test]
    fn test_parse_document_date_formats() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_document_date("2024-03-05", &DEFAULT_DATE_FORMATS), Some(d));
        assert_eq!(parse_document_date("2024-03-05 17:45:00", &DEFAULT_DATE_FORMATS), Some(d));
        assert_eq!(parse_document_date("05/03/2024", &DEFAULT_DATE_FORMATS), Some(d));
        assert_eq!(parse_document_date("2024-03-05T23:59:59+02:00", &DEFAULT_DATE_FORMATS), Some(d));
    }

    #[test]
    fn test_parse_document_date_rejects_garbage() {
        assert_eq!(parse_document_date("", &DEFAULT_DATE_FORMATS), None);
        assert_eq!(parse_document_date("not a date", &DEFAULT_DATE_FORMATS), None);
        assert_eq!(parse_document_date("2024-02-30", &DEFAULT_DATE_FORMATS), None);
    }
}
