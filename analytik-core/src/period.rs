//! Calendar periods: the year/month fields derived from a document date.
//!
//! The month-name table is injected configuration, so switching the locale of
//! labels is a matter of constructing a different [`MonthCalendar`].

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const SPANISH_MONTHS: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

const ENGLISH_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Fixed, ordered table of 12 localized month names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct MonthCalendar {
    names: Vec<String>,
}

impl MonthCalendar {
    pub fn new(names: Vec<String>) -> Result<Self, CoreError> {
        if names.len() != 12 {
            return Err(CoreError::InvalidCalendar(names.len()));
        }
        Ok(Self { names })
    }

    pub fn spanish() -> Self {
        Self::from_static(&SPANISH_MONTHS)
    }

    pub fn english() -> Self {
        Self::from_static(&ENGLISH_MONTHS)
    }

    fn from_static(names: &[&str; 12]) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Name for a 1-based month number.
    pub fn month_name(&self, month_number: u32) -> Result<&str, CoreError> {
        if !(1..=12).contains(&month_number) {
            return Err(CoreError::InvalidMonth(month_number));
        }
        self.names
            .get(month_number as usize - 1)
            .map(String::as_str)
            .ok_or(CoreError::InvalidMonth(month_number))
    }

    /// Reverse lookup, exact match on the configured name.
    pub fn month_number(&self, name: &str) -> Option<u32> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| i as u32 + 1)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Derive the period fields of a date. Independent of locale settings and
    /// of the system clock.
    pub fn label(&self, date: NaiveDate) -> Result<Period, CoreError> {
        let month_number = date.month();
        let month_name = self.month_name(month_number)?.to_string();
        Ok(Period {
            year: date.year(),
            month_number,
            month_name,
        })
    }
}

impl Default for MonthCalendar {
    fn default() -> Self {
        Self::spanish()
    }
}

impl TryFrom<Vec<String>> for MonthCalendar {
    type Error = CoreError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(names)
    }
}

impl From<MonthCalendar> for Vec<String> {
    fn from(calendar: MonthCalendar) -> Self {
        calendar.names
    }
}

/// Year + month derived once per load and attached to each record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    /// 1-12
    pub month_number: u32,
    pub month_name: String,
}
