use analytik_core::{MonthCalendar, TOP_N_DEFAULT, TOP_N_MAX, TOP_N_MIN};
use analytik_ingest::{ColumnNames, DEFAULT_DATE_FORMATS, DecimalMark, LoadOptions};
use analytik_reports::DisplayLabels;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{analytik_home, ensure_analytik_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub columns: ColumnNames,
    pub calendar: CalendarSection,
    pub labels: DisplayLabels,
    pub report: ReportSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSection {
    /// Exactly 12 names, January first
    pub months: MonthCalendar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    pub top_n: usize,
    /// chrono formats tried in order for the document date column
    pub date_formats: Vec<String>,
    /// `point` for `1,234.50`, `comma` for `1.234,50`
    pub decimal_mark: DecimalMark,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            top_n: TOP_N_DEFAULT,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
            decimal_mark: DecimalMark::default(),
        }
    }
}

impl Config {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            columns: self.columns.clone(),
            calendar: self.calendar.months.clone(),
            date_formats: self.report.date_formats.clone(),
            decimal_mark: self.report.decimal_mark,
        }
    }

    pub fn default_top_n(&self) -> usize {
        self.report.top_n.clamp(TOP_N_MIN, TOP_N_MAX)
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(analytik_home()?.join("config.toml"))
}

/// An explicit path must exist; the default location falls back to built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => {
            if !p.exists() {
                bail!("config not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => {
            let p = default_config_path()?;
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

pub fn init_config(path: Option<&Path>) -> Result<()> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => ensure_analytik_home()?.join("config.toml"),
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let s = toml::to_string_pretty(&Config::default()).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_default_config_roundtrips_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        assert_eq!(parse_config(&s).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_columns_section() {
        let cfg = parse_config(
            r#"
[columns]
amount = "Monto Neto"
customer = "Razon Social"

[report]
top_n = 99
"#,
        )
        .unwrap();
        assert_eq!(cfg.columns.amount, "Monto Neto");
        assert_eq!(cfg.columns.document_date, "documentDate");
        assert_eq!(cfg.default_top_n(), TOP_N_MAX);
        assert_eq!(cfg.load_options().decimal_mark, DecimalMark::Point);
    }

    #[test]
    fn test_decimal_comma_amounts() {
        let cfg = parse_config(
            r#"
[report]
decimal_mark = "comma"
"#,
        )
        .unwrap();
        assert_eq!(cfg.load_options().decimal_mark, DecimalMark::Comma);
        assert!(parse_config("[report]\ndecimal_mark = \"dot\"\n").is_err());
    }

    #[test]
    fn test_calendar_must_have_twelve_months() {
        let err = parse_config(
            r#"
[calendar]
months = ["Jan", "Feb"]
"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_english_calendar() {
        let cfg = parse_config(
            r#"
[calendar]
months = ["January","February","March","April","May","June","July","August","September","October","November","December"]

[labels]
no_comparison = "No comparison"
"#,
        )
        .unwrap();
        assert_eq!(cfg.calendar.months, MonthCalendar::english());
        assert_eq!(cfg.labels.no_comparison, "No comparison");
        assert_eq!(cfg.labels.currency_symbol, "$");
        assert_eq!(cfg.load_options().calendar, MonthCalendar::english());
    }
}
