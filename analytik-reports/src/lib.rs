//! analytik-reports: comparative KPIs, rankings, monthly trends, and the dashboard pass

pub mod dashboard;
pub mod display;
pub mod error;
pub mod kpi;
pub mod measure;
pub mod ranking;
pub mod trend;

pub use dashboard::{Dashboard, DashboardSnapshot, Loader, TableCache};
pub use display::{DeltaTone, DisplayLabels, KpiCard, format_currency, format_delta, kpi_cards, peak_summary};
pub use error::ReportError;
pub use kpi::{ComparativeKpi, ComparativePeriodResult, delta_pct};
pub use measure::{EntityKey, Measure};
pub use ranking::{RankingAggregator, RankingEntry, RankingResult};
pub use trend::{TrendPoint, TrendSeries};
