//! analytik-core: typed sales records, calendar periods, and filters

pub mod error;
pub mod filter;
pub mod period;
pub mod record;

pub use error::CoreError;
pub use filter::{FilterEngine, FilterOptions, FilterState, TOP_N_DEFAULT, TOP_N_MAX, TOP_N_MIN};
pub use period::{MonthCalendar, Period};
pub use record::TransactionRecord;
