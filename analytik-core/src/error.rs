use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid month number {0}: expected a value in 1..=12")]
    InvalidMonth(u32),

    #[error("Invalid month calendar: expected 12 month names, got {0}")]
    InvalidCalendar(usize),
}
