use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CardError {
    /// A counter read from the store can't be represented, e.g. a negative lapse count.
    #[error("{field} must be a non-negative count, got {value}")]
    InvalidCounter { field: &'static str, value: i64 },

    #[error("unknown review outcome '{0}'")]
    UnknownOutcome(String),
}
