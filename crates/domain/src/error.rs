//! Domain error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Validation failures raised before any side effect takes place.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A required field is absent or blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A date could not be parsed as `YYYY-MM-DD`.
    #[error("Invalid date format for {field}: {value}")]
    InvalidDate { field: &'static str, value: String },

    /// The stay is empty or inverted.
    #[error("Invalid dates: check_out {check_out} must be after check_in {check_in}")]
    InvalidDates {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    /// Quantity must be at least one room.
    #[error("Invalid quantity: {0} (must be at least 1)")]
    InvalidQuantity(u32),

    /// Stay length must be at least one day.
    #[error("Invalid number of days: {0} (must be at least 1)")]
    InvalidDays(u32),
}
