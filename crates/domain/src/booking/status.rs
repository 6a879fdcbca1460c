//! Booking status.

use serde::{Deserialize, Serialize};

/// The status of a booking record.
///
/// ```text
/// Pending ──► Confirmed
/// ```
///
/// Confirmation does not inspect the current status, so confirming an
/// already confirmed booking is accepted and leaves it confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Created together with the inventory decrement; awaiting confirmation.
    #[default]
    Pending,

    /// Confirmed by an external trigger such as payment completion.
    Confirmed,
}

impl BookingStatus {
    /// Returns the status name as stored and returned over the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
        }
    }

    /// Parses a stored status name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            _ => None,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
