//! Shared identifier types for the hotel booking system.

mod types;

pub use types::{BookingId, NotificationId};
