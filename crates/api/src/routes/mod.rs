//! HTTP route handlers.

pub mod bookings;
pub mod catalog;
pub mod health;
pub mod hotels;
pub mod metrics;

use saga::{NotificationSink, ReservationCoordinator};
use store::Storage;

/// Shared application state accessible from all handlers.
pub struct AppState<S: Storage, N: NotificationSink> {
    pub coordinator: ReservationCoordinator<S, N>,
}
