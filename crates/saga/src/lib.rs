//! Booking reservation saga.
//!
//! The saga turns a booking request into persisted inventory and booking
//! state plus a notification attempt:
//! 1. Price the stay
//! 2. Reserve inventory and create the booking rows as one unit
//! 3. Notify the guest on each contact channel
//!
//! Steps 1 and 2 either both take effect or neither does. Step 3 is best
//! effort: its failures are reported in the outcome and never roll back.

pub mod booking_reservation;
pub mod coordinator;
pub mod error;
pub mod outcome;
pub mod pricing;
pub mod services;

pub use booking_reservation::DOWNSTREAM_TIMEOUT;
pub use coordinator::ReservationCoordinator;
pub use error::{BookingError, DeliveryError, Result};
pub use outcome::{BookingOutcome, CommittedBooking, NotificationOutcome};
pub use pricing::PriceCalculator;
pub use services::{
    Delivery, InMemoryNotificationSink, LogNotificationSink, NotificationSink, compose_message,
};
