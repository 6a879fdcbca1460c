//! Results of the two saga phases.

use common::BookingId;
use domain::{BookingStatus, Channel, DeliveryStatus, Money, PriceQuote};
use serde::Serialize;

/// What the transactional phase committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommittedBooking {
    pub booking_ids: Vec<BookingId>,
    pub status: BookingStatus,
    /// Per-room quote.
    pub quote: PriceQuote,
    /// Charge for all rooms, stored on every booking row.
    pub total_price: Money,
    pub quantity: u32,
    /// Stock left for the room type right after the commit.
    pub remaining: u32,
}

/// Outcome of one notification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationOutcome {
    pub channel: Channel,
    pub recipient: String,
    pub status: DeliveryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A committed booking plus what happened when the guest was notified.
///
/// Notification failures never turn a committed booking into an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingOutcome {
    pub booking: CommittedBooking,
    pub notifications: Vec<NotificationOutcome>,
}

impl BookingOutcome {
    /// The id notifications are sent for.
    pub fn primary_booking_id(&self) -> Option<BookingId> {
        self.booking.booking_ids.first().copied()
    }

    pub fn failed_notifications(&self) -> usize {
        self.notifications
            .iter()
            .filter(|n| n.status == DeliveryStatus::Failed)
            .count()
    }
}
