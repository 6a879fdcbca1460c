//! Notification sink trait and implementations.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use common::BookingId;
use domain::{Channel, Recipient, ReservationIntent};

use crate::error::DeliveryError;

/// Delivers one message to one recipient on one channel.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(
        &self,
        booking_id: BookingId,
        recipient: &Recipient,
        message: &str,
    ) -> Result<(), DeliveryError>;
}

/// Builds the guest message for `channel`.
pub fn compose_message(
    channel: Channel,
    booking_id: BookingId,
    intent: &ReservationIntent,
) -> String {
    match channel {
        Channel::Email => format!(
            "Dear {}, your booking {} at {} has been received: {} room, {} to {}. Status: pending.",
            intent.guest.name,
            booking_id,
            intent.hotel_name,
            intent.room_type,
            intent.stay.check_in(),
            intent.stay.check_out(),
        ),
        Channel::Sms => format!(
            "Booking {} at {} received ({} to {}).",
            booking_id,
            intent.hotel_name,
            intent.stay.check_in(),
            intent.stay.check_out(),
        ),
    }
}

/// Sink that writes each message to the application log.
#[derive(Debug, Clone, Default)]
pub struct LogNotificationSink;

impl LogNotificationSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSink for LogNotificationSink {
    async fn notify(
        &self,
        booking_id: BookingId,
        recipient: &Recipient,
        message: &str,
    ) -> Result<(), DeliveryError> {
        tracing::info!(
            %booking_id,
            channel = %recipient.channel,
            recipient = %recipient.address,
            message,
            "notification sent"
        );
        Ok(())
    }
}

/// A message accepted by [`InMemoryNotificationSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub booking_id: BookingId,
    pub recipient: Recipient,
    pub message: String,
}

#[derive(Debug, Default)]
struct InMemorySinkState {
    deliveries: Vec<Delivery>,
    failing: HashSet<Channel>,
    delay: Option<Duration>,
}

/// In-memory notification sink for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationSink {
    state: Arc<Mutex<InMemorySinkState>>,
}

impl InMemoryNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, InMemorySinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes every delivery on `channel` fail while set.
    pub fn set_fail_on_channel(&self, channel: Channel, fail: bool) {
        let mut state = self.state();
        if fail {
            state.failing.insert(channel);
        } else {
            state.failing.remove(&channel);
        }
    }

    /// Delays every delivery by `delay`.
    pub fn set_delay(&self, delay: Option<Duration>) {
        self.state().delay = delay;
    }

    /// Returns the number of accepted messages.
    pub fn sent_count(&self) -> usize {
        self.state().deliveries.len()
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.state().deliveries.clone()
    }
}

#[async_trait]
impl NotificationSink for InMemoryNotificationSink {
    async fn notify(
        &self,
        booking_id: BookingId,
        recipient: &Recipient,
        message: &str,
    ) -> Result<(), DeliveryError> {
        let delay = self.state().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state();
        if state.failing.contains(&recipient.channel) {
            return Err(DeliveryError::Rejected(format!(
                "{} gateway rejected the message",
                recipient.channel
            )));
        }

        state.deliveries.push(Delivery {
            booking_id,
            recipient: recipient.clone(),
            message: message.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::BookingRequest;

    fn email() -> Recipient {
        Recipient {
            channel: Channel::Email,
            address: "ana@example.com".to_string(),
        }
    }

    fn sms() -> Recipient {
        Recipient {
            channel: Channel::Sms,
            address: "+351900000000".to_string(),
        }
    }

    #[tokio::test]
    async fn test_accepts_and_records() {
        let sink = InMemoryNotificationSink::new();
        let booking_id = BookingId::new();

        sink.notify(booking_id, &email(), "hello").await.unwrap();

        assert_eq!(sink.sent_count(), 1);
        let delivery = &sink.deliveries()[0];
        assert_eq!(delivery.booking_id, booking_id);
        assert_eq!(delivery.recipient, email());
    }

    #[tokio::test]
    async fn test_fail_on_channel() {
        let sink = InMemoryNotificationSink::new();
        sink.set_fail_on_channel(Channel::Sms, true);

        let result = sink.notify(BookingId::new(), &sms(), "hello").await;
        assert!(matches!(result, Err(DeliveryError::Rejected(_))));
        assert!(sink.notify(BookingId::new(), &email(), "hello").await.is_ok());
        assert_eq!(sink.sent_count(), 1);

        sink.set_fail_on_channel(Channel::Sms, false);
        assert!(sink.notify(BookingId::new(), &sms(), "hello").await.is_ok());
    }

    #[tokio::test]
    async fn test_log_sink_always_succeeds() {
        let sink = LogNotificationSink::new();
        assert!(sink.notify(BookingId::new(), &sms(), "hello").await.is_ok());
    }

    #[test]
    fn test_compose_message_per_channel() {
        let intent = ReservationIntent::try_from(BookingRequest {
            hotel_id: Some(1),
            hotel_name: Some("Hotel Porto City".to_string()),
            room_type: Some("Luxury".to_string()),
            check_in: Some("2025-12-15".to_string()),
            check_out: Some("2025-12-17".to_string()),
            guest_name: Some("Ana".to_string()),
            ..Default::default()
        })
        .unwrap();
        let booking_id = BookingId::new();

        let email = compose_message(Channel::Email, booking_id, &intent);
        assert!(email.starts_with("Dear Ana"));
        assert!(email.contains(&booking_id.to_string()));
        assert!(email.contains("Luxury"));

        let sms = compose_message(Channel::Sms, booking_id, &intent);
        assert!(sms.contains("Hotel Porto City"));
        assert!(sms.contains("2025-12-15 to 2025-12-17"));
    }
}
