//! Saga coordinator for the booking reservation.

use std::time::{Duration, Instant};

use chrono::Utc;
use common::{BookingId, NotificationId};
use domain::{
    Booking, BookingRequest, BookingStatus, DeliveryStatus, ExtraService, Recipient,
    ReservationIntent, RoomType, RoomTypeInfo, TariffRule,
};
use store::{AvailabilityCheck, NotificationRecord, ReservationUnit, RoomAvailability, Storage};

use crate::booking_reservation::{self, DOWNSTREAM_TIMEOUT, bounded};
use crate::error::{BookingError, DeliveryError, Result};
use crate::outcome::{BookingOutcome, CommittedBooking, NotificationOutcome};
use crate::pricing::PriceCalculator;
use crate::services::notification::{NotificationSink, compose_message};

/// Orchestrates booking reservation sagas.
///
/// The saga has two phases. The transactional phase prices the stay and
/// reserves stock together with the booking rows in one unit of work; any
/// failure there ends the saga with nothing persisted. The best-effort phase
/// notifies the guest once per contact channel. Its failures are recorded
/// and reported but never undo the reservation, and there is no
/// compensation step.
pub struct ReservationCoordinator<S, N>
where
    S: Storage,
    N: NotificationSink,
{
    store: S,
    pricing: PriceCalculator<S>,
    notifier: N,
    timeout: Duration,
}

impl<S, N> ReservationCoordinator<S, N>
where
    S: Storage,
    N: NotificationSink,
{
    /// Creates a new coordinator over `store` and `notifier`.
    pub fn new(store: S, notifier: N) -> Self {
        let pricing = PriceCalculator::new(store.clone());
        Self {
            store,
            pricing,
            notifier,
            timeout: DOWNSTREAM_TIMEOUT,
        }
    }

    /// Overrides the bound on every downstream call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.pricing = self.pricing.with_timeout(timeout);
        self.timeout = timeout;
        self
    }

    pub fn pricing(&self) -> &PriceCalculator<S> {
        &self.pricing
    }

    /// Validates `request` and runs the booking saga for it.
    #[tracing::instrument(skip(self, request), fields(saga_type = booking_reservation::SAGA_TYPE))]
    pub async fn book(&self, request: BookingRequest) -> Result<BookingOutcome> {
        metrics::counter!("booking_saga_executions_total").increment(1);
        let saga_start = Instant::now();

        let result = match ReservationIntent::try_from(request) {
            Ok(intent) => self.book_intent(&intent).await,
            Err(e) => {
                tracing::info!(error = %e, "booking request rejected");
                Err(e.into())
            }
        };

        metrics::histogram!("booking_saga_duration_seconds")
            .record(saga_start.elapsed().as_secs_f64());
        result
    }

    /// Runs the booking saga for an already validated intent.
    pub async fn book_intent(&self, intent: &ReservationIntent) -> Result<BookingOutcome> {
        let booking = self.commit(intent).await?;
        let notifications = self.notify_guest(intent, &booking).await;

        tracing::info!(
            booking_ids = ?booking.booking_ids,
            total_price = %booking.total_price,
            notifications_failed = notifications
                .iter()
                .filter(|n| n.status == DeliveryStatus::Failed)
                .count(),
            "saga completed"
        );

        Ok(BookingOutcome {
            booking,
            notifications,
        })
    }

    async fn commit(&self, intent: &ReservationIntent) -> Result<CommittedBooking> {
        tracing::info!(
            step = booking_reservation::STEP_CALCULATE_PRICE,
            room_type = %intent.room_type,
            days = intent.days(),
            "saga step started"
        );
        let quote = self
            .pricing
            .calculate(
                &intent.room_type,
                intent.days(),
                &intent.tariff,
                &intent.extras,
            )
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    step = booking_reservation::STEP_CALCULATE_PRICE,
                    error = %e,
                    "saga step failed"
                )
            })?;
        let total_price = quote.total_for(intent.quantity);

        tracing::info!(
            step = booking_reservation::STEP_RESERVE_AND_CREATE,
            room_type = %intent.room_type,
            quantity = intent.quantity,
            "saga step started"
        );
        let unit = ReservationUnit::new(intent.new_booking(total_price), intent.quantity);
        let committed = bounded("store", self.timeout, self.store.reserve_and_create(unit))
            .await
            .inspect_err(|e| {
                if matches!(e, BookingError::InsufficientInventory { .. }) {
                    metrics::counter!("inventory_reservations_rejected_total").increment(1);
                }
                tracing::warn!(
                    step = booking_reservation::STEP_RESERVE_AND_CREATE,
                    error = %e,
                    "saga step failed"
                )
            })?;

        metrics::counter!("bookings_created_total").increment(committed.booking_ids.len() as u64);

        Ok(CommittedBooking {
            booking_ids: committed.booking_ids,
            status: BookingStatus::Pending,
            quote,
            total_price,
            quantity: intent.quantity,
            remaining: committed.remaining,
        })
    }

    /// Sends one message per contact channel. Never fails.
    async fn notify_guest(
        &self,
        intent: &ReservationIntent,
        booking: &CommittedBooking,
    ) -> Vec<NotificationOutcome> {
        let Some(&booking_id) = booking.booking_ids.first() else {
            return Vec::new();
        };

        tracing::info!(
            step = booking_reservation::STEP_NOTIFY_GUEST,
            %booking_id,
            "saga step started"
        );

        let mut outcomes = Vec::new();
        for recipient in intent.guest.recipients() {
            let message = compose_message(recipient.channel, booking_id, intent);
            let delivery = tokio::time::timeout(
                self.timeout,
                self.notifier.notify(booking_id, &recipient, &message),
            )
            .await
            .unwrap_or(Err(DeliveryError::TimedOut(self.timeout)));

            let outcome = match delivery {
                Ok(()) => {
                    metrics::counter!("notifications_sent_total").increment(1);
                    NotificationOutcome {
                        channel: recipient.channel,
                        recipient: recipient.address.clone(),
                        status: DeliveryStatus::Sent,
                        error: None,
                    }
                }
                Err(e) => {
                    metrics::counter!("notifications_failed_total").increment(1);
                    tracing::warn!(
                        %booking_id,
                        channel = %recipient.channel,
                        error = %e,
                        "notification failed"
                    );
                    NotificationOutcome {
                        channel: recipient.channel,
                        recipient: recipient.address.clone(),
                        status: DeliveryStatus::Failed,
                        error: Some(e.to_string()),
                    }
                }
            };

            self.record_attempt(booking_id, &recipient, message, &outcome)
                .await;
            outcomes.push(outcome);
        }
        outcomes
    }

    async fn record_attempt(
        &self,
        booking_id: BookingId,
        recipient: &Recipient,
        message: String,
        outcome: &NotificationOutcome,
    ) {
        let record = NotificationRecord {
            id: NotificationId::new(),
            booking_id,
            channel: recipient.channel,
            recipient: recipient.address.clone(),
            message,
            status: outcome.status,
            error: outcome.error.clone(),
            created_at: Utc::now(),
        };

        if let Err(e) = bounded("notification_log", self.timeout, self.store.record(record)).await {
            tracing::warn!(%booking_id, error = %e, "failed to record notification attempt");
        }
    }

    /// Loads one booking.
    pub async fn booking(&self, id: BookingId) -> Result<Booking> {
        bounded("store", self.timeout, self.store.get(id))
            .await?
            .ok_or_else(|| BookingError::not_found("booking", id))
    }

    /// Moves a booking to `confirmed` whatever its current status.
    #[tracing::instrument(skip(self))]
    pub async fn confirm(&self, id: BookingId) -> Result<Booking> {
        let booking = bounded("store", self.timeout, self.store.confirm(id))
            .await?
            .ok_or_else(|| BookingError::not_found("booking", id))?;
        tracing::info!(booking_id = %id, "booking confirmed");
        Ok(booking)
    }

    /// Recorded notification attempts for a booking, oldest first.
    pub async fn notifications(&self, id: BookingId) -> Result<Vec<NotificationRecord>> {
        bounded("notification_log", self.timeout, self.store.for_booking(id)).await
    }

    // -- Reference data and stock, read under the same bound as the saga --

    pub async fn room_types(&self) -> Result<Vec<RoomTypeInfo>> {
        bounded("catalog", self.timeout, self.store.room_types()).await
    }

    pub async fn room_type(&self, room_type: &RoomType) -> Result<RoomTypeInfo> {
        bounded("catalog", self.timeout, self.store.room_type(room_type))
            .await?
            .ok_or_else(|| BookingError::not_found("room_type", room_type))
    }

    pub async fn tariffs(&self) -> Result<Vec<TariffRule>> {
        bounded("catalog", self.timeout, self.store.tariffs()).await
    }

    pub async fn extra_services(&self) -> Result<Vec<ExtraService>> {
        bounded("catalog", self.timeout, self.store.extra_services()).await
    }

    /// Current stock without taking any lock; `None` lists every room type.
    pub async fn availability(
        &self,
        room_type: Option<&RoomType>,
    ) -> Result<Vec<RoomAvailability>> {
        bounded("inventory", self.timeout, self.store.availability(room_type)).await
    }

    pub async fn check_availability(
        &self,
        room_type: &RoomType,
        quantity: u32,
    ) -> Result<AvailabilityCheck> {
        bounded("inventory", self.timeout, self.store.check(room_type, quantity)).await
    }
}
