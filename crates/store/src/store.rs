use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{BookingId, NotificationId};
use domain::{
    Booking, Channel, DeliveryStatus, ExtraService, Money, NewBooking, RoomType, RoomTypeInfo,
    ServiceCode, TariffRule, TariffType,
};
use serde::Serialize;

use crate::Result;

/// Read access to room types, tariffs and extra services.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All room types, cheapest first.
    async fn room_types(&self) -> Result<Vec<RoomTypeInfo>>;

    async fn room_type(&self, room_type: &RoomType) -> Result<Option<RoomTypeInfo>>;

    async fn tariffs(&self) -> Result<Vec<TariffRule>>;

    async fn tariff(&self, tariff_type: &TariffType) -> Result<Option<TariffRule>>;

    /// All extra services, cheapest first.
    async fn extra_services(&self) -> Result<Vec<ExtraService>>;

    /// Extra services whose code is in `codes`. Unknown codes are ignored.
    async fn extra_services_by_code(&self, codes: &[ServiceCode]) -> Result<Vec<ExtraService>>;
}

/// Stock level of one room type, as shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomAvailability {
    pub room_type: RoomType,
    pub available: u32,
    pub base_price: Money,
}

/// Answer to "could `requested` rooms be reserved right now?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityCheck {
    pub available: bool,
    pub room_type: RoomType,
    pub requested: u32,
    pub in_stock: u32,
}

/// Per-room-type stock counts with serialized check-and-decrement.
#[async_trait]
pub trait InventoryLedger: Send + Sync {
    /// Current stock, optionally for one room type.
    ///
    /// Not consistent with concurrent reservations; for display only.
    async fn availability(&self, room_type: Option<&RoomType>) -> Result<Vec<RoomAvailability>>;

    /// Non-locking sufficiency check.
    ///
    /// Fails with `RoomTypeNotFound` for an unknown room type.
    async fn check(&self, room_type: &RoomType, quantity: u32) -> Result<AvailabilityCheck>;

    /// Atomically takes `quantity` rooms of `room_type` out of stock.
    ///
    /// Reservations of the same room type are serialized from the
    /// availability check until the decrement is committed. Returns the
    /// stock left afterwards. On `InsufficientInventory` or
    /// `RoomTypeNotFound` nothing is written.
    async fn reserve(&self, room_type: &RoomType, quantity: u32) -> Result<u32>;
}

/// Durable booking records.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn get(&self, id: BookingId) -> Result<Option<Booking>>;

    /// Sets the booking to `confirmed` whatever its current status.
    ///
    /// Returns `None` if the booking does not exist.
    async fn confirm(&self, id: BookingId) -> Result<Option<Booking>>;
}

/// The unit of work that reserves stock and records bookings together.
///
/// Reads the current count of `booking.room_type`, asserts it covers
/// `quantity`, writes the new count and writes `quantity` pending booking
/// rows. All of it commits or none of it does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationUnit {
    pub booking: NewBooking,
    pub quantity: u32,
}

impl ReservationUnit {
    pub fn new(booking: NewBooking, quantity: u32) -> Self {
        Self { booking, quantity }
    }

    pub fn room_type(&self) -> &RoomType {
        &self.booking.room_type
    }
}

/// Result of a committed [`ReservationUnit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedReservation {
    pub booking_ids: Vec<BookingId>,
    pub remaining: u32,
}

/// Stores that can run a [`ReservationUnit`] as one transaction.
#[async_trait]
pub trait ReservationStore: InventoryLedger + BookingStore {
    async fn reserve_and_create(&self, unit: ReservationUnit) -> Result<CommittedReservation>;
}

/// A recorded notification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationRecord {
    pub id: NotificationId,
    pub booking_id: BookingId,
    pub channel: Channel,
    pub recipient: String,
    pub message: String,
    pub status: DeliveryStatus,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Append-only log of notification attempts.
#[async_trait]
pub trait NotificationLog: Send + Sync {
    async fn record(&self, record: NotificationRecord) -> Result<()>;

    /// Attempts for one booking, oldest first.
    async fn for_booking(&self, booking_id: BookingId) -> Result<Vec<NotificationRecord>>;
}

/// Everything the gateway needs from a single backend.
pub trait Storage: CatalogStore + ReservationStore + NotificationLog + Clone + 'static {}

impl<T> Storage for T where
    T: CatalogStore + ReservationStore + NotificationLog + Clone + 'static
{
}
