//! Booking records and the reservation intent that creates them.

mod intent;
mod status;
mod value_objects;

pub use intent::{BookingRequest, ReservationIntent, StayDates};
pub use status::BookingStatus;
pub use value_objects::{DEFAULT_TARIFF, Money, RoomType, ServiceCode, TariffType};

use chrono::{DateTime, NaiveDate, Utc};
use common::BookingId;
use serde::{Deserialize, Serialize};

/// A persisted booking for a single room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub hotel_id: i32,
    pub hotel_name: String,
    pub room_type: RoomType,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub extras: Vec<ServiceCode>,
    pub total_price: Money,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Attributes shared by every booking row created by one reservation.
///
/// `total_price` is the charge for the whole request (per-room quote times
/// quantity) and is stored unchanged on each row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub hotel_id: i32,
    pub hotel_name: String,
    pub room_type: RoomType,
    pub stay: StayDates,
    pub extras: Vec<ServiceCode>,
    pub total_price: Money,
}

impl NewBooking {
    /// Materializes a pending booking row with the given identity.
    pub fn to_booking(&self, id: BookingId, created_at: DateTime<Utc>) -> Booking {
        Booking {
            id,
            hotel_id: self.hotel_id,
            hotel_name: self.hotel_name.clone(),
            room_type: self.room_type.clone(),
            check_in: self.stay.check_in(),
            check_out: self.stay.check_out(),
            extras: self.extras.clone(),
            total_price: self.total_price,
            status: BookingStatus::Pending,
            created_at,
        }
    }
}

impl Booking {
    /// Number of nights covered by the booking.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}
