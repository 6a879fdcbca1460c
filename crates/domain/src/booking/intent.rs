//! Inbound booking request and its validated form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::contact::GuestContact;
use crate::error::DomainError;

use super::{Money, NewBooking, RoomType, ServiceCode, TariffType};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A check-in/check-out pair with `check_out` strictly after `check_in`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayDates {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayDates {
    /// Creates a stay, rejecting zero-length and inverted ranges.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, DomainError> {
        if check_out <= check_in {
            return Err(DomainError::InvalidDates {
                check_in,
                check_out,
            });
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// Parses ISO 8601 (`YYYY-MM-DD`) dates and validates their order.
    pub fn parse(check_in: &str, check_out: &str) -> Result<Self, DomainError> {
        let check_in = parse_date("check_in", check_in)?;
        let check_out = parse_date("check_out", check_out)?;
        Self::new(check_in, check_out)
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Number of nights; always at least 1.
    pub fn nights(&self) -> u32 {
        let days = (self.check_out - self.check_in).num_days();
        u32::try_from(days).unwrap_or(u32::MAX)
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| DomainError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Booking request as received from a caller, before validation.
///
/// Every field the caller must supply is optional here so that a missing
/// field is reported as a validation error rather than a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub hotel_id: Option<i32>,
    pub hotel_name: Option<String>,
    pub room_type: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub quantity: Option<u32>,
    pub tariff: Option<String>,
    #[serde(default)]
    pub extras: Vec<String>,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
}

/// A validated booking intent ready for pricing and reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationIntent {
    pub hotel_id: i32,
    pub hotel_name: String,
    pub room_type: RoomType,
    pub stay: StayDates,
    pub quantity: u32,
    pub tariff: TariffType,
    pub extras: Vec<ServiceCode>,
    pub guest: GuestContact,
}

impl ReservationIntent {
    /// Builds the shared attributes for the booking rows of this intent.
    pub fn new_booking(&self, total_price: Money) -> NewBooking {
        NewBooking {
            hotel_id: self.hotel_id,
            hotel_name: self.hotel_name.clone(),
            room_type: self.room_type.clone(),
            stay: self.stay,
            extras: self.extras.clone(),
            total_price,
        }
    }

    /// Number of nights in the stay.
    pub fn days(&self) -> u32 {
        self.stay.nights()
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, DomainError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DomainError::MissingField(field)),
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<BookingRequest> for ReservationIntent {
    type Error = DomainError;

    fn try_from(req: BookingRequest) -> Result<Self, Self::Error> {
        let hotel_id = req.hotel_id.ok_or(DomainError::MissingField("hotel_id"))?;
        let hotel_name = required("hotel_name", req.hotel_name)?;
        let room_type = required("room_type", req.room_type)?;
        let check_in = required("check_in", req.check_in)?;
        let check_out = required("check_out", req.check_out)?;
        let guest_name = required("guest_name", req.guest_name)?;

        let stay = StayDates::parse(&check_in, &check_out)?;

        let quantity = req.quantity.unwrap_or(1);
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity(quantity));
        }

        let tariff = optional(req.tariff)
            .map(TariffType::from)
            .unwrap_or_default();

        Ok(Self {
            hotel_id,
            hotel_name,
            room_type: RoomType::from(room_type),
            stay,
            quantity,
            tariff,
            extras: req.extras.into_iter().map(ServiceCode::from).collect(),
            guest: GuestContact {
                name: guest_name,
                email: optional(req.guest_email),
                phone: optional(req.guest_phone),
            },
        })
    }
}
