//! Domain layer for the hotel booking system.
//!
//! This crate holds the pure parts of the system:
//! - Value objects (`Money`, `RoomType`, `TariffType`, `ServiceCode`)
//! - Booking records and the validated reservation intent
//! - Catalog reference data and the price calculation over it
//! - Guest contacts and notification recipients
//! - The generated hotel search

pub mod booking;
pub mod catalog;
pub mod contact;
pub mod error;
pub mod hotel;
pub mod pricing;

pub use booking::{
    Booking, BookingRequest, BookingStatus, DEFAULT_TARIFF, Money, NewBooking, ReservationIntent,
    RoomType, ServiceCode, StayDates, TariffType,
};
pub use catalog::{ExtraService, RoomTypeInfo, TariffRule};
pub use contact::{Channel, DeliveryStatus, GuestContact, Recipient};
pub use error::DomainError;
pub use hotel::{Hotel, SearchQuery, SearchResults};
pub use pricing::{PriceQuote, QuotedExtra};
