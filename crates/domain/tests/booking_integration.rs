//! Integration tests for the booking domain.
//!
//! These tests walk a raw booking request through validation, pricing and
//! booking-row materialization without any storage.

use chrono::{TimeZone, Utc};
use common::BookingId;
use domain::{
    BookingRequest, BookingStatus, DomainError, ExtraService, Money, ReservationIntent,
    RoomType, RoomTypeInfo, ServiceCode, TariffRule, TariffType, pricing,
};
use rust_decimal_macros::dec;

fn luxury() -> RoomTypeInfo {
    RoomTypeInfo {
        room_type: RoomType::new("Luxury"),
        name: "Luxury suite".to_string(),
        description: String::new(),
        base_price: Money::new(dec!(250)),
        max_guests: 3,
        amenities: vec![],
    }
}

fn non_refundable() -> TariffRule {
    TariffRule {
        tariff_type: TariffType::new("NonRefundable"),
        name: "Non-refundable rate".to_string(),
        multiplier: dec!(0.9),
        description: String::new(),
    }
}

fn catalog() -> Vec<ExtraService> {
    let extra = |code: &str, price, per_day| ExtraService {
        service_code: ServiceCode::new(code),
        name: code.to_string(),
        price: Money::new(price),
        per_day,
        description: String::new(),
    };
    vec![
        extra("breakfast", dec!(20), true),
        extra("minibar", dec!(50), false),
    ]
}

fn request() -> BookingRequest {
    BookingRequest {
        hotel_id: Some(2),
        hotel_name: Some("Hotel Porto Resort".to_string()),
        room_type: Some("Luxury".to_string()),
        check_in: Some("2025-12-15".to_string()),
        check_out: Some("2025-12-17".to_string()),
        quantity: Some(2),
        tariff: Some("NonRefundable".to_string()),
        extras: vec!["breakfast".to_string(), "minibar".to_string(), "spa".to_string()],
        guest_name: Some("Ana Silva".to_string()),
        guest_email: Some("ana@example.com".to_string()),
        guest_phone: None,
    }
}

mod booking_pipeline {
    use super::*;

    #[test]
    fn request_to_priced_booking_rows() {
        let intent = ReservationIntent::try_from(request()).unwrap();
        assert_eq!(intent.days(), 2);

        let quote = pricing::quote(
            &luxury(),
            &non_refundable(),
            intent.days(),
            &intent.extras,
            &catalog(),
        )
        .unwrap();
        assert_eq!(quote.room_total, Money::new(dec!(450)));
        assert_eq!(quote.extras_total, Money::new(dec!(90)));
        assert_eq!(quote.total_price, Money::new(dec!(540)));

        let total = quote.total_for(intent.quantity);
        assert_eq!(total, Money::new(dec!(1080)));

        let new_booking = intent.new_booking(total);
        let created_at = Utc.with_ymd_and_hms(2025, 11, 1, 12, 0, 0).unwrap();
        let first = new_booking.to_booking(BookingId::new(), created_at);
        let second = new_booking.to_booking(BookingId::new(), created_at);

        assert_ne!(first.id, second.id);
        assert_eq!(first.status, BookingStatus::Pending);
        assert_eq!(first.total_price, second.total_price);
        assert_eq!(first.extras, second.extras);
        assert_eq!(first.nights(), 2);
    }

    #[test]
    fn invalid_request_never_reaches_pricing() {
        let mut req = request();
        req.check_out = Some("2025-12-14".to_string());

        let result = ReservationIntent::try_from(req);
        assert!(matches!(result, Err(DomainError::InvalidDates { .. })));
    }
}

mod serialization {
    use super::*;

    #[test]
    fn booking_request_accepts_minimal_json() {
        let req: BookingRequest = serde_json::from_str(
            r#"{"hotel_id": 1, "hotel_name": "H", "room_type": "Standard",
                "check_in": "2025-12-15", "check_out": "2025-12-16",
                "guest_name": "Ana"}"#,
        )
        .unwrap();

        let intent = ReservationIntent::try_from(req).unwrap();
        assert_eq!(intent.quantity, 1);
        assert_eq!(intent.tariff, TariffType::default());
        assert!(intent.extras.is_empty());
        assert!(intent.guest.recipients().is_empty());
    }

    #[test]
    fn quote_serializes_money_as_numbers() {
        let quote = pricing::quote(&luxury(), &non_refundable(), 2, &[], &catalog()).unwrap();
        let json = serde_json::to_value(&quote).unwrap();

        assert_eq!(json["room_type"], "Luxury");
        assert_eq!(json["total_price"], 450.0);
        assert_eq!(json["tariff_multiplier"], 0.9);
    }
}
