//! Default reference data and starting inventory.

use domain::{ExtraService, Money, RoomType, RoomTypeInfo, ServiceCode, TariffRule, TariffType};
use rust_decimal::Decimal;

/// Starting stock per room type.
pub fn inventory() -> Vec<(RoomType, u32)> {
    vec![
        (RoomType::new("Standard"), 10),
        (RoomType::new("Luxury"), 5),
        (RoomType::new("Apartment"), 3),
    ]
}

pub fn room_types() -> Vec<RoomTypeInfo> {
    let amenities = |list: &[&str]| list.iter().map(|a| a.to_string()).collect();
    vec![
        RoomTypeInfo {
            room_type: RoomType::new("Standard"),
            name: "Standard room".to_string(),
            description: "Cosy room with the basic amenities".to_string(),
            base_price: Money::from_units(100),
            max_guests: 2,
            amenities: amenities(&["Wi-Fi", "TV", "Air conditioning"]),
        },
        RoomTypeInfo {
            room_type: RoomType::new("Luxury"),
            name: "Luxury suite".to_string(),
            description: "Spacious room with premium amenities and a city view".to_string(),
            base_price: Money::from_units(250),
            max_guests: 3,
            amenities: amenities(&["Wi-Fi", "TV", "Air conditioning", "Minibar", "Jacuzzi"]),
        },
        RoomTypeInfo {
            room_type: RoomType::new("Apartment"),
            name: "Apartment".to_string(),
            description: "Full apartment with kitchen and living room".to_string(),
            base_price: Money::from_units(400),
            max_guests: 4,
            amenities: amenities(&[
                "Wi-Fi",
                "TV",
                "Air conditioning",
                "Kitchen",
                "Washing machine",
                "Balcony",
            ]),
        },
    ]
}

pub fn tariffs() -> Vec<TariffRule> {
    vec![
        TariffRule {
            tariff_type: TariffType::new("Flexible"),
            name: "Flexible rate".to_string(),
            multiplier: Decimal::new(12, 1),
            description: "Free cancellation, +20% on the room price".to_string(),
        },
        TariffRule {
            tariff_type: TariffType::new("NonRefundable"),
            name: "Non-refundable rate".to_string(),
            multiplier: Decimal::new(9, 1),
            description: "No cancellation, 10% off the room price".to_string(),
        },
    ]
}

pub fn extra_services() -> Vec<ExtraService> {
    let extra = |code: &str, name: &str, price: i64, per_day: bool, description: &str| {
        ExtraService {
            service_code: ServiceCode::new(code),
            name: name.to_string(),
            price: Money::from_units(price),
            per_day,
            description: description.to_string(),
        }
    };
    vec![
        extra("minibar", "Minibar", 50, false, "Access to the in-room minibar"),
        extra(
            "late_checkout",
            "Late checkout",
            30,
            false,
            "Check out by 18:00 instead of 12:00",
        ),
        extra("breakfast", "Breakfast", 20, true, "Buffet breakfast"),
        extra("transfer", "Transfer", 40, false, "Airport transfer"),
    ]
}
