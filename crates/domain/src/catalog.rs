//! Read-only reference data consumed by pricing and display.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::booking::{Money, RoomType, ServiceCode, TariffType};

/// A room category with its base nightly price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomTypeInfo {
    pub room_type: RoomType,
    pub name: String,
    pub description: String,
    pub base_price: Money,
    pub max_guests: u32,
    pub amenities: Vec<String>,
}

/// A pricing policy applied to the whole stay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffRule {
    pub tariff_type: TariffType,
    pub name: String,
    pub multiplier: Decimal,
    pub description: String,
}

/// An optional add-on, priced flat or per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraService {
    pub service_code: ServiceCode,
    pub name: String,
    pub price: Money,
    pub per_day: bool,
    pub description: String,
}

impl ExtraService {
    /// Price of this extra for a stay of `days` days.
    pub fn price_for(&self, days: u32) -> Money {
        if self.per_day {
            self.price.times(days)
        } else {
            self.price
        }
    }
}
