//! Price calculation for a stay.
//!
//! `room_total = base_price * days * multiplier`, plus one line per
//! requested extra found in the catalog. Unknown extra codes are skipped
//! without error, unlike unknown room types and tariffs which the caller
//! must reject before calling [`quote`]. The grand total is rounded to two
//! decimal places here and nowhere else.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::booking::{Money, RoomType, ServiceCode, TariffType};
use crate::catalog::{ExtraService, RoomTypeInfo, TariffRule};
use crate::error::DomainError;

/// One priced extra in a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotedExtra {
    pub code: ServiceCode,
    pub name: String,
    pub price: Money,
    pub per_day: bool,
}

/// Itemized price of a stay for a single room. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub room_type: RoomType,
    pub base_price: Money,
    pub days: u32,
    pub tariff: TariffType,
    pub tariff_multiplier: Decimal,
    pub room_total: Money,
    pub extras: Vec<QuotedExtra>,
    pub extras_total: Money,
    pub total_price: Money,
}

impl PriceQuote {
    /// Charge for `quantity` identical rooms.
    ///
    /// `total_price` is already rounded, so the product needs no further
    /// rounding.
    pub fn total_for(&self, quantity: u32) -> Money {
        self.total_price.times(quantity)
    }
}

/// Prices a stay of `days` days.
///
/// `catalog` is searched for each code in `requested`; the order of
/// `requested` is kept in the itemization, and a code requested twice is
/// charged twice.
pub fn quote(
    room: &RoomTypeInfo,
    tariff: &TariffRule,
    days: u32,
    requested: &[ServiceCode],
    catalog: &[ExtraService],
) -> Result<PriceQuote, DomainError> {
    if days < 1 {
        return Err(DomainError::InvalidDays(days));
    }

    let room_total = room.base_price.times(days).scale(tariff.multiplier);

    let extras: Vec<QuotedExtra> = requested
        .iter()
        .filter_map(|code| catalog.iter().find(|e| &e.service_code == code))
        .map(|extra| QuotedExtra {
            code: extra.service_code.clone(),
            name: extra.name.clone(),
            price: extra.price_for(days),
            per_day: extra.per_day,
        })
        .collect();

    let extras_total: Money = extras.iter().map(|e| e.price).sum();
    let total_price = (room_total + extras_total).rounded();

    Ok(PriceQuote {
        room_type: room.room_type.clone(),
        base_price: room.base_price,
        days,
        tariff: tariff.tariff_type.clone(),
        tariff_multiplier: tariff.multiplier,
        room_total,
        extras,
        extras_total,
        total_price,
    })
}
