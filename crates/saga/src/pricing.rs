//! Price calculation backed by the reference-data catalog.

use std::time::Duration;

use domain::{DomainError, PriceQuote, RoomType, ServiceCode, TariffType, pricing};
use store::CatalogStore;

use crate::booking_reservation::{DOWNSTREAM_TIMEOUT, bounded};
use crate::error::{BookingError, Result};

/// Looks up catalog entries and prices a stay.
///
/// Holds no state of its own; safe to share between concurrent requests.
#[derive(Clone)]
pub struct PriceCalculator<C> {
    catalog: C,
    timeout: Duration,
}

impl<C: CatalogStore> PriceCalculator<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            timeout: DOWNSTREAM_TIMEOUT,
        }
    }

    /// Overrides the bound on each catalog lookup.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Prices `days` days of `room_type` under `tariff` with `extras`.
    ///
    /// Unknown room types and tariffs are `EntityNotFound`; unknown extras
    /// are skipped.
    #[tracing::instrument(
        skip(self, room_type, tariff, extras),
        fields(room_type = %room_type, tariff = %tariff)
    )]
    pub async fn calculate(
        &self,
        room_type: &RoomType,
        days: u32,
        tariff: &TariffType,
        extras: &[ServiceCode],
    ) -> Result<PriceQuote> {
        if days < 1 {
            return Err(DomainError::InvalidDays(days).into());
        }

        let room = bounded("catalog", self.timeout, self.catalog.room_type(room_type))
            .await?
            .ok_or_else(|| BookingError::not_found("room_type", room_type))?;

        let rule = bounded("catalog", self.timeout, self.catalog.tariff(tariff))
            .await?
            .ok_or_else(|| BookingError::not_found("tariff", tariff))?;

        let catalog_extras = if extras.is_empty() {
            Vec::new()
        } else {
            bounded(
                "catalog",
                self.timeout,
                self.catalog.extra_services_by_code(extras),
            )
            .await?
        };

        Ok(pricing::quote(&room, &rule, days, extras, &catalog_extras)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::Money;
    use rust_decimal_macros::dec;
    use store::InMemoryStore;

    fn calculator() -> PriceCalculator<InMemoryStore> {
        PriceCalculator::new(InMemoryStore::seeded())
    }

    #[tokio::test]
    async fn test_standard_flexible_no_extras() {
        let quote = calculator()
            .calculate(&RoomType::new("Standard"), 5, &TariffType::new("Flexible"), &[])
            .await
            .unwrap();

        assert_eq!(quote.room_total, Money::new(dec!(600)));
        assert_eq!(quote.total_price, Money::new(dec!(600)));
        assert!(quote.extras.is_empty());
    }

    #[tokio::test]
    async fn test_luxury_non_refundable_with_extras() {
        let quote = calculator()
            .calculate(
                &RoomType::new("Luxury"),
                2,
                &TariffType::new("NonRefundable"),
                &[ServiceCode::new("breakfast"), ServiceCode::new("minibar")],
            )
            .await
            .unwrap();

        assert_eq!(quote.room_total, Money::new(dec!(450)));
        assert_eq!(quote.extras_total, Money::new(dec!(90)));
        assert_eq!(quote.total_price, Money::new(dec!(540)));
    }

    #[tokio::test]
    async fn test_unknown_extra_is_skipped() {
        let quote = calculator()
            .calculate(
                &RoomType::new("Standard"),
                1,
                &TariffType::new("Flexible"),
                &[ServiceCode::new("spa")],
            )
            .await
            .unwrap();

        assert!(quote.extras.is_empty());
        assert_eq!(quote.total_price, Money::new(dec!(120)));
    }

    #[tokio::test]
    async fn test_unknown_room_type_and_tariff() {
        let result = calculator()
            .calculate(&RoomType::new("Penthouse"), 1, &TariffType::new("Flexible"), &[])
            .await;
        assert!(matches!(
            result,
            Err(BookingError::EntityNotFound { kind: "room_type", .. })
        ));

        let result = calculator()
            .calculate(&RoomType::new("Standard"), 1, &TariffType::new("Weekly"), &[])
            .await;
        assert!(matches!(
            result,
            Err(BookingError::EntityNotFound { kind: "tariff", .. })
        ));
    }

    #[tokio::test]
    async fn test_zero_days_is_rejected() {
        let result = calculator()
            .calculate(&RoomType::new("Standard"), 0, &TariffType::new("Flexible"), &[])
            .await;
        assert!(matches!(
            result,
            Err(BookingError::Validation(DomainError::InvalidDays(0)))
        ));
    }
}
