//! Value objects shared by bookings, the catalog, and pricing.

use std::iter::Sum;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Name of the tariff applied when a request does not specify one.
pub const DEFAULT_TARIFF: &str = "Flexible";

/// Named inventory category such as `"Standard"` or `"Luxury"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomType(String);

impl RoomType {
    /// Creates a room type from a string.
    pub fn new(room_type: impl Into<String>) -> Self {
        Self(room_type.into())
    }

    /// Returns the room type as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoomType {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RoomType {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Key of a pricing rule such as `"Flexible"` or `"NonRefundable"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TariffType(String);

impl TariffType {
    /// Creates a tariff type from a string.
    pub fn new(tariff: impl Into<String>) -> Self {
        Self(tariff.into())
    }

    /// Returns the tariff type as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TariffType {
    fn default() -> Self {
        Self::new(DEFAULT_TARIFF)
    }
}

impl std::fmt::Display for TariffType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TariffType {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TariffType {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Code of an optional extra service such as `"breakfast"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceCode(String);

impl ServiceCode {
    /// Creates a service code from a string.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the service code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ServiceCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ServiceCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ServiceCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Monetary amount held as an exact decimal.
///
/// Arithmetic never rounds. [`Money::rounded`] is the only place a value is
/// brought to two decimal places, and the pricing quote is its only caller.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a money amount from a decimal.
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Creates a money amount from whole currency units.
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Returns the underlying decimal.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiplies by a whole count (days, rooms).
    pub fn times(&self, count: u32) -> Money {
        Money(self.0 * Decimal::from(count))
    }

    /// Multiplies by a decimal factor such as a tariff multiplier.
    pub fn scale(&self, factor: Decimal) -> Money {
        Money(self.0 * factor)
    }

    /// Rounds half away from zero to two decimal places.
    pub fn rounded(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}
