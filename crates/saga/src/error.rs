//! Saga error types.

use std::time::Duration;

use domain::{DomainError, RoomType};
use store::StoreError;
use thiserror::Error;

/// Errors that end a booking saga or one of its lookups.
#[derive(Debug, Error)]
pub enum BookingError {
    /// The request was rejected before any side effect.
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),

    /// A referenced room type, tariff or booking does not exist.
    #[error("{kind} not found: {key}")]
    EntityNotFound { kind: &'static str, key: String },

    /// Not enough rooms left. Nothing was persisted.
    #[error(
        "Insufficient inventory for {room_type}: requested {requested}, available {available}"
    )]
    InsufficientInventory {
        room_type: RoomType,
        requested: u32,
        available: u32,
    },

    /// A collaborator timed out or refused the call.
    #[error("Dependency '{dependency}' failed: {reason}")]
    Dependency {
        dependency: &'static str,
        reason: String,
        retryable: bool,
    },

    /// The store failed in a way the caller cannot act on.
    #[error("Storage error: {0}")]
    Storage(#[source] StoreError),
}

impl BookingError {
    pub fn not_found(kind: &'static str, key: impl ToString) -> Self {
        Self::EntityNotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub fn timed_out(dependency: &'static str, after: Duration) -> Self {
        Self::Dependency {
            dependency,
            reason: format!("timed out after {after:?}"),
            retryable: true,
        }
    }

    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Dependency {
                retryable: true,
                ..
            }
        )
    }
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::RoomTypeNotFound(room_type) => Self::not_found("room_type", room_type),
            StoreError::InsufficientInventory {
                room_type,
                requested,
                available,
            } => Self::InsufficientInventory {
                room_type,
                requested,
                available,
            },
            StoreError::Unavailable(reason) => Self::Dependency {
                dependency: "store",
                reason,
                retryable: true,
            },
            other => Self::Storage(other),
        }
    }
}

/// A single notification attempt failed. Never escapes the saga.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// The channel refused the message.
    #[error("{0}")]
    Rejected(String),

    /// The channel did not answer in time.
    #[error("delivery timed out after {0:?}")]
    TimedOut(Duration),
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, BookingError>;
