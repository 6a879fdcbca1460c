use domain::RoomType;
use thiserror::Error;

/// Errors that can occur when interacting with the booking stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No inventory row exists for the room type.
    #[error("Room type not found: {0}")]
    RoomTypeNotFound(RoomType),

    /// The room type exists but has fewer rooms than requested.
    /// Nothing was written.
    #[error(
        "Insufficient inventory for {room_type}: requested {requested}, available {available}"
    )]
    InsufficientInventory {
        room_type: RoomType,
        requested: u32,
        available: u32,
    },

    /// The backing store refused the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored value could not be mapped back to a domain type.
    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
