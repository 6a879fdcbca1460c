pub mod error;
pub mod memory;
pub mod postgres;
pub mod seed;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use store::{
    AvailabilityCheck, BookingStore, CatalogStore, CommittedReservation, InventoryLedger,
    NotificationLog, NotificationRecord, ReservationStore, ReservationUnit, RoomAvailability,
    Storage,
};
