use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use common::BookingId;
use domain::{
    Booking, BookingStatus, ExtraService, Money, RoomType, RoomTypeInfo, ServiceCode, TariffRule,
    TariffType,
};
use tokio::sync::{Mutex, RwLock};

use crate::{
    Result, StoreError, seed,
    store::{
        AvailabilityCheck, BookingStore, CatalogStore, CommittedReservation, InventoryLedger,
        NotificationLog, NotificationRecord, ReservationStore, ReservationUnit, RoomAvailability,
    },
};

#[derive(Debug)]
struct InventoryRow {
    available: u32,
    base_price: Money,
}

#[derive(Debug, Default)]
struct CatalogState {
    room_types: Vec<RoomTypeInfo>,
    tariffs: Vec<TariffRule>,
    extras: Vec<ExtraService>,
}

/// In-memory implementation of every store, for tests and database-less runs.
///
/// Each room type's stock sits behind its own mutex, so reservations of one
/// room type are serialized while different room types proceed in parallel.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    catalog: Arc<RwLock<CatalogState>>,
    inventory: Arc<RwLock<HashMap<RoomType, Arc<Mutex<InventoryRow>>>>>,
    bookings: Arc<RwLock<HashMap<BookingId, Booking>>>,
    notifications: Arc<RwLock<Vec<NotificationRecord>>>,
    unavailable: Arc<AtomicBool>,
    catalog_latency_ms: Arc<AtomicU64>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the default catalog and starting inventory.
    pub fn seeded() -> Self {
        let room_types = seed::room_types();
        let inventory = seed::inventory()
            .into_iter()
            .filter_map(|(room_type, available)| {
                let base_price = room_types
                    .iter()
                    .find(|r| r.room_type == room_type)?
                    .base_price;
                let row = InventoryRow {
                    available,
                    base_price,
                };
                Some((room_type, Arc::new(Mutex::new(row))))
            })
            .collect();

        Self {
            catalog: Arc::new(RwLock::new(CatalogState {
                room_types,
                tariffs: seed::tariffs(),
                extras: seed::extra_services(),
            })),
            inventory: Arc::new(RwLock::new(inventory)),
            ..Self::default()
        }
    }

    /// Sets the stock of a room type, creating the row if needed.
    pub async fn set_inventory(&self, room_type: RoomType, available: u32, base_price: Money) {
        let mut inventory = self.inventory.write().await;
        match inventory.get(&room_type) {
            Some(row) => {
                let mut row = row.lock().await;
                row.available = available;
                row.base_price = base_price;
            }
            None => {
                let row = InventoryRow {
                    available,
                    base_price,
                };
                inventory.insert(room_type, Arc::new(Mutex::new(row)));
            }
        }
    }

    /// Makes every inventory write fail with `Unavailable` while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Delays every catalog read by `latency`. `Duration::ZERO` clears it.
    pub fn set_catalog_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.catalog_latency_ms.store(millis, Ordering::SeqCst);
    }

    /// Returns the total number of booking rows.
    pub async fn booking_count(&self) -> usize {
        self.bookings.read().await.len()
    }

    /// Returns all booking rows in no particular order.
    pub async fn bookings(&self) -> Vec<Booking> {
        self.bookings.read().await.values().cloned().collect()
    }

    /// Returns the total number of recorded notification attempts.
    pub async fn notification_count(&self) -> usize {
        self.notifications.read().await.len()
    }

    async fn catalog(&self) -> tokio::sync::RwLockReadGuard<'_, CatalogState> {
        let millis = self.catalog_latency_ms.load(Ordering::SeqCst);
        if millis > 0 {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
        self.catalog.read().await
    }

    async fn row(&self, room_type: &RoomType) -> Result<Arc<Mutex<InventoryRow>>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store disabled".to_string()));
        }
        self.inventory
            .read()
            .await
            .get(room_type)
            .cloned()
            .ok_or_else(|| StoreError::RoomTypeNotFound(room_type.clone()))
    }
}

fn ensure_sufficient(row: &InventoryRow, room_type: &RoomType, quantity: u32) -> Result<()> {
    if row.available < quantity {
        return Err(StoreError::InsufficientInventory {
            room_type: room_type.clone(),
            requested: quantity,
            available: row.available,
        });
    }
    Ok(())
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn room_types(&self) -> Result<Vec<RoomTypeInfo>> {
        let mut rooms = self.catalog().await.room_types.clone();
        rooms.sort_by_key(|r| r.base_price);
        Ok(rooms)
    }

    async fn room_type(&self, room_type: &RoomType) -> Result<Option<RoomTypeInfo>> {
        let catalog = self.catalog().await;
        Ok(catalog
            .room_types
            .iter()
            .find(|r| &r.room_type == room_type)
            .cloned())
    }

    async fn tariffs(&self) -> Result<Vec<TariffRule>> {
        Ok(self.catalog().await.tariffs.clone())
    }

    async fn tariff(&self, tariff_type: &TariffType) -> Result<Option<TariffRule>> {
        let catalog = self.catalog().await;
        Ok(catalog
            .tariffs
            .iter()
            .find(|t| &t.tariff_type == tariff_type)
            .cloned())
    }

    async fn extra_services(&self) -> Result<Vec<ExtraService>> {
        let mut extras = self.catalog().await.extras.clone();
        extras.sort_by_key(|e| e.price);
        Ok(extras)
    }

    async fn extra_services_by_code(&self, codes: &[ServiceCode]) -> Result<Vec<ExtraService>> {
        let catalog = self.catalog().await;
        Ok(catalog
            .extras
            .iter()
            .filter(|e| codes.contains(&e.service_code))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InventoryLedger for InMemoryStore {
    async fn availability(&self, room_type: Option<&RoomType>) -> Result<Vec<RoomAvailability>> {
        let inventory = self.inventory.read().await;
        let mut rooms = Vec::with_capacity(inventory.len());
        for (key, row) in inventory.iter() {
            if room_type.is_some_and(|wanted| wanted != key) {
                continue;
            }
            let row = row.lock().await;
            rooms.push(RoomAvailability {
                room_type: key.clone(),
                available: row.available,
                base_price: row.base_price,
            });
        }
        rooms.sort_by(|a, b| a.room_type.cmp(&b.room_type));
        Ok(rooms)
    }

    async fn check(&self, room_type: &RoomType, quantity: u32) -> Result<AvailabilityCheck> {
        let row = self.row(room_type).await?;
        let in_stock = row.lock().await.available;
        Ok(AvailabilityCheck {
            available: in_stock >= quantity,
            room_type: room_type.clone(),
            requested: quantity,
            in_stock,
        })
    }

    async fn reserve(&self, room_type: &RoomType, quantity: u32) -> Result<u32> {
        let row = self.row(room_type).await?;
        let mut row = row.lock().await;
        ensure_sufficient(&row, room_type, quantity)?;
        row.available -= quantity;
        Ok(row.available)
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn get(&self, id: BookingId) -> Result<Option<Booking>> {
        Ok(self.bookings.read().await.get(&id).cloned())
    }

    async fn confirm(&self, id: BookingId) -> Result<Option<Booking>> {
        let mut bookings = self.bookings.write().await;
        Ok(bookings.get_mut(&id).map(|booking| {
            booking.status = BookingStatus::Confirmed;
            booking.clone()
        }))
    }
}

#[async_trait]
impl ReservationStore for InMemoryStore {
    async fn reserve_and_create(&self, unit: ReservationUnit) -> Result<CommittedReservation> {
        let row = self.row(unit.room_type()).await?;
        let mut row = row.lock().await;
        ensure_sufficient(&row, unit.room_type(), unit.quantity)?;

        let now = Utc::now();
        let rows: Vec<Booking> = (0..unit.quantity)
            .map(|_| unit.booking.to_booking(BookingId::new(), now))
            .collect();
        let booking_ids = rows.iter().map(|b| b.id).collect();

        // Both writes happen while the row lock is held and neither can fail.
        let mut bookings = self.bookings.write().await;
        bookings.extend(rows.into_iter().map(|b| (b.id, b)));
        row.available -= unit.quantity;

        Ok(CommittedReservation {
            booking_ids,
            remaining: row.available,
        })
    }
}

#[async_trait]
impl NotificationLog for InMemoryStore {
    async fn record(&self, record: NotificationRecord) -> Result<()> {
        self.notifications.write().await.push(record);
        Ok(())
    }

    async fn for_booking(&self, booking_id: BookingId) -> Result<Vec<NotificationRecord>> {
        let notifications = self.notifications.read().await;
        Ok(notifications
            .iter()
            .filter(|n| n.booking_id == booking_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use common::NotificationId;
    use domain::{Channel, DeliveryStatus, NewBooking, StayDates};

    fn standard() -> RoomType {
        RoomType::new("Standard")
    }

    fn new_booking(room_type: RoomType) -> NewBooking {
        NewBooking {
            hotel_id: 1,
            hotel_name: "Hotel Porto City".to_string(),
            room_type,
            stay: StayDates::new(
                NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
                NaiveDate::from_ymd_opt(2025, 12, 20).unwrap(),
            )
            .unwrap(),
            extras: vec![ServiceCode::new("breakfast")],
            total_price: Money::from_units(1400),
        }
    }

    async fn store_with(room_type: RoomType, available: u32) -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .set_inventory(room_type, available, Money::from_units(100))
            .await;
        store
    }

    #[tokio::test]
    async fn reserve_decrements_stock() {
        let store = store_with(standard(), 10).await;

        let remaining = store.reserve(&standard(), 3).await.unwrap();
        assert_eq!(remaining, 7);

        let check = store.check(&standard(), 7).await.unwrap();
        assert!(check.available);
        assert_eq!(check.in_stock, 7);
    }

    #[tokio::test]
    async fn reserve_more_than_available_changes_nothing() {
        let store = store_with(standard(), 2).await;

        let result = store.reserve(&standard(), 3).await;
        assert!(matches!(
            result,
            Err(StoreError::InsufficientInventory {
                requested: 3,
                available: 2,
                ..
            })
        ));

        let rooms = store.availability(Some(&standard())).await.unwrap();
        assert_eq!(rooms[0].available, 2);
    }

    #[tokio::test]
    async fn reserve_unknown_room_type() {
        let store = InMemoryStore::seeded();
        let result = store.reserve(&RoomType::new("Penthouse"), 1).await;
        assert!(matches!(result, Err(StoreError::RoomTypeNotFound(_))));
    }

    #[tokio::test]
    async fn reserve_and_create_writes_one_row_per_room() {
        let store = store_with(standard(), 10).await;

        let committed = store
            .reserve_and_create(ReservationUnit::new(new_booking(standard()), 3))
            .await
            .unwrap();

        assert_eq!(committed.booking_ids.len(), 3);
        assert_eq!(committed.remaining, 7);
        assert_eq!(store.booking_count().await, 3);

        let first = store.get(committed.booking_ids[0]).await.unwrap().unwrap();
        for id in &committed.booking_ids {
            let booking = store.get(*id).await.unwrap().unwrap();
            assert_eq!(booking.status, BookingStatus::Pending);
            assert_eq!(Booking { id: first.id, ..booking }, first);
        }
    }

    #[tokio::test]
    async fn failed_reservation_creates_no_rows() {
        let store = store_with(standard(), 1).await;

        let result = store
            .reserve_and_create(ReservationUnit::new(new_booking(standard()), 2))
            .await;

        assert!(matches!(
            result,
            Err(StoreError::InsufficientInventory { .. })
        ));
        assert_eq!(store.booking_count().await, 0);
        assert_eq!(store.check(&standard(), 1).await.unwrap().in_stock, 1);
    }

    #[tokio::test]
    async fn unavailable_store_rejects_writes() {
        let store = store_with(standard(), 5).await;
        store.set_unavailable(true);

        let result = store
            .reserve_and_create(ReservationUnit::new(new_booking(standard()), 1))
            .await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(store.booking_count().await, 0);

        store.set_unavailable(false);
        assert!(store.reserve(&standard(), 1).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn catalog_latency_delays_reads() {
        let store = InMemoryStore::seeded();
        store.set_catalog_latency(Duration::from_secs(5));

        let started = tokio::time::Instant::now();
        assert_eq!(store.tariffs().await.unwrap().len(), 2);
        assert!(started.elapsed() >= Duration::from_secs(5));

        store.set_catalog_latency(Duration::ZERO);
        let started = tokio::time::Instant::now();
        store.tariffs().await.unwrap();
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reservations_never_oversell() {
        let store = store_with(standard(), 10).await;

        let handles: Vec<_> = (0..25)
            .map(|i| {
                let store = store.clone();
                let quantity = 1 + (i % 3);
                tokio::spawn(async move {
                    store
                        .reserve_and_create(ReservationUnit::new(new_booking(standard()), quantity))
                        .await
                        .map(|_| quantity)
                })
            })
            .collect();

        let mut reserved = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(quantity) => reserved += quantity,
                Err(StoreError::InsufficientInventory { .. }) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        let left = store.check(&standard(), 0).await.unwrap().in_stock;
        assert!(reserved <= 10);
        assert_eq!(left, 10 - reserved);
        assert_eq!(store.booking_count().await as u32, reserved);
    }

    #[tokio::test]
    async fn room_types_are_independent() {
        let store = InMemoryStore::seeded();

        store.reserve(&RoomType::new("Apartment"), 3).await.unwrap();
        assert!(store.reserve(&RoomType::new("Apartment"), 1).await.is_err());
        assert_eq!(store.reserve(&standard(), 1).await.unwrap(), 9);
    }

    #[tokio::test]
    async fn confirm_is_lenient_and_repeatable() {
        let store = store_with(standard(), 1).await;
        let committed = store
            .reserve_and_create(ReservationUnit::new(new_booking(standard()), 1))
            .await
            .unwrap();
        let id = committed.booking_ids[0];

        let confirmed = store.confirm(id).await.unwrap().unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);

        let again = store.confirm(id).await.unwrap().unwrap();
        assert_eq!(again.status, BookingStatus::Confirmed);

        assert!(store.confirm(BookingId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn availability_lists_all_or_one() {
        let store = InMemoryStore::seeded();

        let all = store.availability(None).await.unwrap();
        assert_eq!(all.len(), 3);

        let one = store
            .availability(Some(&RoomType::new("Luxury")))
            .await
            .unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].available, 5);
        assert_eq!(one[0].base_price, Money::from_units(250));
    }

    #[tokio::test]
    async fn catalog_lookups() {
        let store = InMemoryStore::seeded();

        let rooms = store.room_types().await.unwrap();
        assert_eq!(rooms[0].room_type, standard());
        assert_eq!(rooms[2].room_type, RoomType::new("Apartment"));

        assert!(store.tariff(&TariffType::new("Flexible")).await.unwrap().is_some());
        assert!(store.tariff(&TariffType::new("Weekly")).await.unwrap().is_none());

        let extras = store.extra_services().await.unwrap();
        assert_eq!(extras[0].service_code, ServiceCode::new("breakfast"));

        let picked = store
            .extra_services_by_code(&[ServiceCode::new("minibar"), ServiceCode::new("spa")])
            .await
            .unwrap();
        assert_eq!(picked.len(), 1);
    }

    #[tokio::test]
    async fn notifications_are_filtered_by_booking() {
        let store = InMemoryStore::new();
        let booking_id = BookingId::new();
        let record = |booking_id| NotificationRecord {
            id: NotificationId::new(),
            booking_id,
            channel: Channel::Email,
            recipient: "ana@example.com".to_string(),
            message: "hello".to_string(),
            status: DeliveryStatus::Sent,
            error: None,
            created_at: Utc::now(),
        };

        store.record(record(booking_id)).await.unwrap();
        store.record(record(BookingId::new())).await.unwrap();

        assert_eq!(store.notification_count().await, 2);
        assert_eq!(store.for_booking(booking_id).await.unwrap().len(), 1);
    }
}
