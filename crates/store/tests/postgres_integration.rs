//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use common::{BookingId, NotificationId};
use domain::{
    BookingStatus, Channel, DeliveryStatus, Money, NewBooking, RoomType, ServiceCode, StayDates,
    TariffType,
};
use futures_util::future::join_all;
use rust_decimal_macros::dec;
use sqlx::PgPool;
use store::{
    BookingStore, CatalogStore, InventoryLedger, NotificationLog, NotificationRecord,
    PostgresStore, ReservationStore, ReservationUnit, StoreError,
};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_booking_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with cleared tables and the default reference data
async fn get_test_store() -> PostgresStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query(
        "TRUNCATE TABLE room_types, pricing_rules, extra_services, room_availability, bookings, notifications",
    )
    .execute(&pool)
    .await
    .unwrap();

    let store = PostgresStore::new(pool);
    store.seed_reference_data().await.unwrap();
    store
}

fn new_booking(room_type: &str) -> NewBooking {
    NewBooking {
        hotel_id: 1,
        hotel_name: "Hotel Lisbon City".to_string(),
        room_type: RoomType::new(room_type),
        stay: StayDates::new(
            NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 20).unwrap(),
        )
        .unwrap(),
        extras: vec![ServiceCode::new("breakfast"), ServiceCode::new("minibar")],
        total_price: Money::new(dec!(1400.00)),
    }
}

#[tokio::test]
async fn seeded_catalog_is_readable() {
    let store = get_test_store().await;

    let rooms = store.room_types().await.unwrap();
    assert_eq!(rooms.len(), 3);
    assert_eq!(rooms[0].room_type, RoomType::new("Standard"));
    assert_eq!(rooms[0].base_price, Money::new(dec!(100)));

    let flexible = store
        .tariff(&TariffType::new("Flexible"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(flexible.multiplier, dec!(1.2));

    let extras = store
        .extra_services_by_code(&[ServiceCode::new("breakfast"), ServiceCode::new("spa")])
        .await
        .unwrap();
    assert_eq!(extras.len(), 1);
    assert!(extras[0].per_day);
}

#[tokio::test]
async fn seeding_twice_keeps_existing_rows() {
    let store = get_test_store().await;
    store.reserve(&RoomType::new("Luxury"), 2).await.unwrap();

    store.seed_reference_data().await.unwrap();

    let luxury = store
        .availability(Some(&RoomType::new("Luxury")))
        .await
        .unwrap();
    assert_eq!(luxury[0].available, 3);
}

#[tokio::test]
async fn reserve_and_create_commits_rows_and_stock() {
    let store = get_test_store().await;

    let committed = store
        .reserve_and_create(ReservationUnit::new(new_booking("Standard"), 2))
        .await
        .unwrap();

    assert_eq!(committed.booking_ids.len(), 2);
    assert_eq!(committed.remaining, 8);

    for id in &committed.booking_ids {
        let booking = store.get(*id).await.unwrap().unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.total_price, Money::new(dec!(1400.00)));
        assert_eq!(booking.extras.len(), 2);
    }

    let check = store.check(&RoomType::new("Standard"), 8).await.unwrap();
    assert!(check.available);
    assert_eq!(check.in_stock, 8);
}

#[tokio::test]
async fn insufficient_stock_rolls_back() {
    let store = get_test_store().await;

    let result = store
        .reserve_and_create(ReservationUnit::new(new_booking("Apartment"), 4))
        .await;

    assert!(matches!(
        result,
        Err(StoreError::InsufficientInventory {
            requested: 4,
            available: 3,
            ..
        })
    ));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);

    let apartment = store
        .availability(Some(&RoomType::new("Apartment")))
        .await
        .unwrap();
    assert_eq!(apartment[0].available, 3);
}

#[tokio::test]
async fn unknown_room_type_is_reported() {
    let store = get_test_store().await;

    let result = store.reserve(&RoomType::new("Penthouse"), 1).await;
    assert!(matches!(result, Err(StoreError::RoomTypeNotFound(_))));

    let result = store.check(&RoomType::new("Penthouse"), 1).await;
    assert!(matches!(result, Err(StoreError::RoomTypeNotFound(_))));
}

#[tokio::test]
async fn concurrent_reservations_never_oversell() {
    let store = get_test_store().await;

    let attempts = (0..8).map(|_| {
        let store = store.clone();
        async move {
            store
                .reserve_and_create(ReservationUnit::new(new_booking("Apartment"), 1))
                .await
        }
    });
    let results = join_all(attempts).await;

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(StoreError::InsufficientInventory { .. })))
        .count();
    assert_eq!(succeeded, 3);
    assert_eq!(rejected, 5);

    let apartment = store
        .availability(Some(&RoomType::new("Apartment")))
        .await
        .unwrap();
    assert_eq!(apartment[0].available, 0);
}

#[tokio::test]
async fn confirm_updates_status() {
    let store = get_test_store().await;
    let committed = store
        .reserve_and_create(ReservationUnit::new(new_booking("Luxury"), 1))
        .await
        .unwrap();
    let id = committed.booking_ids[0];

    let confirmed = store.confirm(id).await.unwrap().unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);
    assert_eq!(
        store.get(id).await.unwrap().unwrap().status,
        BookingStatus::Confirmed
    );

    assert!(store.confirm(BookingId::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn notification_log_round_trip() {
    let store = get_test_store().await;
    let booking_id = BookingId::new();

    store
        .record(NotificationRecord {
            id: NotificationId::new(),
            booking_id,
            channel: Channel::Sms,
            recipient: "+351900000000".to_string(),
            message: "Booking received".to_string(),
            status: DeliveryStatus::Failed,
            error: Some("gateway timeout".to_string()),
            created_at: Utc::now(),
        })
        .await
        .unwrap();

    let records = store.for_booking(booking_id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].channel, Channel::Sms);
    assert_eq!(records[0].status, DeliveryStatus::Failed);
    assert_eq!(records[0].error.as_deref(), Some("gateway timeout"));

    assert!(store.for_booking(BookingId::new()).await.unwrap().is_empty());
}
