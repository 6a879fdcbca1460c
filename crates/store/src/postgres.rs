use async_trait::async_trait;
use chrono::Utc;
use common::{BookingId, NotificationId};
use domain::{
    Booking, BookingStatus, Channel, DeliveryStatus, ExtraService, Money, RoomType, RoomTypeInfo,
    ServiceCode, TariffRule, TariffType,
};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Result, StoreError, seed,
    store::{
        AvailabilityCheck, BookingStore, CatalogStore, CommittedReservation, InventoryLedger,
        NotificationLog, NotificationRecord, ReservationStore, ReservationUnit, RoomAvailability,
    },
};

const BOOKING_COLUMNS: &str = "id, hotel_id, hotel_name, room_type, check_in, check_out, extras, total_price, status, created_at";

/// PostgreSQL-backed implementation of every store.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    /// Inserts the default catalog and starting inventory.
    ///
    /// Existing rows are left untouched, so this is safe to run on every start.
    pub async fn seed_reference_data(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let room_types = seed::room_types();
        for room in &room_types {
            sqlx::query(
                r#"
                INSERT INTO room_types (room_type, name, description, base_price, max_guests, amenities)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (room_type) DO NOTHING
                "#,
            )
            .bind(room.room_type.as_str())
            .bind(&room.name)
            .bind(&room.description)
            .bind(room.base_price.amount())
            .bind(to_column(room.max_guests)?)
            .bind(&room.amenities)
            .execute(&mut *tx)
            .await?;
        }

        for tariff in seed::tariffs() {
            sqlx::query(
                r#"
                INSERT INTO pricing_rules (tariff_type, name, multiplier, description)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (tariff_type) DO NOTHING
                "#,
            )
            .bind(tariff.tariff_type.as_str())
            .bind(&tariff.name)
            .bind(tariff.multiplier)
            .bind(&tariff.description)
            .execute(&mut *tx)
            .await?;
        }

        for extra in seed::extra_services() {
            sqlx::query(
                r#"
                INSERT INTO extra_services (service_code, name, price, per_day, description)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (service_code) DO NOTHING
                "#,
            )
            .bind(extra.service_code.as_str())
            .bind(&extra.name)
            .bind(extra.price.amount())
            .bind(extra.per_day)
            .bind(&extra.description)
            .execute(&mut *tx)
            .await?;
        }

        for (room_type, available) in seed::inventory() {
            let Some(room) = room_types.iter().find(|r| r.room_type == room_type) else {
                continue;
            };
            sqlx::query(
                r#"
                INSERT INTO room_availability (room_type, available_count, base_price)
                VALUES ($1, $2, $3)
                ON CONFLICT (room_type) DO NOTHING
                "#,
            )
            .bind(room_type.as_str())
            .bind(to_column(available)?)
            .bind(room.base_price.amount())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::info!("reference data seeded");
        Ok(())
    }

    fn row_to_room_type(row: PgRow) -> Result<RoomTypeInfo> {
        Ok(RoomTypeInfo {
            room_type: RoomType::new(row.try_get::<String, _>("room_type")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            base_price: Money::new(row.try_get("base_price")?),
            max_guests: to_count(row.try_get("max_guests")?)?,
            amenities: row.try_get("amenities")?,
        })
    }

    fn row_to_tariff(row: PgRow) -> Result<TariffRule> {
        Ok(TariffRule {
            tariff_type: TariffType::new(row.try_get::<String, _>("tariff_type")?),
            name: row.try_get("name")?,
            multiplier: row.try_get::<Decimal, _>("multiplier")?.normalize(),
            description: row.try_get("description")?,
        })
    }

    fn row_to_extra(row: PgRow) -> Result<ExtraService> {
        Ok(ExtraService {
            service_code: ServiceCode::new(row.try_get::<String, _>("service_code")?),
            name: row.try_get("name")?,
            price: Money::new(row.try_get("price")?),
            per_day: row.try_get("per_day")?,
            description: row.try_get("description")?,
        })
    }

    fn row_to_booking(row: PgRow) -> Result<Booking> {
        let status: String = row.try_get("status")?;
        let extras: Vec<String> = row.try_get("extras")?;

        Ok(Booking {
            id: BookingId::from_uuid(row.try_get::<Uuid, _>("id")?),
            hotel_id: row.try_get("hotel_id")?,
            hotel_name: row.try_get("hotel_name")?,
            room_type: RoomType::new(row.try_get::<String, _>("room_type")?),
            check_in: row.try_get("check_in")?,
            check_out: row.try_get("check_out")?,
            extras: extras.into_iter().map(ServiceCode::new).collect(),
            total_price: Money::new(row.try_get("total_price")?),
            status: BookingStatus::parse(&status)
                .ok_or_else(|| StoreError::Corrupt(format!("booking status '{status}'")))?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_notification(row: PgRow) -> Result<NotificationRecord> {
        let channel: String = row.try_get("channel")?;
        let status: String = row.try_get("status")?;

        Ok(NotificationRecord {
            id: NotificationId::from_uuid(row.try_get::<Uuid, _>("id")?),
            booking_id: BookingId::from_uuid(row.try_get::<Uuid, _>("booking_id")?),
            channel: Channel::parse(&channel)
                .ok_or_else(|| StoreError::Corrupt(format!("notification channel '{channel}'")))?,
            recipient: row.try_get("recipient")?,
            message: row.try_get("message")?,
            status: DeliveryStatus::parse(&status)
                .ok_or_else(|| StoreError::Corrupt(format!("delivery status '{status}'")))?,
            error: row.try_get("error")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

fn to_count(value: i32) -> Result<u32> {
    u32::try_from(value).map_err(|_| StoreError::Corrupt(format!("negative count {value}")))
}

fn to_column(value: u32) -> Result<i32> {
    i32::try_from(value).map_err(|_| StoreError::Corrupt(format!("count {value} out of range")))
}

/// Locks the inventory row of `room_type` and takes `quantity` rooms from it.
///
/// The row lock is held until `tx` ends. On error nothing has been written
/// and dropping `tx` rolls back.
async fn lock_and_decrement(
    tx: &mut Transaction<'_, Postgres>,
    room_type: &RoomType,
    quantity: u32,
) -> Result<u32> {
    let available: Option<i32> = sqlx::query_scalar(
        "SELECT available_count FROM room_availability WHERE room_type = $1 FOR UPDATE",
    )
    .bind(room_type.as_str())
    .fetch_optional(&mut **tx)
    .await?;

    let available = available
        .ok_or_else(|| StoreError::RoomTypeNotFound(room_type.clone()))?;
    let available = to_count(available)?;
    if available < quantity {
        return Err(StoreError::InsufficientInventory {
            room_type: room_type.clone(),
            requested: quantity,
            available,
        });
    }

    let remaining = available - quantity;
    sqlx::query(
        "UPDATE room_availability SET available_count = $2, updated_at = NOW() WHERE room_type = $1",
    )
    .bind(room_type.as_str())
    .bind(to_column(remaining)?)
    .execute(&mut **tx)
    .await?;

    Ok(remaining)
}

#[async_trait]
impl CatalogStore for PostgresStore {
    async fn room_types(&self) -> Result<Vec<RoomTypeInfo>> {
        let rows = sqlx::query(
            "SELECT room_type, name, description, base_price, max_guests, amenities FROM room_types ORDER BY base_price ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_room_type).collect()
    }

    async fn room_type(&self, room_type: &RoomType) -> Result<Option<RoomTypeInfo>> {
        let row = sqlx::query(
            "SELECT room_type, name, description, base_price, max_guests, amenities FROM room_types WHERE room_type = $1",
        )
        .bind(room_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_room_type).transpose()
    }

    async fn tariffs(&self) -> Result<Vec<TariffRule>> {
        let rows = sqlx::query(
            "SELECT tariff_type, name, multiplier, description FROM pricing_rules ORDER BY tariff_type ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_tariff).collect()
    }

    async fn tariff(&self, tariff_type: &TariffType) -> Result<Option<TariffRule>> {
        let row = sqlx::query(
            "SELECT tariff_type, name, multiplier, description FROM pricing_rules WHERE tariff_type = $1",
        )
        .bind(tariff_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_tariff).transpose()
    }

    async fn extra_services(&self) -> Result<Vec<ExtraService>> {
        let rows = sqlx::query(
            "SELECT service_code, name, price, per_day, description FROM extra_services ORDER BY price ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_extra).collect()
    }

    async fn extra_services_by_code(&self, codes: &[ServiceCode]) -> Result<Vec<ExtraService>> {
        let codes: Vec<&str> = codes.iter().map(ServiceCode::as_str).collect();
        let rows = sqlx::query(
            "SELECT service_code, name, price, per_day, description FROM extra_services WHERE service_code = ANY($1)",
        )
        .bind(&codes)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_extra).collect()
    }
}

#[async_trait]
impl InventoryLedger for PostgresStore {
    async fn availability(&self, room_type: Option<&RoomType>) -> Result<Vec<RoomAvailability>> {
        let rows = sqlx::query(
            r#"
            SELECT room_type, available_count, base_price
            FROM room_availability
            WHERE $1::VARCHAR IS NULL OR room_type = $1
            ORDER BY room_type ASC
            "#,
        )
        .bind(room_type.map(RoomType::as_str))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(RoomAvailability {
                    room_type: RoomType::new(row.try_get::<String, _>("room_type")?),
                    available: to_count(row.try_get("available_count")?)?,
                    base_price: Money::new(row.try_get("base_price")?),
                })
            })
            .collect()
    }

    async fn check(&self, room_type: &RoomType, quantity: u32) -> Result<AvailabilityCheck> {
        let available: Option<i32> = sqlx::query_scalar(
            "SELECT available_count FROM room_availability WHERE room_type = $1",
        )
        .bind(room_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let available = available
            .ok_or_else(|| StoreError::RoomTypeNotFound(room_type.clone()))?;
        let in_stock = to_count(available)?;
        Ok(AvailabilityCheck {
            available: in_stock >= quantity,
            room_type: room_type.clone(),
            requested: quantity,
            in_stock,
        })
    }

    #[tracing::instrument(skip(self, room_type), fields(room_type = %room_type))]
    async fn reserve(&self, room_type: &RoomType, quantity: u32) -> Result<u32> {
        let mut tx = self.pool.begin().await?;
        let remaining = lock_and_decrement(&mut tx, room_type, quantity).await?;
        tx.commit().await?;
        Ok(remaining)
    }
}

#[async_trait]
impl BookingStore for PostgresStore {
    async fn get(&self, id: BookingId) -> Result<Option<Booking>> {
        let row = sqlx::query(&format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_booking).transpose()
    }

    async fn confirm(&self, id: BookingId) -> Result<Option<Booking>> {
        let row = sqlx::query(&format!(
            "UPDATE bookings SET status = 'confirmed' WHERE id = $1 RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_booking).transpose()
    }
}

#[async_trait]
impl ReservationStore for PostgresStore {
    #[tracing::instrument(
        skip(self, unit),
        fields(room_type = %unit.room_type(), quantity = unit.quantity)
    )]
    async fn reserve_and_create(&self, unit: ReservationUnit) -> Result<CommittedReservation> {
        let mut tx = self.pool.begin().await?;

        let remaining = lock_and_decrement(&mut tx, unit.room_type(), unit.quantity).await?;

        let booking = &unit.booking;
        let extras: Vec<&str> = booking.extras.iter().map(ServiceCode::as_str).collect();
        let created_at = Utc::now();
        let mut booking_ids = Vec::with_capacity(unit.quantity as usize);

        for _ in 0..unit.quantity {
            let id = BookingId::new();
            sqlx::query(
                r#"
                INSERT INTO bookings (id, hotel_id, hotel_name, room_type, check_in, check_out, extras, total_price, status, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(id.as_uuid())
            .bind(booking.hotel_id)
            .bind(&booking.hotel_name)
            .bind(booking.room_type.as_str())
            .bind(booking.stay.check_in())
            .bind(booking.stay.check_out())
            .bind(&extras)
            .bind(booking.total_price.amount())
            .bind(BookingStatus::Pending.as_str())
            .bind(created_at)
            .execute(&mut *tx)
            .await?;

            booking_ids.push(id);
        }

        tx.commit().await?;
        tracing::debug!(remaining, "reservation committed");

        Ok(CommittedReservation {
            booking_ids,
            remaining,
        })
    }
}

#[async_trait]
impl NotificationLog for PostgresStore {
    async fn record(&self, record: NotificationRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, booking_id, channel, recipient, message, status, error, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.booking_id.as_uuid())
        .bind(record.channel.as_str())
        .bind(&record.recipient)
        .bind(&record.message)
        .bind(record.status.as_str())
        .bind(&record.error)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn for_booking(&self, booking_id: BookingId) -> Result<Vec<NotificationRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, booking_id, channel, recipient, message, status, error, created_at
            FROM notifications
            WHERE booking_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(booking_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_notification).collect()
    }
}
