use async_trait::async_trait;
use jiff::Timestamp;
use parkspot_core::page::{Page, PageRequest};
use parkspot_core::repository::{ReadRepository, Repository, Result};
use parkspot_core::{ParkingSpot, SpotId, StorageError, UniqueConstraint};
use sqlx::error::DatabaseError;
use sqlx::mysql::{MySqlPoolOptions, MySqlRow};
use sqlx::{MySqlPool, Row};
use tracing::{debug, warn};

/// DDL for the `parking_spots` table.
pub const SCHEMA: &str = include_str!("../ddl/mysql/parking_spots.sql");

const SELECT_COLUMNS: &str = r#"
    id, spot_number, license_plate, brand, model, color,
    responsible_name, apartment, `block`, registered_at
"#;

/// MySQL implementation of the repository contract.
///
/// The unique keys of `parking_spots` are the final arbiter for the spot
/// number, license plate and apartment/block constraints: a write that
/// loses a race against a concurrent one is rejected by MySQL and reported
/// as [`StorageError::Conflict`] naming the violated key.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `parking_spots` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn exists_where(
        &self,
        predicate: &str,
        values: &[&str],
        excluding: Option<&SpotId>,
    ) -> Result<bool> {
        let sql = format!(
            "SELECT 1 FROM parking_spots WHERE {predicate} AND (? IS NULL OR id <> ?) LIMIT 1"
        );
        let excluding = excluding.map(SpotId::to_string);

        let mut query = sqlx::query(&sql);
        for value in values {
            query = query.bind(*value);
        }

        let exists = query
            .bind(excluding.as_deref())
            .bind(excluding.as_deref())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .is_some();

        Ok(exists)
    }
}

fn parse_registered_at(micros: i64) -> Result<Timestamp> {
    Timestamp::from_microsecond(micros).map_err(|e| {
        StorageError::InvalidData(format!("invalid registered_at timestamp '{micros}': {e}"))
    })
}

fn spot_from_row(row: &MySqlRow) -> Result<ParkingSpot> {
    let id: String = row.try_get("id").map_err(map_sqlx_error)?;
    let id = id
        .parse::<SpotId>()
        .map_err(|e| StorageError::InvalidData(format!("invalid id '{id}': {e}")))?;
    let registered_at: i64 = row.try_get("registered_at").map_err(map_sqlx_error)?;

    Ok(ParkingSpot {
        id,
        spot_number: row.try_get("spot_number").map_err(map_sqlx_error)?,
        license_plate: row.try_get("license_plate").map_err(map_sqlx_error)?,
        brand: row.try_get("brand").map_err(map_sqlx_error)?,
        model: row.try_get("model").map_err(map_sqlx_error)?,
        color: row.try_get("color").map_err(map_sqlx_error)?,
        responsible_name: row.try_get("responsible_name").map_err(map_sqlx_error)?,
        apartment: row.try_get("apartment").map_err(map_sqlx_error)?,
        block: row.try_get("block").map_err(map_sqlx_error)?,
        registered_at: parse_registered_at(registered_at)?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(DatabaseError::is_unique_violation)
}

/// Maps a failed INSERT/UPDATE, recognising duplicate-key rejections.
fn map_write_error(err: sqlx::Error) -> StorageError {
    if is_unique_violation(&err) {
        let constraint = err
            .as_database_error()
            .and_then(|db| UniqueConstraint::from_key_message(db.message()));
        if let Some(constraint) = constraint {
            return StorageError::Conflict(constraint);
        }
        warn!(error = %err, "unique violation on an unrecognised key");
    }
    map_sqlx_error(err)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    async fn find_by_id(&self, id: &SpotId) -> Result<Option<ParkingSpot>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM parking_spots WHERE id = ? LIMIT 1");

        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(spot_from_row).transpose()
    }

    async fn find_all(&self, request: &PageRequest) -> Result<Page<ParkingSpot>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM parking_spots")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        // Sort columns come from a closed enum, never from caller text.
        let sort = request.sort();
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM parking_spots ORDER BY `{}` {}, id ASC LIMIT ? OFFSET ?",
            sort.property.column(),
            sort.direction.as_sql(),
        );

        let rows = sqlx::query(&sql)
            .bind(request.size())
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let content = rows.iter().map(spot_from_row).collect::<Result<Vec<_>>>()?;
        let total = u64::try_from(total)
            .map_err(|_| StorageError::InvalidData(format!("negative row count {total}")))?;

        Ok(Page::new(content, *request, total))
    }

    async fn exists_by_spot_number(
        &self,
        spot_number: &str,
        excluding: Option<&SpotId>,
    ) -> Result<bool> {
        self.exists_where("spot_number = ?", &[spot_number], excluding)
            .await
    }

    async fn exists_by_license_plate(
        &self,
        license_plate: &str,
        excluding: Option<&SpotId>,
    ) -> Result<bool> {
        self.exists_where("license_plate = ?", &[license_plate], excluding)
            .await
    }

    async fn exists_by_apartment_and_block(
        &self,
        apartment: &str,
        block: &str,
        excluding: Option<&SpotId>,
    ) -> Result<bool> {
        self.exists_where("apartment = ? AND `block` = ?", &[apartment, block], excluding)
            .await
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn save(&self, spot: ParkingSpot) -> Result<ParkingSpot> {
        let id = spot.id.to_string();
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let existing = sqlx::query("SELECT 1 FROM parking_spots WHERE id = ? FOR UPDATE")
            .bind(&id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let result = if existing.is_some() {
            sqlx::query(
                r#"
                UPDATE parking_spots
                SET spot_number = ?, license_plate = ?, brand = ?, model = ?, color = ?,
                    responsible_name = ?, apartment = ?, `block` = ?
                WHERE id = ?
                "#,
            )
            .bind(&spot.spot_number)
            .bind(&spot.license_plate)
            .bind(&spot.brand)
            .bind(&spot.model)
            .bind(&spot.color)
            .bind(&spot.responsible_name)
            .bind(&spot.apartment)
            .bind(&spot.block)
            .bind(&id)
            .execute(&mut *tx)
            .await
        } else {
            sqlx::query(
                r#"
                INSERT INTO parking_spots (
                    id, spot_number, license_plate, brand, model, color,
                    responsible_name, apartment, `block`, registered_at
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&id)
            .bind(&spot.spot_number)
            .bind(&spot.license_plate)
            .bind(&spot.brand)
            .bind(&spot.model)
            .bind(&spot.color)
            .bind(&spot.responsible_name)
            .bind(&spot.apartment)
            .bind(&spot.block)
            .bind(spot.registered_at.as_microsecond())
            .execute(&mut *tx)
            .await
        };

        result.map_err(map_write_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;

        debug!(id = %spot.id, updated = existing.is_some(), "saved parking spot");
        Ok(spot)
    }

    async fn delete(&self, id: &SpotId) -> Result<()> {
        let result = sqlx::query("DELETE FROM parking_spots WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(*id));
        }
        Ok(())
    }
}
