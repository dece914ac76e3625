use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::time::Duration;

use crate::models::{BoundingBox, CategoryFilter, FacilityRecord, NewFacility};
use crate::services::store::{FacilityStore, StoreError};

const FACILITY_COLUMNS: &str = "id, name, facility_type, address, latitude, longitude, \
    phone, website, services, emergency_services, accepts_insurance";

/// PostgreSQL-backed facility store
///
/// Facilities live in the `medical_facilities` table created by the
/// embedded migrations. Bounding-box queries hit the (latitude, longitude)
/// index.
pub struct PostgresFacilityStore {
    pool: PgPool,
}

impl PostgresFacilityStore {
    /// Create a new PostgreSQL store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

fn facility_from_row(row: &PgRow) -> Result<FacilityRecord, sqlx::Error> {
    Ok(FacilityRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        facility_type: row.try_get("facility_type")?,
        address: row.try_get("address")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        phone: row.try_get("phone")?,
        website: row.try_get("website")?,
        services: row.try_get("services")?,
        emergency_services: row.try_get("emergency_services")?,
        accepts_insurance: row.try_get("accepts_insurance")?,
    })
}

async fn insert_rows(
    tx: &mut Transaction<'_, Postgres>,
    facilities: &[NewFacility],
) -> Result<Vec<i64>, sqlx::Error> {
    let query = r#"
        INSERT INTO medical_facilities
            (name, facility_type, address, latitude, longitude, phone, website,
             services, emergency_services, accepts_insurance)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id
    "#;

    let mut ids = Vec::with_capacity(facilities.len());

    for facility in facilities {
        let row = sqlx::query(query)
            .bind(&facility.name)
            .bind(&facility.facility_type)
            .bind(&facility.address)
            .bind(facility.latitude)
            .bind(facility.longitude)
            .bind(&facility.phone)
            .bind(&facility.website)
            .bind(&facility.services)
            .bind(facility.emergency_services)
            .bind(facility.accepts_insurance)
            .fetch_one(&mut **tx)
            .await?;

        ids.push(row.try_get("id")?);
    }

    Ok(ids)
}

#[async_trait]
impl FacilityStore for PostgresFacilityStore {
    async fn query_by_bounding_box(
        &self,
        bbox: &BoundingBox,
        category: &CategoryFilter,
    ) -> Result<Vec<FacilityRecord>, StoreError> {
        let query = format!(
            r#"
            SELECT {FACILITY_COLUMNS}
            FROM medical_facilities
            WHERE latitude BETWEEN $1 AND $2
              AND longitude BETWEEN $3 AND $4
              AND ($5::TEXT IS NULL OR facility_type = $5)
            ORDER BY id
            "#
        );

        let rows = sqlx::query(&query)
            .bind(bbox.min_lat)
            .bind(bbox.max_lat)
            .bind(bbox.min_lon)
            .bind(bbox.max_lon)
            .bind(category.category())
            .fetch_all(&self.pool)
            .await?;

        let facilities = rows
            .iter()
            .map(facility_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Bounding box query returned {} facilities", facilities.len());

        Ok(facilities)
    }

    async fn get_facility(&self, id: i64) -> Result<Option<FacilityRecord>, StoreError> {
        let query = format!("SELECT {FACILITY_COLUMNS} FROM medical_facilities WHERE id = $1");

        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;

        Ok(row.as_ref().map(facility_from_row).transpose()?)
    }

    async fn count_facilities(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM medical_facilities")
            .fetch_one(&self.pool)
            .await?;

        let total: i64 = row.try_get("total")?;
        Ok(total.max(0) as u64)
    }

    /// Inserts all facilities in a single transaction
    async fn insert_facilities(&self, facilities: Vec<NewFacility>) -> Result<Vec<i64>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let ids = insert_rows(&mut tx, &facilities).await?;
        tx.commit().await?;

        tracing::info!("Inserted {} facilities", ids.len());

        Ok(ids)
    }

    /// Locks the table for the check and the insert so concurrent callers
    /// cannot both see it empty
    async fn insert_facilities_if_empty(
        &self,
        facilities: Vec<NewFacility>,
    ) -> Result<Option<Vec<i64>>, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("LOCK TABLE medical_facilities IN EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM medical_facilities) AS populated")
            .fetch_one(&mut *tx)
            .await?;
        let populated: bool = row.try_get("populated")?;

        if populated {
            tx.rollback().await?;
            return Ok(None);
        }

        let ids = insert_rows(&mut tx, &facilities).await?;
        tx.commit().await?;

        tracing::info!("Inserted {} facilities into empty table", ids.len());

        Ok(Some(ids))
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
