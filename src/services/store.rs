use async_trait::async_trait;
use thiserror::Error;

use crate::models::{BoundingBox, CategoryFilter, FacilityRecord, NewFacility};

/// Errors that can occur when querying a facility store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[source] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    /// Connection-level failures become `Unavailable`; query errors keep their
    /// sqlx detail
    fn from(err: sqlx::Error) -> Self {
        let unreachable = matches!(
            err,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
        );

        if unreachable {
            StoreError::Unavailable(err.to_string())
        } else {
            StoreError::SqlxError(err)
        }
    }
}

/// Read/write access to facility records
///
/// Search only ever calls `query_by_bounding_box`; the other operations back
/// lookups, seeding, and health reporting.
#[async_trait]
pub trait FacilityStore: Send + Sync {
    /// All records inside the inclusive box, optionally restricted to an
    /// exact category. Order is unspecified.
    async fn query_by_bounding_box(
        &self,
        bbox: &BoundingBox,
        category: &CategoryFilter,
    ) -> Result<Vec<FacilityRecord>, StoreError>;

    async fn get_facility(&self, id: i64) -> Result<Option<FacilityRecord>, StoreError>;

    async fn count_facilities(&self) -> Result<u64, StoreError>;

    /// Insert facilities, returning their assigned identifiers in order
    async fn insert_facilities(&self, facilities: Vec<NewFacility>) -> Result<Vec<i64>, StoreError>;

    /// Insert facilities only if the store holds none, as one atomic step.
    /// Returns `None` when the store already had records.
    async fn insert_facilities_if_empty(
        &self,
        facilities: Vec<NewFacility>,
    ) -> Result<Option<Vec<i64>>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failures_are_unavailable() {
        assert!(matches!(StoreError::from(sqlx::Error::PoolTimedOut), StoreError::Unavailable(_)));
        assert!(matches!(StoreError::from(sqlx::Error::PoolClosed), StoreError::Unavailable(_)));
        assert!(matches!(StoreError::from(sqlx::Error::RowNotFound), StoreError::SqlxError(_)));
    }
}
