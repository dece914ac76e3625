use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::filters::matches_store_query;
use crate::models::{BoundingBox, CategoryFilter, FacilityRecord, NewFacility};
use crate::services::store::{FacilityStore, StoreError};

/// Facility store held entirely in memory
///
/// Used for tests and for running the service without PostgreSQL.
/// Identifiers are assigned sequentially starting at 1.
#[derive(Debug, Default)]
pub struct InMemoryFacilityStore {
    records: RwLock<Vec<FacilityRecord>>,
}

impl InMemoryFacilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing records, keeping their identifiers
    pub fn with_records(records: Vec<FacilityRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

fn append_records(records: &mut Vec<FacilityRecord>, facilities: Vec<NewFacility>) -> Vec<i64> {
    let mut next_id = records.iter().map(|record| record.id).max().unwrap_or(0) + 1;

    let mut ids = Vec::with_capacity(facilities.len());
    for facility in facilities {
        records.push(facility.into_record(next_id));
        ids.push(next_id);
        next_id += 1;
    }
    ids
}

#[async_trait]
impl FacilityStore for InMemoryFacilityStore {
    async fn query_by_bounding_box(
        &self,
        bbox: &BoundingBox,
        category: &CategoryFilter,
    ) -> Result<Vec<FacilityRecord>, StoreError> {
        let records = self.records.read().await;

        Ok(records
            .iter()
            .filter(|record| matches_store_query(record, bbox, category))
            .cloned()
            .collect())
    }

    async fn get_facility(&self, id: i64) -> Result<Option<FacilityRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|record| record.id == id).cloned())
    }

    async fn count_facilities(&self) -> Result<u64, StoreError> {
        Ok(self.records.read().await.len() as u64)
    }

    async fn insert_facilities(&self, facilities: Vec<NewFacility>) -> Result<Vec<i64>, StoreError> {
        let mut records = self.records.write().await;
        let ids = append_records(&mut records, facilities);

        tracing::debug!("Inserted {} facilities into memory store", ids.len());
        Ok(ids)
    }

    async fn insert_facilities_if_empty(
        &self,
        facilities: Vec<NewFacility>,
    ) -> Result<Option<Vec<i64>>, StoreError> {
        // Write lock spans the check and the insert
        let mut records = self.records.write().await;
        if !records.is_empty() {
            return Ok(None);
        }

        let ids = append_records(&mut records, facilities);
        tracing::debug!("Inserted {} facilities into empty memory store", ids.len());
        Ok(Some(ids))
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
