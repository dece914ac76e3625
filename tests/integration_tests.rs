// Integration tests for IntelliMed

use async_trait::async_trait;
use intellimed::core::{distance::haversine_distance, ProximitySearch, SearchError};
use intellimed::models::{
    BoundingBox, CategoryFilter, FacilityRecord, NearbyFacilitiesRequest, NewFacility, NumericParam, SearchQuery,
};
use intellimed::services::{seed_sample_facilities, FacilityStore, InMemoryFacilityStore, StoreError};
use std::sync::atomic::{AtomicUsize, Ordering};

async fn seeded_store() -> InMemoryFacilityStore {
    let store = InMemoryFacilityStore::new();
    seed_sample_facilities(&store).await.unwrap();
    store
}

fn query(lat: f64, lng: f64, radius_km: f64, category: &str) -> SearchQuery {
    SearchQuery {
        latitude: lat,
        longitude: lng,
        radius_km,
        category: CategoryFilter::parse(category),
    }
}

fn create_test_facility(id: i64, facility_type: &str, lat: f64, lon: f64) -> FacilityRecord {
    FacilityRecord {
        id,
        name: format!("Facility {}", id),
        facility_type: facility_type.to_string(),
        address: format!("{} Test Ave", id),
        latitude: lat,
        longitude: lon,
        phone: None,
        website: None,
        services: None,
        emergency_services: false,
        accepts_insurance: true,
    }
}

/// Store that counts queries and can be told to fail
struct CountingStore {
    inner: InMemoryFacilityStore,
    queries: AtomicUsize,
    fail: bool,
}

impl CountingStore {
    fn new(records: Vec<FacilityRecord>, fail: bool) -> Self {
        Self {
            inner: InMemoryFacilityStore::with_records(records),
            queries: AtomicUsize::new(0),
            fail,
        }
    }
}

#[async_trait]
impl FacilityStore for CountingStore {
    async fn query_by_bounding_box(
        &self,
        bbox: &BoundingBox,
        category: &CategoryFilter,
    ) -> Result<Vec<FacilityRecord>, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        self.inner.query_by_bounding_box(bbox, category).await
    }

    async fn get_facility(&self, id: i64) -> Result<Option<FacilityRecord>, StoreError> {
        self.inner.get_facility(id).await
    }

    async fn count_facilities(&self) -> Result<u64, StoreError> {
        tokio::task::yield_now().await;
        self.inner.count_facilities().await
    }

    async fn insert_facilities(&self, facilities: Vec<NewFacility>) -> Result<Vec<i64>, StoreError> {
        self.inner.insert_facilities(facilities).await
    }

    async fn insert_facilities_if_empty(
        &self,
        facilities: Vec<NewFacility>,
    ) -> Result<Option<Vec<i64>>, StoreError> {
        // Yield like a database round-trip would
        tokio::task::yield_now().await;
        self.inner.insert_facilities_if_empty(facilities).await
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(!self.fail)
    }
}

#[tokio::test]
async fn test_times_square_hospitals_within_5km() {
    let store = seeded_store().await;
    let engine = ProximitySearch::default();

    let outcome = engine
        .find_nearby(&store, &query(40.7589, -73.9851, 5.0, "hospital"))
        .await
        .unwrap();

    let names: Vec<&str> = outcome.facilities.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["NYU Langone Health", "NewYork-Presbyterian Hospital", "Mount Sinai Hospital"]
    );

    let distances: Vec<f64> = outcome.facilities.iter().map(|f| f.distance).collect();
    assert_eq!(distances, vec![2.09, 2.63, 4.42]);

    assert!(outcome.facilities.iter().all(|f| f.facility_type == "hospital"));
    assert!(!names.contains(&"Brooklyn Methodist Hospital"));
    assert_eq!(outcome.count(), 3);
}

#[tokio::test]
async fn test_all_categories_within_5km() {
    let store = seeded_store().await;
    let engine = ProximitySearch::default();

    let outcome = engine
        .find_nearby(&store, &query(40.7589, -73.9851, 5.0, "all"))
        .await
        .unwrap();

    // Everything except Brooklyn Methodist (~9.5 km)
    assert_eq!(outcome.count(), 9);
    assert_eq!(outcome.facilities[0].name, "Walgreens Pharmacy - Times Square");
    assert_eq!(outcome.facilities[0].distance, 0.5);

    let mut categories: Vec<&str> = outcome.facilities.iter().map(|f| f.facility_type.as_str()).collect();
    categories.sort();
    categories.dedup();
    assert_eq!(categories, vec!["clinic", "hospital", "pharmacy", "urgent_care"]);
}

#[tokio::test]
async fn test_results_carry_facility_fields() {
    let store = seeded_store().await;
    let engine = ProximitySearch::default();

    let outcome = engine
        .find_nearby(&store, &query(40.7589, -73.9851, 1.0, "pharmacy"))
        .await
        .unwrap();

    assert_eq!(outcome.count(), 2);
    let walgreens = &outcome.facilities[0];
    assert_eq!(walgreens.address, "1411 Broadway, New York, NY 10018");
    assert_eq!(walgreens.phone.as_deref(), Some("(212) 921-1589"));
    assert_eq!(walgreens.services, vec!["Pharmacy", "Vaccinations", "Photo Services"]);
    assert!(!walgreens.emergency_services);
    assert!(walgreens.accepts_insurance);
}

#[tokio::test]
async fn test_search_properties_over_grid() {
    let store = seeded_store().await;
    let engine = ProximitySearch::default();

    for lat_step in 0..5 {
        for lng_step in 0..5 {
            let lat = 40.68 + lat_step as f64 * 0.03;
            let lng = -74.02 + lng_step as f64 * 0.02;

            for radius in [0.5, 1.0, 2.5, 5.0, 10.0] {
                for category in ["all", "hospital", "clinic", "pharmacy", "urgent_care"] {
                    let q = query(lat, lng, radius, category);
                    let outcome = engine.find_nearby(&store, &q).await.unwrap();

                    for facility in &outcome.facilities {
                        assert!(facility.distance <= radius);
                        assert!(haversine_distance(lat, lng, facility.lat, facility.lng) <= radius);
                        if category != "all" {
                            assert_eq!(facility.facility_type, category);
                        }
                    }

                    for pair in outcome.facilities.windows(2) {
                        assert!(pair[0].distance <= pair[1].distance);
                    }
                }
            }
        }
    }
}

#[tokio::test]
async fn test_repeated_searches_are_identical() {
    let store = seeded_store().await;
    let engine = ProximitySearch::default();
    let q = query(40.75, -73.98, 3.0, "all");

    let first = engine.find_nearby(&store, &q).await.unwrap();
    let second = engine.find_nearby(&store, &q).await.unwrap();

    assert_eq!(first.facilities, second.facilities);
}

#[tokio::test]
async fn test_facility_exactly_on_radius_is_included() {
    let facility = create_test_facility(1, "clinic", 40.7420, -73.9881);
    let radius = haversine_distance(40.7589, -73.9851, facility.latitude, facility.longitude);
    let store = InMemoryFacilityStore::with_records(vec![facility]);

    let outcome = ProximitySearch::default()
        .find_nearby(&store, &query(40.7589, -73.9851, radius, "all"))
        .await
        .unwrap();

    assert_eq!(outcome.count(), 1);
}

#[tokio::test]
async fn test_north_pole_origin() {
    let store = InMemoryFacilityStore::with_records(vec![
        create_test_facility(1, "clinic", 89.95, 10.0),
        create_test_facility(2, "clinic", 89.95, -170.0),
        create_test_facility(3, "clinic", 40.7589, -73.9851),
    ]);

    let outcome = ProximitySearch::default()
        .find_nearby(&store, &query(90.0, 0.0, 10.0, "all"))
        .await
        .unwrap();

    // Both polar facilities sit ~5.6 km from the pole on opposite meridians
    let ids: Vec<i64> = outcome.facilities.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn test_search_across_antimeridian() {
    let store = InMemoryFacilityStore::with_records(vec![
        create_test_facility(1, "hospital", -17.75, -179.95),
        create_test_facility(2, "hospital", -17.75, 179.98),
    ]);

    let outcome = ProximitySearch::default()
        .find_nearby(&store, &query(-17.75, 179.99, 10.0, "all"))
        .await
        .unwrap();

    let ids: Vec<i64> = outcome.facilities.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn test_missing_latitude_skips_store() {
    let store = CountingStore::new(vec![create_test_facility(1, "clinic", 40.75, -73.98)], false);
    let engine = ProximitySearch::default();

    let request = NearbyFacilitiesRequest {
        latitude: None,
        longitude: Some(NumericParam::from(-73.9851)),
        radius_km: None,
        category: None,
    };

    let result = engine.search(&store, &request).await;

    assert!(matches!(result, Err(SearchError::InvalidInput(_))));
    assert_eq!(store.queries.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_zero_radius_is_rejected() {
    let store = CountingStore::new(vec![], false);
    let engine = ProximitySearch::default();

    let request = NearbyFacilitiesRequest {
        latitude: Some(NumericParam::from(40.7589)),
        longitude: Some(NumericParam::from(-73.9851)),
        radius_km: Some(NumericParam::from(0.0)),
        category: None,
    };

    let result = engine.search(&store, &request).await;

    assert!(matches!(result, Err(SearchError::InvalidInput(_))));
    assert_eq!(store.queries.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_store_failure_is_propagated() {
    let store = CountingStore::new(vec![], true);

    let result = ProximitySearch::default()
        .find_nearby(&store, &query(40.7589, -73.9851, 5.0, "all"))
        .await;

    assert!(matches!(result, Err(SearchError::StoreUnavailable(_))));
    // Not retried
    assert_eq!(store.queries.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_corrupt_service_list_keeps_rest_of_batch() {
    let mut corrupt = create_test_facility(1, "clinic", 40.7546, -73.9869);
    corrupt.services = Some("[\"Primary Care\",".to_string());
    let mut healthy = create_test_facility(2, "clinic", 40.7527, -73.9772);
    healthy.services = Some("[\"Vaccinations\"]".to_string());

    let store = InMemoryFacilityStore::with_records(vec![corrupt, healthy]);

    let outcome = ProximitySearch::default()
        .find_nearby(&store, &query(40.7589, -73.9851, 5.0, "all"))
        .await
        .unwrap();

    assert_eq!(outcome.count(), 2);
    assert!(outcome.facilities[0].services.is_empty());
    assert_eq!(outcome.facilities[1].services, vec!["Vaccinations"]);
}

#[tokio::test]
async fn test_concurrent_seeding_inserts_once() {
    let store = CountingStore::new(vec![], false);

    let (a, b) = tokio::join!(seed_sample_facilities(&store), seed_sample_facilities(&store));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.inserted + b.inserted, 10);
    assert_eq!(store.count_facilities().await.unwrap(), 10);
}
