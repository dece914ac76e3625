use thiserror::Error;
use validator::Validate;

use crate::core::{
    decode::services_or_empty,
    distance::{calculate_bounding_box, round_distance},
    filters::{matches_category, within_radius},
};
use crate::models::{CategoryFilter, FacilityRecord, NearbyFacilitiesRequest, NearbyFacility, NumericParam, SearchQuery};
use crate::services::store::{FacilityStore, StoreError};

/// Radius used when a request does not specify one
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// Errors returned by a nearby search
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Facility store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

/// Result of a nearby search
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub facilities: Vec<NearbyFacility>,
    /// Records returned by the bounding-box prefilter
    pub candidates_considered: usize,
}

impl SearchOutcome {
    pub fn count(&self) -> usize {
        self.facilities.len()
    }
}

/// Nearby-facility search engine
///
/// # Pipeline Stages
/// 1. Bounding box pre-filter (pushed down to the store)
/// 2. Category filter
/// 3. Exact Haversine distance, radius cut
/// 4. Annotation (rounded distance, decoded services)
/// 5. Stable sort by distance
///
/// The engine holds no store; callers pass one to every search.
#[derive(Debug, Clone, Copy)]
pub struct ProximitySearch {
    default_radius_km: f64,
}

impl ProximitySearch {
    pub fn new(default_radius_km: f64) -> Self {
        Self { default_radius_km }
    }

    pub fn with_default_radius() -> Self {
        Self::new(DEFAULT_RADIUS_KM)
    }

    pub fn default_radius_km(&self) -> f64 {
        self.default_radius_km
    }

    /// Turn raw request parameters into a validated query
    pub fn build_query(&self, request: &NearbyFacilitiesRequest) -> Result<SearchQuery, SearchError> {
        let latitude = required_number("latitude", request.latitude.as_ref())?;
        let longitude = required_number("longitude", request.longitude.as_ref())?;
        let radius_km = match &request.radius_km {
            Some(raw) => parse_number("radius", raw)?,
            None => self.default_radius_km,
        };
        let category = request
            .category
            .as_deref()
            .map(CategoryFilter::parse)
            .unwrap_or_default();

        let query = SearchQuery {
            latitude,
            longitude,
            radius_km,
            category,
        };

        query
            .validate()
            .map_err(|errors| SearchError::InvalidInput(errors.to_string()))?;

        Ok(query)
    }

    /// Find facilities within the query radius, nearest first
    pub async fn find_nearby(
        &self,
        store: &dyn FacilityStore,
        query: &SearchQuery,
    ) -> Result<SearchOutcome, SearchError> {
        let bbox = calculate_bounding_box(query.latitude, query.longitude, query.radius_km);

        let candidates = store.query_by_bounding_box(&bbox, &query.category).await?;

        tracing::debug!(
            "Bounding box [{:.4}, {:.4}] x [{:.4}, {:.4}] yielded {} candidates",
            bbox.min_lat,
            bbox.max_lat,
            bbox.min_lon,
            bbox.max_lon,
            candidates.len()
        );

        Ok(rank_candidates(query, candidates))
    }

    /// Parse, validate and run a search in one step
    pub async fn search(
        &self,
        store: &dyn FacilityStore,
        request: &NearbyFacilitiesRequest,
    ) -> Result<SearchOutcome, SearchError> {
        let query = self.build_query(request)?;
        self.find_nearby(store, &query).await
    }
}

impl Default for ProximitySearch {
    fn default() -> Self {
        Self::with_default_radius()
    }
}

/// Filter, annotate and sort prefiltered candidates.
///
/// Candidates are assumed to come from a bounding-box query; anything outside
/// the exact radius is discarded here. Reported distances are rounded to 2
/// decimals and never exceed the radius. Ties keep candidate order.
pub fn rank_candidates(query: &SearchQuery, candidates: Vec<FacilityRecord>) -> SearchOutcome {
    let candidates_considered = candidates.len();

    let mut facilities: Vec<NearbyFacility> = candidates
        .into_iter()
        .filter(|facility| matches_category(facility, &query.category))
        .filter_map(|facility| {
            let distance_km = within_radius(&facility, query.latitude, query.longitude, query.radius_km)?;
            Some(annotate(facility, reported_distance(distance_km, query.radius_km)))
        })
        .collect();

    // sort_by is stable
    facilities.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    SearchOutcome {
        facilities,
        candidates_considered,
    }
}

/// Distance rounded to 2 decimals, rounded down instead when rounding to
/// nearest would land past the radius
fn reported_distance(distance_km: f64, radius_km: f64) -> f64 {
    let rounded = round_distance(distance_km);
    if rounded <= radius_km {
        rounded
    } else {
        (distance_km * 100.0).floor() / 100.0
    }
}

fn annotate(facility: FacilityRecord, distance: f64) -> NearbyFacility {
    let services = services_or_empty(facility.id, facility.services.as_deref());

    NearbyFacility {
        id: facility.id,
        name: facility.name,
        facility_type: facility.facility_type,
        address: facility.address,
        lat: facility.latitude,
        lng: facility.longitude,
        phone: facility.phone,
        website: facility.website,
        services,
        emergency_services: facility.emergency_services,
        accepts_insurance: facility.accepts_insurance,
        distance,
    }
}

fn required_number(name: &str, raw: Option<&NumericParam>) -> Result<f64, SearchError> {
    match raw {
        Some(raw) => parse_number(name, raw),
        None => Err(SearchError::InvalidInput("Missing latitude or longitude".to_string())),
    }
}

fn parse_number(name: &str, raw: &NumericParam) -> Result<f64, SearchError> {
    raw.parse()
        .ok_or_else(|| SearchError::InvalidInput(format!("{} must be a finite number", name)))
}
