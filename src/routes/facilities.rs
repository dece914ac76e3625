use actix_web::{error, http::StatusCode, web, HttpResponse, Responder};
use std::sync::Arc;

use crate::core::{services_or_empty, ProximitySearch, SearchError};
use crate::models::{
    ErrorResponse, FacilityDetails, FacilityRecord, FacilityResponse, HealthResponse,
    NearbyFacilitiesRequest, NearbyFacilitiesResponse, SeedResponse,
};
use crate::services::{seed_sample_facilities, CacheKey, CacheManager, FacilityStore, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FacilityStore>,
    pub cache: Option<Arc<CacheManager>>,
    pub search: ProximitySearch,
}

/// Configure all facility-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/facilities/nearby", web::get().to(nearby_facilities_query))
        .route("/facilities/nearby", web::post().to(nearby_facilities_json))
        .route("/facilities/seed", web::post().to(seed_facilities))
        .route("/facilities/{id}", web::get().to(get_facility));
}

impl SearchError {
    fn code(&self) -> &'static str {
        match self {
            SearchError::InvalidInput(_) => "invalid_input",
            SearchError::StoreUnavailable(_) => "store_unavailable",
        }
    }
}

impl error::ResponseError for SearchError {
    fn status_code(&self) -> StatusCode {
        match self {
            SearchError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SearchError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            SearchError::InvalidInput(_) => self.to_string(),
            // Store details stay in the logs
            SearchError::StoreUnavailable(_) => "Failed to search facilities".to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.code(), message))
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = state.store.health_check().await.unwrap_or(false);
    let facilities = if healthy {
        state.store.count_facilities().await.ok()
    } else {
        None
    };

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        facilities,
        cache: state.cache.as_ref().map(|cache| cache.stats()),
    })
}

/// Nearby facilities endpoint (query string)
///
/// GET /api/v1/facilities/nearby?lat=40.7589&lng=-73.9851&radius=5&type=hospital
async fn nearby_facilities_query(
    state: web::Data<AppState>,
    req: web::Query<NearbyFacilitiesRequest>,
) -> Result<HttpResponse, SearchError> {
    nearby_facilities(&state, &req).await
}

/// Nearby facilities endpoint (JSON body)
///
/// POST /api/v1/facilities/nearby
///
/// Request body:
/// ```json
/// {
///   "latitude": 40.7589,
///   "longitude": -73.9851,
///   "radiusKm": 5,
///   "category": "hospital"
/// }
/// ```
async fn nearby_facilities_json(
    state: web::Data<AppState>,
    req: web::Json<NearbyFacilitiesRequest>,
) -> Result<HttpResponse, SearchError> {
    nearby_facilities(&state, &req).await
}

async fn nearby_facilities(
    state: &AppState,
    req: &NearbyFacilitiesRequest,
) -> Result<HttpResponse, SearchError> {
    let query = state.search.build_query(req).map_err(|e| {
        tracing::info!("Rejected nearby search: {}", e);
        e
    })?;

    let cache_key = CacheKey::nearby(&query);
    if let Some(cache) = &state.cache {
        match cache.get::<NearbyFacilitiesResponse>(&cache_key).await {
            Ok(Some(cached)) => {
                tracing::debug!("Serving nearby search from cache: {}", cache_key);
                return Ok(HttpResponse::Ok().json(cached));
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Cache read failed for {}: {}", cache_key, e),
        }
    }

    let outcome = state
        .search
        .find_nearby(state.store.as_ref(), &query)
        .await
        .map_err(|e| {
            tracing::error!("Facility search failed: {}", e);
            e
        })?;

    tracing::info!(
        "Returning {} facilities within {} km of ({}, {}) for category {} (from {} candidates)",
        outcome.count(),
        query.radius_km,
        query.latitude,
        query.longitude,
        query.category,
        outcome.candidates_considered
    );

    let response = NearbyFacilitiesResponse::new(outcome.facilities);

    if let Some(cache) = &state.cache {
        if let Err(e) = cache.set(&cache_key, &response).await {
            tracing::warn!("Failed to cache nearby search {}: {}", cache_key, e);
        }
    }

    Ok(HttpResponse::Ok().json(response))
}

/// Single facility lookup
///
/// GET /api/v1/facilities/{id}
async fn get_facility(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    let id = path.into_inner();

    match state.store.get_facility(id).await {
        Ok(Some(facility)) => HttpResponse::Ok().json(FacilityResponse {
            success: true,
            facility: details(facility),
        }),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse::new(
            "not_found",
            format!("Facility {} not found", id),
        )),
        Err(e) => store_failure("load facility", e),
    }
}

/// Sample data endpoint
///
/// POST /api/v1/facilities/seed
///
/// Inserts the sample facilities only when the store is empty.
async fn seed_facilities(state: web::Data<AppState>) -> HttpResponse {
    let outcome = match seed_sample_facilities(state.store.as_ref()).await {
        Ok(outcome) => outcome,
        Err(e) => return store_failure("seed sample facilities", e),
    };

    if outcome.inserted > 0 {
        if let Some(cache) = &state.cache {
            if let Err(e) = cache.invalidate_pattern(CacheKey::NEARBY_PATTERN).await {
                tracing::warn!("Failed to invalidate cached searches: {}", e);
            }
        }
    }

    HttpResponse::Ok().json(SeedResponse {
        success: true,
        message: outcome.message,
        inserted: outcome.inserted,
    })
}

/// 503 body for a store failure outside search; details stay in the logs
fn store_failure(action: &str, e: StoreError) -> HttpResponse {
    tracing::error!("Failed to {}: {}", action, e);

    HttpResponse::ServiceUnavailable().json(ErrorResponse::new(
        "store_unavailable",
        format!("Failed to {}", action),
    ))
}

fn details(facility: FacilityRecord) -> FacilityDetails {
    let services = services_or_empty(facility.id, facility.services.as_deref());

    FacilityDetails {
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
    }
}
