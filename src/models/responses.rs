use serde::{Deserialize, Serialize};
use crate::models::domain::{FacilityDetails, NearbyFacility};
use crate::services::CacheStats;

/// Response for the nearby facilities endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyFacilitiesResponse {
    pub success: bool,
    pub facilities: Vec<NearbyFacility>,
    pub count: usize,
}

impl NearbyFacilitiesResponse {
    pub fn new(facilities: Vec<NearbyFacility>) -> Self {
        Self {
            success: true,
            count: facilities.len(),
            facilities,
        }
    }
}

/// Response for a single facility lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityResponse {
    pub success: bool,
    pub facility: FacilityDetails,
}

/// Response for the sample data endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedResponse {
    pub success: bool,
    pub message: String,
    pub inserted: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub facilities: Option<u64>,
    pub cache: Option<CacheStats>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: &str, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: code.to_string(),
        }
    }
}
