//! IntelliMed - nearby medical facility search service
//!
//! This library provides the proximity search used by the IntelliMed facility
//! finder: a bounding-box prefilter pushed down to the facility store, followed
//! by an exact Haversine radius cut and a stable sort by distance.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{ProximitySearch, SearchError, SearchOutcome, distance::{haversine_distance, calculate_bounding_box}};
pub use models::{FacilityRecord, SearchQuery, NearbyFacility, CategoryFilter, NearbyFacilitiesRequest, NearbyFacilitiesResponse};
pub use services::{FacilityStore, StoreError, InMemoryFacilityStore};
