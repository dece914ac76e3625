// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{FacilityRecord, NewFacility, FacilityCategory, CategoryFilter, SearchQuery, NearbyFacility, FacilityDetails, BoundingBox};
pub use requests::{NearbyFacilitiesRequest, NumericParam};
pub use responses::{NearbyFacilitiesResponse, FacilityResponse, SeedResponse, HealthResponse, ErrorResponse};
