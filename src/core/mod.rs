// Core algorithm exports
pub mod decode;
pub mod distance;
pub mod filters;
pub mod search;

pub use decode::{decode_service_list, services_or_empty, DecodeError};
pub use distance::{haversine_distance, calculate_bounding_box, is_within_bounding_box, round_distance};
pub use filters::{matches_category, matches_store_query, within_radius};
pub use search::{ProximitySearch, SearchError, SearchOutcome, rank_candidates};
