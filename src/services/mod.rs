// Service exports
pub mod cache;
pub mod memory;
pub mod postgres;
pub mod seed;
pub mod store;

pub use cache::{CacheManager, CacheKey, CacheError, CacheStats};
pub use memory::InMemoryFacilityStore;
pub use postgres::PostgresFacilityStore;
pub use seed::{seed_sample_facilities, sample_facilities, SeedOutcome};
pub use store::{FacilityStore, StoreError};
