// Service exports
pub mod cache;
pub mod postgres;
pub mod profile_store;

pub use cache::{CacheError, CacheKey, CacheManager, CacheStats};
pub use postgres::{week_start, GroupSuggestion, PostgresClient, PostgresError};
pub use profile_store::{ProfileStoreClient, ProfileStoreError, StoreTables};
