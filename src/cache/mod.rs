//! Cache Module
//!
//! Provides the in-memory expiring map, its entry type and the public
//! [`Cache`] facade.

mod entry;
mod expiration;
mod facade;
mod stats;
mod store;


// Re-export public types
pub use entry::Entry;
pub use expiration::{Expiration, DEFAULT_EXPIRATION, NO_EXPIRATION};
pub use facade::Cache;
pub use stats::CacheStats;
pub use store::Store;
