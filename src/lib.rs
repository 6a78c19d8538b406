//! Expiry Cache - an in-process key-value cache with per-entry TTL
//!
//! Entries expire lazily: reads and snapshots hide expired entries, and an
//! optional background sweeper reclaims their memory.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats, Entry, Expiration, Store, DEFAULT_EXPIRATION, NO_EXPIRATION};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::Sweeper;
