//! Error types for the cache
//!
//! Data operations on the cache never fail; only construction and
//! configuration loading can produce a [`CacheError`].

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A sweeper was requested outside of a tokio runtime
    #[error("Sweeper requires a running tokio runtime")]
    RuntimeUnavailable,

    /// A sweeper was requested with a zero interval
    #[error("Sweep interval must be greater than zero")]
    ZeroSweepInterval,

    /// An environment variable held a value that could not be parsed
    #[error("Invalid configuration: {var}={value:?}")]
    InvalidConfig { var: String, value: String },
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
