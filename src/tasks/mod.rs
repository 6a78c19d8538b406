//! Background Tasks Module
//!
//! Contains background tasks that run alongside a cache.
//!
//! # Tasks
//! - Expiration sweeper: removes expired cache entries at a fixed interval

mod sweeper;

pub use sweeper::Sweeper;
