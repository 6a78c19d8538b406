//! Expiration Policy Module
//!
//! Symbolic TTL values accepted by `set` and the cache constructors.

use std::time::Duration;

// == Expiration ==
/// How long an entry stays live after it is stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Expiration {
    /// The entry never expires
    Never,
    /// Use the cache's configured default expiration
    #[default]
    Default,
    /// The entry expires this long after it is stored
    After(Duration),
}

/// Sentinel for entries that never expire.
pub const NO_EXPIRATION: Expiration = Expiration::Never;

/// Sentinel asking the cache to apply its default expiration.
pub const DEFAULT_EXPIRATION: Expiration = Expiration::Default;

impl Expiration {
    // == Resolve ==
    /// Resolves the policy into a concrete TTL, substituting `default` for
    /// [`Expiration::Default`].
    ///
    /// `None` means the entry never expires. `After(Duration::ZERO)` is the
    /// default sentinel, same as [`From<Duration>`]. A zero default resolves
    /// to `None`, since only positive TTLs set an expiration instant.
    pub fn resolve(self, default: Option<Duration>) -> Option<Duration> {
        let ttl = match self {
            Expiration::Never => None,
            Expiration::Default => default,
            Expiration::After(ttl) if ttl.is_zero() => default,
            Expiration::After(ttl) => Some(ttl),
        };
        ttl.filter(|ttl| !ttl.is_zero())
    }
}

impl From<Duration> for Expiration {
    /// A zero duration is the default-expiration sentinel.
    fn from(ttl: Duration) -> Self {
        if ttl.is_zero() {
            Expiration::Default
        } else {
            Expiration::After(ttl)
        }
    }
}

impl From<Option<Duration>> for Expiration {
    /// `None` means no expiration.
    fn from(ttl: Option<Duration>) -> Self {
        match ttl {
            Some(ttl) => ttl.into(),
            None => Expiration::Never,
        }
    }
}
