//! In-memory cache of fetched result pages.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use tokio::time::Instant;

use crate::{ResultPage, ValidationError};

/// Defines whether a session keeps fetched pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// Keep fetched pages and serve a non-expired one without a network
    /// call when its query and page come up again.
    Use,
    /// Always fetch; nothing is kept. (Default)
    #[default]
    Refresh,
}

impl CacheMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Use => "use",
            Self::Refresh => "refresh",
        }
    }

    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Use)
    }
}

impl FromStr for CacheMode {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "use" => Ok(Self::Use),
            "refresh" => Ok(Self::Refresh),
            other => Err(ValidationError::InvalidCacheMode {
                value: other.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PageKey {
    query: String,
    page_index: u32,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    page: ResultPage,
    expires_at: Instant,
}

/// Pages keyed by query and page index, each with an expiry.
///
/// Owned by a single session, so no interior locking.
#[derive(Debug, Clone)]
pub struct PageCache {
    map: HashMap<PageKey, CacheEntry>,
    default_ttl: Duration,
}

impl PageCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            map: HashMap::new(),
            default_ttl,
        }
    }

    /// Create a page cache with a default TTL of 5 minutes.
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::from_secs(300))
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn is_disabled(&self) -> bool {
        self.default_ttl == Duration::ZERO
    }

    pub fn get(&self, query: &str, page_index: u32) -> Option<ResultPage> {
        let key = PageKey {
            query: query.to_owned(),
            page_index,
        };
        self.map.get(&key).and_then(|entry| {
            if Instant::now() <= entry.expires_at {
                Some(entry.page.clone())
            } else {
                None
            }
        })
    }

    pub fn put(&mut self, query: &str, page_index: u32, page: ResultPage) {
        if self.is_disabled() {
            return;
        }

        let key = PageKey {
            query: query.to_owned(),
            page_index,
        };
        let expires_at = Instant::now() + self.default_ttl;
        self.map.insert(key, CacheEntry { page, expires_at });
    }

    pub fn clear_expired(&mut self) {
        let now = Instant::now();
        self.map.retain(|_, entry| entry.expires_at > now);
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Number of entries, including expired ones.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for PageCache {
    fn default() -> Self {
        Self::with_default_ttl()
    }
}
