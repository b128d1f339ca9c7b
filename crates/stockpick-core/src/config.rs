use std::time::Duration;

use crate::debounce::DEFAULT_DEBOUNCE;
use crate::{CacheMode, ValidationError};

/// Default number of entries requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Tunables of a search session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Quiet interval before typed text becomes the stable query.
    pub debounce: Duration,
    pub page_size: usize,
    pub cache_mode: CacheMode,
    pub cache_ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            page_size: DEFAULT_PAGE_SIZE,
            cache_mode: CacheMode::default(),
            cache_ttl: Duration::from_secs(300),
        }
    }
}

impl SessionConfig {
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_cache_mode(mut self, cache_mode: CacheMode) -> Self {
        self.cache_mode = cache_mode;
        self
    }

    pub fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }

    pub fn validate(self) -> Result<Self, ValidationError> {
        if self.page_size == 0 {
            return Err(ValidationError::InvalidPageSize);
        }
        Ok(self)
    }
}
