//! Search source trait and page request/response types.
//!
//! This module defines the fetch capability (`SearchSource`) the session
//! consumes. Everything behind it, HTTP or otherwise, is a collaborator.
//!
//! # Example
//!
//! ```rust,ignore
//! use stockpick_core::{FixtureSearchSource, PageRequest, SearchSource};
//!
//! async fn first_page(source: &FixtureSearchSource) -> Result<(), stockpick_core::SourceError> {
//!     let request = PageRequest::new("samsung", 1, 20)?;
//!     let page = source.fetch_page(request).await?;
//!
//!     for stock in &page.entries {
//!         println!("{} ({})", stock.name, stock.market_type);
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{SourceKind, Stock, ValidationError};

/// Source-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    Decode,
    Internal,
}

/// Structured fetch error reported by a search source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Decode,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Decode => "source.decode",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

impl From<ValidationError> for SourceError {
    fn from(value: ValidationError) -> Self {
        Self::invalid_request(value.to_string())
    }
}

/// Request for one page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub query: String,
    /// 1-based.
    pub page_index: u32,
    pub page_size: usize,
}

impl PageRequest {
    pub fn new(
        query: impl Into<String>,
        page_index: u32,
        page_size: usize,
    ) -> Result<Self, ValidationError> {
        if page_index == 0 {
            return Err(ValidationError::InvalidPageIndex);
        }
        if page_size == 0 {
            return Err(ValidationError::InvalidPageSize);
        }
        Ok(Self {
            query: query.into(),
            page_index,
            page_size,
        })
    }
}

/// One fetched batch of results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage {
    #[serde(rename = "data", default)]
    pub entries: Vec<Stock>,
    #[serde(default)]
    pub has_next_page: bool,
}

impl ResultPage {
    pub fn new(entries: Vec<Stock>, has_next_page: bool) -> Self {
        Self {
            entries,
            has_next_page,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Async page-fetch capability consumed by the search session.
///
/// Implementations must be `Send + Sync`: fetches run on spawned tasks and
/// post their result back to the session.
pub trait SearchSource: Send + Sync {
    /// Identifies the implementation in logs and CLI output.
    fn kind(&self) -> SourceKind;

    /// Fetches one page of results for `req.query`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the upstream is unavailable, rate limited,
    /// rejects the request or returns a body that cannot be decoded. Sources
    /// may retry internally; callers never do.
    fn fetch_page<'a>(
        &'a self,
        req: PageRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ResultPage, SourceError>> + Send + 'a>>;
}
