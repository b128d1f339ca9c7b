use thiserror::Error;

use crate::SourceError;

/// Validation and contract errors exposed by `stockpick-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("stock {asset_id} has neither a ticker code nor a stock code")]
    InvalidIdentity { asset_id: u64 },

    #[error("invalid source '{value}', expected one of http, fixture")]
    InvalidSource { value: String },
    #[error("invalid cache mode '{value}', expected use or refresh")]
    InvalidCacheMode { value: String },

    #[error("page index must be at least 1")]
    InvalidPageIndex,
    #[error("page size must be greater than zero")]
    InvalidPageSize,
}

/// Session-level failures surfaced while applying fetch responses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("page {page_index} for '{query}' failed: {source}")]
    FetchFailure {
        query: String,
        page_index: u32,
        #[source]
        source: SourceError,
    },

    #[error("response channel closed")]
    ChannelClosed,
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
