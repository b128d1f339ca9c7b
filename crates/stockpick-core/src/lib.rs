//! # Stockpick Core
//!
//! Incremental search-and-selection controller for a stock catalog.
//!
//! ## Overview
//!
//! Typing in a search box produces a burst of raw values; a result list has to
//! follow the *settled* query, page on demand, and never show entries that
//! belong to a query the user already typed past. Alongside it, a selection
//! set collects stocks picked across any number of queries.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`debounce`] | Quiet-interval filter for raw input |
//! | [`pagination`] | Page index, generation tags and fetch dispatch |
//! | [`result_store`] | Merged result list and render state |
//! | [`selection`] | Selection set keyed by identity |
//! | [`reconciler`] | Stable-query transition state machine |
//! | [`session`] | Composes the above into one owned controller |
//! | [`search_source`] | Page-fetch capability and its errors |
//! | [`adapters`] | HTTP and fixture search sources |
//! | [`cache`] | Per-query page cache |
//! | [`domain`] | Stock, identity key and selection records |
//!
//! ## Data flow
//!
//! ```text
//! keystroke ─▶ DebounceFilter ─▶ QueryReconciler ─▶ PaginationController ─▶ ResultStore
//!                                                        ▲      │ spawn
//!                                    tagged PageResponse │      ▼
//!                                                        └── SearchSource
//! click ─▶ SelectionSet (independent of result lifecycle)
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use stockpick_core::{SourceError, SourceErrorKind};
//!
//! fn describe(error: &SourceError) -> &'static str {
//!     match error.kind() {
//!         SourceErrorKind::RateLimited | SourceErrorKind::Unavailable => "try again",
//!         SourceErrorKind::InvalidRequest | SourceErrorKind::Decode => "report",
//!         SourceErrorKind::Internal => "bug",
//!     }
//! }
//! ```

pub mod adapters;
pub mod cache;
pub mod config;
pub mod debounce;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod pagination;
pub mod reconciler;
pub mod result_store;
pub mod retry;
pub mod search_source;
pub mod selection;
pub mod session;
pub mod source;

pub use adapters::{FixtureSearchSource, HttpSearchSource};
pub use cache::{CacheMode, PageCache};
pub use config::{SessionConfig, DEFAULT_PAGE_SIZE};
pub use debounce::{DebounceFilter, DEFAULT_DEBOUNCE};
pub use domain::{AssetCategoryType, CountryType, IdentityKey, MarketType, SelectedStock, Stock};
pub use error::{CoreError, SessionError, ValidationError};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use pagination::{
    Accepted, FetchIssue, Generation, MergeMode, PageResponse, PageTicket, PaginationController,
};
pub use reconciler::{QueryReconciler, QueryTransition, ReconcilerState};
pub use result_store::{RenderState, ResultStore};
pub use retry::{Backoff, RetryConfig};
pub use search_source::{PageRequest, ResultPage, SearchSource, SourceError, SourceErrorKind};
pub use selection::{SelectionSet, ToggleOutcome};
pub use session::{ApplyOutcome, SearchSession, SessionEvent, SessionUpdate};
pub use source::SourceKind;
