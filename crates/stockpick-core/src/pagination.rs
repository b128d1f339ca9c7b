//! Page index bookkeeping and tagged fetch dispatch.
//!
//! Every request is stamped with the generation that was current when it was
//! issued. [`PaginationController::invalidate`] bumps the generation, so a
//! response that arrives after a query change no longer matches and is
//! dropped by [`PaginationController::accept`]. The underlying request is
//! not aborted; its result is ignored.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::{
    CacheMode, PageCache, PageRequest, ResultPage, SearchSource, SessionConfig, SessionError,
    SourceError,
};

/// Marker of the query epoch a request belongs to.
pub type Generation = u64;

/// Identifies one issued page request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageTicket {
    pub generation: Generation,
    pub query: String,
    pub page_index: u32,
}

/// A fetch result posted back to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub ticket: PageTicket,
    pub result: Result<ResultPage, SourceError>,
    pub from_cache: bool,
}

/// How an accepted page is merged into the result store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    Replace,
    Append,
}

/// Outcome of issuing a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchIssue {
    Issued(PageTicket),
    /// Empty query: answered with no results and no request.
    ShortCircuited,
}

/// Outcome of matching a response against the current generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accepted {
    Page { merge: MergeMode, page: ResultPage },
    Discarded,
    Failed(SessionError),
}

/// Owns the page index for the active query and dispatches fetches.
pub struct PaginationController {
    source: Arc<dyn SearchSource>,
    responses: UnboundedSender<PageResponse>,
    cache: PageCache,
    cache_mode: CacheMode,
    page_size: usize,
    generation: Generation,
    query: String,
    page_index: u32,
    has_next_page: bool,
    in_flight: Option<PageTicket>,
    failed_page: Option<u32>,
}

impl PaginationController {
    pub fn new(
        source: Arc<dyn SearchSource>,
        config: &SessionConfig,
        responses: UnboundedSender<PageResponse>,
    ) -> Self {
        let cache = if config.cache_mode.is_enabled() {
            PageCache::new(config.cache_ttl)
        } else {
            PageCache::disabled()
        };

        Self {
            source,
            responses,
            cache,
            cache_mode: config.cache_mode,
            page_size: config.page_size,
            generation: 0,
            query: String::new(),
            page_index: 1,
            has_next_page: false,
            in_flight: None,
            failed_page: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub const fn page_index(&self) -> u32 {
        self.page_index
    }

    pub const fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    pub const fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<&PageTicket> {
        self.in_flight.as_ref()
    }

    /// Page whose last fetch failed and has not been retried yet.
    pub const fn failed_page(&self) -> Option<u32> {
        self.failed_page
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    /// Issue a request for `page_index` of `query` under the current
    /// generation. Exactly one response is posted per issued ticket, also
    /// when the source panics.
    pub fn fetch_page(&mut self, query: &str, page_index: u32) -> FetchIssue {
        if query.is_empty() {
            self.has_next_page = false;
            return FetchIssue::ShortCircuited;
        }

        let ticket = PageTicket {
            generation: self.generation,
            query: query.to_owned(),
            page_index,
        };
        self.in_flight = Some(ticket.clone());
        self.failed_page = None;

        if self.cache_mode.is_enabled() {
            if let Some(page) = self.cache.get(query, page_index) {
                debug!(query, page_index, "serving page from cache");
                self.post(PageResponse {
                    ticket: ticket.clone(),
                    result: Ok(page),
                    from_cache: true,
                });
                return FetchIssue::Issued(ticket);
            }
        }

        debug!(query, page_index, generation = self.generation, "requesting page");
        let request = PageRequest {
            query: query.to_owned(),
            page_index,
            page_size: self.page_size,
        };
        let source = Arc::clone(&self.source);
        let responses = self.responses.clone();
        let task_ticket = ticket.clone();
        tokio::spawn(async move {
            let fetch = tokio::spawn(async move { source.fetch_page(request).await });
            let result = fetch.await.unwrap_or_else(|error| {
                warn!(%error, "search task did not complete");
                Err(SourceError::internal(format!("search task failed: {error}")))
            });
            // The session may already be gone; nothing to deliver to then.
            let _ = responses.send(PageResponse {
                ticket: task_ticket,
                result,
                from_cache: false,
            });
        });

        FetchIssue::Issued(ticket)
    }

    /// Fetch the next page of the active query.
    ///
    /// Returns `None` without touching any state when there is no next page
    /// or a fetch is already in flight. After a failure the failed page is
    /// requested again instead of advancing.
    pub fn load_more(&mut self) -> Option<PageTicket> {
        if self.in_flight.is_some() || self.query.is_empty() {
            return None;
        }

        let page_index = match self.failed_page {
            Some(failed) => failed,
            None if self.has_next_page => self.page_index + 1,
            None => return None,
        };

        self.page_index = page_index;
        let query = self.query.clone();
        match self.fetch_page(&query, page_index) {
            FetchIssue::Issued(ticket) => Some(ticket),
            FetchIssue::ShortCircuited => None,
        }
    }

    /// Re-issue the last failed page, if any.
    pub fn retry(&mut self) -> Option<PageTicket> {
        if self.failed_page.is_none() {
            return None;
        }
        self.load_more()
    }

    /// Switch to `query`: start a new generation, reset to page 1 and fetch
    /// it. Responses of earlier generations will be discarded.
    pub fn invalidate(&mut self, query: &str) -> FetchIssue {
        self.generation += 1;
        self.query = query.to_owned();
        self.page_index = 1;
        self.has_next_page = false;
        self.in_flight = None;
        self.failed_page = None;

        self.cache.clear_expired();

        self.fetch_page(query, 1)
    }

    /// Match `response` against the current generation and in-flight ticket.
    pub fn accept(&mut self, response: PageResponse) -> Accepted {
        let PageResponse {
            ticket,
            result,
            from_cache,
        } = response;

        if ticket.generation != self.generation || self.in_flight.as_ref() != Some(&ticket) {
            debug!(
                query = %ticket.query,
                page_index = ticket.page_index,
                generation = ticket.generation,
                current = self.generation,
                "discarding stale page response"
            );
            return Accepted::Discarded;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                self.has_next_page = page.has_next_page;
                if self.cache_mode.is_enabled() && !from_cache {
                    self.cache.put(&ticket.query, ticket.page_index, page.clone());
                }
                let merge = if ticket.page_index == 1 {
                    MergeMode::Replace
                } else {
                    MergeMode::Append
                };
                Accepted::Page { merge, page }
            }
            Err(source) => {
                warn!(
                    query = %ticket.query,
                    page_index = ticket.page_index,
                    code = source.code(),
                    "page fetch failed"
                );
                self.failed_page = Some(ticket.page_index);
                Accepted::Failed(SessionError::FetchFailure {
                    query: ticket.query,
                    page_index: ticket.page_index,
                    source,
                })
            }
        }
    }

    fn post(&self, response: PageResponse) {
        let _ = self.responses.send(response);
    }
}
