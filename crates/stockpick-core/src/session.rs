//! Search session: the single owner and writer of query, result and
//! selection state.
//!
//! The session is driven by three timelines:
//!
//! | Input | Entry point |
//! |-------|-------------|
//! | Keystrokes | [`SearchSession::input`], settled through the debounce filter |
//! | Page responses | posted by fetch tasks, applied by [`SearchSession::step`] |
//! | Selection clicks | [`SearchSession::toggle`], [`SearchSession::remove`] |
//!
//! ```rust,ignore
//! let mut session = SearchSession::new(Arc::new(FixtureSearchSource::demo()), SessionConfig::default());
//! session.input("sam");
//! session.input("samsung");
//! session.settle().await?;
//! for stock in session.results() {
//!     println!("{} selected={}", stock.name, session.is_selected(stock));
//! }
//! ```

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::Instant;
use tracing::debug;

use crate::{
    Accepted, DebounceFilter, FetchIssue, IdentityKey, MergeMode, PageResponse,
    PaginationController, QueryReconciler, QueryTransition, ReconcilerState, RenderState,
    ResultStore, SearchSource, SelectionSet, SessionConfig, SessionError, Stock, ToggleOutcome,
    ValidationError,
};

/// Something the session is waiting on resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    StableQuery(String),
    Response(PageResponse),
}

/// Effect of applying a page response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Replaced { count: usize },
    Appended { count: usize },
    /// The response belonged to an older query or request.
    Discarded,
    Failed(SessionError),
}

/// What a single [`SearchSession::step`] changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    QueryChanged(String),
    QueryUnchanged(String),
    Applied(ApplyOutcome),
}

/// Incremental search-and-selection controller.
pub struct SearchSession {
    config: SessionConfig,
    raw_value: String,
    debounce: DebounceFilter<String>,
    reconciler: QueryReconciler,
    pagination: PaginationController,
    results: ResultStore,
    selection: SelectionSet,
    responses: UnboundedReceiver<PageResponse>,
}

impl SearchSession {
    pub fn new(source: Arc<dyn SearchSource>, config: SessionConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        debug!(source = %source.kind(), page_size = config.page_size, "search session created");

        Self {
            raw_value: String::new(),
            debounce: DebounceFilter::new(config.debounce),
            reconciler: QueryReconciler::new(),
            pagination: PaginationController::new(source, &config, tx),
            results: ResultStore::new(),
            selection: SelectionSet::new(),
            responses: rx,
            config,
        }
    }

    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Record the current text of the search box.
    pub fn input(&mut self, raw: impl Into<String>) {
        let raw = raw.into();
        self.raw_value.clone_from(&raw);
        self.debounce.push(raw, Instant::now());
    }

    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    pub fn stable_value(&self) -> &str {
        self.reconciler.stable_value()
    }

    /// Whether typed text is still waiting for the quiet interval.
    pub fn is_debouncing(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Adopt `value` as the stable query. On change the store is cleared and
    /// page 1 of the new query is requested. Returns whether it changed.
    pub fn set_stable(&mut self, value: &str) -> bool {
        match self.reconciler.observe(value) {
            QueryTransition::Unchanged => false,
            QueryTransition::Changed { .. } => {
                self.results.clear();
                if self.pagination.invalidate(value) == FetchIssue::ShortCircuited {
                    self.reconciler.on_page(0);
                }
                true
            }
        }
    }

    /// Request the next page of the active query. Returns whether a fetch
    /// was issued.
    pub fn load_more(&mut self) -> bool {
        let issued = self.pagination.load_more().is_some();
        if issued {
            self.reconciler.on_retry(self.results.len());
        }
        issued
    }

    /// Re-issue the page whose fetch failed last.
    pub fn retry(&mut self) -> bool {
        let issued = self.pagination.retry().is_some();
        if issued {
            self.reconciler.on_retry(self.results.len());
        }
        issued
    }

    /// Apply a fetch response if it still belongs to the active request.
    pub fn apply(&mut self, response: PageResponse) -> ApplyOutcome {
        match self.pagination.accept(response) {
            Accepted::Page { merge, page } => {
                let count = page.entries.len();
                let outcome = match merge {
                    MergeMode::Replace => {
                        self.results.replace(page);
                        ApplyOutcome::Replaced { count }
                    }
                    MergeMode::Append => {
                        self.results.append(page);
                        ApplyOutcome::Appended { count }
                    }
                };
                self.reconciler.on_page(self.results.len());
                outcome
            }
            Accepted::Discarded => ApplyOutcome::Discarded,
            Accepted::Failed(error) => {
                if let SessionError::FetchFailure { source, .. } = &error {
                    self.reconciler.on_failure(source.clone());
                }
                ApplyOutcome::Failed(error)
            }
        }
    }

    /// Wait for the next settled query or page response.
    pub async fn next_event(&mut self) -> Result<SessionEvent, SessionError> {
        tokio::select! {
            value = self.debounce.settled() => Ok(SessionEvent::StableQuery(value)),
            response = self.responses.recv() => response
                .map(SessionEvent::Response)
                .ok_or(SessionError::ChannelClosed),
        }
    }

    /// Handle an event produced by [`next_event`](Self::next_event).
    pub fn handle(&mut self, event: SessionEvent) -> SessionUpdate {
        match event {
            SessionEvent::StableQuery(value) => {
                debug!(query = %value, "debounced query settled");
                if self.set_stable(&value) {
                    SessionUpdate::QueryChanged(value)
                } else {
                    SessionUpdate::QueryUnchanged(value)
                }
            }
            SessionEvent::Response(response) => SessionUpdate::Applied(self.apply(response)),
        }
    }

    pub async fn step(&mut self) -> Result<SessionUpdate, SessionError> {
        let event = self.next_event().await?;
        Ok(self.handle(event))
    }

    /// Step until no typed text is pending and no fetch is in flight.
    pub async fn settle(&mut self) -> Result<Vec<SessionUpdate>, SessionError> {
        let mut updates = Vec::new();
        while self.debounce.is_pending() || self.pagination.is_loading() {
            updates.push(self.step().await?);
        }
        Ok(updates)
    }

    /// Toggle `stock` in the selection under the current stable query.
    pub fn toggle(&mut self, stock: &Stock) -> Result<ToggleOutcome, ValidationError> {
        self.selection.toggle(stock, self.reconciler.stable_value())
    }

    /// Toggle the result at `index` (0-based). `None` if out of range.
    pub fn toggle_at(&mut self, index: usize) -> Option<Result<ToggleOutcome, ValidationError>> {
        let stock = self.results.get(index)?.clone();
        Some(self.toggle(&stock))
    }

    pub fn remove(&mut self, key: &IdentityKey) -> bool {
        self.selection.remove_key(key)
    }

    pub fn is_selected(&self, stock: &Stock) -> bool {
        self.selection.is_selected(stock)
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Mutable access for editing count and price of selected entries.
    pub fn selection_mut(&mut self) -> &mut SelectionSet {
        &mut self.selection
    }

    pub fn results(&self) -> &[Stock] {
        self.results.entries()
    }

    pub fn is_loading(&self) -> bool {
        self.pagination.is_loading()
    }

    pub fn has_next_page(&self) -> bool {
        self.pagination.has_next_page()
    }

    pub fn page_index(&self) -> u32 {
        self.pagination.page_index()
    }

    pub fn state(&self) -> &ReconcilerState {
        self.reconciler.state()
    }

    /// Summary for the result area.
    ///
    /// A failure only replaces the list when nothing has been loaded for the
    /// query; a failed load-more keeps showing the pages already merged.
    pub fn render_state(&self) -> RenderState {
        if self.stable_value().is_empty() {
            return RenderState::NoQuery;
        }
        if !self.results.is_empty() {
            return RenderState::Results {
                count: self.results.len(),
            };
        }
        if let ReconcilerState::Failed(error) = self.reconciler.state() {
            return RenderState::Failed {
                code: error.code().to_owned(),
                message: error.message().to_owned(),
            };
        }
        if self.is_loading() {
            RenderState::Loading
        } else {
            RenderState::NoResults
        }
    }
}
