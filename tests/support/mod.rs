//! Shared fixtures for session behavior tests.

#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use stockpick_core::{
    AssetCategoryType, MarketType, PageRequest, ResultPage, SearchSource, SourceError, SourceKind,
    Stock,
};
use tokio::sync::oneshot;

type Reply = Result<ResultPage, SourceError>;

/// Search source whose fetches stay in flight until the test releases them,
/// in whatever order the test chooses.
#[derive(Default)]
pub struct GatedSource {
    waiting: Mutex<Vec<(PageRequest, oneshot::Sender<Reply>)>>,
    seen: Mutex<Vec<(String, u32)>>,
}

impl GatedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(query, page_index)` requested so far.
    pub fn requests(&self) -> Vec<(String, u32)> {
        self.seen.lock().expect("seen lock").clone()
    }

    fn take(&self, query: &str, page_index: u32) -> Option<oneshot::Sender<Reply>> {
        let mut waiting = self.waiting.lock().expect("waiting lock");
        let position = waiting
            .iter()
            .position(|(req, _)| req.query == query && req.page_index == page_index)?;
        Some(waiting.remove(position).1)
    }

    /// Yield until the fetch task for `(query, page_index)` has started, then
    /// resolve it with `reply`.
    pub async fn release(&self, query: &str, page_index: u32, reply: Reply) {
        for _ in 0..1_000 {
            if let Some(sender) = self.take(query, page_index) {
                sender.send(reply).expect("session dropped the request");
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("no request for '{query}' page {page_index} was issued");
    }

    /// Yield until `count` requests have been observed.
    pub async fn wait_for_requests(&self, count: usize) {
        for _ in 0..1_000 {
            if self.requests().len() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {count} requests, saw {:?}", self.requests());
    }
}

impl SearchSource for GatedSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Fixture
    }

    fn fetch_page<'a>(
        &'a self,
        req: PageRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ResultPage, SourceError>> + Send + 'a>> {
        let (tx, rx) = oneshot::channel();
        self.seen
            .lock()
            .expect("seen lock")
            .push((req.query.clone(), req.page_index));
        self.waiting.lock().expect("waiting lock").push((req, tx));

        Box::pin(async move {
            rx.await
                .unwrap_or_else(|_| Err(SourceError::internal("gate closed")))
        })
    }
}

/// Search source whose first `panics` fetches panic; later fetches answer
/// with two stocks named after the query.
pub struct PanickingSource {
    remaining: AtomicUsize,
}

impl PanickingSource {
    pub fn new(panics: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(panics),
        }
    }
}

impl SearchSource for PanickingSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Fixture
    }

    fn fetch_page<'a>(
        &'a self,
        req: PageRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ResultPage, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let should_panic = self
                .remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
                .is_ok();
            if should_panic {
                panic!("search backend crashed on '{}'", req.query);
            }
            page(&req.query, 2, false)
        })
    }
}

/// `count` US stocks whose tickers start with `prefix`.
pub fn stocks(prefix: &str, count: u64) -> Vec<Stock> {
    (1..=count)
        .map(|n| {
            Stock::us(
                n,
                format!("{prefix}{n}"),
                format!("{prefix} company {n}"),
                MarketType::Nyse,
                AssetCategoryType::Stock,
            )
        })
        .collect()
}

pub fn page(prefix: &str, count: u64, has_next_page: bool) -> Reply {
    Ok(ResultPage::new(stocks(prefix, count), has_next_page))
}

pub fn tickers(results: &[Stock]) -> Vec<String> {
    results
        .iter()
        .filter_map(|stock| stock.ticker_code.clone())
        .collect()
}
