use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::{
    AssetCategoryType, MarketType, PageRequest, ResultPage, SearchSource, SourceError, SourceKind,
    Stock,
};

/// Deterministic in-memory catalog used by `--source fixture` runs and tests.
#[derive(Debug, Clone, Default)]
pub struct FixtureSearchSource {
    catalog: Vec<Stock>,
    latency: Duration,
}

impl FixtureSearchSource {
    pub fn new(catalog: Vec<Stock>) -> Self {
        Self {
            catalog,
            latency: Duration::ZERO,
        }
    }

    /// A small mixed KRX / US catalog.
    pub fn demo() -> Self {
        Self::new(demo_catalog())
    }

    /// Delay every response, to make in-flight overlap observable.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn catalog(&self) -> &[Stock] {
        &self.catalog
    }

    fn matches(stock: &Stock, needle: &str) -> bool {
        let contains = |value: &str| value.to_lowercase().contains(needle);
        contains(&stock.name)
            || stock.ticker_code.as_deref().is_some_and(contains)
            || stock.stock_code.as_deref().is_some_and(contains)
    }

    fn search(&self, req: &PageRequest) -> ResultPage {
        let needle = req.query.trim().to_lowercase();
        let offset = (req.page_index as usize - 1) * req.page_size;

        let mut hits = self
            .catalog
            .iter()
            .filter(|stock| Self::matches(stock, &needle))
            .skip(offset);
        let entries: Vec<Stock> = hits.by_ref().take(req.page_size).cloned().collect();
        let has_next_page = hits.next().is_some();

        ResultPage::new(entries, has_next_page)
    }
}

impl SearchSource for FixtureSearchSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Fixture
    }

    fn fetch_page<'a>(
        &'a self,
        req: PageRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ResultPage, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if req.query.trim().is_empty() {
                return Err(SourceError::invalid_request(
                    "fixture search query must not be empty",
                ));
            }
            if req.page_index == 0 || req.page_size == 0 {
                return Err(SourceError::invalid_request(
                    "fixture search requires a 1-based page index and a positive page size",
                ));
            }

            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }

            Ok(self.search(&req))
        })
    }
}

fn demo_catalog() -> Vec<Stock> {
    use AssetCategoryType::{Etf, Stock as Equity};
    use MarketType::{Amex, KrxKosdaq, KrxKospi, Nasdaq, Nyse};

    let mut catalog = vec![
        Stock::krx(1, "005930", "Samsung Electronics", KrxKospi, Equity),
        Stock::krx(2, "005935", "Samsung Electronics Pref", KrxKospi, Equity),
        Stock::krx(3, "006400", "Samsung SDI", KrxKospi, Equity),
        Stock::krx(4, "207940", "Samsung Biologics", KrxKospi, Equity),
        Stock::krx(5, "028260", "Samsung C&T", KrxKospi, Equity),
        Stock::krx(6, "032830", "Samsung Life Insurance", KrxKospi, Equity),
        Stock::krx(7, "000810", "Samsung Fire & Marine Insurance", KrxKospi, Equity),
        Stock::krx(8, "009150", "Samsung Electro-Mechanics", KrxKospi, Equity),
        Stock::krx(9, "018260", "Samsung SDS", KrxKospi, Equity),
        Stock::krx(10, "010140", "Samsung Heavy Industries", KrxKospi, Equity),
        Stock::krx(11, "016360", "Samsung Securities", KrxKospi, Equity),
        Stock::krx(12, "029780", "Samsung Card", KrxKospi, Equity),
        Stock::krx(13, "000660", "SK Hynix", KrxKospi, Equity),
        Stock::krx(14, "035420", "NAVER", KrxKospi, Equity),
        Stock::krx(15, "035720", "Kakao", KrxKospi, Equity),
        Stock::krx(16, "247540", "Ecopro BM", KrxKosdaq, Equity),
        Stock::krx(17, "069500", "KODEX 200", KrxKospi, Etf),
        Stock::us(101, "AAPL", "Apple Inc.", Nasdaq, Equity),
        Stock::us(102, "MSFT", "Microsoft Corporation", Nasdaq, Equity),
        Stock::us(103, "AMZN", "Amazon.com Inc.", Nasdaq, Equity),
        Stock::us(104, "KO", "Coca-Cola Company", Nyse, Equity),
        Stock::us(105, "O", "Realty Income Corporation", Nyse, Equity),
        Stock::us(106, "SCHD", "Schwab U.S. Dividend Equity ETF", Amex, Etf),
        Stock::us(107, "SPY", "SPDR S&P 500 ETF Trust", Amex, Etf),
    ];

    // Samsung-branded ETFs pad the catalog so "samsung" spans several pages.
    catalog.extend((0..14).map(|n| {
        Stock::krx(
            200 + n,
            format!("1{:05}", 48_020 + n),
            format!("KODEX Samsung Group Series {}", n + 1),
            KrxKospi,
            Etf,
        )
    }));

    catalog
}
