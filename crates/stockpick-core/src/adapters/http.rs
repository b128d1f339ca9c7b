use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::{
    HttpClient, HttpRequest, HttpResponse, PageRequest, ReqwestHttpClient, ResultPage,
    RetryConfig, SearchSource, SourceError, SourceKind,
};

/// Search source backed by the catalog service's paged search endpoint.
///
/// Requests `GET {base_url}/search?query=..&page=..&size=..` and expects
/// `{"data": [Stock...], "hasNextPage": bool}`.
#[derive(Clone)]
pub struct HttpSearchSource {
    base_url: String,
    http_client: Arc<dyn HttpClient>,
    retry: RetryConfig,
    timeout_ms: u64,
}

impl HttpSearchSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(base_url, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_http_client(base_url: impl Into<String>, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            http_client,
            retry: RetryConfig::default(),
            timeout_ms: 3_000,
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn page_url(&self, req: &PageRequest) -> String {
        format!(
            "{}/search?query={}&page={}&size={}",
            self.base_url,
            urlencoding::encode(&req.query),
            req.page_index,
            req.page_size
        )
    }

    async fn execute_with_retry(&self, url: &str) -> Result<HttpResponse, SourceError> {
        let mut attempt = 0;
        loop {
            let request = HttpRequest::get(url, Duration::from_millis(self.timeout_ms));

            let retry_reason = match self.http_client.execute(request).await {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) => {
                    if attempt >= self.retry.max_retries
                        || !self.retry.should_retry_status(response.status)
                    {
                        return Err(status_error(response.status));
                    }
                    format!("status {}", response.status)
                }
                Err(error) => {
                    if attempt >= self.retry.max_retries || !self.retry.should_retry_error(&error)
                    {
                        return Err(if error.retryable() {
                            SourceError::unavailable(format!("search transport error: {error}"))
                        } else {
                            SourceError::internal(format!("search transport error: {error}"))
                        });
                    }
                    error.to_string()
                }
            };

            let delay = self.retry.delay_for_attempt(attempt);
            warn!(attempt, reason = %retry_reason, delay_ms = delay.as_millis() as u64, "retrying search request");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

fn status_error(status: u16) -> SourceError {
    match status {
        429 => SourceError::rate_limited("search service rate limit exceeded"),
        400..=499 => {
            SourceError::invalid_request(format!("search service rejected request ({status})"))
        }
        _ => SourceError::unavailable(format!("search service returned status {status}")),
    }
}

impl SearchSource for HttpSearchSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Http
    }

    fn fetch_page<'a>(
        &'a self,
        req: PageRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ResultPage, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.page_url(&req);
            debug!(%url, "fetching search page");

            let response = self.execute_with_retry(&url).await?;
            serde_json::from_str::<ResultPage>(&response.body).map_err(|error| {
                SourceError::decode(format!("failed to decode search page: {error}"))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::HttpError;

    /// Replays a fixed list of responses and records requested URLs.
    struct ScriptedHttpClient {
        replies: Mutex<Vec<Result<HttpResponse, HttpError>>>,
        urls: Mutex<Vec<String>>,
    }

    impl ScriptedHttpClient {
        fn new(mut replies: Vec<Result<HttpResponse, HttpError>>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
                urls: Mutex::new(Vec::new()),
            }
        }

        fn urls(&self) -> Vec<String> {
            self.urls.lock().expect("urls lock").clone()
        }
    }

    impl HttpClient for ScriptedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.urls.lock().expect("urls lock").push(request.url);
            let reply = self
                .replies
                .lock()
                .expect("replies lock")
                .pop()
                .unwrap_or_else(|| Err(HttpError::Rejected(String::from("script exhausted"))));
            Box::pin(async move { reply })
        }
    }

    fn status(status: u16) -> Result<HttpResponse, HttpError> {
        Ok(HttpResponse::new(status, ""))
    }

    fn json(body: &str) -> Result<HttpResponse, HttpError> {
        Ok(HttpResponse::new(200, body))
    }

    const PAGE: &str = r#"{"data":[{"assetId":1,"stockCode":"005930","name":"Samsung Electronics",
        "countryType":"KOR","marketType":"KRX_KOSPI","assetCategoryType":"STOCK"}],"hasNextPage":true}"#;

    #[tokio::test]
    async fn requests_encoded_page_url() {
        let client = Arc::new(ScriptedHttpClient::new(vec![json(
            r#"{"data":[],"hasNextPage":false}"#,
        )]));
        let source =
            HttpSearchSource::with_http_client("https://api.example.test/", client.clone());

        let page = source
            .fetch_page(PageRequest::new("s&p 500", 2, 20).expect("request"))
            .await
            .expect("empty page");

        assert!(page.is_empty());
        assert_eq!(
            client.urls(),
            vec![String::from(
                "https://api.example.test/search?query=s%26p%20500&page=2&size=20"
            )]
        );
    }

    #[tokio::test]
    async fn rejected_transport_errors_are_internal() {
        let client = Arc::new(ScriptedHttpClient::new(vec![Err(HttpError::Rejected(
            String::from("relative URL without a base"),
        ))]));
        let source = HttpSearchSource::with_http_client("https://api.example.test", client.clone());

        let err = source
            .fetch_page(PageRequest::new("aapl", 1, 20).expect("request"))
            .await
            .expect_err("must fail");

        assert_eq!(err.code(), "source.internal");
        assert_eq!(client.urls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_status_then_decodes() {
        let client = Arc::new(ScriptedHttpClient::new(vec![
            status(503),
            json(PAGE),
        ]));
        let source = HttpSearchSource::with_http_client("https://api.example.test", client.clone())
            .with_retry(RetryConfig::fixed(Duration::from_millis(10), 2));

        let page = source
            .fetch_page(PageRequest::new("samsung", 1, 20).expect("request"))
            .await
            .expect("page after retry");

        assert_eq!(page.entries.len(), 1);
        assert!(page.has_next_page);
        assert_eq!(client.urls().len(), 2);
    }

    #[tokio::test]
    async fn maps_rate_limit_without_retry_budget() {
        let client = Arc::new(ScriptedHttpClient::new(vec![status(429)]));
        let source = HttpSearchSource::with_http_client("https://api.example.test", client)
            .with_retry(RetryConfig::no_retry());

        let err = source
            .fetch_page(PageRequest::new("aapl", 1, 20).expect("request"))
            .await
            .expect_err("must fail");

        assert_eq!(err.code(), "source.rate_limited");
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let client = Arc::new(ScriptedHttpClient::new(vec![status(404), status(200)]));
        let source = HttpSearchSource::with_http_client("https://api.example.test", client.clone());

        let err = source
            .fetch_page(PageRequest::new("aapl", 1, 20).expect("request"))
            .await
            .expect_err("must fail");

        assert_eq!(err.code(), "source.invalid_request");
        assert_eq!(client.urls().len(), 1);
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let client = Arc::new(ScriptedHttpClient::new(vec![json("<html>")]));
        let source = HttpSearchSource::with_http_client("https://api.example.test", client);

        let err = source
            .fetch_page(PageRequest::new("aapl", 1, 20).expect("request"))
            .await
            .expect_err("must fail");

        assert_eq!(err.code(), "source.decode");
    }
}
