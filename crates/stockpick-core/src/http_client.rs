//! Transport seam under [`HttpSearchSource`](crate::HttpSearchSource).
//!
//! The search endpoint is a plain JSON `GET`, so a request is just a URL and
//! a timeout budget. Errors are classified by what a retry could change.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;

/// One `GET` against the search service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure before a status line was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Connection refused, reset or body cut short.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The request could not be built or sent at all.
    #[error("request rejected by client: {0}")]
    Rejected(String),
}

impl HttpError {
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    pub const fn retryable(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_builder() {
            Self::Rejected(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }
}

pub trait HttpClient: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;
}

/// reqwest-backed client that asks for JSON.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("stockpick/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let response = self
                .client
                .get(&request.url)
                .header(reqwest::header::ACCEPT, "application/json")
                .timeout(request.timeout)
                .send()
                .await?;

            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse::new(status, body))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_2xx() {
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(301, "").is_success());
        assert!(!HttpResponse::new(503, "").is_success());
    }

    #[test]
    fn only_rejected_requests_are_final() {
        assert!(HttpError::Timeout(String::from("slow")).retryable());
        assert!(HttpError::Timeout(String::from("slow")).is_timeout());
        assert!(HttpError::Transport(String::from("reset")).retryable());
        assert!(!HttpError::Rejected(String::from("bad url")).retryable());
    }
}
