pub mod cycle;
pub mod http_fetcher;

use async_trait::async_trait;
use thiserror::Error;

use crate::parser::ParseError;

pub use cycle::FetchCycle;
pub use http_fetcher::HttpFetcher;

/// Raw page as returned by the transport.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub status: u16,
    pub body: String,
}

impl PageResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// Why a fetch cycle produced no buffer. Every variant is retried after the
/// fixed backoff.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("got HTTP status code {0}")]
    BadStatus(u16),

    #[error("could not parse page: {0}")]
    ParseFailed(#[from] ParseError),
}

#[async_trait]
pub trait Fetcher {
    /// Issues one GET. Only transport failures are errors; any HTTP status
    /// comes back as a [`PageResponse`].
    async fn fetch(&self, url: &str) -> Result<PageResponse, FetchError>;
}
