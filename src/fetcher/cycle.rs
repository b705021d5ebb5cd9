use std::sync::Arc;

use tracing::debug;

use crate::domain::EntryBuffer;
use crate::fetcher::{FetchError, Fetcher};
use crate::parser::PageParser;

/// One round-trip to the playlist page: GET, status check, parse.
#[derive(Clone)]
pub struct FetchCycle {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    parser: PageParser,
    url: String,
}

impl FetchCycle {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, parser: PageParser, url: String) -> Self {
        Self {
            fetcher,
            parser,
            url,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// An empty buffer is a valid result, not an error.
    pub async fn fetch(&self) -> Result<EntryBuffer, FetchError> {
        let response = self.fetcher.fetch(&self.url).await?;

        if response.status != 200 {
            return Err(FetchError::BadStatus(response.status));
        }

        let buffer = self.parser.parse(&response.body)?;
        debug!(url = %self.url, entries = buffer.len(), "Fetched playlist");

        Ok(buffer)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::fetcher::PageResponse;
    use crate::parser::ParseError;

    /// Hands out queued responses in order; errors once the queue is empty.
    pub(crate) struct ScriptedFetcher {
        responses: Mutex<VecDeque<Result<PageResponse, FetchError>>>,
        pub(crate) requests: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        pub(crate) fn new(responses: Vec<Result<PageResponse, FetchError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn push(&self, response: Result<PageResponse, FetchError>) {
            self.responses.lock().unwrap().push_back(response);
        }
    }

    #[async_trait]
    impl Fetcher for ScriptedFetcher {
        async fn fetch(&self, url: &str) -> Result<PageResponse, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::Transport("no scripted response".into())))
        }
    }

    const ONE_ROW: &str = "<table><tr><td>October 5, 2013 11:42:07PM PDT</td><td>A - B</td></tr></table>";

    fn cycle(fetcher: ScriptedFetcher) -> (Arc<ScriptedFetcher>, FetchCycle) {
        let fetcher = Arc::new(fetcher);
        let cycle = FetchCycle::new(
            fetcher.clone(),
            PageParser::default(),
            "http://radio.test/last-played".into(),
        );
        (fetcher, cycle)
    }

    #[tokio::test]
    async fn test_success_returns_buffer() {
        let (fetcher, cycle) = cycle(ScriptedFetcher::new(vec![Ok(PageResponse::ok(ONE_ROW))]));

        let buffer = assert_ok!(cycle.fetch().await);
        assert_eq!(buffer.len(), 1);
        assert_eq!(
            *fetcher.requests.lock().unwrap(),
            vec!["http://radio.test/last-played".to_string()]
        );
    }

    #[tokio::test]
    async fn test_non_200_is_bad_status() {
        let (_, cycle) = cycle(ScriptedFetcher::new(vec![
            Ok(PageResponse {
                status: 503,
                body: ONE_ROW.into(),
            }),
            Ok(PageResponse {
                status: 204,
                body: String::new(),
            }),
        ]));

        assert!(matches!(cycle.fetch().await, Err(FetchError::BadStatus(503))));
        assert!(matches!(cycle.fetch().await, Err(FetchError::BadStatus(204))));
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let (_, cycle) = cycle(ScriptedFetcher::new(vec![Err(FetchError::Transport(
            "connection reset".into(),
        ))]));

        let err = assert_err!(cycle.fetch().await);
        assert!(matches!(err, FetchError::Transport(ref msg) if msg == "connection reset"));
    }

    #[tokio::test]
    async fn test_unparsable_body_is_parse_failed() {
        let (_, cycle) = cycle(ScriptedFetcher::new(vec![Ok(PageResponse::ok("<p>nope</p>"))]));

        assert!(matches!(
            cycle.fetch().await,
            Err(FetchError::ParseFailed(ParseError::NoTable))
        ));
    }

    #[tokio::test]
    async fn test_empty_table_is_ok() {
        let (_, cycle) = cycle(ScriptedFetcher::new(vec![Ok(PageResponse::ok("<table></table>"))]));

        let buffer = assert_ok!(cycle.fetch().await);
        assert!(buffer.is_empty());
    }
}
