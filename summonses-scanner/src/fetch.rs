use crate::error::Result;
use crate::result::FetchOutcome;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Anything that can retrieve a page and classify the outcome.
///
/// Implementations block until the outcome is known.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> FetchOutcome;
}

impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    fn fetch(&self, url: &str) -> FetchOutcome {
        (**self).fetch(url)
    }
}

/// How an HTTP status code feeds the walker's retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    /// 404 or 410
    Missing,
    Retryable,
}

pub fn classify_status(code: u16) -> StatusClass {
    match code {
        200..=299 => StatusClass::Success,
        404 | 410 => StatusClass::Missing,
        _ => StatusClass::Retryable,
    }
}

/// Blocking HTTP fetcher used against the live archive.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("summonses/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs((timeout_secs / 2).max(1)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> FetchOutcome {
        debug!("Fetching {}", url);

        let response = match self.client.get(url).send() {
            Ok(response) => response,
            Err(e) => return FetchOutcome::Transient(e.to_string()),
        };

        let status = response.status().as_u16();
        match classify_status(status) {
            StatusClass::Success => match response.text() {
                Ok(body) => FetchOutcome::Body(body),
                Err(e) => FetchOutcome::Transient(format!("reading body: {}", e)),
            },
            StatusClass::Missing => FetchOutcome::Absent,
            StatusClass::Retryable => FetchOutcome::Transient(format!("HTTP {}", status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    #[test]
    fn test_success_statuses() {
        assert_eq!(classify_status(200), StatusClass::Success);
        assert_eq!(classify_status(204), StatusClass::Success);
    }

    #[test]
    fn test_not_found_and_gone_are_missing() {
        assert_eq!(classify_status(404), StatusClass::Missing);
        assert_eq!(classify_status(410), StatusClass::Missing);
    }

    #[test]
    fn test_other_errors_are_retryable() {
        assert_eq!(classify_status(403), StatusClass::Retryable);
        assert_eq!(classify_status(429), StatusClass::Retryable);
        assert_eq!(classify_status(500), StatusClass::Retryable);
        assert_eq!(classify_status(503), StatusClass::Retryable);
    }

    /// The blocking client must live outside the async runtime.
    #[tokio::test(flavor = "multi_thread")]
    async fn test_http_fetcher_outcomes() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/archive_2012.shtml"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string("<html><body>2012</body></html>"),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/archive_2008.shtml"))
            .respond_with(ResponseTemplate::new(410))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/archive_2016.shtml"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let base = mock_server.uri();
        let outcomes = tokio::task::spawn_blocking(move || {
            let fetcher = HttpFetcher::with_timeout(5).unwrap();
            ["2012", "2009", "2008", "2016"]
                .iter()
                .map(|year| fetcher.fetch(&format!("{}/archive_{}.shtml", base, year)))
                .collect::<Vec<_>>()
        })
        .await
        .unwrap();

        assert_eq!(
            outcomes[0],
            FetchOutcome::Body("<html><body>2012</body></html>".to_string())
        );
        // Unmocked paths answer 404
        assert_eq!(outcomes[1], FetchOutcome::Absent);
        assert_eq!(outcomes[2], FetchOutcome::Absent);
        assert_eq!(outcomes[3], FetchOutcome::Transient("HTTP 500".to_string()));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_connection_failure_is_transient() {
        let outcome = tokio::task::spawn_blocking(|| {
            let fetcher = HttpFetcher::with_timeout(2).unwrap();
            fetcher.fetch("http://127.0.0.1:1/archive_2012.shtml")
        })
        .await
        .unwrap();

        assert!(matches!(outcome, FetchOutcome::Transient(_)));
    }
}
