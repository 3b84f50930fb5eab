use std::error::Error as _;
use std::time::Duration;

use url::Url;
use volby_model::{ScrapeError, ScrapeResult};

/// HTTP settings for talking to the elections site.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("volby/{} (election results scraper)", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Source of HTML pages. The district pipeline only ever asks for one
/// page at a time and waits for it.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    /// Fetch `url` and return the decoded body. Any transport failure or
    /// non-success status is a `ScrapeError::Network`.
    async fn fetch(&self, url: &Url) -> ScrapeResult<String>;
}

/// `PageFetcher` backed by a reqwest client.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> ScrapeResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| ScrapeError::network("(client setup)", describe(&e)))?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> ScrapeResult<String> {
        tracing::debug!(url = %url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ScrapeError::network(url, describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::network(url, format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScrapeError::network(url, format!("failed to read response body: {}", describe(&e))))?;
        tracing::debug!(url = %url, bytes = body.len(), "Received HTML");
        Ok(body)
    }
}

/// Flatten a reqwest error and its sources into one line, so the user sees
/// "connection refused" or "operation timed out" rather than just
/// "error sending request".
fn describe(err: &reqwest::Error) -> String {
    let mut message = if err.is_timeout() {
        format!("request timed out ({err})")
    } else {
        err.to_string()
    };
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("volby/"));
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        // Nothing listens on the discard port locally.
        let fetcher = HttpFetcher::new(&FetchConfig {
            timeout: Duration::from_secs(5),
            ..FetchConfig::default()
        })
        .unwrap();
        let url = Url::parse("http://127.0.0.1:9/ps32?xkraj=12").unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Network { .. }), "got {err:?}");
    }
}
