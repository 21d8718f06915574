//! HTTP client for retrieving source pages and data files.

use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, InvalidHeaderValue};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// A browser-like user agent; several scraped sources reject other clients.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X) AppleWebKit/537.36 (KHTML, like Gecko) Chrome Safari";

/// Accept header sent with every request.
pub const DEFAULT_ACCEPT: &str = "text/html,application/json;q=0.9,*/*;q=0.8";

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Connection establishment timeout.
    pub connect_timeout: Duration,
    /// Maximum retry attempts for transient failures.
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds).
    pub max_delay_ms: u64,
    /// User agent string.
    pub user_agent: String,
    /// Accept header value.
    pub accept: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_retries: 2,
            base_delay_ms: 500,
            max_delay_ms: 8_000,
            user_agent: BROWSER_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
        }
    }
}

/// Errors that can occur while fetching.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server kept returning an error status after all retries.
    #[error("Server error: {status}")]
    ServerError {
        /// HTTP status code.
        status: u16,
    },

    /// A configured header value is not valid.
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
}

/// HTTP client with browser-like headers, timeouts and retry logic.
///
/// Created once per run and shared by reference with every source.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
    config: ClientConfig,
}

impl FetchClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_str(&config.accept)?);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetches a URL and returns its body as text.
    ///
    /// Returns `Ok(None)` if the resource does not exist (404).
    ///
    /// # Errors
    ///
    /// Returns an error on other non-2xx statuses, or if the request fails
    /// after all retries.
    pub async fn fetch(&self, url: &str) -> Result<Option<String>, FetchError> {
        let mut attempts = 0;

        loop {
            debug!(url, attempt = attempts, "GET");
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Ok(None);
                    }

                    // Retry on server errors (5xx) and rate limiting (429)
                    if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS
                    {
                        if attempts < self.config.max_retries {
                            attempts += 1;
                            let delay = self.calculate_backoff_delay(attempts);
                            debug!(url, %status, ?delay, "retrying");
                            tokio::time::sleep(delay).await;
                            continue;
                        }
                        return Err(FetchError::ServerError {
                            status: status.as_u16(),
                        });
                    }

                    response.error_for_status_ref()?;
                    return Ok(Some(response.text().await?));
                }
                Err(e) if Self::is_retryable_error(&e) && attempts < self.config.max_retries => {
                    attempts += 1;
                    let delay = self.calculate_backoff_delay(attempts);
                    debug!(url, error = %e, ?delay, "retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Calculates the backoff delay with exponential backoff and jitter.
    fn calculate_backoff_delay(&self, attempt: u32) -> Duration {
        let exp_delay = self
            .config
            .base_delay_ms
            .saturating_mul(1u64 << attempt.min(10));
        let capped_delay = exp_delay.min(self.config.max_delay_ms);

        // Deterministic jitter within ±25% keyed on the attempt number
        let jitter_range = (capped_delay / 4) as i64;
        let jitter = if jitter_range > 0 {
            (i64::from(attempt) * 17) % (jitter_range * 2) - jitter_range
        } else {
            0
        };

        let final_delay = (capped_delay as i64 + jitter).max(100) as u64;
        Duration::from_millis(final_delay)
    }

    /// Determines if an error is retryable.
    fn is_retryable_error(error: &reqwest::Error) -> bool {
        if error.is_builder() {
            return false;
        }
        error.is_timeout() || error.is_connect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

    /// Matches a header against its complete value.
    ///
    /// wiremock stores comma-separated header values as separate entries, so
    /// both sides are compared part by part.
    struct FullHeader {
        name: &'static str,
        value: &'static str,
    }

    impl Match for FullHeader {
        fn matches(&self, request: &Request) -> bool {
            let expected: Vec<&str> = self.value.split(',').map(str::trim).collect();
            request.headers.iter().any(|(name, values)| {
                name.as_str().eq_ignore_ascii_case(self.name)
                    && values
                        .iter()
                        .flat_map(|v| v.as_str().split(','))
                        .map(str::trim)
                        .collect::<Vec<_>>()
                        == expected
            })
        }
    }

    fn fast_client(max_retries: u32) -> FetchClient {
        FetchClient::new(ClientConfig {
            max_retries,
            base_delay_ms: 1,
            max_delay_ms: 1,
            timeout: Duration::from_secs(5),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.user_agent, BROWSER_USER_AGENT);
    }

    #[test]
    fn test_invalid_accept_header() {
        let result = FetchClient::new(ClientConfig {
            accept: "bad\nvalue".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(FetchError::InvalidHeader(_))));
    }

    #[test]
    fn test_backoff_delay_calculation() {
        let client = FetchClient::with_defaults().unwrap();

        // First attempt: base_delay * 2 = 1000ms (plus jitter)
        let delay1 = client.calculate_backoff_delay(1);
        assert!(delay1.as_millis() >= 750 && delay1.as_millis() <= 1250);

        // High attempt should be capped at max_delay
        let delay_high = client.calculate_backoff_delay(20);
        assert!(delay_high.as_millis() <= 10_000);
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(FullHeader {
                name: "user-agent",
                value: BROWSER_USER_AGENT,
            })
            .and(FullHeader {
                name: "accept",
                value: DEFAULT_ACCEPT,
            })
            .respond_with(ResponseTemplate::new(200).set_body_string("rate 6.1%"))
            .mount(&server)
            .await;

        let body = fast_client(0)
            .fetch(&format!("{}/page", server.uri()))
            .await
            .unwrap();
        assert_eq!(body.as_deref(), Some("rate 6.1%"));
    }

    #[tokio::test]
    async fn test_fetch_not_found_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let body = fast_client(0)
            .fetch(&format!("{}/missing", server.uri()))
            .await
            .unwrap();
        assert!(body.is_none());
    }

    #[tokio::test]
    async fn test_fetch_retries_then_fails_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let result = fast_client(2).fetch(&server.uri()).await;
        assert!(matches!(
            result,
            Err(FetchError::ServerError { status: 503 })
        ));
    }

    #[tokio::test]
    async fn test_fetch_client_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        let result = fast_client(2).fetch(&server.uri()).await;
        assert!(matches!(result, Err(FetchError::Http(_))));
    }
}
