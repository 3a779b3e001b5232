//! bunny.net REST transport.
//!
//! Unique responsibility: perform single HTTP calls against the bunny.net
//! management API and read pull zones. Retries for transient failures live
//! here and nowhere else.
//!
//! API endpoint:
//! - <https://api.bunny.net>
//! - Header: `AccessKey: <token>`
//!
//! All configuration is loaded from environment variables.

use std::{env, time::Duration};

use async_trait::async_trait;
use reqwest::{Method, StatusCode, header};
use tracing::{debug, warn};

use crate::bunny_error::BunnyError;
use crate::bunny_pullzone::Pullzone;

/// Configuration for the bunny.net REST client.
#[derive(Clone, Debug)]
pub struct BunnyClientConfig {
    /// bunny.net account API key.
    /// Env: `BUNNY_API_KEY` (required)
    pub api_key: String,

    /// Management API base URL.
    /// Env: `BUNNY_API_URL` (default: "<https://api.bunny.net>")
    pub api_url: String,

    /// HTTP request timeout in milliseconds.
    /// Env: `BUNNY_HTTP_TIMEOUT_MS` (default: 15000)
    pub timeout_ms: u64,

    /// Maximum number of retry attempts.
    /// Env: `BUNNY_HTTP_RETRY_MAX` (default: 3)
    pub retry_max: u32,

    /// Backoff time between retries in milliseconds.
    /// Env: `BUNNY_HTTP_RETRY_BACKOFF_MS` (default: 250)
    pub retry_backoff_ms: u64,

    /// User agent for HTTP requests.
    /// Env: `BUNNY_USER_AGENT` (default: "bunny-pullzone/<version>")
    pub user_agent: String,
}

impl BunnyClientConfig {
    /// Build a configuration with default transport settings.
    #[must_use]
    pub fn new(api_key: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: api_url.into(),
            timeout_ms: 15_000,
            retry_max: 3,
            retry_backoff_ms: 250,
            user_agent: default_user_agent(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// In local dev, this will also attempt to load `.env` from the current directory.
    /// If `.env` is missing, it does not fail.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, BunnyError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            api_key: must_env("BUNNY_API_KEY")?,
            api_url: env::var("BUNNY_API_URL")
                .unwrap_or_else(|_| "https://api.bunny.net".to_string()),
            timeout_ms: parse_u64_env("BUNNY_HTTP_TIMEOUT_MS", 15_000)?,
            retry_max: parse_u32_env("BUNNY_HTTP_RETRY_MAX", 3)?,
            retry_backoff_ms: parse_u64_env("BUNNY_HTTP_RETRY_BACKOFF_MS", 250)?,
            user_agent: env::var("BUNNY_USER_AGENT").unwrap_or_else(|_| default_user_agent()),
        })
    }
}

/// Raw outcome of a single remote call.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Status line as sent by the server, e.g. `404 Not Found`.
    pub status_text: String,
    /// Response body.
    pub body: String,
}

impl ApiResponse {
    /// Build a response whose status text is the canonical one.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text(status, None),
            body: body.into(),
        }
    }

    /// Turn an unexpected response into an `Api` error for `operation`.
    #[must_use]
    pub fn into_error(self, operation: &'static str) -> BunnyError {
        BunnyError::Api {
            operation,
            status: self.status,
            status_text: self.status_text,
            body: self.body,
        }
    }
}

/// Remote collaborator the hostname reconciler runs against.
///
/// `BunnyClient` is the production implementation. Tests substitute an
/// in-memory zone.
#[async_trait]
pub trait PullzoneApi: Send + Sync {
    /// Management API base URL, without trailing slash.
    fn api_url(&self) -> &str;

    /// Perform one HTTP call and return its status and body.
    ///
    /// # Errors
    ///
    /// Returns an error only if the call could not be completed. Any HTTP
    /// status, success or not, is returned as `Ok`.
    async fn do_request(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
    ) -> Result<ApiResponse, BunnyError>;

    /// Read a pull zone with its current hostname list.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails, the API does not answer `200 OK`,
    /// or the body cannot be decoded.
    async fn get_pullzone(&self, id: i64) -> Result<Pullzone, BunnyError>;
}

/// REST client for the bunny.net management API.
pub struct BunnyClient {
    cfg: BunnyClientConfig,
    http: reqwest::Client,
}

impl BunnyClient {
    /// Create a new bunny.net client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(cfg: BunnyClientConfig) -> Result<Self, BunnyError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .user_agent(cfg.user_agent.clone())
            .build()?;

        Ok(Self { cfg, http })
    }

    /// Get a reference to the current configuration.
    #[must_use]
    pub const fn config(&self) -> &BunnyClientConfig {
        &self.cfg
    }
}

#[async_trait]
impl PullzoneApi for BunnyClient {
    fn api_url(&self) -> &str {
        self.cfg.api_url.trim_end_matches('/')
    }

    async fn do_request(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
    ) -> Result<ApiResponse, BunnyError> {
        let mut attempt: u32 = 0;
        let mut backoff = Duration::from_millis(self.cfg.retry_backoff_ms);

        loop {
            attempt = attempt.saturating_add(1);
            debug!(%method, url, attempt, "bunny api request");

            let mut req = self
                .http
                .request(method.clone(), url)
                .header("AccessKey", &self.cfg.api_key)
                .header(header::ACCEPT, "application/json");
            if let Some(bytes) = &body {
                req = req
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(bytes.clone());
            }

            match req.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    let reason = resp
                        .extensions()
                        .get::<hyper::ext::ReasonPhrase>()
                        .map(|r| r.as_bytes().to_vec());
                    let status_text = status_text(status, reason.as_deref());
                    let text = match resp.text().await {
                        Ok(text) => text,
                        Err(e) => {
                            warn!(%method, url, %status, error = %e, "failed to read bunny api response body");
                            String::new()
                        }
                    };

                    if attempt <= self.cfg.retry_max && is_retryable_status(&method, status) {
                        warn!(%method, url, %status, attempt, "retrying bunny api request");
                        tokio::time::sleep(backoff).await;
                        backoff = next_backoff(backoff);
                        continue;
                    }

                    return Ok(ApiResponse {
                        status,
                        status_text,
                        body: text,
                    });
                }
                Err(e) => {
                    if attempt <= self.cfg.retry_max && is_retryable_reqwest(&method, &e) {
                        warn!(%method, url, error = %e, attempt, "retrying bunny api request");
                        tokio::time::sleep(backoff).await;
                        backoff = next_backoff(backoff);
                        continue;
                    }

                    return Err(BunnyError::Http(e));
                }
            }
        }
    }

    async fn get_pullzone(&self, id: i64) -> Result<Pullzone, BunnyError> {
        let url = format!("{}/pullzone/{id}", self.api_url());
        let resp = self.do_request(Method::GET, &url, None).await?;

        if resp.status != StatusCode::OK {
            return Err(resp.into_error("getPullzone"));
        }

        Ok(serde_json::from_str(&resp.body)?)
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn default_user_agent() -> String {
    format!("bunny-pullzone/{}", env!("CARGO_PKG_VERSION"))
}

fn must_env(key: &'static str) -> Result<String, BunnyError> {
    env::var(key).map_err(|_| BunnyError::MissingEnv(key))
}

fn parse_u32_env(key: &'static str, default: u32) -> Result<u32, BunnyError> {
    env::var(key).map_or_else(
        |_| Ok(default),
        |v| {
            v.parse::<u32>().map_err(|_| BunnyError::InvalidEnv {
                key,
                reason: "expected an unsigned integer",
            })
        },
    )
}

fn parse_u64_env(key: &'static str, default: u64) -> Result<u64, BunnyError> {
    env::var(key).map_or_else(
        |_| Ok(default),
        |v| {
            v.parse::<u64>().map_err(|_| BunnyError::InvalidEnv {
                key,
                reason: "expected an unsigned integer",
            })
        },
    )
}

/// Render a status line, preferring the server's own reason phrase.
fn status_text(status: StatusCode, reason: Option<&[u8]>) -> String {
    let phrase = reason
        .map(String::from_utf8_lossy)
        .filter(|r| !r.trim().is_empty())
        .map(|r| r.into_owned())
        .or_else(|| status.canonical_reason().map(str::to_string));

    match phrase {
        Some(phrase) => format!("{} {phrase}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

/// Writes are only resent when the server asks to come back later.
#[inline]
fn is_retryable_status(method: &Method, status: StatusCode) -> bool {
    if *method == Method::GET {
        matches!(status.as_u16(), 408 | 425 | 429 | 500 | 502 | 503 | 504)
    } else {
        matches!(status.as_u16(), 429 | 503)
    }
}

/// A write that timed out may already be applied; only resend it when the
/// connection was never made.
#[inline]
fn is_retryable_reqwest(method: &Method, e: &reqwest::Error) -> bool {
    e.is_connect() || (*method == Method::GET && e.is_timeout())
}

#[inline]
fn next_backoff(current: Duration) -> Duration {
    // Exponential backoff capped at 5 seconds.
    let next = current.saturating_mul(2);
    next.min(Duration::from_secs(5))
}

#[cfg(test)]
mod tests {
    use super::{
        ApiResponse, BunnyClient, BunnyClientConfig, PullzoneApi, is_retryable_status, next_backoff,
        status_text,
    };
    use reqwest::{Method, StatusCode};
    use std::time::Duration;

    #[test]
    fn api_url_ignores_trailing_slash() {
        let client = BunnyClient::new(BunnyClientConfig::new("key", "https://api.bunny.net/")).unwrap();
        assert_eq!(client.api_url(), "https://api.bunny.net");
        assert_eq!(client.config().retry_max, 3);
    }

    #[test]
    fn reads_retry_on_transient_statuses() {
        assert!(is_retryable_status(&Method::GET, StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(&Method::GET, StatusCode::BAD_GATEWAY));
        assert!(is_retryable_status(&Method::GET, StatusCode::REQUEST_TIMEOUT));
        assert!(!is_retryable_status(&Method::GET, StatusCode::NO_CONTENT));
        assert!(!is_retryable_status(&Method::GET, StatusCode::NOT_FOUND));
        assert!(!is_retryable_status(&Method::GET, StatusCode::CONFLICT));
    }

    #[test]
    fn writes_retry_only_when_told_to_come_back() {
        for method in [Method::POST, Method::DELETE] {
            assert!(is_retryable_status(&method, StatusCode::TOO_MANY_REQUESTS));
            assert!(is_retryable_status(&method, StatusCode::SERVICE_UNAVAILABLE));
            assert!(!is_retryable_status(&method, StatusCode::CONFLICT));
            assert!(!is_retryable_status(&method, StatusCode::INTERNAL_SERVER_ERROR));
            assert!(!is_retryable_status(&method, StatusCode::GATEWAY_TIMEOUT));
            assert!(!is_retryable_status(&method, StatusCode::REQUEST_TIMEOUT));
        }
    }

    #[test]
    fn status_text_prefers_server_reason() {
        let unknown = StatusCode::from_u16(520).unwrap();
        assert_eq!(
            status_text(unknown, Some(b"Web Server Returned an Unknown Error")),
            "520 Web Server Returned an Unknown Error"
        );
        assert_eq!(status_text(unknown, None), "520");
        assert_eq!(status_text(StatusCode::NOT_FOUND, Some(b"")), "404 Not Found");
        assert_eq!(
            status_text(StatusCode::BAD_REQUEST, Some(b"Hostname Already Registered")),
            "400 Hostname Already Registered"
        );
        assert_eq!(ApiResponse::new(StatusCode::NO_CONTENT, "").status_text, "204 No Content");
    }

    #[test]
    fn backoff_doubles_and_caps() {
        assert_eq!(next_backoff(Duration::from_millis(250)), Duration::from_millis(500));
        assert_eq!(next_backoff(Duration::from_secs(4)), Duration::from_secs(5));
    }
}
