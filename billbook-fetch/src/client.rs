//! MyBillBook API client.
//!
//! Every call goes through [`ApiClient::execute`], which sends the request,
//! classifies the outcome, and drives retries from a single loop.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::auth::Credentials;
use crate::error::RequestError;
use crate::retry::RetryPolicy;

/// Production API base URL.
pub const DEFAULT_BASE_URL: &str = "https://mybillbook.in/api/web";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// API endpoint paths.
pub mod endpoints {
    /// Bulk upload status; also the connectivity probe.
    pub const BULK_UPLOAD_STATUS: &str = "/bulk_upload/status";
    /// Item listing.
    pub const ITEMS: &str = "/items";
    /// Item statistics.
    pub const ITEMS_STATS: &str = "/items/stats";
}

/// Query string as ordered key/value pairs.
pub type Query<'a> = &'a [(&'a str, String)];

// ============================================================================
// HTTP Method
// ============================================================================

/// HTTP methods the API is called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET request.
    Get,
    /// POST request with an optional JSON body.
    Post,
}

impl FromStr for HttpMethod {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            _ => Err(RequestError::UnsupportedMethod(s.to_string())),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Settings for the API client.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// API base URL, without a trailing endpoint.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry policy for rate limits and transport failures.
    pub retry: RetryPolicy,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientSettings {
    /// Creates settings for the given base URL with default timeout and
    /// retry policy.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Outcome of a single attempt.
#[derive(Debug)]
enum Classified {
    /// 2xx with a JSON body.
    Success(Value),
    /// Worth another attempt if the policy allows.
    Retryable(RequestError),
    /// Surface immediately.
    Fatal(RequestError),
}

fn classify_send_error(err: reqwest::Error) -> Classified {
    if err.is_builder() {
        return Classified::Fatal(RequestError::Client(err));
    }
    if err.is_timeout() {
        return Classified::Retryable(RequestError::TransportFailure(format!(
            "request timed out: {err}"
        )));
    }
    if err.is_connect() || err.is_request() {
        return Classified::Retryable(RequestError::TransportFailure(format!(
            "connection error: {err}"
        )));
    }
    Classified::Fatal(RequestError::TransportFailure(err.to_string()))
}

async fn classify_response(response: Response) -> Classified {
    let status = response.status();

    if status.is_success() {
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if e.is_timeout() => {
                return Classified::Retryable(RequestError::TransportFailure(format!(
                    "timed out reading body: {e}"
                )));
            }
            Err(e) => {
                return Classified::Fatal(RequestError::TransportFailure(format!(
                    "failed to read body: {e}"
                )));
            }
        };
        return match serde_json::from_str(&body) {
            Ok(value) => Classified::Success(value),
            Err(e) => Classified::Fatal(RequestError::TransportFailure(format!(
                "response body is not valid JSON: {e}"
            ))),
        };
    }

    match status {
        StatusCode::UNAUTHORIZED => Classified::Fatal(RequestError::AuthenticationFailure),
        StatusCode::TOO_MANY_REQUESTS => {
            Classified::Retryable(RequestError::RateLimited { attempts: 1 })
        }
        _ => {
            let body = response.text().await.unwrap_or_default();
            Classified::Fatal(RequestError::ServerRejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

// ============================================================================
// API Client
// ============================================================================

/// Authenticated client for the MyBillBook web API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Creates a client with the credentials bound into its default headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid, a credential is not a
    /// valid header value, or the HTTP client cannot be built.
    pub fn new(settings: ClientSettings, credentials: &Credentials) -> Result<Self, RequestError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|e| RequestError::InvalidUrl(format!("{}: {e}", settings.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(RequestError::InvalidUrl(settings.base_url));
        }

        let http = Client::builder()
            .timeout(settings.timeout)
            .default_headers(credentials.headers()?)
            .build()?;

        debug!(base_url = %settings.base_url, timeout_secs = settings.timeout.as_secs(), "API client ready");

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            retry: settings.retry,
        })
    }

    /// Returns the retry policy in use.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Resolves an endpoint path against the base URL.
    fn url_for(&self, endpoint: &str) -> Result<Url, RequestError> {
        let joined = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        Url::parse(&joined).map_err(|e| RequestError::InvalidUrl(format!("{joined}: {e}")))
    }

    /// Sends one request and classifies the result.
    async fn attempt(
        &self,
        url: &Url,
        method: HttpMethod,
        query: Option<Query<'_>>,
        body: Option<&Value>,
    ) -> Classified {
        let mut request = match method {
            HttpMethod::Get => self.http.get(url.clone()),
            HttpMethod::Post => self.http.post(url.clone()),
        };
        if let Some(query) = query {
            request = request.query(query);
        }
        if let (HttpMethod::Post, Some(body)) = (method, body) {
            request = request.json(body);
        }

        match request.send().await {
            Ok(response) => {
                debug!(status = %response.status(), "Response received");
                classify_response(response).await
            }
            Err(e) => classify_send_error(e),
        }
    }

    /// Executes a request, retrying rate limits and transport failures
    /// according to the retry policy.
    ///
    /// # Errors
    ///
    /// Returns the final classification when the request fails terminally
    /// or retries are exhausted.
    #[instrument(skip(self, query, body), fields(method = %method))]
    pub async fn execute(
        &self,
        endpoint: &str,
        method: HttpMethod,
        query: Option<Query<'_>>,
        body: Option<&Value>,
    ) -> Result<Value, RequestError> {
        let url = self.url_for(endpoint)?;
        let mut attempt: u32 = 0;

        loop {
            debug!(attempt = attempt + 1, "Sending request");

            let err = match self.attempt(&url, method, query, body).await {
                Classified::Success(value) => {
                    info!("Request succeeded");
                    return Ok(value);
                }
                Classified::Fatal(err) => {
                    log_fatal(&err);
                    return Err(err);
                }
                Classified::Retryable(err) => err,
            };

            let delay = self.retry.delay_for(err.kind(), attempt);
            match delay {
                Some(delay) if self.retry.can_retry(attempt) => {
                    warn!(
                        error = %err,
                        retry = attempt + 1,
                        max_retries = self.retry.max_retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Retrying request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                _ => {
                    let err = match err {
                        RequestError::RateLimited { .. } => {
                            RequestError::RateLimited { attempts: attempt + 1 }
                        }
                        other => other,
                    };
                    error!(error = %err, attempts = attempt + 1, "Giving up after retries");
                    return Err(err);
                }
            }
        }
    }

    /// Executes a GET request.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn get(&self, endpoint: &str, query: Option<Query<'_>>) -> Result<Value, RequestError> {
        self.execute(endpoint, HttpMethod::Get, query, None).await
    }

    /// Lightweight authenticated request used to validate credentials.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn probe(&self) -> Result<Value, RequestError> {
        info!("Testing API connection");
        self.get(endpoints::BULK_UPLOAD_STATUS, None).await
    }

    /// Returns true if the probe request succeeds.
    pub async fn test_connection(&self) -> bool {
        match self.probe().await {
            Ok(_) => {
                info!("Connection successful");
                true
            }
            Err(e) => {
                warn!(error = %e, "Connection failed");
                false
            }
        }
    }

    /// Fetches the bulk upload status for item uploads.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn bulk_upload_status(&self) -> Result<Value, RequestError> {
        let query = [("upload_type", "item".to_string())];
        self.get(endpoints::BULK_UPLOAD_STATUS, Some(&query)).await
    }

    /// Fetches item statistics.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn items_stats(&self) -> Result<Value, RequestError> {
        self.get(endpoints::ITEMS_STATS, None).await
    }

    /// Fetches one page of the item listing.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn list_items(&self, page: u32, per_page: u32) -> Result<Value, RequestError> {
        info!(page, per_page, "Fetching inventory items");
        let query = [("page", page.to_string()), ("per_page", per_page.to_string())];
        self.get(endpoints::ITEMS, Some(&query)).await
    }
}

fn log_fatal(err: &RequestError) {
    match err {
        RequestError::AuthenticationFailure => {
            error!("Authentication failed. Please check your credentials.");
        }
        RequestError::ServerRejected { status, body } => {
            error!(status, body = %body, "Server rejected request");
        }
        other => error!(error = %other, "Request failed"),
    }
}

// ============================================================================
// Tests
// ============================================================================
