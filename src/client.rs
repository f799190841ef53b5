//! `RunPod` API client implementation.
//!
//! This module provides the HTTP request pipeline shared by every façade:
//! URL composition across the two API surfaces, header injection, bounded
//! retries with linear backoff, and error-classifying response decoding.
//!
//! The client is immutable after construction and cheap to clone, so callers
//! may freely issue concurrent requests from independent tasks.

use std::time::Duration;

use reqwest::{Method, Response, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::types::ListOptions;
use crate::validate;

/// Default `RunPod` REST API base URL.
pub const DEFAULT_BASE_URL: &str = "https://rest.runpod.io/v1";

/// Default base URL for serverless job-queue operations.
pub const DEFAULT_SERVERLESS_BASE_URL: &str = "https://api.runpod.ai/v2";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default user agent string.
pub const DEFAULT_USER_AGENT: &str = concat!("runpod-client-rust/", env!("CARGO_PKG_VERSION"));

/// Default maximum number of retry attempts for failed requests.
pub const DEFAULT_MAX_RETRY_ATTEMPTS: u32 = 3;

/// Default base delay between retry attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Default interval between job/pod status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Path prefix identifying serverless job-queue endpoints.
const SERVERLESS_PATH_PREFIX: &str = "/v2/";

/// Hostname of the serverless job-queue API.
const SERVERLESS_HOST: &str = "api.runpod.ai";

/// Returns true for HTTP statuses worth retrying.
pub(crate) const fn is_retryable_status(status: u16) -> bool {
    matches!(status, 500 | 502 | 503 | 504 | 429)
}

/// Builder for [`Client`] with named, defaulted configuration options.
#[derive(Debug)]
pub struct ClientBuilder {
    api_key: String,
    base_url: String,
    serverless_base_url: String,
    timeout: Duration,
    user_agent: String,
    debug: bool,
    max_retry_attempts: u32,
    retry_delay: Duration,
    poll_interval: Duration,
    http_client: Option<reqwest::Client>,
}

impl ClientBuilder {
    /// Creates a builder with all options at their defaults.
    #[must_use]
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            serverless_base_url: DEFAULT_SERVERLESS_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            debug: false,
            max_retry_attempts: DEFAULT_MAX_RETRY_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            poll_interval: DEFAULT_POLL_INTERVAL,
            http_client: None,
        }
    }

    /// Overrides the REST API base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// Overrides the serverless job-queue base URL.
    #[must_use]
    pub fn serverless_base_url(mut self, base_url: &str) -> Self {
        self.serverless_base_url = base_url.to_string();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the user agent string.
    #[must_use]
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Enables debug logging of request and response bodies at `trace` level.
    #[must_use]
    pub const fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Sets the maximum number of retry attempts.
    #[must_use]
    pub const fn max_retry_attempts(mut self, attempts: u32) -> Self {
        self.max_retry_attempts = attempts;
        self
    }

    /// Sets the base delay between retry attempts (scaled linearly).
    #[must_use]
    pub const fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Sets the interval between status polls in the wait/stream helpers.
    #[must_use]
    pub const fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Supplies a pre-built transport instead of constructing one.
    ///
    /// The configured [`Self::timeout`] is ignored in this case; the supplied
    /// client's own timeout applies.
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the API key is empty, or a network error
    /// if the HTTP transport cannot be constructed.
    pub fn build(self) -> Result<Client> {
        validate::required_str("apiKey", &self.api_key)?;

        let http = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| Error::network_caused("failed to create HTTP client", e))?,
        };

        Ok(Client {
            http,
            api_key: self.api_key,
            base_url: self.base_url,
            serverless_base_url: self.serverless_base_url,
            timeout: self.timeout,
            user_agent: self.user_agent,
            debug: self.debug,
            max_retry_attempts: self.max_retry_attempts,
            retry_delay: self.retry_delay,
            poll_interval: self.poll_interval,
        })
    }
}

/// `RunPod` API client.
#[derive(Clone)]
pub struct Client {
    /// HTTP transport.
    http: reqwest::Client,
    /// API key.
    api_key: String,
    /// REST API base URL.
    base_url: String,
    /// Serverless job-queue base URL.
    serverless_base_url: String,
    /// Request timeout.
    timeout: Duration,
    /// User agent sent with every request.
    user_agent: String,
    /// Whether body-level debug logging is enabled.
    debug: bool,
    /// Maximum retry attempts for retryable failures.
    max_retry_attempts: u32,
    /// Base delay between retries.
    retry_delay: Duration,
    /// Interval between status polls.
    poll_interval: Duration,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &mask_api_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("serverless_base_url", &self.serverless_base_url)
            .field("timeout", &self.timeout)
            .field("max_retry_attempts", &self.max_retry_attempts)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the transport cannot be
    /// created.
    pub fn new(api_key: &str) -> Result<Self> {
        Self::builder(api_key).build()
    }

    /// Returns a builder for customized configuration.
    #[must_use]
    pub fn builder(api_key: &str) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Returns the configured API key in masked form.
    ///
    /// Use [`Self::expose_api_key`] when the raw key is genuinely needed.
    #[must_use]
    pub fn api_key(&self) -> String {
        mask_api_key(&self.api_key)
    }

    /// Returns the raw, unmasked API key.
    ///
    /// This is the only accessor that reveals the full key; avoid logging its
    /// result.
    #[must_use]
    pub fn expose_api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the REST API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the serverless job-queue base URL.
    #[must_use]
    pub fn serverless_base_url(&self) -> &str {
        &self.serverless_base_url
    }

    /// Returns whether debug body logging is enabled.
    #[must_use]
    pub const fn is_debug_enabled(&self) -> bool {
        self.debug
    }

    /// Returns the interval between status polls.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Composes the full URL for an endpoint.
    ///
    /// Endpoints starting with `/v2/` are serverless job-queue calls and are
    /// routed to the serverless base URL; absolute URLs (including anything
    /// already naming the job-queue host) pass through verbatim; everything
    /// else is appended to the REST base URL. This rule is the only dispatch
    /// mechanism between the two API surfaces.
    pub(crate) fn build_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with(SERVERLESS_PATH_PREFIX) {
            return format!("{}{endpoint}", self.serverless_base_url);
        }
        if endpoint.starts_with("http://")
            || endpoint.starts_with("https://")
            || endpoint.contains(SERVERLESS_HOST)
        {
            return endpoint.to_string();
        }
        format!("{}{endpoint}", self.base_url)
    }

    /// Composes a URL with pagination query parameters.
    pub(crate) fn build_list_url(&self, endpoint: &str, opts: Option<ListOptions>) -> String {
        let url = self.build_url(endpoint);
        match opts.and_then(ListOptions::to_query) {
            Some(query) => format!("{url}?{query}"),
            None => url,
        }
    }

    /// Performs a single HTTP call with the standard headers.
    async fn dispatch(&self, method: &Method, url: &str, body: Option<&[u8]>) -> Result<Response> {
        let mut request = self
            .http
            .request(method.clone(), url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::USER_AGENT, &self.user_agent);

        if let Some(bytes) = body {
            request = request
                .header(header::CONTENT_TYPE, "application/json")
                .body(bytes.to_vec());
        }

        debug!("{method} {url}");
        if self.debug {
            if let Some(bytes) = body {
                trace!("request body: {}", String::from_utf8_lossy(bytes));
            }
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(format!("{method} {url}"), self.timeout)
            } else {
                Error::network_caused("HTTP request failed", e)
            }
        })?;

        Ok(response)
    }

    /// Executes a request with bounded retries and linear backoff.
    ///
    /// Transport failures are always retryable; retryable HTTP statuses
    /// (5xx and 429) are retried only while attempts remain, so the final
    /// attempt's response is returned for decoding instead of being eaten by
    /// the retry loop.
    pub(crate) async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Response> {
        let url = self.build_url(endpoint);
        let mut last_err = None;

        for attempt in 0..=self.max_retry_attempts {
            if attempt > 0 {
                debug!("retry attempt {attempt} of {}", self.max_retry_attempts);
                tokio::time::sleep(self.retry_delay * attempt).await;
            }

            match self.dispatch(&method, &url, body.as_deref()).await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if is_retryable_status(status) && attempt < self.max_retry_attempts {
                        debug!("HTTP {status} received, retrying");
                        last_err = Some(Error::api(status, "retryable server error"));
                        continue;
                    }
                    return Ok(response);
                }
                Err(e) => {
                    if !e.is_retryable() {
                        return Err(e);
                    }
                    debug!("request attempt {} failed, retrying: {e}", attempt + 1);
                    last_err = Some(e);
                }
            }
        }

        Err(Error::RetriesExhausted {
            attempts: self.max_retry_attempts + 1,
            source: Box::new(last_err.unwrap_or_else(|| Error::network("no response received"))),
        })
    }

    /// Decodes a response into `T`, mapping non-2xx statuses to typed errors.
    pub(crate) async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let body = response
            .text()
            .await
            .map_err(|e| Error::network_caused("failed to read response body", e))?;

        if self.debug {
            trace!("response status: {status}");
            trace!("response body: {body}");
        }

        if status >= 400 {
            return Err(parse_error_response(status, &body, retry_after.as_deref()));
        }

        if body.is_empty() {
            return Err(Error::decode("empty response body"));
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::decode(format!("failed to unmarshal response: {e}")))
    }

    /// Checks a response for errors, discarding any success body.
    pub(crate) async fn handle_empty_response(&self, response: Response) -> Result<()> {
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let body = response
            .text()
            .await
            .map_err(|e| Error::network_caused("failed to read response body", e))?;

        if self.debug {
            trace!("response status: {status}");
        }

        if status >= 400 {
            return Err(parse_error_response(status, &body, retry_after.as_deref()));
        }

        Ok(())
    }

    /// Performs a GET request and decodes the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self.execute(Method::GET, endpoint, None).await?;
        self.handle_response(response).await
    }

    /// Performs a POST request with a JSON body and decodes the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be serialized, the request fails,
    /// or the response cannot be decoded.
    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = encode_body(body)?;
        let response = self.execute(Method::POST, endpoint, Some(bytes)).await?;
        self.handle_response(response).await
    }

    /// Performs a bodyless POST request and decodes the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// decoded.
    pub async fn post_no_body<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self.execute(Method::POST, endpoint, None).await?;
        self.handle_response(response).await
    }

    /// Performs a bodyless POST request, discarding any success body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn post_empty(&self, endpoint: &str) -> Result<()> {
        let response = self.execute(Method::POST, endpoint, None).await?;
        self.handle_empty_response(response).await
    }

    /// Performs a PUT request with a JSON body and decodes the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be serialized, the request fails,
    /// or the response cannot be decoded.
    pub async fn put<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = encode_body(body)?;
        let response = self.execute(Method::PUT, endpoint, Some(bytes)).await?;
        self.handle_response(response).await
    }

    /// Performs a PATCH request with a JSON body and decodes the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be serialized, the request fails,
    /// or the response cannot be decoded.
    pub async fn patch<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = encode_body(body)?;
        let response = self.execute(Method::PATCH, endpoint, Some(bytes)).await?;
        self.handle_response(response).await
    }

    /// Performs a DELETE request, discarding any success body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&self, endpoint: &str) -> Result<()> {
        let response = self.execute(Method::DELETE, endpoint, None).await?;
        self.handle_empty_response(response).await
    }
}

/// Serializes a request body to JSON bytes.
fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Vec<u8>> {
    serde_json::to_vec(body).map_err(|e| Error::decode(format!("failed to marshal request body: {e}")))
}

/// Masks an API key for display: `abcd***wxyz`, or `***` for short keys.
///
/// Counts characters rather than bytes so keys containing multi-byte UTF-8
/// never split a character at the mask boundaries.
fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return String::from("***");
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}***{tail}")
}

/// Structured API error payload.
#[derive(serde::Deserialize)]
struct StructuredErrorBody {
    message: Option<String>,
    details: Option<String>,
    code: Option<String>,
}

/// Minimal `{error|message}` error payload.
#[derive(serde::Deserialize)]
struct SimpleErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Classifies an error response body into a typed error.
///
/// Precedence: structured API error body, then the simple `{error|message}`
/// shape, then a status-code-specific fallback.
fn parse_error_response(status: u16, body: &str, retry_after: Option<&str>) -> Error {
    if let Ok(parsed) = serde_json::from_str::<StructuredErrorBody>(body) {
        if let Some(message) = parsed.message.filter(|m| !m.is_empty()) {
            return Error::Api {
                status,
                message,
                details: parsed.details,
                code: parsed.code,
            };
        }
    }

    if let Ok(parsed) = serde_json::from_str::<SimpleErrorBody>(body) {
        let message = parsed
            .error
            .filter(|m| !m.is_empty())
            .or_else(|| parsed.message.filter(|m| !m.is_empty()));
        if let Some(message) = message {
            return Error::api(status, message);
        }
    }

    match status {
        401 => Error::auth("invalid or expired API key"),
        403 => Error::auth("insufficient permissions"),
        404 => Error::api(404, "resource not found"),
        429 => Error::rate_limit(
            "rate limit exceeded",
            retry_after.map_or_else(|| String::from("unknown"), |s| format!("{s} seconds")),
        ),
        500 | 502 | 503 | 504 => Error::api(status, "server error"),
        _ => Error::api(status, body),
    }
}
