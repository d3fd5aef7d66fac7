//! Minimal HTTP client with safe logging and header auth.
//!
//! - Request options: headers, header `Auth`, query params, timeout
//! - Redacts sensitive query params and never logs secret values
//! - Hands back status, headers and raw body for every completed exchange;
//!   the caller decides what a non-2xx status means
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), replyfetch_http::HttpError> {
//! let client = replyfetch_http::HttpClient::new()?;
//! let resp = client
//!     .get("https://api.example.com/v1/items", replyfetch_http::RequestOpts::default())
//!     .await?;
//! let got: serde_json::Value = resp.json()?;
//! # Ok(()) }
//! ```
//!
//! Security: logs only ever include the auth kind (header/none), not
//! the secret.
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated) and transport errors.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::time::Duration;
use thiserror::Error;

const BODY_SNIPPET_MAX: usize = 500;

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {}ms: {message}", timeout.as_millis())]
    Timeout { timeout: Duration, message: String },
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
}

impl HttpError {
    /// True when the request never produced a usable response body.
    ///
    /// ```
    /// use replyfetch_http::HttpError;
    ///
    /// assert!(HttpError::Network("connection refused".into()).is_transport());
    /// assert!(!HttpError::Decode("expected value".into(), "<html>".into()).is_transport());
    /// ```
    pub fn is_transport(&self) -> bool {
        !matches!(self, HttpError::Decode(..))
    }
}

// ==============================
// Auth & Request Options
// ==============================

/// Authentication strategies supported by the HTTP client helpers.
///
/// ```
/// use replyfetch_http::Auth;
///
/// let auth = Auth::header("x-api-key", "secret").unwrap();
/// match auth {
///     Auth::Header { name, value } => {
///         assert_eq!(name.as_str(), "x-api-key");
///         assert_eq!(value.to_str().unwrap(), "secret");
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Clone, Debug)]
pub enum Auth {
    /// Custom header (e.g., `X-API-Key`)
    Header {
        name: HeaderName,
        value: HeaderValue,
    },
    None,
}

impl Auth {
    /// Build header auth, validating both name and value up front.
    pub fn header(name: &str, value: &str) -> Result<Self, HttpError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| HttpError::Build(format!("invalid auth header name: {e}")))?;
        let mut value = HeaderValue::from_str(value)
            .map_err(|e| HttpError::Build(format!("invalid auth header value: {e}")))?;
        value.set_sensitive(true);
        Ok(Auth::Header { name, value })
    }

    fn kind(&self) -> &'static str {
        match self {
            Auth::Header { .. } => "header",
            Auth::None => "none",
        }
    }
}

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use replyfetch_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(10)),
///     query: Some(vec![("tweetId", "42".into())]),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 10);
/// assert!(opts.auth.is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub auth: Option<Auth>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>, // e.g. [("tweetId", "123".into())]
}

// ==============================
// Response
// ==============================

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Decode the body as JSON.
    ///
    /// ```
    /// use replyfetch_http::{HttpError, HttpResponse};
    /// use reqwest::StatusCode;
    /// use reqwest::header::HeaderMap;
    ///
    /// let resp = HttpResponse {
    ///     status: StatusCode::OK,
    ///     headers: HeaderMap::new(),
    ///     body: br#"{"tweets": []}"#.to_vec(),
    /// };
    /// let v: serde_json::Value = resp.json().unwrap();
    /// assert!(v["tweets"].is_array());
    ///
    /// let bad = HttpResponse { body: b"<html>".to_vec(), ..resp };
    /// assert!(matches!(bad.json::<serde_json::Value>(), Err(HttpError::Decode(..))));
    /// ```
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_slice::<T>(&self.body).map_err(|e| {
            let snippet = snip_body(&self.body);
            tracing::warn!(
                status=%self.status,
                serde_line=%e.line(),
                serde_col=%e.column(),
                serde_err=%e.to_string(),
                body_snippet=%snippet,
                "http.response.decode_error"
            );
            HttpError::Decode(e.to_string(), snippet)
        })
    }
}

// ==============================
// Client
// ==============================

#[derive(Clone, Debug)]
pub struct HttpClient {
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Construct a client with the default 10 second timeout.
    ///
    /// The timeout covers the whole exchange, connecting included, so there is
    /// no separate connect deadline to fall out of step with it.
    ///
    /// ```no_run
    /// use replyfetch_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new()?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(10));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new() -> Result<Self, HttpError> {
        let inner = Client::builder()
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            inner,
            default_timeout: Duration::from_secs(10),
        })
    }

    /// Override the default timeout returned by [`HttpClient::new`].
    ///
    /// ```no_run
    /// use replyfetch_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new()?.with_timeout(Duration::from_secs(2));
    /// assert_eq!(client.default_timeout, Duration::from_secs(2));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// GET an absolute URL with per-request options (headers/query/auth/timeout).
    pub async fn get(&self, url: &str, opts: RequestOpts<'_>) -> Result<HttpResponse, HttpError> {
        self.request(Method::GET, url, opts).await
    }

    // ==============================
    // Core request implementation
    // ==============================

    async fn request(
        &self,
        method: Method,
        url: &str,
        opts: RequestOpts<'_>,
    ) -> Result<HttpResponse, HttpError> {
        let url = Url::parse(url).map_err(|e| HttpError::Url(format!("{e}: {url:?}")))?;

        // ----- Build request -----
        let mut rb = self.inner.request(method.clone(), url.clone());

        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        rb = rb.timeout(timeout);

        if let Some(q) = &opts.query {
            let pairs: Vec<(&str, &str)> = q.iter().map(|(k, v)| (*k, v.as_ref())).collect();
            rb = rb.query(&pairs);
        }

        if let Some(hdrs) = &opts.headers {
            rb = rb.headers(hdrs.clone());
        }

        if let Some(Auth::Header { name, value }) = &opts.auth {
            rb = rb.header(name, value);
        }

        // ----- Safe request logging (pre-send) -----
        let auth_kind = opts.auth.as_ref().map(Auth::kind).unwrap_or("none");
        let redacted_q: Vec<(String, String)> = opts
            .query
            .as_ref()
            .map(|q| {
                q.iter()
                    .map(|(k, v)| ((*k).to_string(), redact_value(k, v)))
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!(
            method=%method,
            host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
            query=?redacted_q,
            timeout_ms=timeout.as_millis() as u64,
            auth_kind,
            "http.request.start"
        );

        // ----- Send -----
        let t0 = std::time::Instant::now();
        let resp = rb
            .send()
            .await
            .map_err(|err| transport_error(err, timeout, "http.network_error.send"))?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp
            .bytes()
            .await
            .map_err(|err| transport_error(err, timeout, "http.network_error.body"))?
            .to_vec();
        let dur_ms = t0.elapsed().as_millis() as u64;

        let req_hdr_id = headers
            .get("x-request-id")
            .or_else(|| headers.get("x-correlation-id"))
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::debug!(
            %status,
            duration_ms=dur_ms,
            body_len=body.len(),
            x_request_id=%req_hdr_id,
            "http.response.headers"
        );
        tracing::trace!(body_snippet=%snip_body(&body), "http.response.body_snippet");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

// ==============================
// Helpers
// ==============================

fn transport_error(err: reqwest::Error, timeout: Duration, event: &'static str) -> HttpError {
    let message = err.to_string();
    tracing::warn!(
        message=%message,
        is_timeout=err.is_timeout(),
        is_connect=err.is_connect(),
        "{event}"
    );
    if err.is_timeout() {
        HttpError::Timeout { timeout, message }
    } else if err.is_builder() {
        HttpError::Build(message)
    } else {
        HttpError::Network(message)
    }
}

fn is_secret_key(key: &str) -> bool {
    matches!(
        key.to_ascii_lowercase().as_str(),
        "access_token"
            | "authorization"
            | "auth"
            | "key"
            | "api_key"
            | "apikey"
            | "x-api-key"
            | "token"
            | "secret"
            | "client_secret"
            | "bearer"
    )
}

fn redact_value(key: &str, value: &str) -> String {
    if is_secret_key(key) {
        "<redacted>".to_string()
    } else {
        value.to_string()
    }
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > BODY_SNIPPET_MAX {
        let mut cut = BODY_SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}
