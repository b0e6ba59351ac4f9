//! Remote fetcher: one GET per search, no retries.
//!
//! # Design
//! `Transport` is the seam between the deterministic client and the
//! network. `UreqTransport` is the production implementation; it disables
//! ureq's status-as-error behaviour so non-200 answers come back as data
//! and the client decides what they mean. Any closure with the right
//! signature is also a `Transport`, which is how tests script responses.
//!
//! Failures are returned as `ApiError` from the `try_*` functions and
//! flattened to an empty result (after logging) by the others.

use std::time::Duration;

use log::{debug, warn};

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::parse::parse_volumes;
use crate::types::BookRecord;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Executes an `HttpRequest` and returns the response as data.
///
/// Implementations return `Err` only when no HTTP response was obtained;
/// every status code, including 4xx/5xx, is an `Ok` response.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, ApiError>,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self(request)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Duration,
    /// Applied separately to waiting for the response head and to reading the body.
    pub read: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: DEFAULT_CONNECT_TIMEOUT,
            read: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// Blocking transport backed by a ureq agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(Timeouts::default())
    }
}

impl UreqTransport {
    pub fn new(timeouts: Timeouts) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(Some(timeouts.connect))
            .timeout_recv_response(Some(timeouts.read))
            .timeout_recv_body(Some(timeouts.read))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        check_url(&request.url)?;

        let mut builder = self.agent.get(&request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        let mut response = builder.call().map_err(map_ureq_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(map_ureq_error)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn check_url(url: &str) -> Result<(), ApiError> {
    let uri: ureq::http::Uri = url.parse().map_err(|e: ureq::http::uri::InvalidUri| {
        ApiError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        }
    })?;
    if uri.scheme().is_none() || uri.host().is_none() {
        return Err(ApiError::InvalidUrl {
            url: url.to_string(),
            reason: "missing scheme or host".to_string(),
        });
    }
    Ok(())
}

fn map_ureq_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Timeout(which) => ApiError::Timeout(format!("{which:?}")),
        ureq::Error::BadUri(reason) => ApiError::InvalidUrl {
            url: String::new(),
            reason,
        },
        other => ApiError::Transport(other.to_string()),
    }
}

/// GET `request` and return the body of a 200 response.
pub fn try_fetch<T: Transport + ?Sized>(transport: &T, request: &HttpRequest) -> Result<String, ApiError> {
    debug!("GET {}", request.url);
    transport.execute(request)?.into_body()
}

/// Like `try_fetch`, but any failure is logged and yields an empty body.
pub fn fetch<T: Transport + ?Sized>(transport: &T, request: &HttpRequest) -> String {
    try_fetch(transport, request).unwrap_or_else(|err| {
        log_failure(&request.url, &err);
        String::new()
    })
}

/// Execute a prepared search and parse the response body.
pub fn try_fetch_books<T: Transport + ?Sized>(
    transport: &T,
    request: &HttpRequest,
) -> Result<Vec<BookRecord>, ApiError> {
    let body = try_fetch(transport, request)?;
    parse_volumes(&body)
}

/// Like `try_fetch_books`, but failures are logged and yield no records.
pub fn fetch_books<T: Transport + ?Sized>(transport: &T, request: &HttpRequest) -> Vec<BookRecord> {
    try_fetch_books(transport, request).unwrap_or_else(|err| {
        log_failure(&request.url, &err);
        Vec::new()
    })
}

pub(crate) fn log_failure(url: &str, err: &ApiError) {
    warn!("search request to {url} failed ({:?}): {err}", err.kind());
}
