//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! client builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network; a `Transport` implementation (see
//! `fetch`) performs the actual round-trip. Tests substitute a scripted
//! transport so the parser and loader never depend on a live server.

use crate::error::ApiError;

/// A GET request described as plain data.
///
/// The Books API search is the only call this crate makes, so there is no
/// method or body: every request is a GET to `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// A 200 response with the given body and no headers.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// The body of a 200 response. Any other status is an `HttpError`.
    pub fn into_body(self) -> Result<String, ApiError> {
        if self.status != 200 {
            return Err(ApiError::HttpError {
                status: self.status,
                body: self.body,
            });
        }
        Ok(self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_200_yields_a_body() {
        assert_eq!(HttpResponse::ok("{}").into_body().unwrap(), "{}");

        for status in [201, 204, 304, 404, 500] {
            let response = HttpResponse {
                status,
                headers: Vec::new(),
                body: "nope".to_string(),
            };
            let err = response.into_body().unwrap_err();
            assert!(matches!(err, ApiError::HttpError { status: s, .. } if s == status));
        }
    }
}
