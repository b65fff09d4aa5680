//! HTTP request and response value objects.
//!
//! # Design
//! Both types are plain data. An `HttpRequest` is built once, may gain
//! header lines, and is then handed to a `Transport`. An `HttpResponse`
//! is produced by `send` and only read afterwards.
//!
//! The request owns its URL, body and header chain; the response owns its
//! body bytes. Dropping a value releases everything it owns, so the
//! `free_*` helpers are only spelled-out drops for callers that prefer the
//! explicit lifecycle.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RequestError, TransportError};
use crate::header::{HeaderEntry, Headers};

/// The two methods this client speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound call.
///
/// `body` is raw bytes, kept verbatim regardless of method; only POST hands
/// it to the transport (see `body_for_transport`).
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub body: Option<Vec<u8>>,
    pub method: HttpMethod,
    pub headers: Option<Headers>,
    pub connect_timeout: Duration,
    pub response_timeout: Duration,
}

impl HttpRequest {
    /// Build a request. Ownership of `headers` moves into the request.
    ///
    /// Fails with `RequestError::EmptyUrl` when `url` is empty or blank.
    /// Header lines are not validated.
    pub fn build(
        url: impl Into<String>,
        body: Option<Vec<u8>>,
        method: HttpMethod,
        headers: Option<Headers>,
        connect_timeout: Duration,
        response_timeout: Duration,
    ) -> Result<Self, RequestError> {
        let url = url.into();
        validate_url(&url)?;
        Ok(Self {
            url,
            body,
            method,
            headers,
            connect_timeout,
            response_timeout,
        })
    }

    pub fn append_header(&mut self, line: impl Into<String>) -> &HeaderEntry {
        crate::header::append_header(&mut self.headers, line)
    }

    pub fn header_lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.headers.iter().flat_map(|headers| headers.lines())
    }

    pub fn header_count(&self) -> usize {
        self.headers.as_ref().map_or(0, Headers::len)
    }

    pub fn body_for_transport(&self) -> Option<&[u8]> {
        match self.method {
            HttpMethod::Post => self.body.as_deref(),
            HttpMethod::Get => None,
        }
    }
}

/// The only construction-time check: the URL must not be blank.
pub fn validate_url(url: &str) -> Result<(), RequestError> {
    if url.trim().is_empty() {
        return Err(RequestError::EmptyUrl);
    }
    Ok(())
}

/// Outcome of one `send`.
///
/// `status` and `body` are only meaningful when `error` is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub body: Vec<u8>,
    pub status: u16,
    pub error: Option<TransportError>,
}

impl HttpResponse {
    pub fn ok(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            status,
            error: None,
        }
    }

    pub fn failed(error: TransportError) -> Self {
        Self {
            body: Vec::new(),
            status: 0,
            error: Some(error),
        }
    }

    /// Transport result code. Zero means the exchange completed.
    pub fn code(&self) -> i32 {
        self.error.as_ref().map_or(0, TransportError::code)
    }

    /// Static diagnostic text for a failed exchange.
    pub fn error_message(&self) -> Option<&'static str> {
        self.error.as_ref().map(TransportError::message)
    }

    /// The transport completed the exchange. Says nothing about the status.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn body_size(&self) -> usize {
        self.body.len()
    }

    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

pub fn free_request(request: HttpRequest) {
    drop(request);
}

pub fn free_response(response: HttpResponse) {
    drop(response);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportErrorKind;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn build_get_without_body_or_headers() {
        let req = HttpRequest::build(
            "http://example.test/api",
            None,
            HttpMethod::Get,
            None,
            secs(5),
            secs(10),
        )
        .unwrap();
        assert_eq!(req.url, "http://example.test/api");
        assert_eq!(req.method, HttpMethod::Get);
        assert!(req.body.is_none());
        assert_eq!(req.header_count(), 0);
        assert_eq!(req.connect_timeout, secs(5));
        assert_eq!(req.response_timeout, secs(10));
    }

    #[test]
    fn build_rejects_empty_url() {
        let err = HttpRequest::build("", None, HttpMethod::Get, None, secs(1), secs(1)).unwrap_err();
        assert_eq!(err, RequestError::EmptyUrl);
        let err = HttpRequest::build("   ", None, HttpMethod::Post, None, secs(1), secs(1)).unwrap_err();
        assert_eq!(err, RequestError::EmptyUrl);
    }

    #[test]
    fn get_keeps_body_verbatim_but_does_not_transmit_it() {
        let req = HttpRequest::build(
            "http://example.test",
            Some(b"ignored".to_vec()),
            HttpMethod::Get,
            None,
            secs(1),
            secs(1),
        )
        .unwrap();
        assert_eq!(req.body.as_deref(), Some(&b"ignored"[..]));
        assert_eq!(req.body_for_transport(), None);
    }

    #[test]
    fn post_transmits_body() {
        let req = HttpRequest::build(
            "http://example.test",
            Some(b"payload".to_vec()),
            HttpMethod::Post,
            None,
            secs(1),
            secs(1),
        )
        .unwrap();
        assert_eq!(req.body_for_transport(), Some(&b"payload"[..]));
    }

    #[test]
    fn post_body_is_not_required_to_be_utf8() {
        let req = HttpRequest::build(
            "http://example.test",
            Some(b"caf\xe9".to_vec()),
            HttpMethod::Post,
            None,
            secs(1),
            secs(1),
        )
        .unwrap();
        assert_eq!(req.body_for_transport(), Some(&b"caf\xe9"[..]));
    }

    #[test]
    fn headers_move_into_request_and_can_grow() {
        let headers: Headers = ["Content-Type: text/plain"].into_iter().collect();
        let mut req = HttpRequest::build(
            "http://example.test",
            None,
            HttpMethod::Post,
            Some(headers),
            secs(1),
            secs(1),
        )
        .unwrap();
        req.append_header("X-Id: 7");
        assert_eq!(
            req.header_lines().collect::<Vec<_>>(),
            vec!["Content-Type: text/plain", "X-Id: 7"]
        );
    }

    #[test]
    fn append_header_on_request_without_headers_creates_chain() {
        let mut req =
            HttpRequest::build("http://example.test", None, HttpMethod::Get, None, secs(1), secs(1)).unwrap();
        req.append_header("Accept: */*");
        assert_eq!(req.header_count(), 1);
    }

    #[test]
    fn method_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&HttpMethod::Post).unwrap(), r#""POST""#);
        let m: HttpMethod = serde_json::from_str(r#""GET""#).unwrap();
        assert_eq!(m, HttpMethod::Get);
        assert_eq!(HttpMethod::Post.to_string(), "POST");
    }

    #[test]
    fn ok_response_has_zero_code() {
        let resp = HttpResponse::ok(200, "ok");
        assert_eq!(resp.code(), 0);
        assert!(resp.is_success());
        assert_eq!(resp.error_message(), None);
        assert_eq!(resp.body_size(), 2);
        assert_eq!(resp.body_text(), "ok");
    }

    #[test]
    fn failed_response_reports_kind_code() {
        let resp = HttpResponse::failed(TransportError::new(TransportErrorKind::CouldNotConnect, "refused"));
        assert_eq!(resp.code(), 7);
        assert!(!resp.is_success());
        assert_eq!(resp.error_message(), Some("Couldn't connect to server"));
    }

    #[test]
    fn body_may_contain_nul_bytes() {
        let resp = HttpResponse::ok(200, vec![b'a', 0, b'b']);
        assert_eq!(resp.body_size(), 3);
    }
}
