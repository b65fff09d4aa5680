//! Synchronous send.
//!
//! # Design
//! `HttpClient` holds only its transport and carries no state between
//! calls. `send` makes exactly one attempt and always returns an
//! `HttpResponse`: a transport failure becomes `HttpResponse::error`, an
//! HTTP-level failure is just a status code for the caller to interpret.

use tracing::{debug, warn};

use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Sends `HttpRequest` values through a `Transport`.
#[derive(Debug, Clone, Default)]
pub struct HttpClient<T> {
    transport: T,
}

impl<T: Transport> HttpClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Perform one blocking exchange. No retries.
    pub fn send(&self, request: &HttpRequest) -> HttpResponse {
        debug!(
            method = %request.method,
            url = %request.url,
            headers = request.header_count(),
            connect_timeout = ?request.connect_timeout,
            response_timeout = ?request.response_timeout,
            "sending request"
        );
        match self.transport.execute(request) {
            Ok(raw) => HttpResponse::ok(raw.status, raw.body),
            Err(error) => {
                warn!(url = %request.url, code = error.code(), %error, "transport failure");
                HttpResponse::failed(error)
            }
        }
    }
}

/// Send `request` with a default `UreqTransport`.
#[cfg(feature = "ureq")]
pub fn send(request: &HttpRequest) -> HttpResponse {
    HttpClient::new(crate::transport::UreqTransport::default()).send(request)
}
