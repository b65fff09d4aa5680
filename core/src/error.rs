//! Error types for request construction and transport failures.
//!
//! # Design
//! Construction misuse is reported eagerly from `HttpRequest::build` as a
//! `RequestError`. Everything that goes wrong on the wire is a
//! `TransportError`, which never escapes `send` as an `Err`: it is stored
//! in `HttpResponse::error` so one call always yields one response value.
//!
//! `TransportErrorKind` codes reuse libcurl's numbering. C callers that
//! already branch on `curl_code` keep working unchanged.

use std::ffi::CStr;

use thiserror::Error;

/// Errors returned by `HttpRequest::build`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The URL was empty or contained only whitespace.
    #[error("request url must not be empty")]
    EmptyUrl,

    /// The URL bytes were not valid UTF-8.
    #[error("request url is not valid UTF-8")]
    InvalidUrl,

    /// A header line was not valid UTF-8. Holds a lossy rendering for logs.
    #[error("header line {0:?} is not valid UTF-8")]
    InvalidHeader(String),
}

impl RequestError {
    /// Transport kind reported when a request is rejected before any I/O.
    pub fn transport_kind(&self) -> TransportErrorKind {
        match self {
            RequestError::EmptyUrl | RequestError::InvalidUrl => TransportErrorKind::BadUrl,
            RequestError::InvalidHeader(_) => TransportErrorKind::InvalidHeader,
        }
    }
}

/// Category of a transport failure, carrying a stable numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    UnsupportedProtocol,
    BadUrl,
    CouldNotResolveHost,
    CouldNotConnect,
    Tls,
    Timeout,
    InvalidHeader,
    SendError,
    RecvError,
    BodyTooLarge,
    Other,
}

impl TransportErrorKind {
    /// Numeric code exposed as `curl_code`. Never zero.
    pub fn code(self) -> i32 {
        match self {
            TransportErrorKind::UnsupportedProtocol => 1,
            TransportErrorKind::BadUrl => 3,
            TransportErrorKind::CouldNotResolveHost => 6,
            TransportErrorKind::CouldNotConnect => 7,
            TransportErrorKind::Timeout => 28,
            TransportErrorKind::Tls => 35,
            TransportErrorKind::InvalidHeader => 43,
            TransportErrorKind::SendError => 55,
            TransportErrorKind::RecvError => 56,
            TransportErrorKind::BodyTooLarge => 63,
            TransportErrorKind::Other => 99,
        }
    }

    /// Static diagnostic text as a C string, for callers that hand it across
    /// an FFI boundary. The response only ever borrows this.
    pub fn diagnostic(self) -> &'static CStr {
        match self {
            TransportErrorKind::UnsupportedProtocol => c"Unsupported protocol",
            TransportErrorKind::BadUrl => c"URL using bad/illegal format or missing URL",
            TransportErrorKind::CouldNotResolveHost => c"Couldn't resolve host name",
            TransportErrorKind::CouldNotConnect => c"Couldn't connect to server",
            TransportErrorKind::Timeout => c"Timeout was reached",
            TransportErrorKind::Tls => c"SSL connect error",
            TransportErrorKind::InvalidHeader => c"Malformed header line",
            TransportErrorKind::SendError => c"Failed sending data to the peer",
            TransportErrorKind::RecvError => c"Failure when receiving data from the peer",
            TransportErrorKind::BodyTooLarge => c"Maximum file size exceeded",
            TransportErrorKind::Other => c"Unknown transport error",
        }
    }

    /// `diagnostic` as `&str`. Every diagnostic is ASCII.
    pub fn message(self) -> &'static str {
        self.diagnostic().to_str().unwrap_or_default()
    }
}

/// A failed exchange with the transport.
///
/// `detail` holds whatever the transport said beyond the kind, for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} (code {}): {detail}", .kind.message(), .kind.code())]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub detail: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn code(&self) -> i32 {
        self.kind.code()
    }

    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}
