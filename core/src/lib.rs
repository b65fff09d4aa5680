//! Minimal synchronous HTTP client over a generic linked list.
//!
//! # Overview
//! A caller builds a header chain, wraps it in an `HttpRequest`, and hands
//! the request to `HttpClient::send`, which blocks on a `Transport` and
//! returns an `HttpResponse`. Transport failures come back inside the
//! response, never as a panic or an `Err`.
//!
//! # Design
//! - `list::List` is a generic singly linked list (append, predicate
//!   search, exhaustive iteration) that the header chain is built on.
//! - Request, response and header values own their data and release it on
//!   drop. The request owns any header chain passed to it.
//! - All network I/O sits behind the `Transport` trait; `UreqTransport`
//!   (feature `ureq`, on by default) is the real engine.
//! - One call is one attempt. No pooling, no retries, no async.

pub mod client;
pub mod config;
pub mod error;
pub mod header;
pub mod http;
pub mod list;
pub mod transport;

#[cfg(feature = "ureq")]
pub use client::send;
pub use client::HttpClient;
pub use config::{TimeoutUnit, TransportConfig};
pub use error::{RequestError, TransportError, TransportErrorKind};
pub use header::{append_header, free_headers, HeaderEntry, Headers};
pub use http::{free_request, free_response, validate_url, HttpMethod, HttpRequest, HttpResponse};
pub use list::List;
pub use transport::{RawResponse, Transport};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
