//! C-ABI wrapper around `minihttp-core`.
//!
//! # Overview
//! Exposes the generic intrusive list and the HTTP request/response model
//! through `extern "C"` functions, so a C program can build a header chain,
//! build a request, send it synchronously and free everything afterwards.
//!
//! # Design
//! - Every `extern "C"` function that allocates or calls into the core
//!   wraps its body in `catch_unwind` so panics never cross the FFI boundary.
//! - `make_http_request` copies `url` and `request_body`; the caller keeps
//!   ownership of the strings it passed in. The `headers` chain, however,
//!   moves into the request and is released by `free_http_request`.
//!   `free_http_headers` is only for chains never attached to a request.
//! - Header nodes must come from `http_header_new` or
//!   `header_append_node_n`, since they are released with Rust's allocator.
//! - Timeouts are whole seconds for `http_post`. `http_post_with_config`
//!   reads them in the unit its JSON config names. 0 means no limit.
//! - Request bodies are passed to the transport byte for byte. URLs and
//!   header lines must be UTF-8; a request carrying anything else fails
//!   with a transport code instead of being rewritten.

pub mod list;
pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_uint};
use std::panic::catch_unwind;

use minihttp_core::{
    validate_url, HttpClient, HttpResponse, TimeoutUnit, Transport, TransportConfig, TransportError, UreqTransport,
};
use tracing::{debug, warn};

use list::{append_node, iterate_list};
use types::*;

// ---------------------------------------------------------------------------
// Header chain
// ---------------------------------------------------------------------------

/// Allocate an unlinked header node holding a copy of `header`.
///
/// Returns null if `header` is null. Link it with `header_append_node`.
#[unsafe(no_mangle)]
pub extern "C" fn http_header_new(header: *const c_char) -> *mut FfiHttpHeader {
    catch_unwind(|| {
        if header.is_null() {
            return std::ptr::null_mut();
        }
        FfiHttpHeader::alloc(unsafe { CStr::from_ptr(header) })
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Append `node` to the chain stored in `*root`, creating the chain if
/// `*root` is null. `node->next` must already be null.
#[unsafe(no_mangle)]
pub extern "C" fn header_append_node(root: *mut *mut FfiHttpHeader, node: *mut FfiHttpHeader) {
    append_node(root.cast(), FfiHttpHeader::as_node(node));
}

/// Copy `header` (`"Name: Value"`) into a new node and append it.
///
/// Returns the new node, or null if `root` or `header` is null.
#[unsafe(no_mangle)]
pub extern "C" fn header_append_node_n(root: *mut *mut FfiHttpHeader, header: *const c_char) -> *mut FfiHttpHeader {
    catch_unwind(|| {
        if root.is_null() || header.is_null() {
            return std::ptr::null_mut();
        }
        let node = FfiHttpHeader::alloc(unsafe { CStr::from_ptr(header) });
        header_append_node(root, node);
        node
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Request / send
// ---------------------------------------------------------------------------

/// Build a request.
///
/// `request_body` may be null and is only transmitted for `Post`. `headers`
/// may be null; otherwise the request takes ownership of the chain.
/// Returns null if `url` is null, blank or not UTF-8.
/// The caller must free the returned pointer with `free_http_request`.
#[unsafe(no_mangle)]
pub extern "C" fn make_http_request(
    url: *const c_char,
    request_body: *const c_char,
    method: FfiHttpMethod,
    headers: *mut FfiHttpHeader,
    connect_timeout: c_uint,
    response_timeout: c_uint,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if url.is_null() {
            return std::ptr::null_mut();
        }
        let url = unsafe { CStr::from_ptr(url) };
        if url.to_str().map_or(true, |url| validate_url(url).is_err()) {
            return std::ptr::null_mut();
        }
        let request_body = if request_body.is_null() {
            std::ptr::null_mut()
        } else {
            unsafe { CStr::from_ptr(request_body) }.to_owned().into_raw()
        };
        Box::into_raw(Box::new(FfiHttpRequest {
            url: url.to_owned().into_raw(),
            request_body,
            method,
            headers,
            connect_timeout,
            response_timeout,
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Send `request` and block until the transport answers, times out or fails.
///
/// Works for both methods despite the name. Timeouts are read in seconds.
/// Check `curl_code` before reading `response_code` or the body. Returns
/// null only if `request` is null or an internal panic occurs.
/// The caller must free the returned pointer with `free_http_response`.
#[unsafe(no_mangle)]
pub extern "C" fn http_post(request: *const FfiHttpRequest) -> *mut FfiHttpResponse {
    catch_unwind(|| {
        if request.is_null() {
            return std::ptr::null_mut();
        }
        let response = dispatch(unsafe { &*request }, TimeoutUnit::Seconds, UreqTransport::default());
        FfiHttpResponse::from_core(response)
    })
    .unwrap_or(std::ptr::null_mut())
}

/// `http_post` with transport settings given as a JSON object, for example
/// `{"timeout_unit":"milliseconds","max_body_bytes":4096,"user_agent":"app/1"}`.
///
/// Missing fields take their defaults and a null `config_json` is the
/// default config. Returns null if `request` is null, `config_json` does
/// not parse, or an internal panic occurs.
/// The caller must free the returned pointer with `free_http_response`.
#[unsafe(no_mangle)]
pub extern "C" fn http_post_with_config(
    request: *const FfiHttpRequest,
    config_json: *const c_char,
) -> *mut FfiHttpResponse {
    catch_unwind(|| {
        if request.is_null() {
            return std::ptr::null_mut();
        }
        let Some(config) = parse_config(config_json) else {
            return std::ptr::null_mut();
        };
        let unit = config.timeout_unit;
        let response = dispatch(unsafe { &*request }, unit, UreqTransport::new(config));
        FfiHttpResponse::from_core(response)
    })
    .unwrap_or(std::ptr::null_mut())
}

fn parse_config(config_json: *const c_char) -> Option<TransportConfig> {
    if config_json.is_null() {
        return Some(TransportConfig::default());
    }
    let raw = unsafe { CStr::from_ptr(config_json) };
    let parsed = match raw.to_str() {
        Ok(raw) => TransportConfig::from_json(raw).map_err(|err| err.to_string()),
        Err(err) => Err(err.to_string()),
    };
    parsed.map_err(|err| warn!(%err, "rejecting transport config")).ok()
}

/// Convert `request` with `unit` and run it on `transport`. Requests the
/// core refuses to build come back as failed responses.
fn dispatch<T: Transport>(request: &FfiHttpRequest, unit: TimeoutUnit, transport: T) -> HttpResponse {
    match request.to_core(unit) {
        Ok(req) => HttpClient::new(transport).send(&req),
        Err(err) => {
            debug!(%err, "rejecting request");
            HttpResponse::failed(TransportError::new(err.transport_kind(), err.to_string()))
        }
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a request from `make_http_request`, including its header chain.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn free_http_request(request: *mut FfiHttpRequest) {
    if request.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let request = unsafe { Box::from_raw(request) };
        if !request.url.is_null() {
            drop(unsafe { CString::from_raw(request.url) });
        }
        if !request.request_body.is_null() {
            drop(unsafe { CString::from_raw(request.request_body) });
        }
        free_http_headers(request.headers);
    });
}

/// Free a response from `http_post`. `curl_error` is static and untouched.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn free_http_response(response: *mut FfiHttpResponse) {
    if response.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let mut response = unsafe { Box::from_raw(response) };
        response.free_body();
    });
}

/// Free every node and string of a header chain that was never attached
/// to a request. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn free_http_headers(headers: *mut FfiHttpHeader) {
    iterate_list(
        FfiHttpHeader::as_node(headers),
        Some(free_header_node),
        std::ptr::null_mut(),
    );
}
