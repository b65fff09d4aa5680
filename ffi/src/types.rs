//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, an intrusive `next` pointer instead of
//! `Headers`, and plain integers for timeouts. Conversion functions live
//! here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_uint, c_void};

use minihttp_core::{append_header, Headers, HttpMethod, HttpRequest, HttpResponse, RequestError, TimeoutUnit};

use crate::list::{iterate_list, ListNode};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

impl From<FfiHttpMethod> for HttpMethod {
    fn from(m: FfiHttpMethod) -> Self {
        match m {
            FfiHttpMethod::Get => HttpMethod::Get,
            FfiHttpMethod::Post => HttpMethod::Post,
        }
    }
}

/// One header line in an intrusive chain. `next` comes first so a header
/// pointer is also a `ListNode` pointer.
#[repr(C)]
pub struct FfiHttpHeader {
    pub next: *mut FfiHttpHeader,
    pub header: *mut c_char,
}

impl FfiHttpHeader {
    /// Heap-allocate an unlinked header holding a copy of `line`.
    pub(crate) fn alloc(line: &CStr) -> *mut Self {
        Box::into_raw(Box::new(FfiHttpHeader {
            next: std::ptr::null_mut(),
            header: line.to_owned().into_raw(),
        }))
    }

    pub(crate) fn as_node(ptr: *mut Self) -> *mut ListNode {
        ptr.cast()
    }
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `make_http_request`, which owns copies of `url` and
/// `request_body` and takes ownership of the `headers` chain. Released by
/// `free_http_request`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub url: *mut c_char,
    pub request_body: *mut c_char,
    pub method: FfiHttpMethod,
    pub headers: *mut FfiHttpHeader,
    pub connect_timeout: c_uint,
    pub response_timeout: c_uint,
}

impl FfiHttpRequest {
    /// Copy this request into a core `HttpRequest`, reading the integer
    /// timeouts in `unit`.
    ///
    /// The body is copied byte for byte. The URL and every header line must
    /// be valid UTF-8; otherwise the request is rejected rather than altered.
    pub fn to_core(&self, unit: TimeoutUnit) -> Result<HttpRequest, RequestError> {
        let url = match c_bytes(self.url) {
            Some(bytes) => std::str::from_utf8(bytes).map_err(|_| RequestError::InvalidUrl)?,
            None => "",
        };
        let body = c_bytes(self.request_body).map(<[u8]>::to_vec);

        let mut collected = CollectedHeaders::default();
        iterate_list(
            FfiHttpHeader::as_node(self.headers),
            Some(collect_header_line),
            &mut collected as *mut CollectedHeaders as *mut c_void,
        );
        if let Some(err) = collected.error {
            return Err(err);
        }

        HttpRequest::build(
            url,
            body,
            self.method.into(),
            collected.headers,
            unit.to_duration(u64::from(self.connect_timeout)),
            unit.to_duration(u64::from(self.response_timeout)),
        )
    }
}

#[derive(Default)]
struct CollectedHeaders {
    headers: Option<Headers>,
    error: Option<RequestError>,
}

/// `iterate_list` callback copying each header line into `CollectedHeaders`.
/// The first non-UTF-8 line is recorded and the rest are skipped.
unsafe extern "C" fn collect_header_line(node: *mut ListNode, uptr: *mut c_void) -> c_int {
    let header = unsafe { &*(node as *const FfiHttpHeader) };
    let collected = unsafe { &mut *(uptr as *mut CollectedHeaders) };
    if collected.error.is_some() {
        return 0;
    }
    if let Some(bytes) = c_bytes(header.header) {
        match std::str::from_utf8(bytes) {
            Ok(line) => {
                append_header(&mut collected.headers, line);
            }
            Err(_) => {
                collected.error = Some(RequestError::InvalidHeader(String::from_utf8_lossy(bytes).into_owned()));
            }
        }
    }
    0
}

/// `iterate_list` callback releasing one header node and its string.
pub(crate) unsafe extern "C" fn free_header_node(node: *mut ListNode, _uptr: *mut c_void) -> c_int {
    let header = unsafe { Box::from_raw(node as *mut FfiHttpHeader) };
    if !header.header.is_null() {
        drop(unsafe { CString::from_raw(header.header) });
    }
    0
}

fn c_bytes<'a>(ptr: *const c_char) -> Option<&'a [u8]> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_bytes())
}

// ---------------------------------------------------------------------------
// Response type
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// `response_body` holds `response_body_size` bytes followed by a NUL, and
/// may contain embedded NULs. It is null when the transport failed.
/// `curl_error` points at static text and must never be freed.
#[repr(C)]
pub struct FfiHttpResponse {
    pub response_body: *mut c_char,
    pub response_body_size: usize,
    pub response_code: c_int,
    pub curl_error: *const c_char,
    pub curl_code: c_int,
}

impl FfiHttpResponse {
    /// Convert a core `HttpResponse` into a heap-allocated `FfiHttpResponse`.
    pub fn from_core(resp: HttpResponse) -> *mut Self {
        let (curl_code, curl_error) = match &resp.error {
            Some(err) => (err.code(), err.kind.diagnostic()),
            None => (0, NO_ERROR),
        };

        let response_body_size = resp.body.len();
        let response_body = if resp.error.is_some() {
            std::ptr::null_mut()
        } else {
            let mut bytes = resp.body;
            bytes.push(0);
            Box::into_raw(bytes.into_boxed_slice()) as *mut u8 as *mut c_char
        };

        Box::into_raw(Box::new(FfiHttpResponse {
            response_body,
            response_body_size: if response_body.is_null() { 0 } else { response_body_size },
            response_code: c_int::from(resp.status),
            curl_error: curl_error.as_ptr(),
            curl_code,
        }))
    }

    /// Release the body buffer allocated by `from_core`.
    pub(crate) fn free_body(&mut self) {
        if self.response_body.is_null() {
            return;
        }
        let slice = std::ptr::slice_from_raw_parts_mut(self.response_body as *mut u8, self.response_body_size + 1);
        drop(unsafe { Box::from_raw(slice) });
        self.response_body = std::ptr::null_mut();
    }
}

const NO_ERROR: &CStr = c"No error";
