//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use lostfound_core::{ApiError, HttpMethod, HttpRequest, LostFound, LostFoundClient};

/// Opaque handle to a `LostFoundClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiLostFoundClient {
    pub(crate) inner: LostFoundClient,
}

/// Copy `s` into a heap C string owned by the caller. Interior NUL bytes
/// are dropped.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    let bytes: Vec<u8> = s.into_bytes().into_iter().filter(|&b| b != 0).collect();
    CString::new(bytes).unwrap_or_default().into_raw()
}

fn optional_c_string(s: Option<String>) -> *mut c_char {
    s.map(into_c_string).unwrap_or(std::ptr::null_mut())
}

/// Hand a vector to C as a pointer; null when empty.
fn leak_vec<T>(items: Vec<T>) -> *mut T {
    if items.is_empty() {
        return std::ptr::null_mut();
    }
    let mut items = items.into_boxed_slice();
    let ptr = items.as_mut_ptr();
    std::mem::forget(items);
    ptr
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `lf_build_*` functions. The C caller executes the request
/// and passes the response back through `lf_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let headers_len = req.headers.len() as u32;
        let headers = leak_vec(
            req.headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: into_c_string(k),
                    value: into_c_string(v),
                })
                .collect(),
        );
        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path: into_c_string(req.path),
            headers,
            headers_len,
            body: optional_c_string(req.body),
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing an HTTP request,
/// then passes a pointer to a `lf_parse_*` function. The FFI layer reads
/// but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiLostFoundResult`.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NotFound = 1,
    Http = 2,
    Deserialization = 3,
    Serialization = 4,
    Panic = 5,
    NullArg = 6,
    Validation = 7,
    Unauthorized = 8,
    Network = 9,
}

/// Tag that tells `lf_free_result` what `FfiLostFoundResult::data` points to.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    LostFound = 1,
    LostFoundList = 2,
    /// `data` points to an `int64_t` id.
    CreatedId = 3,
    /// `data` is a C string holding the bearer token.
    Token = 4,
}

/// A single posting exposed to C. `cover` may be null.
#[repr(C)]
pub struct FfiLostFound {
    pub id: i64,
    pub title: *mut c_char,
    pub description: *mut c_char,
    pub status: *mut c_char,
    pub is_completed: bool,
    pub cover: *mut c_char,
    pub created_at: *mut c_char,
}

impl From<LostFound> for FfiLostFound {
    fn from(record: LostFound) -> Self {
        let is_completed = record.completed();
        FfiLostFound {
            id: record.id,
            title: into_c_string(record.title),
            description: into_c_string(record.description),
            status: into_c_string(record.status),
            is_completed,
            cover: optional_c_string(record.cover),
            created_at: into_c_string(record.created_at),
        }
    }
}

/// A list of postings exposed to C.
#[repr(C)]
pub struct FfiLostFoundList {
    pub items: *mut FfiLostFound,
    pub len: u32,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the parsed payload (tagged by `data_tag`).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `data` is null.
#[repr(C)]
pub struct FfiLostFoundResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiLostFoundResult {
    fn ok(data_tag: FfiDataTag, data: *mut c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiLostFoundResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag,
            data,
        }))
    }

    fn failure(error_code: FfiErrorCode, http_status: u16, message: String) -> *mut Self {
        Box::into_raw(Box::new(FfiLostFoundResult {
            error_code,
            error_message: into_c_string(message),
            http_status,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }

    pub(crate) fn ok_lost_found(record: LostFound) -> *mut Self {
        let item = Box::new(FfiLostFound::from(record));
        Self::ok(FfiDataTag::LostFound, Box::into_raw(item) as *mut c_void)
    }

    pub(crate) fn ok_lost_found_list(records: Vec<LostFound>) -> *mut Self {
        let len = records.len() as u32;
        let items = leak_vec(records.into_iter().map(FfiLostFound::from).collect());
        let list = Box::new(FfiLostFoundList { items, len });
        Self::ok(FfiDataTag::LostFoundList, Box::into_raw(list) as *mut c_void)
    }

    pub(crate) fn ok_created_id(id: i64) -> *mut Self {
        Self::ok(FfiDataTag::CreatedId, Box::into_raw(Box::new(id)) as *mut c_void)
    }

    pub(crate) fn ok_token(token: String) -> *mut Self {
        Self::ok(FfiDataTag::Token, into_c_string(token) as *mut c_void)
    }

    /// Success with no data payload (update, delete, register).
    pub(crate) fn ok_empty() -> *mut Self {
        Self::ok(FfiDataTag::None, std::ptr::null_mut())
    }

    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let http_status = err.http_status().unwrap_or(0);
        let error_code = match &err {
            ApiError::Network(_) => FfiErrorCode::Network,
            ApiError::Validation { .. } => FfiErrorCode::Validation,
            ApiError::NotFound(_) => FfiErrorCode::NotFound,
            ApiError::Unauthorized { .. } => FfiErrorCode::Unauthorized,
            ApiError::Unknown { .. } => FfiErrorCode::Http,
            ApiError::Deserialization(_) => FfiErrorCode::Deserialization,
            ApiError::Serialization(_) => FfiErrorCode::Serialization,
        };
        Self::failure(error_code, http_status, err.display_message())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, 0, format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, 0, msg.to_string())
    }
}

/// Colored status label. `text` is a static string; do not free it.
#[repr(C)]
pub struct FfiStatusLabel {
    pub text: *const c_char,
    /// ARGB.
    pub color: u32,
    pub span_start: u32,
    pub span_end: u32,
}
