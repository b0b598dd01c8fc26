//! C-ABI wrapper around `lostfound-core`.
//!
//! # Overview
//! Exposes login and the lost-found item operations through `extern "C"`
//! functions so any language with a C FFI can build and parse HTTP
//! requests/responses without linking to serde directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-operation `lf_build_*` / `lf_parse_*` mirrors the core API 1:1.
//! - A single `FfiLostFoundResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - Optional strings are nullable pointers. Optional completion flags use
//!   -1 = skip, 0 = false, 1 = true.
//! - The C caller owns all returned pointers and must call the matching
//!   `lf_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use lostfound_core::{
    highlight_status, CreateLostFound, HttpResponse, ListFilter, LoginRequest, LostFoundClient,
    RegisterRequest, StatusTone, UpdateLostFound,
};

use types::*;

/// Read a C string; null yields `None`. Invalid UTF-8 is replaced.
fn read_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

fn tri_state(value: i32) -> Option<bool> {
    match value {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new client bound to `base_url`.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `lf_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn lf_client_new(base_url: *const c_char) -> *mut FfiLostFoundClient {
    catch_unwind(|| {
        let Some(url) = read_str(base_url) else {
            return std::ptr::null_mut();
        };
        let client = LostFoundClient::new(&url);
        Box::into_raw(Box::new(FfiLostFoundClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `lf_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn lf_client_free(client: *mut FfiLostFoundClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

/// Set the bearer token sent with item requests. Null or empty clears it.
/// Returns false if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn lf_client_set_token(client: *mut FfiLostFoundClient, token: *const c_char) -> bool {
    if client.is_null() {
        return false;
    }
    catch_unwind(|| {
        let client = unsafe { &mut *client };
        client.inner.set_token(read_str(token));
        true
    })
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build a registration request. Returns null if any argument is null.
#[unsafe(no_mangle)]
pub extern "C" fn lf_build_register(
    client: *const FfiLostFoundClient,
    name: *const c_char,
    email: *const c_char,
    password: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let (Some(name), Some(email), Some(password)) = (read_str(name), read_str(email), read_str(password))
        else {
            return std::ptr::null_mut();
        };
        let client = unsafe { &*client };
        let input = RegisterRequest { name, email, password };
        FfiHttpRequest::from_core(client.inner.build_register(&input))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a login request. Returns null if any argument is null.
#[unsafe(no_mangle)]
pub extern "C" fn lf_build_login(
    client: *const FfiLostFoundClient,
    email: *const c_char,
    password: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let (Some(email), Some(password)) = (read_str(email), read_str(password)) else {
            return std::ptr::null_mut();
        };
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_login(&LoginRequest { email, password }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a request listing postings.
///
/// `completed` uses tri-state: -1 = any, 0 = open, 1 = resolved.
/// `status` may be null (any status).
#[unsafe(no_mangle)]
pub extern "C" fn lf_build_list_lost_founds(
    client: *const FfiLostFoundClient,
    completed: i32,
    status: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let filter = ListFilter {
            is_completed: tri_state(completed),
            status: read_str(status),
        };
        FfiHttpRequest::from_core(client.inner.build_list_lost_founds(&filter))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a request fetching one posting.
#[unsafe(no_mangle)]
pub extern "C" fn lf_build_get_lost_found(client: *const FfiLostFoundClient, id: i64) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_get_lost_found(id))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a request creating a posting. `status` may be null.
///
/// Returns null if `client`, `title` or `description` is null.
#[unsafe(no_mangle)]
pub extern "C" fn lf_build_create_lost_found(
    client: *const FfiLostFoundClient,
    title: *const c_char,
    description: *const c_char,
    status: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let (Some(title), Some(description)) = (read_str(title), read_str(description)) else {
            return std::ptr::null_mut();
        };
        let client = unsafe { &*client };
        let input = CreateLostFound {
            title,
            description,
            status: read_str(status),
        };
        FfiHttpRequest::from_core(client.inner.build_create_lost_found(&input))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a request updating a posting.
///
/// `title` and `description` are required. `status` may be null (keep).
/// `completed` uses tri-state: -1 = keep, 0 = false, 1 = true.
#[unsafe(no_mangle)]
pub extern "C" fn lf_build_update_lost_found(
    client: *const FfiLostFoundClient,
    id: i64,
    title: *const c_char,
    description: *const c_char,
    status: *const c_char,
    completed: i32,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let (Some(title), Some(description)) = (read_str(title), read_str(description)) else {
            return std::ptr::null_mut();
        };
        let client = unsafe { &*client };
        let input = UpdateLostFound {
            title,
            description,
            status: read_str(status),
            is_completed: tri_state(completed),
        };
        FfiHttpRequest::from_core(client.inner.build_update_lost_found(id, &input))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a request deleting a posting.
#[unsafe(no_mangle)]
pub extern "C" fn lf_build_delete_lost_found(
    client: *const FfiLostFoundClient,
    id: i64,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_delete_lost_found(id))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    HttpResponse::new(resp.status, read_str(resp.body).unwrap_or_default())
}

/// Shared null checks and conversion for every `lf_parse_*` function.
fn parse_with(
    operation: &str,
    client: *const FfiLostFoundClient,
    response: *const FfiHttpResponse,
    parse: impl FnOnce(&LostFoundClient, HttpResponse) -> *mut FfiLostFoundResult + std::panic::UnwindSafe,
) -> *mut FfiLostFoundResult {
    if client.is_null() {
        return FfiLostFoundResult::null_arg("client");
    }
    if response.is_null() {
        return FfiLostFoundResult::null_arg("response");
    }
    catch_unwind(|| {
        let client = unsafe { &*client };
        let resp = ffi_response_to_core(unsafe { &*response });
        parse(&client.inner, resp)
    })
    .unwrap_or_else(|_| FfiLostFoundResult::panic(&format!("panic in {operation}")))
}

/// Parse a registration response. `data_tag = None` on success.
#[unsafe(no_mangle)]
pub extern "C" fn lf_parse_register(
    client: *const FfiLostFoundClient,
    response: *const FfiHttpResponse,
) -> *mut FfiLostFoundResult {
    parse_with("lf_parse_register", client, response, |c, resp| match c.parse_register(resp) {
        Ok(()) => FfiLostFoundResult::ok_empty(),
        Err(e) => FfiLostFoundResult::from_error(e),
    })
}

/// Parse a login response. `data_tag = Token` on success; `data` is the
/// token as a C string. The client's token is not changed; call
/// `lf_client_set_token` to use it.
#[unsafe(no_mangle)]
pub extern "C" fn lf_parse_login(
    client: *const FfiLostFoundClient,
    response: *const FfiHttpResponse,
) -> *mut FfiLostFoundResult {
    parse_with("lf_parse_login", client, response, |c, resp| match c.parse_login(resp) {
        Ok(token) => FfiLostFoundResult::ok_token(token),
        Err(e) => FfiLostFoundResult::from_error(e),
    })
}

/// Parse a list response. `data_tag = LostFoundList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn lf_parse_list_lost_founds(
    client: *const FfiLostFoundClient,
    response: *const FfiHttpResponse,
) -> *mut FfiLostFoundResult {
    parse_with("lf_parse_list_lost_founds", client, response, |c, resp| {
        match c.parse_list_lost_founds(resp) {
            Ok(items) => FfiLostFoundResult::ok_lost_found_list(items),
            Err(e) => FfiLostFoundResult::from_error(e),
        }
    })
}

/// Parse a get response. `data_tag = LostFound` on success.
#[unsafe(no_mangle)]
pub extern "C" fn lf_parse_get_lost_found(
    client: *const FfiLostFoundClient,
    response: *const FfiHttpResponse,
) -> *mut FfiLostFoundResult {
    parse_with("lf_parse_get_lost_found", client, response, |c, resp| {
        match c.parse_get_lost_found(resp) {
            Ok(item) => FfiLostFoundResult::ok_lost_found(item),
            Err(e) => FfiLostFoundResult::from_error(e),
        }
    })
}

/// Parse a create response. `data_tag = CreatedId` on success.
#[unsafe(no_mangle)]
pub extern "C" fn lf_parse_create_lost_found(
    client: *const FfiLostFoundClient,
    response: *const FfiHttpResponse,
) -> *mut FfiLostFoundResult {
    parse_with("lf_parse_create_lost_found", client, response, |c, resp| {
        match c.parse_create_lost_found(resp) {
            Ok(id) => FfiLostFoundResult::ok_created_id(id),
            Err(e) => FfiLostFoundResult::from_error(e),
        }
    })
}

/// Parse an update response. `data_tag = None` on success.
#[unsafe(no_mangle)]
pub extern "C" fn lf_parse_update_lost_found(
    client: *const FfiLostFoundClient,
    response: *const FfiHttpResponse,
) -> *mut FfiLostFoundResult {
    parse_with("lf_parse_update_lost_found", client, response, |c, resp| {
        match c.parse_update_lost_found(resp) {
            Ok(()) => FfiLostFoundResult::ok_empty(),
            Err(e) => FfiLostFoundResult::from_error(e),
        }
    })
}

/// Parse a delete response. `data_tag = None` on success.
#[unsafe(no_mangle)]
pub extern "C" fn lf_parse_delete_lost_found(
    client: *const FfiLostFoundClient,
    response: *const FfiHttpResponse,
) -> *mut FfiLostFoundResult {
    parse_with("lf_parse_delete_lost_found", client, response, |c, resp| {
        match c.parse_delete_lost_found(resp) {
            Ok(()) => FfiLostFoundResult::ok_empty(),
            Err(e) => FfiLostFoundResult::from_error(e),
        }
    })
}

// ---------------------------------------------------------------------------
// Status highlighting
// ---------------------------------------------------------------------------

/// Label and color for a posting's status. Null is treated as lost.
#[unsafe(no_mangle)]
pub extern "C" fn lf_status_label(status: *const c_char) -> FfiStatusLabel {
    let lost = || FfiStatusLabel {
        text: c"Lost".as_ptr(),
        color: StatusTone::Lost.color().0,
        span_start: 0,
        span_end: 4,
    };
    catch_unwind(|| {
        let status = read_str(status).unwrap_or_default();
        let highlighted = highlight_status(&status);
        let text = match StatusTone::classify(&status) {
            StatusTone::Found => c"Found",
            StatusTone::Lost => c"Lost",
        };
        FfiStatusLabel {
            text: text.as_ptr(),
            color: highlighted.color.0,
            span_start: highlighted.span.start as u32,
            span_end: highlighted.span.end as u32,
        }
    })
    .unwrap_or_else(|_| lost())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `lf_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn lf_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.path);
        free_c_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Vec::from_raw_parts(req.headers, req.headers_len as usize, req.headers_len as usize)
            };
            for h in headers {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free an `FfiLostFoundResult` returned by any `lf_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn lf_free_result(result: *mut FfiLostFoundResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::LostFound => {
                let item = unsafe { Box::from_raw(result.data as *mut FfiLostFound) };
                free_lost_found_fields(&item);
            }
            FfiDataTag::LostFoundList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiLostFoundList) };
                if !list.items.is_null() && list.len > 0 {
                    let items = unsafe {
                        Vec::from_raw_parts(list.items, list.len as usize, list.len as usize)
                    };
                    for item in &items {
                        free_lost_found_fields(item);
                    }
                }
            }
            FfiDataTag::CreatedId => drop(unsafe { Box::from_raw(result.data as *mut i64) }),
            FfiDataTag::Token => free_c_string(result.data as *mut c_char),
            FfiDataTag::None => {}
        }
    });
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Free the C-string fields of an `FfiLostFound` (but not the struct itself).
fn free_lost_found_fields(item: &FfiLostFound) {
    free_c_string(item.title);
    free_c_string(item.description);
    free_c_string(item.status);
    free_c_string(item.cover);
    free_c_string(item.created_at);
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn lf_free_string(s: *mut c_char) {
    let _ = catch_unwind(|| free_c_string(s));
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
