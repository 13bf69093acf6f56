//! FFI interface for page-integration hosts
//!
//! Provides C-compatible functions for building reports from HTML.
//! Results are passed back as JSON for simplicity and type safety. The host
//! owns clipboard delivery on this path.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use serde::Serialize;

use crate::config::Config;
use crate::extractors::{Extractor, Page, PageKind};
use crate::normalize::NormalizeOptions;
use crate::report::{extract_report, CopyReport};

/// Result struct returned to the host
/// Both pointers are owned by Rust and must be freed via issue_clip_free_result
#[repr(C)]
pub struct IssueClipResult {
    /// JSON-serialized result (null-terminated)
    pub json_ptr: *mut c_char,
    /// Error message if the call itself failed (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

/// Build a report from a rendered page.
///
/// # Arguments
/// * `html_ptr` - Pointer to HTML content (UTF-8, not necessarily null-terminated)
/// * `html_len` - Length of HTML content in bytes
/// * `location` - Page URL (null-terminated)
/// * `kind` - `"issue"`, `"knowledge_base"`, or null to classify from `location`
///
/// # Returns
/// IssueClipResult whose json_ptr holds a serialized `CopyReport`. Extraction
/// failures are reported inside the JSON (`success: false`); error_ptr is only
/// set for invalid arguments.
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - `location` and a non-null `kind` must be valid null-terminated C strings
/// - Caller must free the result via `issue_clip_free_result`
#[no_mangle]
pub unsafe extern "C" fn issue_clip_extract(
    html_ptr: *const c_char,
    html_len: usize,
    location: *const c_char,
    kind: *const c_char,
) -> IssueClipResult {
    let html = match read_html(html_ptr, html_len) {
        Ok(html) => html,
        Err(msg) => return make_error_result(msg),
    };

    let location = match read_cstr(location) {
        Some(Ok(s)) => s,
        Some(Err(_)) => return make_error_result("Invalid UTF-8 in location"),
        None => return make_error_result("Location is null"),
    };

    let pinned = match read_cstr(kind) {
        None => None,
        Some(Ok(s)) => match s.parse::<PageKind>() {
            Ok(kind) => Some(kind),
            Err(e) => return make_error_result(&e),
        },
        Some(Err(_)) => return make_error_result("Invalid UTF-8 in kind"),
    };

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => return make_error_result(&format!("Failed to load configuration: {}", e)),
    };

    let report = match Page::parse(&html, location) {
        Ok(page) => extract_report(&Extractor::from_config(&config), &page, pinned),
        Err(err) => CopyReport::failure(&err),
    };

    make_json_result(&report)
}

/// Convert and normalize an HTML fragment with the layered configuration
/// (files and `ISSUE_CLIP_*` environment), as `issue_clip_extract` does.
///
/// A non-zero `max_length` overrides the configured limit; 0 keeps it.
/// Returns a JSON string.
///
/// # Safety
/// Same as issue_clip_extract
#[no_mangle]
pub unsafe extern "C" fn issue_clip_convert(
    html_ptr: *const c_char,
    html_len: usize,
    max_length: usize,
) -> IssueClipResult {
    let html = match read_html(html_ptr, html_len) {
        Ok(html) => html,
        Err(msg) => return make_error_result(msg),
    };

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => return make_error_result(&format!("Failed to load configuration: {}", e)),
    };
    if max_length > 0 {
        config.normalize = NormalizeOptions {
            max_length,
            ..config.normalize
        };
    }

    let text = Extractor::from_config(&config).convert_fragment(&html);
    make_json_result(&text)
}

/// Free an IssueClipResult returned by this library
///
/// # Safety
/// - `result` must have been returned by an `issue_clip_*` function
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn issue_clip_free_result(result: IssueClipResult) {
    if !result.json_ptr.is_null() {
        drop(CString::from_raw(result.json_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

unsafe fn read_html(html_ptr: *const c_char, html_len: usize) -> Result<String, &'static str> {
    if html_ptr.is_null() || html_len == 0 {
        return Ok(String::new());
    }
    let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
    std::str::from_utf8(slice)
        .map(str::to_string)
        .map_err(|_| "Invalid UTF-8 in HTML content")
}

unsafe fn read_cstr<'a>(ptr: *const c_char) -> Option<Result<&'a str, std::str::Utf8Error>> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_str())
    }
}

fn make_json_result<T: Serialize>(value: &T) -> IssueClipResult {
    match serde_json::to_string(value) {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => IssueClipResult {
                json_ptr: cstr.into_raw(),
                error_ptr: ptr::null_mut(),
            },
            Err(_) => make_error_result("Result JSON contains null bytes"),
        },
        Err(e) => make_error_result(&format!("Failed to serialize result: {}", e)),
    }
}

// Helper to create error result
fn make_error_result(msg: &str) -> IssueClipResult {
    let error_cstr = CString::new(msg.replace('\0', " ")).unwrap_or_default();
    IssueClipResult {
        json_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn take_json(result: IssueClipResult) -> serde_json::Value {
        assert!(result.error_ptr.is_null());
        let json = CStr::from_ptr(result.json_ptr).to_str().unwrap().to_string();
        issue_clip_free_result(result);
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_extract_reports_missing_element_in_json() {
        let html = "<html><body><p>nothing here</p></body></html>";
        let location = CString::new("https://demo.youtrack.cloud/issue/DEMO-1").unwrap();

        let json = unsafe {
            take_json(issue_clip_extract(
                html.as_ptr() as *const c_char,
                html.len(),
                location.as_ptr(),
                ptr::null(),
            ))
        };

        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("project"));
    }

    #[test]
    fn test_null_location_is_an_error() {
        let html = "<p>x</p>";
        unsafe {
            let result = issue_clip_extract(html.as_ptr() as *const c_char, html.len(), ptr::null(), ptr::null());
            assert!(result.json_ptr.is_null());
            let msg = CStr::from_ptr(result.error_ptr).to_str().unwrap().to_string();
            issue_clip_free_result(result);
            assert_eq!(msg, "Location is null");
        }
    }

    #[test]
    fn test_convert_max_length_overrides_config() {
        let html = "<p>abcdefgh</p>";
        let json = unsafe { take_json(issue_clip_convert(html.as_ptr() as *const c_char, html.len(), 3)) };
        assert_eq!(json, serde_json::json!("  abc..."));
    }

    #[test]
    fn test_convert_fragment() {
        let html = "<p>Hello <b>world</b></p><ul><li>one</li></ul>";
        let json = unsafe { take_json(issue_clip_convert(html.as_ptr() as *const c_char, html.len(), 0)) };
        assert_eq!(json, serde_json::json!("  Hello**world**\n  - one"));
    }
}
