//! FFI interface for C++ interop
//!
//! Provides C-compatible functions for analyzing the images of an HTML page.
//! Options and results are passed as JSON.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use crate::analysis::{analyze_html, ImageContextRecord};
use crate::config::AnalyzerConfig;

/// Result struct returned to C++
/// Both pointers are owned by Rust and must be freed via free_analysis_result
#[repr(C)]
pub struct AnalysisResultFFI {
    /// JSON array of image records (null-terminated)
    pub json_ptr: *mut c_char,
    /// Error message if analysis failed (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

/// Classify every image in an HTML document and gather its context.
///
/// No descriptions are generated here; `suggested_alt` is only present
/// (as `""`) for decorative images.
///
/// # Arguments
/// * `html_ptr` - Pointer to HTML content (UTF-8, not necessarily null-terminated)
/// * `html_len` - Length of HTML content in bytes
/// * `options_json` - JSON-serialized AnalyzerConfig (null-terminated), or null for defaults
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - `options_json` must be null or a valid null-terminated C string
/// - Caller must free the result via `free_analysis_result`
#[no_mangle]
pub unsafe extern "C" fn analyze_html_ffi(
    html_ptr: *const c_char,
    html_len: usize,
    options_json: *const c_char,
) -> AnalysisResultFFI {
    let html = if html_ptr.is_null() || html_len == 0 {
        String::new()
    } else {
        let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
        match std::str::from_utf8(slice) {
            Ok(s) => s.to_string(),
            Err(_) => return make_error_result("Invalid UTF-8 in HTML content"),
        }
    };

    let options = if options_json.is_null() {
        ""
    } else {
        match CStr::from_ptr(options_json).to_str() {
            Ok(s) => s,
            Err(_) => return make_error_result("Invalid UTF-8 in options JSON"),
        }
    };

    let config = match AnalyzerConfig::from_json(options) {
        Ok(c) => c,
        Err(e) => return make_error_result(&format!("Failed to parse options: {}", e)),
    };

    let records: Vec<ImageContextRecord> = analyze_html(&html, &config)
        .into_iter()
        .map(|image| image.record)
        .collect();

    match serde_json::to_string(&records) {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => AnalysisResultFFI {
                json_ptr: cstr.into_raw(),
                error_ptr: ptr::null_mut(),
            },
            Err(_) => make_error_result("Result JSON contains null bytes"),
        },
        Err(e) => make_error_result(&format!("Failed to serialize result: {}", e)),
    }
}

/// Free an AnalysisResultFFI returned by analyze_html_ffi
///
/// # Safety
/// - `result` must have been returned by `analyze_html_ffi`
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn free_analysis_result(result: AnalysisResultFFI) {
    if !result.json_ptr.is_null() {
        drop(CString::from_raw(result.json_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

fn make_error_result(msg: &str) -> AnalysisResultFFI {
    let error_cstr = CString::new(msg).unwrap_or_else(|_| CString::from(c"Unknown error"));
    AnalysisResultFFI {
        json_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}
