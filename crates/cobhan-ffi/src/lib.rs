//! C ABI exports for Cobhan buffers.
//!
//! Hosts load this library to configure the process-wide buffer limits and
//! to check their own buffer handling against this library.
//! Every echo function decodes its `input` buffer and re-encodes the value
//! into `output`, so a host can round-trip each payload kind (including the
//! temp-file overflow path) through native code.
//!
//! All functions returning `i32` return `0` on success or a negative Cobhan
//! error code.
//!
//! # Usage from C
//!
//! ```c
//! int32_t cobhan_echo_string(const char *input, char *output);
//!
//! char *out = malloc(8 + 64);
//! *(int32_t *)out = 64;            // capacity
//! int32_t rc = cobhan_echo_string(in, out);
//! ```

// Exported symbols and foreign pointers are the purpose of this crate.
#![allow(unsafe_code)]

mod logging;

use std::os::raw::c_char;

use cobhan::{raw, BufferConfig, CobhanError, ERR_NONE};
use tracing::debug;

// ============================================================================
// Configuration
// ============================================================================

/// Set the process-wide ceiling on declared buffer lengths.
#[no_mangle]
pub extern "C" fn cobhan_set_default_buffer_maximum(max: i32) {
    debug!("Setting default buffer maximum to {}", max);
    cobhan::set_default_buffer_maximum(max);
}

/// Enable (non-zero) or disable (zero) the temp-file overflow channel.
#[no_mangle]
pub extern "C" fn cobhan_allow_temp_file_buffers(allow: i32) {
    debug!("Temp file buffers allowed: {}", allow != 0);
    cobhan::allow_temp_file_buffers(allow != 0);
}

/// Install a stderr log subscriber. Safe to call more than once.
///
/// `debug` non-zero lowers the default level to DEBUG; `RUST_LOG` overrides.
#[no_mangle]
pub extern "C" fn cobhan_init_logging(debug: i32) -> i32 {
    logging::init(debug != 0);
    ERR_NONE
}

// ============================================================================
// Error codes
// ============================================================================

/// Symbolic name for an error code.
pub fn error_name(code: i32) -> &'static str {
    if code == ERR_NONE {
        return "ERR_NONE";
    }
    CobhanError::from_code(code)
        .map(|err| err.name())
        .unwrap_or("ERR_UNKNOWN")
}

/// Write the symbolic name of `code` into the string buffer `output`.
///
/// # Safety
/// `output` must be null or point at a Cobhan buffer whose header holds its
/// writable capacity.
#[no_mangle]
pub unsafe extern "C" fn cobhan_error_name(code: i32, output: *mut c_char) -> i32 {
    let config = BufferConfig::current();
    // SAFETY: forwarded from the caller.
    let result = unsafe { raw::string_to_buffer(error_name(code), output, &config) };
    report("cobhan_error_name", result)
}

// ============================================================================
// Echo entry points
// ============================================================================

/// # Safety
/// `input` and `output` must each be null or point at a valid Cobhan buffer.
#[no_mangle]
pub unsafe extern "C" fn cobhan_echo_bytes(input: *const c_char, output: *mut c_char) -> i32 {
    let config = BufferConfig::current();
    // SAFETY: forwarded from the caller.
    let result = unsafe { raw::buffer_to_bytes(input, &config) }
        .and_then(|bytes| unsafe { raw::bytes_to_buffer(&bytes, output, &config) });
    report("cobhan_echo_bytes", result)
}

/// # Safety
/// `input` and `output` must each be null or point at a valid Cobhan buffer.
#[no_mangle]
pub unsafe extern "C" fn cobhan_echo_string(input: *const c_char, output: *mut c_char) -> i32 {
    let config = BufferConfig::current();
    // SAFETY: forwarded from the caller.
    let result = unsafe { raw::buffer_to_string(input, &config) }
        .and_then(|value| unsafe { raw::string_to_buffer(&value, output, &config) });
    report("cobhan_echo_string", result)
}

/// Decode a JSON object and re-encode it in canonical compact form.
///
/// # Safety
/// `input` and `output` must each be null or point at a valid Cobhan buffer.
#[no_mangle]
pub unsafe extern "C" fn cobhan_echo_json(input: *const c_char, output: *mut c_char) -> i32 {
    let config = BufferConfig::current();
    // SAFETY: forwarded from the caller.
    let result = unsafe { raw::buffer_to_json(input, &config) }
        .and_then(|object| unsafe { raw::json_to_buffer(&object, output, &config) });
    report("cobhan_echo_json", result)
}

/// # Safety
/// `input` and `output` must each be null or point at a header followed by
/// 4 bytes of payload.
#[no_mangle]
pub unsafe extern "C" fn cobhan_echo_int32(input: *const c_char, output: *mut c_char) -> i32 {
    // SAFETY: forwarded from the caller.
    let result = unsafe { raw::buffer_to_i32(input) }
        .and_then(|value| unsafe { raw::i32_to_buffer(value, output) });
    report("cobhan_echo_int32", result)
}

/// # Safety
/// `input` and `output` must each be null or point at a header followed by
/// 8 bytes of payload.
#[no_mangle]
pub unsafe extern "C" fn cobhan_echo_int64(input: *const c_char, output: *mut c_char) -> i32 {
    // SAFETY: forwarded from the caller.
    let result = unsafe { raw::buffer_to_i64(input) }
        .and_then(|value| unsafe { raw::i64_to_buffer(value, output) });
    report("cobhan_echo_int64", result)
}

fn report(operation: &str, result: cobhan::Result<()>) -> i32 {
    if let Err(err) = &result {
        debug!("{} failed with {}: {}", operation, err.name(), err);
    }
    CobhanError::to_code(result)
}
