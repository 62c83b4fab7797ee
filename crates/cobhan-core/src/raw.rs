//! Raw-pointer entry points for buffers received across FFI.
//!
//! The data region's extent is trusted from the header, after the header has
//! passed the bounds policy. Null pointers are reported as
//! [`CobhanError::NullPointer`] and never dereferenced.
//!
//! # Safety
//!
//! For every function here, a non-null buffer pointer must point at a header
//! followed by at least `|declared length|` accessible bytes (4 or 8 bytes
//! for the integer functions), valid for the duration of the call and not
//! accessed concurrently by the other side.

// This module turns foreign pointers into bounds-checked views.
#![allow(unsafe_code)]

use std::os::raw::c_char;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::buffer::header;
use crate::buffer::{BufferMut, BufferRef, DeclaredLength};
use crate::config::BufferConfig;
use crate::convert::{bytes, int, json, string, JsonObject};
use crate::error::{CobhanError, Result};

/// Build a view covering the header and the declared payload.
unsafe fn source<'a>(ptr: *const c_char, config: &BufferConfig) -> Result<BufferRef<'a>> {
    if ptr.is_null() {
        return Err(CobhanError::NullPointer);
    }
    // SAFETY: non-null; the caller guarantees a readable header.
    let declared = DeclaredLength::from_raw(unsafe { header::length_of(ptr) }).check(config)?;
    // SAFETY: the caller guarantees the declared extent is readable.
    BufferRef::new(unsafe { header::buffer_slice(ptr, declared.len()) })
}

/// Build a writable view covering the header and the declared capacity.
unsafe fn destination<'a>(ptr: *mut c_char, config: &BufferConfig) -> Result<BufferMut<'a>> {
    if ptr.is_null() {
        return Err(CobhanError::NullPointer);
    }
    // SAFETY: non-null; the caller guarantees a readable header.
    let capacity = match DeclaredLength::from_raw(unsafe { header::length_of(ptr) }) {
        DeclaredLength::Inline(len) => DeclaredLength::Inline(len).check(config)?.len(),
        DeclaredLength::Spilled(_) => 0,
    };
    // SAFETY: the caller guarantees the declared capacity is writable.
    BufferMut::new(unsafe { header::buffer_slice_mut(ptr, capacity) })
}

/// View over the header and `N` bytes of fixed-width payload.
unsafe fn fixed_source<'a, const N: usize>(ptr: *const c_char) -> Result<BufferRef<'a>> {
    if ptr.is_null() {
        return Err(CobhanError::NullPointer);
    }
    // SAFETY: the caller guarantees N bytes after the header.
    BufferRef::new(unsafe { header::buffer_slice(ptr, N) })
}

unsafe fn fixed_destination<'a, const N: usize>(ptr: *mut c_char) -> Result<BufferMut<'a>> {
    if ptr.is_null() {
        return Err(CobhanError::NullPointer);
    }
    // SAFETY: the caller guarantees N writable bytes after the header.
    BufferMut::new(unsafe { header::buffer_slice_mut(ptr, N) })
}

/// Copy the bytes held by the buffer at `src`.
///
/// # Safety
/// See the [module documentation](self).
pub unsafe fn buffer_to_bytes(src: *const c_char, config: &BufferConfig) -> Result<Vec<u8>> {
    // SAFETY: forwarded from the caller.
    bytes::decode(&unsafe { source(src, config) }?, config)
}

/// Store `value` in the buffer at `dst`, whose header holds its capacity.
///
/// # Safety
/// See the [module documentation](self).
pub unsafe fn bytes_to_buffer(value: &[u8], dst: *mut c_char, config: &BufferConfig) -> Result<()> {
    // SAFETY: forwarded from the caller.
    bytes::encode(value, &mut unsafe { destination(dst, config) }?, config)
}

/// # Safety
/// See the [module documentation](self).
pub unsafe fn buffer_to_string(src: *const c_char, config: &BufferConfig) -> Result<String> {
    // SAFETY: forwarded from the caller.
    string::decode(&unsafe { source(src, config) }?, config)
}

/// # Safety
/// See the [module documentation](self).
pub unsafe fn string_to_buffer(value: &str, dst: *mut c_char, config: &BufferConfig) -> Result<()> {
    // SAFETY: forwarded from the caller.
    string::encode(value, &mut unsafe { destination(dst, config) }?, config)
}

/// Decode a JSON object from the buffer at `src`.
///
/// # Safety
/// See the [module documentation](self).
pub unsafe fn buffer_to_json(src: *const c_char, config: &BufferConfig) -> Result<JsonObject> {
    // SAFETY: forwarded from the caller.
    json::decode(&unsafe { source(src, config) }?, config)
}

/// Decode the buffer at `src` into `T`.
///
/// # Safety
/// See the [module documentation](self).
pub unsafe fn buffer_to_json_struct<T: DeserializeOwned>(
    src: *const c_char,
    config: &BufferConfig,
) -> Result<T> {
    // SAFETY: forwarded from the caller.
    json::decode_struct(&unsafe { source(src, config) }?, config)
}

/// # Safety
/// See the [module documentation](self).
pub unsafe fn json_to_buffer<T: Serialize + ?Sized>(
    value: &T,
    dst: *mut c_char,
    config: &BufferConfig,
) -> Result<()> {
    // SAFETY: forwarded from the caller.
    json::encode(value, &mut unsafe { destination(dst, config) }?, config)
}

/// # Safety
/// See the [module documentation](self).
pub unsafe fn buffer_to_i32(src: *const c_char) -> Result<i32> {
    // SAFETY: forwarded from the caller.
    int::decode_i32(&unsafe { fixed_source::<4>(src) }?)
}

/// # Safety
/// See the [module documentation](self).
pub unsafe fn i32_to_buffer(value: i32, dst: *mut c_char) -> Result<()> {
    // SAFETY: forwarded from the caller.
    int::encode_i32(value, &mut unsafe { fixed_destination::<4>(dst) }?)
}

/// # Safety
/// See the [module documentation](self).
pub unsafe fn buffer_to_i64(src: *const c_char) -> Result<i64> {
    // SAFETY: forwarded from the caller.
    int::decode_i64(&unsafe { fixed_source::<8>(src) }?)
}

/// # Safety
/// See the [module documentation](self).
pub unsafe fn i64_to_buffer(value: i64, dst: *mut c_char) -> Result<()> {
    // SAFETY: forwarded from the caller.
    int::encode_i64(value, &mut unsafe { fixed_destination::<8>(dst) }?)
}
