//! Header codec.
//!
//! ```text
//! [i32 host-endian: declared length][4 reserved bytes][data region ...]
//! ```
//!
//! This module owns all pointer arithmetic on buffers. It performs no
//! validation; callers check the declared length against a [`BufferConfig`]
//! before sizing anything from it.

// Raw pointer access is the purpose of this module.
#![allow(unsafe_code)]

use std::os::raw::c_char;

use crate::config::{BufferConfig, BufferLayout};
use crate::error::{CobhanError, Result};

const HEADER_SIZE: usize = BufferLayout::HEADER_SIZE;
const LENGTH_SIZE: usize = BufferLayout::LENGTH_SIZE;

/// Decoded meaning of the header's signed length field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclaredLength {
    /// The data region holds this many payload bytes (or, before a write, has
    /// this much capacity).
    Inline(usize),
    /// The data region holds a temp file path of this many bytes.
    Spilled(usize),
}

impl DeclaredLength {
    pub fn from_raw(raw: i32) -> Self {
        if raw >= 0 {
            DeclaredLength::Inline(raw.unsigned_abs() as usize)
        } else {
            DeclaredLength::Spilled(raw.unsigned_abs() as usize)
        }
    }

    /// Header encoding, or `None` when the length has no i32 representation.
    pub fn to_raw(self) -> Option<i32> {
        match self {
            DeclaredLength::Inline(len) => i32::try_from(len).ok(),
            DeclaredLength::Spilled(len) => i32::try_from(len).ok().map(|len| -len),
        }
    }

    /// Number of data-region bytes this length covers.
    pub fn len(self) -> usize {
        match self {
            DeclaredLength::Inline(len) | DeclaredLength::Spilled(len) => len,
        }
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    pub fn is_spilled(self) -> bool {
        matches!(self, DeclaredLength::Spilled(_))
    }

    /// Apply the bounds policy.
    pub fn check(self, config: &BufferConfig) -> Result<Self> {
        if config.permits(self.len()) {
            Ok(self)
        } else {
            Err(CobhanError::BufferTooLarge)
        }
    }
}

/// Read the declared length from a header slice.
///
/// # Panics
/// If `buffer` is shorter than the length field.
pub fn read_length(buffer: &[u8]) -> i32 {
    let mut raw = [0u8; LENGTH_SIZE];
    raw.copy_from_slice(&buffer[..LENGTH_SIZE]);
    i32::from_ne_bytes(raw)
}

/// Write the declared length into a header slice.
///
/// # Panics
/// If `buffer` is shorter than the length field.
pub fn write_length(buffer: &mut [u8], length: i32) {
    buffer[..LENGTH_SIZE].copy_from_slice(&length.to_ne_bytes());
}

/// Read the declared length at `ptr`.
///
/// # Safety
/// `ptr` must be non-null and point at least `LENGTH_SIZE` readable bytes.
pub unsafe fn length_of(ptr: *const c_char) -> i32 {
    // SAFETY: the caller guarantees four readable bytes; no alignment is assumed.
    let raw = unsafe { ptr.cast::<[u8; LENGTH_SIZE]>().read_unaligned() };
    i32::from_ne_bytes(raw)
}

/// Address of the data region for the buffer at `ptr`.
pub fn data_ptr_of(ptr: *const c_char) -> *const c_char {
    ptr.wrapping_add(HEADER_SIZE)
}

/// Write the declared length at `ptr`.
///
/// # Safety
/// `ptr` must be non-null and point at least `LENGTH_SIZE` writable bytes.
pub unsafe fn set_length(ptr: *mut c_char, length: i32) {
    // SAFETY: the caller guarantees four writable bytes; no alignment is assumed.
    unsafe { ptr.cast::<[u8; LENGTH_SIZE]>().write_unaligned(length.to_ne_bytes()) }
}

/// Borrow the header plus `region_len` data bytes at `ptr` as a slice.
///
/// # Safety
/// `ptr` must be non-null and point at `HEADER_SIZE + region_len` readable
/// bytes that are not mutated for the lifetime `'a`.
pub unsafe fn buffer_slice<'a>(ptr: *const c_char, region_len: usize) -> &'a [u8] {
    // SAFETY: extent and aliasing are guaranteed by the caller.
    unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), HEADER_SIZE + region_len) }
}

/// Mutable counterpart of [`buffer_slice`].
///
/// # Safety
/// `ptr` must be non-null and point at `HEADER_SIZE + region_len` writable
/// bytes with no other live reference for the lifetime `'a`.
pub unsafe fn buffer_slice_mut<'a>(ptr: *mut c_char, region_len: usize) -> &'a mut [u8] {
    // SAFETY: extent and exclusivity are guaranteed by the caller.
    unsafe { std::slice::from_raw_parts_mut(ptr.cast::<u8>(), HEADER_SIZE + region_len) }
}
