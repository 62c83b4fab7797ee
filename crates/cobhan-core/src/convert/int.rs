//! Fixed-width integers.
//!
//! Integers sit at the start of the data region in host byte order. The
//! header is not consulted or updated: callers allocate exactly 4 or 8 bytes
//! of payload by convention.

use crate::buffer::{BufferMut, BufferRef};
use crate::error::Result;

pub fn decode_i32(src: &BufferRef<'_>) -> Result<i32> {
    src.fixed().map(i32::from_ne_bytes)
}

pub fn decode_i64(src: &BufferRef<'_>) -> Result<i64> {
    src.fixed().map(i64::from_ne_bytes)
}

pub fn encode_i32(value: i32, dst: &mut BufferMut<'_>) -> Result<()> {
    dst.write_fixed(value.to_ne_bytes())
}

pub fn encode_i64(value: i64, dst: &mut BufferMut<'_>) -> Result<()> {
    dst.write_fixed(value.to_ne_bytes())
}

pub fn buffer_to_i32(buffer: &[u8]) -> Result<i32> {
    decode_i32(&BufferRef::new(buffer)?)
}

pub fn buffer_to_i64(buffer: &[u8]) -> Result<i64> {
    decode_i64(&BufferRef::new(buffer)?)
}

pub fn i32_to_buffer(value: i32, buffer: &mut [u8]) -> Result<()> {
    encode_i32(value, &mut BufferMut::new(buffer)?)
}

pub fn i64_to_buffer(value: i64, buffer: &mut [u8]) -> Result<()> {
    encode_i64(value, &mut BufferMut::new(buffer)?)
}
