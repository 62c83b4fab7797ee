//! UTF-8 strings, stored as their bytes.

use crate::buffer::{BufferMut, BufferRef};
use crate::config::BufferConfig;
use crate::convert::bytes;
use crate::error::{CobhanError, Result};

pub fn decode(src: &BufferRef<'_>, config: &BufferConfig) -> Result<String> {
    let data = bytes::decode(src, config)?;
    String::from_utf8(data).map_err(|_| CobhanError::InvalidUtf8)
}

pub fn encode(value: &str, dst: &mut BufferMut<'_>, config: &BufferConfig) -> Result<()> {
    bytes::encode(value.as_bytes(), dst, config)
}

/// Read a UTF-8 string from a slice-backed buffer.
pub fn buffer_to_string(buffer: &[u8], config: &BufferConfig) -> Result<String> {
    decode(&BufferRef::new(buffer)?, config)
}

/// Write `value` into a slice-backed buffer.
pub fn string_to_buffer(value: &str, buffer: &mut [u8], config: &BufferConfig) -> Result<()> {
    encode(value, &mut BufferMut::new(buffer)?, config)
}
