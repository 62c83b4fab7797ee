//! Byte sequences. Every other payload kind is layered on these two functions.

use crate::buffer::{BufferMut, BufferRef, DeclaredLength, Payload};
use crate::config::BufferConfig;
use crate::error::Result;
use crate::overflow;

/// Copy the payload out of `src`, recalling an overflow file if needed.
pub fn decode(src: &BufferRef<'_>, config: &BufferConfig) -> Result<Vec<u8>> {
    match src.payload(config)? {
        Payload::Inline(data) => Ok(data.to_vec()),
        Payload::Spilled(path) => overflow::recall(path, config),
    }
}

/// Store `bytes` in `dst`, spilling to a temp file when they exceed its capacity.
pub fn encode(bytes: &[u8], dst: &mut BufferMut<'_>, config: &BufferConfig) -> Result<()> {
    let capacity = dst.capacity(config)?;
    if bytes.len() > capacity {
        return overflow::spill(bytes, dst, capacity, config);
    }
    dst.copy_into_region(bytes)?;
    dst.commit(DeclaredLength::Inline(bytes.len()))
}

/// Read the bytes held by a slice-backed buffer.
pub fn buffer_to_bytes(buffer: &[u8], config: &BufferConfig) -> Result<Vec<u8>> {
    decode(&BufferRef::new(buffer)?, config)
}

/// Write `bytes` into a slice-backed buffer whose header holds its capacity.
pub fn bytes_to_buffer(bytes: &[u8], buffer: &mut [u8], config: &BufferConfig) -> Result<()> {
    encode(bytes, &mut BufferMut::new(buffer)?, config)
}
