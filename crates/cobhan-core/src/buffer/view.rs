//! Bounds-checked views over a buffer's bytes.
//!
//! A view wraps the whole buffer (header and data region) as a slice, so
//! every access below is range checked. Raw-pointer callers build the slice
//! from the declared length first; see [`crate::raw`].

use crate::buffer::header::{self, DeclaredLength};
use crate::config::{BufferConfig, BufferLayout};
use crate::error::{CobhanError, Result};

const HEADER_SIZE: usize = BufferLayout::HEADER_SIZE;

/// Data-region contents, tagged by the header's sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    Inline(&'a [u8]),
    /// Bytes of the temp file path holding the real payload.
    Spilled(&'a [u8]),
}

/// Read-only view of a buffer.
#[derive(Debug, Clone, Copy)]
pub struct BufferRef<'a> {
    pub(super) bytes: &'a [u8],
}

impl<'a> BufferRef<'a> {
    /// Wrap a buffer. Fails with `BufferTooSmall` if there is no room for a header.
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(CobhanError::BufferTooSmall);
        }
        Ok(Self { bytes })
    }

    pub fn declared(&self) -> DeclaredLength {
        DeclaredLength::from_raw(header::read_length(self.bytes))
    }

    fn region(&self) -> &'a [u8] {
        &self.bytes[HEADER_SIZE..]
    }

    /// Declared payload, checked against the ceiling and the view's extent.
    pub fn payload(&self, config: &BufferConfig) -> Result<Payload<'a>> {
        let declared = self.declared().check(config)?;
        let data = self
            .region()
            .get(..declared.len())
            .ok_or(CobhanError::BufferTooLarge)?;
        Ok(match declared {
            DeclaredLength::Inline(_) => Payload::Inline(data),
            DeclaredLength::Spilled(_) => Payload::Spilled(data),
        })
    }

    /// First `N` bytes of the data region, ignoring the declared length.
    pub fn fixed<const N: usize>(&self) -> Result<[u8; N]> {
        let data = self
            .region()
            .get(..N)
            .ok_or(CobhanError::BufferTooSmall)?;
        let mut out = [0u8; N];
        out.copy_from_slice(data);
        Ok(out)
    }
}

/// Writable view of a buffer.
#[derive(Debug)]
pub struct BufferMut<'a> {
    pub(super) bytes: &'a mut [u8],
}

impl<'a> BufferMut<'a> {
    pub fn new(bytes: &'a mut [u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(CobhanError::BufferTooSmall);
        }
        Ok(Self { bytes })
    }

    pub fn declared(&self) -> DeclaredLength {
        DeclaredLength::from_raw(header::read_length(self.bytes))
    }

    /// Capacity announced by the header before a write.
    ///
    /// A spilled (negative) header has no capacity left.
    pub fn capacity(&self, config: &BufferConfig) -> Result<usize> {
        let capacity = match self.declared() {
            DeclaredLength::Inline(len) => len,
            DeclaredLength::Spilled(_) => 0,
        };
        if !config.permits(capacity) || capacity > self.bytes.len() - HEADER_SIZE {
            return Err(CobhanError::BufferTooLarge);
        }
        Ok(capacity)
    }

    /// Copy `payload` to the start of the data region without touching the header.
    pub fn copy_into_region(&mut self, payload: &[u8]) -> Result<()> {
        let region = &mut self.bytes[HEADER_SIZE..];
        let copied = payload.len().min(region.len());
        region[..copied].copy_from_slice(&payload[..copied]);
        if copied != payload.len() {
            return Err(CobhanError::CopyFailed);
        }
        Ok(())
    }

    /// Record the final length in the header.
    pub fn commit(&mut self, declared: DeclaredLength) -> Result<()> {
        let raw = declared.to_raw().ok_or(CobhanError::BufferTooLarge)?;
        header::write_length(self.bytes, raw);
        Ok(())
    }

    /// Overwrite the first `N` bytes of the data region.
    pub fn write_fixed<const N: usize>(&mut self, value: [u8; N]) -> Result<()> {
        let data = self
            .bytes
            .get_mut(HEADER_SIZE..HEADER_SIZE + N)
            .ok_or(CobhanError::BufferTooSmall)?;
        data.copy_from_slice(&value);
        Ok(())
    }

    /// Read-only view of the same bytes.
    pub fn as_view(&self) -> BufferRef<'_> {
        BufferRef { bytes: &*self.bytes }
    }
}
