//! Owned buffers for the side of the boundary that originates a value.

use std::os::raw::c_char;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::buffer::header::{self, DeclaredLength};
use crate::buffer::view::{BufferMut, BufferRef};
use crate::config::{BufferConfig, BufferLayout};
use crate::convert::{bytes, int, json, string, JsonObject};
use crate::error::{CobhanError, Result};

const HEADER_SIZE: usize = BufferLayout::HEADER_SIZE;

/// A heap-allocated buffer: header followed by a data region.
///
/// Hand `as_ptr()`/`as_mut_ptr()` across the boundary; the allocation must
/// outlive any use the other side makes of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    bytes: Vec<u8>,
}

impl Buffer {
    /// Allocate a zeroed buffer whose header announces `capacity`.
    pub fn allocate(capacity: usize) -> Result<Self> {
        let declared = DeclaredLength::Inline(capacity)
            .to_raw()
            .ok_or(CobhanError::BufferTooLarge)?;
        let mut bytes = vec![0u8; HEADER_SIZE + capacity];
        header::write_length(&mut bytes, declared);
        Ok(Self { bytes })
    }

    /// Allocate exactly enough room for `payload` and store it.
    pub fn from_bytes(payload: &[u8]) -> Result<Self> {
        let mut buffer = Self::allocate(payload.len())?;
        buffer.write_bytes(payload, &BufferConfig::default())?;
        Ok(buffer)
    }

    pub fn from_string(value: &str) -> Result<Self> {
        Self::from_bytes(value.as_bytes())
    }

    /// Serialize `value` and store its JSON text.
    pub fn from_json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Self::from_bytes(&json::to_json_bytes(value)?)
    }

    pub fn from_i32(value: i32) -> Result<Self> {
        let mut buffer = Self::allocate(std::mem::size_of::<i32>())?;
        buffer.write_i32(value)?;
        Ok(buffer)
    }

    pub fn from_i64(value: i64) -> Result<Self> {
        let mut buffer = Self::allocate(std::mem::size_of::<i64>())?;
        buffer.write_i64(value)?;
        Ok(buffer)
    }

    /// Adopt bytes that already hold a header, e.g. a buffer dump.
    pub fn from_vec(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(CobhanError::BufferTooSmall);
        }
        Ok(Self { bytes })
    }

    pub fn declared_length(&self) -> DeclaredLength {
        DeclaredLength::from_raw(header::read_length(&self.bytes))
    }

    /// Size of the data region actually allocated.
    pub fn capacity(&self) -> usize {
        self.bytes.len() - HEADER_SIZE
    }

    /// Reset the header to the full allocated capacity so the buffer can be
    /// written again.
    pub fn reset(&mut self) -> Result<()> {
        let declared = DeclaredLength::Inline(self.capacity())
            .to_raw()
            .ok_or(CobhanError::BufferTooLarge)?;
        header::write_length(&mut self.bytes, declared);
        Ok(())
    }

    pub fn as_ptr(&self) -> *const c_char {
        self.bytes.as_ptr().cast()
    }

    pub fn as_mut_ptr(&mut self) -> *mut c_char {
        self.bytes.as_mut_ptr().cast()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.bytes
    }

    fn view(&self) -> BufferRef<'_> {
        BufferRef { bytes: &self.bytes[..] }
    }

    fn view_mut(&mut self) -> BufferMut<'_> {
        BufferMut { bytes: &mut self.bytes[..] }
    }

    pub fn read_bytes(&self, config: &BufferConfig) -> Result<Vec<u8>> {
        bytes::decode(&self.view(), config)
    }

    pub fn read_string(&self, config: &BufferConfig) -> Result<String> {
        string::decode(&self.view(), config)
    }

    pub fn read_json(&self, config: &BufferConfig) -> Result<JsonObject> {
        json::decode(&self.view(), config)
    }

    pub fn read_json_struct<T: DeserializeOwned>(&self, config: &BufferConfig) -> Result<T> {
        json::decode_struct(&self.view(), config)
    }

    pub fn read_i32(&self) -> Result<i32> {
        int::decode_i32(&self.view())
    }

    pub fn read_i64(&self) -> Result<i64> {
        int::decode_i64(&self.view())
    }

    pub fn write_bytes(&mut self, payload: &[u8], config: &BufferConfig) -> Result<()> {
        bytes::encode(payload, &mut self.view_mut(), config)
    }

    pub fn write_str(&mut self, value: &str, config: &BufferConfig) -> Result<()> {
        string::encode(value, &mut self.view_mut(), config)
    }

    pub fn write_json<T: Serialize + ?Sized>(&mut self, value: &T, config: &BufferConfig) -> Result<()> {
        json::encode(value, &mut self.view_mut(), config)
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        int::encode_i32(value, &mut self.view_mut())
    }

    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        int::encode_i64(value, &mut self.view_mut())
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_allocate_sets_capacity() {
        let buffer = Buffer::allocate(32).unwrap();
        assert_eq!(buffer.declared_length(), DeclaredLength::Inline(32));
        assert_eq!(buffer.capacity(), 32);
        assert_eq!(buffer.as_bytes().len(), HEADER_SIZE + 32);
    }

    #[test]
    fn test_allocate_zero() {
        let buffer = Buffer::allocate(0).unwrap();
        assert_eq!(buffer.as_bytes().len(), HEADER_SIZE);
        assert!(buffer.read_bytes(&BufferConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn test_from_string_round_trip() {
        let buffer = Buffer::from_string("InputString").unwrap();
        assert_eq!(buffer.declared_length(), DeclaredLength::Inline(11));
        assert_eq!(
            buffer.read_string(&BufferConfig::default()).unwrap(),
            "InputString"
        );
    }

    #[test]
    fn test_from_bytes_round_trip() {
        let buffer = Buffer::from_bytes(&[1, 2, 3, 4]).unwrap();
        assert_eq!(
            buffer.read_bytes(&BufferConfig::default()).unwrap(),
            vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn test_from_json_round_trip() {
        let buffer = Buffer::from_json(&json!({ "name1": "value1", "name2": "value2" })).unwrap();
        let map = buffer.read_json(&BufferConfig::default()).unwrap();
        assert_eq!(map["name1"], "value1");
        assert_eq!(map["name2"], "value2");
    }

    #[test]
    fn test_integer_buffers() {
        let buffer = Buffer::from_i32(1234).unwrap();
        assert_eq!(buffer.declared_length(), DeclaredLength::Inline(4));
        assert_eq!(buffer.read_i32().unwrap(), 1234);

        let buffer = Buffer::from_i64(i64::MIN).unwrap();
        assert_eq!(buffer.declared_length(), DeclaredLength::Inline(8));
        assert_eq!(buffer.read_i64().unwrap(), i64::MIN);
    }

    #[test]
    fn test_reset_restores_capacity() {
        let config = BufferConfig::default();
        let mut buffer = Buffer::allocate(16).unwrap();
        buffer.write_str("abc", &config).unwrap();
        assert_eq!(buffer.declared_length(), DeclaredLength::Inline(3));

        assert_eq!(
            buffer.write_str("abcdef", &config.clone().with_temp_files(false)),
            Err(CobhanError::BufferTooSmall)
        );
        buffer.reset().unwrap();
        buffer.write_str("abcdef", &config).unwrap();
        assert_eq!(buffer.read_string(&config).unwrap(), "abcdef");
    }

    #[test]
    fn test_from_vec_requires_header() {
        assert_eq!(
            Buffer::from_vec(vec![0u8; 4]).unwrap_err(),
            CobhanError::BufferTooSmall
        );
        assert!(Buffer::from_vec(vec![0u8; HEADER_SIZE]).is_ok());
    }
}
