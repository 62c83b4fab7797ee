//! JSON documents, stored as their UTF-8 text.
//!
//! Untyped decoding produces a JSON object map and rejects any other
//! top-level value. Typed decoding hands the text to the target's
//! `Deserialize` impl and accepts whatever shape it accepts.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::buffer::{BufferMut, BufferRef};
use crate::config::BufferConfig;
use crate::convert::bytes;
use crate::error::{CobhanError, Result};

/// A decoded top-level JSON object.
pub type JsonObject = Map<String, Value>;

pub fn decode(src: &BufferRef<'_>, config: &BufferConfig) -> Result<JsonObject> {
    match decode_struct::<Value>(src, config)? {
        Value::Object(map) => Ok(map),
        _ => Err(CobhanError::JsonDecodeFailed),
    }
}

pub fn decode_struct<T: DeserializeOwned>(src: &BufferRef<'_>, config: &BufferConfig) -> Result<T> {
    let data = bytes::decode(src, config)?;
    serde_json::from_slice(&data).map_err(|_| CobhanError::JsonDecodeFailed)
}

pub fn encode<T: Serialize + ?Sized>(
    value: &T,
    dst: &mut BufferMut<'_>,
    config: &BufferConfig,
) -> Result<()> {
    let text = to_json_bytes(value)?;
    bytes::encode(&text, dst, config)
}

pub(crate) fn to_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|_| CobhanError::JsonEncodeFailed)
}

/// Decode a slice-backed buffer holding a JSON object.
pub fn buffer_to_json(buffer: &[u8], config: &BufferConfig) -> Result<JsonObject> {
    decode(&BufferRef::new(buffer)?, config)
}

/// Decode a slice-backed buffer into `T`.
pub fn buffer_to_json_struct<T: DeserializeOwned>(buffer: &[u8], config: &BufferConfig) -> Result<T> {
    decode_struct(&BufferRef::new(buffer)?, config)
}

/// Serialize `value` into a slice-backed buffer.
pub fn json_to_buffer<T: Serialize + ?Sized>(
    value: &T,
    buffer: &mut [u8],
    config: &BufferConfig,
) -> Result<()> {
    encode(value, &mut BufferMut::new(buffer)?, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::header;
    use crate::config::BufferLayout;
    use crate::convert::string::string_to_buffer;
    use serde::{Deserialize, Serializer};

    const TEST_JSON: &str = r#"{ "name1": "value1", "name2": "value2" }"#;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Names {
        name1: String,
        name2: String,
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("functions cannot be serialized"))
        }
    }

    fn buffer(capacity: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; BufferLayout::HEADER_SIZE + capacity];
        header::write_length(&mut bytes, capacity as i32);
        bytes
    }

    #[test]
    fn test_json_object_round_trip() {
        let config = BufferConfig::default();
        let mut buf = buffer(4097);
        string_to_buffer(TEST_JSON, &mut buf, &config).unwrap();
        let json = buffer_to_json(&buf, &config).unwrap();

        let mut buf2 = buffer(4097);
        json_to_buffer(&json, &mut buf2, &config).unwrap();
        let json2 = buffer_to_json(&buf2, &config).unwrap();

        assert_eq!(json2["name1"], "value1");
        assert_eq!(json2["name2"], "value2");
        assert_eq!(json, json2);
    }

    #[test]
    fn test_typed_round_trip() {
        let config = BufferConfig::default();
        let mut buf = buffer(256);
        string_to_buffer(TEST_JSON, &mut buf, &config).unwrap();

        let names: Names = buffer_to_json_struct(&buf, &config).unwrap();
        assert_eq!(names.name1, "value1");
        assert_eq!(names.name2, "value2");

        let mut out = buffer(256);
        json_to_buffer(&names, &mut out, &config).unwrap();
        let map = buffer_to_json(&out, &config).unwrap();
        assert_eq!(map["name1"], "value1");
        assert_eq!(map["name2"], "value2");
    }

    #[test]
    fn test_malformed_json() {
        let config = BufferConfig::default();
        let mut buf = buffer(256);
        string_to_buffer(&"}".repeat(10), &mut buf, &config).unwrap();
        assert_eq!(
            buffer_to_json(&buf, &config),
            Err(CobhanError::JsonDecodeFailed)
        );
    }

    #[test]
    fn test_unserializable_value() {
        let config = BufferConfig::default();
        let mut buf = buffer(256);
        assert_eq!(
            json_to_buffer(&Unserializable, &mut buf, &config),
            Err(CobhanError::JsonEncodeFailed)
        );
        assert_eq!(header::read_length(&buf), 256);
    }

    #[test]
    fn test_top_level_array_only_for_typed_decode() {
        let config = BufferConfig::default();
        let mut buf = buffer(64);
        string_to_buffer("[1, 2, 3]", &mut buf, &config).unwrap();

        assert_eq!(
            buffer_to_json(&buf, &config),
            Err(CobhanError::JsonDecodeFailed)
        );
        let values: Vec<i32> = buffer_to_json_struct(&buf, &config).unwrap();
        assert_eq!(values, vec![1, 2, 3]);
    }
}
