//! Error types for Cobhan buffer operations.
//!
//! The two sides of an FFI boundary share no exception model, so every
//! failure is a member of a closed set with a stable negative integer code.
//! `CobhanError::code` is the value that crosses the boundary.

use thiserror::Error;

/// Code returned across the boundary when an operation succeeds.
pub const ERR_NONE: i32 = 0;

/// Errors produced while reading or writing a Cobhan buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum CobhanError {
    /// One of the provided pointers is null.
    #[error("null buffer pointer")]
    NullPointer,

    /// A declared length exceeds the configured ceiling or the backing allocation.
    #[error("buffer length exceeds the configured maximum")]
    BufferTooLarge,

    /// The destination cannot hold the payload, not even as a temp file path.
    #[error("buffer too small for payload")]
    BufferTooSmall,

    /// Fewer bytes were copied than expected.
    #[error("copy into buffer was incomplete")]
    CopyFailed,

    #[error("failed to decode JSON from buffer")]
    JsonDecodeFailed,

    #[error("failed to encode value as JSON")]
    JsonEncodeFailed,

    #[error("buffer contains invalid UTF-8")]
    InvalidUtf8,

    /// The overflow file named by a buffer could not be read.
    #[error("failed to read overflow temp file")]
    ReadTempFileFailed,

    /// The overflow file could not be created, written or persisted.
    #[error("failed to write overflow temp file")]
    WriteTempFileFailed,
}

/// Result type alias for Cobhan operations.
pub type Result<T> = std::result::Result<T, CobhanError>;

impl CobhanError {
    pub const ERR_NULL_PTR: i32 = -1;
    pub const ERR_BUFFER_TOO_LARGE: i32 = -2;
    pub const ERR_BUFFER_TOO_SMALL: i32 = -3;
    pub const ERR_COPY_FAILED: i32 = -4;
    pub const ERR_JSON_DECODE_FAILED: i32 = -5;
    pub const ERR_JSON_ENCODE_FAILED: i32 = -6;
    pub const ERR_INVALID_UTF8: i32 = -7;
    pub const ERR_READ_TEMP_FILE_FAILED: i32 = -8;
    pub const ERR_WRITE_TEMP_FILE_FAILED: i32 = -9;

    /// Every variant, in code order.
    pub const ALL: [CobhanError; 9] = [
        CobhanError::NullPointer,
        CobhanError::BufferTooLarge,
        CobhanError::BufferTooSmall,
        CobhanError::CopyFailed,
        CobhanError::JsonDecodeFailed,
        CobhanError::JsonEncodeFailed,
        CobhanError::InvalidUtf8,
        CobhanError::ReadTempFileFailed,
        CobhanError::WriteTempFileFailed,
    ];

    /// Convert to the integer code passed across the boundary.
    pub fn code(&self) -> i32 {
        match self {
            CobhanError::NullPointer => Self::ERR_NULL_PTR,
            CobhanError::BufferTooLarge => Self::ERR_BUFFER_TOO_LARGE,
            CobhanError::BufferTooSmall => Self::ERR_BUFFER_TOO_SMALL,
            CobhanError::CopyFailed => Self::ERR_COPY_FAILED,
            CobhanError::JsonDecodeFailed => Self::ERR_JSON_DECODE_FAILED,
            CobhanError::JsonEncodeFailed => Self::ERR_JSON_ENCODE_FAILED,
            CobhanError::InvalidUtf8 => Self::ERR_INVALID_UTF8,
            CobhanError::ReadTempFileFailed => Self::ERR_READ_TEMP_FILE_FAILED,
            CobhanError::WriteTempFileFailed => Self::ERR_WRITE_TEMP_FILE_FAILED,
        }
    }

    /// Map a code received from the other side back to an error.
    ///
    /// Returns `None` for `ERR_NONE` and for codes outside the taxonomy.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|err| err.code() == code)
    }

    /// Symbolic name of the code, as C headers spell it.
    pub fn name(&self) -> &'static str {
        match self {
            CobhanError::NullPointer => "ERR_NULL_PTR",
            CobhanError::BufferTooLarge => "ERR_BUFFER_TOO_LARGE",
            CobhanError::BufferTooSmall => "ERR_BUFFER_TOO_SMALL",
            CobhanError::CopyFailed => "ERR_COPY_FAILED",
            CobhanError::JsonDecodeFailed => "ERR_JSON_DECODE_FAILED",
            CobhanError::JsonEncodeFailed => "ERR_JSON_ENCODE_FAILED",
            CobhanError::InvalidUtf8 => "ERR_INVALID_UTF8",
            CobhanError::ReadTempFileFailed => "ERR_READ_TEMP_FILE_FAILED",
            CobhanError::WriteTempFileFailed => "ERR_WRITE_TEMP_FILE_FAILED",
        }
    }

    /// Collapse a unit result into a boundary code.
    pub fn to_code(result: Result<()>) -> i32 {
        match result {
            Ok(()) => ERR_NONE,
            Err(err) => err.code(),
        }
    }
}
