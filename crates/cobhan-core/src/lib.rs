//! Cobhan - buffer marshaling across a foreign-function-interface boundary.
//!
//! A Cobhan buffer is a single allocation addressed by one pointer:
//!
//! ```text
//! bytes 0..4   declared length (i32, host byte order)
//! bytes 4..8   reserved
//! bytes 8..    data region
//! ```
//!
//! A non-negative declared length is the payload size (or, before a write,
//! the capacity). A negative length means the data region holds the path of a
//! temp file containing the real payload, used when a result is larger than
//! the capacity the caller provided.
//!
//! The crate offers two flavours of every converter:
//! - slice-backed functions at the crate root and methods on [`Buffer`],
//!   bounded by the slice as well as the header;
//! - `unsafe` raw-pointer functions in [`raw`] for buffers received over FFI.
//!
//! # Example
//!
//! ```
//! use cobhan::{Buffer, BufferConfig};
//!
//! let config = BufferConfig::default();
//! let mut buffer = Buffer::allocate(64)?;
//! buffer.write_str("hello", &config)?;
//! assert_eq!(buffer.read_string(&config)?, "hello");
//! # Ok::<(), cobhan::CobhanError>(())
//! ```

pub mod buffer;
pub mod config;
pub mod convert;
pub mod error;
pub mod raw;

mod overflow;

pub use buffer::{Buffer, BufferMut, BufferRef, DeclaredLength, Payload};
pub use config::{
    allow_temp_file_buffers, default_buffer_maximum, set_default_buffer_maximum,
    temp_file_buffers_allowed, BufferConfig, BufferLayout,
};
pub use convert::{
    buffer_to_bytes, buffer_to_i32, buffer_to_i64, buffer_to_json, buffer_to_json_struct,
    buffer_to_string, bytes_to_buffer, i32_to_buffer, i64_to_buffer, json_to_buffer,
    string_to_buffer, JsonObject,
};
pub use error::{CobhanError, Result, ERR_NONE};
