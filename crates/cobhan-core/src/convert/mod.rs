//! Typed converters between native values and buffers.
//!
//! Each submodule exposes `decode`/`encode` over buffer views, used by the
//! raw-pointer entry points in [`crate::raw`] and by [`crate::Buffer`], plus
//! slice-backed functions re-exported at the crate root.

pub mod bytes;
pub mod int;
pub mod json;
pub mod string;

pub use bytes::{buffer_to_bytes, bytes_to_buffer};
pub use int::{buffer_to_i32, buffer_to_i64, i32_to_buffer, i64_to_buffer};
pub use json::{buffer_to_json, buffer_to_json_struct, json_to_buffer, JsonObject};
pub use string::{buffer_to_string, string_to_buffer};
