//! Buffer layout: header codec, bounds-checked views and owned allocations.

pub mod header;
mod owned;
mod view;

pub use header::DeclaredLength;
pub use owned::Buffer;
pub use view::{BufferMut, BufferRef, Payload};
