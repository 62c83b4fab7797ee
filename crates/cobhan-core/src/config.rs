//! Buffer layout constants and runtime configuration.
//!
//! Every operation takes an explicit [`BufferConfig`]. Embedders that cannot
//! thread a value through their call sites (a C host calling exported
//! functions, for instance) set the process-wide defaults once at start-up
//! and use [`BufferConfig::current`].

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

/// Fixed wire layout.
pub struct BufferLayout;

impl BufferLayout {
    /// Reserved header bytes. Only the first four are used; the rest keep the
    /// data region 8-byte aligned relative to the header start.
    pub const HEADER_SIZE: usize = 8;
    /// Bytes of the header holding the declared length.
    pub const LENGTH_SIZE: usize = 4;
    /// Name prefix of overflow temp files.
    pub const TEMP_FILE_PREFIX: &'static str = "cobhan-";
    /// Default ceiling on the absolute declared length.
    pub const DEFAULT_MAX_LENGTH: i32 = i32::MAX;
}

static DEFAULT_BUFFER_MAXIMUM: AtomicI32 = AtomicI32::new(BufferLayout::DEFAULT_MAX_LENGTH);
static ALLOW_TEMP_FILE_BUFFERS: AtomicBool = AtomicBool::new(true);

/// Set the process-wide ceiling on declared buffer lengths.
///
/// Last write wins. A negative maximum rejects every buffer.
pub fn set_default_buffer_maximum(max: i32) {
    DEFAULT_BUFFER_MAXIMUM.store(max, Ordering::SeqCst);
}

/// Current process-wide ceiling.
pub fn default_buffer_maximum() -> i32 {
    DEFAULT_BUFFER_MAXIMUM.load(Ordering::SeqCst)
}

/// Enable or disable the temp-file overflow channel process-wide.
pub fn allow_temp_file_buffers(allow: bool) {
    ALLOW_TEMP_FILE_BUFFERS.store(allow, Ordering::SeqCst);
}

/// Whether the overflow channel is enabled process-wide.
pub fn temp_file_buffers_allowed() -> bool {
    ALLOW_TEMP_FILE_BUFFERS.load(Ordering::SeqCst)
}

/// Per-call limits for buffer operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferConfig {
    /// Ceiling on the absolute declared length of any buffer.
    pub max_length: i32,
    /// Whether oversized results may spill to a temp file.
    pub allow_temp_files: bool,
    /// Directory for overflow files; `None` means the system temp dir.
    pub temp_dir: Option<PathBuf>,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            max_length: BufferLayout::DEFAULT_MAX_LENGTH,
            allow_temp_files: true,
            temp_dir: None,
        }
    }
}

impl BufferConfig {
    /// Snapshot of the process-wide defaults.
    pub fn current() -> Self {
        Self {
            max_length: default_buffer_maximum(),
            allow_temp_files: temp_file_buffers_allowed(),
            temp_dir: None,
        }
    }

    pub fn with_max_length(mut self, max_length: i32) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_temp_files(mut self, allow: bool) -> Self {
        self.allow_temp_files = allow;
        self
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Directory overflow files are created in.
    pub fn temp_dir(&self) -> PathBuf {
        match &self.temp_dir {
            Some(dir) => dir.clone(),
            None => std::env::temp_dir(),
        }
    }

    /// Whether `len` bytes are within the ceiling.
    pub fn permits(&self, len: usize) -> bool {
        usize::try_from(self.max_length).is_ok_and(|max| len <= max)
    }
}
