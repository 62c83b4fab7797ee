//! Temp-file overflow channel.
//!
//! When a result does not fit the capacity a caller supplied, the payload is
//! written to a temp file and the file's path is stored in the buffer with a
//! negated length. The next reader loads the file and deletes it.
//!
//! The writer never cleans up a persisted file; if nobody reads the buffer the
//! file stays behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::buffer::{BufferMut, DeclaredLength};
use crate::config::{BufferConfig, BufferLayout};
use crate::error::{CobhanError, Result};

/// Write `payload` to a temp file and store its path in `dst`.
///
/// `capacity` is the destination capacity the caller already read from the
/// header; the path must fit in it.
pub(crate) fn spill(
    payload: &[u8],
    dst: &mut BufferMut<'_>,
    capacity: usize,
    config: &BufferConfig,
) -> Result<()> {
    if !config.allow_temp_files {
        debug!(
            "Payload of {} bytes exceeds capacity {} and temp files are disabled",
            payload.len(),
            capacity
        );
        return Err(CobhanError::BufferTooSmall);
    }

    let dir = config.temp_dir();
    let mut file = tempfile::Builder::new()
        .prefix(BufferLayout::TEMP_FILE_PREFIX)
        .tempfile_in(&dir)
        .map_err(|e| {
            warn!("Failed to create overflow file in {}: {}", dir.display(), e);
            CobhanError::WriteTempFileFailed
        })?;

    // Dropping `file` before it is persisted removes it from disk.
    let path_bytes = path_to_bytes(file.path())?;
    if path_bytes.len() > capacity {
        debug!(
            "Overflow path of {} bytes does not fit capacity {}",
            path_bytes.len(),
            capacity
        );
        return Err(CobhanError::BufferTooSmall);
    }

    file.write_all(payload)
        .and_then(|()| file.flush())
        .map_err(|e| {
            warn!("Failed to write overflow file {}: {}", file.path().display(), e);
            CobhanError::WriteTempFileFailed
        })?;

    let path = file.into_temp_path().keep().map_err(|e| {
        warn!("Failed to persist overflow file: {}", e);
        CobhanError::WriteTempFileFailed
    })?;

    let stored = dst
        .copy_into_region(&path_bytes)
        .and_then(|()| dst.commit(DeclaredLength::Spilled(path_bytes.len())));
    if let Err(err) = stored {
        remove_quietly(&path);
        return Err(err);
    }

    debug!("Spilled {} bytes to {}", payload.len(), path.display());
    Ok(())
}

/// Load and delete the overflow file named by `path_bytes`.
pub(crate) fn recall(path_bytes: &[u8], config: &BufferConfig) -> Result<Vec<u8>> {
    if !config.allow_temp_files {
        debug!("Buffer references an overflow file but temp files are disabled");
        return Err(CobhanError::ReadTempFileFailed);
    }

    let file = SpilledFile::new(bytes_to_path(path_bytes)?);
    let data = fs::read(file.path()).map_err(|e| {
        warn!("Failed to read overflow file {}: {}", file.path().display(), e);
        CobhanError::ReadTempFileFailed
    })?;

    debug!("Recalled {} bytes from {}", data.len(), file.path().display());
    Ok(data)
}

/// Overflow file owned by the reader; removed on drop.
///
/// Removal failures are logged and otherwise ignored so they never replace
/// the result of the read.
struct SpilledFile {
    path: PathBuf,
}

impl SpilledFile {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SpilledFile {
    fn drop(&mut self) {
        remove_quietly(&self.path);
    }
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        debug!("Failed to remove overflow file {}: {}", path.display(), e);
    }
}

#[cfg(unix)]
fn path_to_bytes(path: &Path) -> Result<Vec<u8>> {
    use std::os::unix::ffi::OsStrExt;
    Ok(path.as_os_str().as_bytes().to_vec())
}

#[cfg(not(unix))]
fn path_to_bytes(path: &Path) -> Result<Vec<u8>> {
    path.to_str()
        .map(|s| s.as_bytes().to_vec())
        .ok_or(CobhanError::WriteTempFileFailed)
}

#[cfg(unix)]
fn bytes_to_path(bytes: &[u8]) -> Result<PathBuf> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    Ok(PathBuf::from(OsStr::from_bytes(bytes)))
}

#[cfg(not(unix))]
fn bytes_to_path(bytes: &[u8]) -> Result<PathBuf> {
    std::str::from_utf8(bytes)
        .map(PathBuf::from)
        .map_err(|_| CobhanError::ReadTempFileFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{header, BufferRef, Payload};
    use tempfile::TempDir;

    const HEADER_SIZE: usize = BufferLayout::HEADER_SIZE;

    fn files_in(dir: &Path) -> usize {
        fs::read_dir(dir).unwrap().count()
    }

    fn buffer(capacity: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_SIZE + capacity];
        header::write_length(&mut bytes, capacity as i32);
        bytes
    }

    #[test]
    fn test_spill_then_recall() {
        let temp_dir = TempDir::new().unwrap();
        let config = BufferConfig::default().with_temp_dir(temp_dir.path());
        let payload = vec![b'X'; 8192];

        let mut bytes = buffer(4096);
        let mut dst = BufferMut::new(&mut bytes).unwrap();
        spill(&payload, &mut dst, 4096, &config).unwrap();
        assert!(dst.declared().is_spilled());
        assert_eq!(files_in(temp_dir.path()), 1);

        let view = BufferRef::new(&bytes).unwrap();
        let Payload::Spilled(path) = view.payload(&config).unwrap() else {
            panic!("expected a spilled payload");
        };
        let path = bytes_to_path(path).unwrap();
        assert!(path.starts_with(temp_dir.path()));
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(BufferLayout::TEMP_FILE_PREFIX));

        let data = recall(&path_to_bytes(&path).unwrap(), &config).unwrap();
        assert_eq!(data, payload);
        assert!(!path.exists());
    }

    #[test]
    fn test_spill_path_does_not_fit() {
        let temp_dir = TempDir::new().unwrap();
        let config = BufferConfig::default().with_temp_dir(temp_dir.path());

        let mut bytes = buffer(2);
        let mut dst = BufferMut::new(&mut bytes).unwrap();
        assert_eq!(
            spill(b"XXX", &mut dst, 2, &config),
            Err(CobhanError::BufferTooSmall)
        );
        assert_eq!(dst.declared(), DeclaredLength::Inline(2));
        assert_eq!(files_in(temp_dir.path()), 0);
    }

    #[test]
    fn test_spill_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let config = BufferConfig::default()
            .with_temp_dir(temp_dir.path())
            .with_temp_files(false);

        let mut bytes = buffer(4096);
        let mut dst = BufferMut::new(&mut bytes).unwrap();
        assert_eq!(
            spill(&[0u8; 8192], &mut dst, 4096, &config),
            Err(CobhanError::BufferTooSmall)
        );
        assert_eq!(files_in(temp_dir.path()), 0);
    }

    #[test]
    fn test_spill_into_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let config = BufferConfig::default().with_temp_dir(temp_dir.path().join("missing"));

        let mut bytes = buffer(4096);
        let mut dst = BufferMut::new(&mut bytes).unwrap();
        assert_eq!(
            spill(&[0u8; 8192], &mut dst, 4096, &config),
            Err(CobhanError::WriteTempFileFailed)
        );
    }

    #[test]
    fn test_recall_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cobhan-gone");
        let result = recall(&path_to_bytes(&path).unwrap(), &BufferConfig::default());
        assert_eq!(result, Err(CobhanError::ReadTempFileFailed));
    }

    #[test]
    fn test_recall_disabled_leaves_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cobhan-kept");
        fs::write(&path, b"data").unwrap();

        let config = BufferConfig::default().with_temp_files(false);
        let result = recall(&path_to_bytes(&path).unwrap(), &config);
        assert_eq!(result, Err(CobhanError::ReadTempFileFailed));
        assert!(path.exists());
    }
}
