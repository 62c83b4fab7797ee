//! Buffer dump commands.
//!
//! A dump is the raw bytes of a buffer, header included, as written by
//! `encode` or captured from a host process.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use cobhan::{Buffer, BufferConfig, DeclaredLength};
use tracing::{debug, info};

/// How to decode the payload of a dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PayloadKind {
    Bytes,
    String,
    Json,
}

/// Decoded view of a buffer dump.
#[derive(Debug)]
pub struct Inspection {
    pub declared: DeclaredLength,
    pub payload: String,
}

impl std::fmt::Display for Inspection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.declared.is_spilled() {
            "spilled"
        } else {
            "inline"
        };
        writeln!(f, "declared length: {} ({})", self.declared.len(), kind)?;
        write!(f, "{}", self.payload)
    }
}

/// Decode a dump file.
///
/// A spilled dump is recalled through its temp file, which is deleted once
/// read.
pub fn inspect(path: &Path, kind: PayloadKind, config: &BufferConfig) -> Result<Inspection> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let buffer = Buffer::from_vec(bytes)
        .with_context(|| format!("{} is not a buffer dump", path.display()))?;
    let declared = buffer.declared_length();
    debug!("Inspecting {} as {:?}: {:?}", path.display(), kind, declared);

    let payload = match kind {
        PayloadKind::Bytes => hex::encode(buffer.read_bytes(config)?),
        PayloadKind::String => buffer.read_string(config)?,
        PayloadKind::Json => {
            let object = buffer.read_json(config)?;
            serde_json::to_string_pretty(&object).context("Failed to format JSON payload")?
        }
    };

    Ok(Inspection { declared, payload })
}

/// Write the contents of `input` into a new dump at `output`.
///
/// `capacity` defaults to the payload size; a smaller capacity spills the
/// payload to a temp file when `config` allows it.
pub fn encode(
    input: &Path,
    output: &Path,
    capacity: Option<usize>,
    config: &BufferConfig,
) -> Result<DeclaredLength> {
    let payload = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let capacity = capacity.unwrap_or(payload.len());

    let mut buffer = Buffer::allocate(capacity)
        .with_context(|| format!("Capacity {} cannot be declared", capacity))?;
    buffer
        .write_bytes(&payload, config)
        .with_context(|| format!("Failed to encode {} bytes", payload.len()))?;

    fs::write(output, buffer.as_bytes())
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let declared = buffer.declared_length();
    info!(
        "Wrote {} ({} payload bytes, {:?})",
        output.display(),
        payload.len(),
        declared
    );
    Ok(declared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cobhan::CobhanError;
    use tempfile::TempDir;

    fn setup() -> (TempDir, BufferConfig) {
        let temp_dir = TempDir::new().unwrap();
        let spill_dir = temp_dir.path().join("spill");
        fs::create_dir(&spill_dir).unwrap();
        let config = BufferConfig::default().with_temp_dir(spill_dir);
        (temp_dir, config)
    }

    #[test]
    fn test_encode_then_inspect_string() {
        let (temp_dir, config) = setup();
        let input = temp_dir.path().join("input.txt");
        let dump = temp_dir.path().join("input.cobhan");
        fs::write(&input, "hello world").unwrap();

        let declared = encode(&input, &dump, None, &config).unwrap();
        assert_eq!(declared, DeclaredLength::Inline(11));
        assert_eq!(fs::metadata(&dump).unwrap().len(), 8 + 11);

        let inspection = inspect(&dump, PayloadKind::String, &config).unwrap();
        assert_eq!(inspection.payload, "hello world");
        assert_eq!(
            inspection.to_string(),
            "declared length: 11 (inline)\nhello world"
        );
    }

    #[test]
    fn test_inspect_bytes_as_hex() {
        let (temp_dir, config) = setup();
        let input = temp_dir.path().join("input.bin");
        let dump = temp_dir.path().join("input.cobhan");
        fs::write(&input, [0xde, 0xad, 0xbe, 0xef]).unwrap();

        encode(&input, &dump, Some(16), &config).unwrap();
        let inspection = inspect(&dump, PayloadKind::Bytes, &config).unwrap();
        assert_eq!(inspection.declared, DeclaredLength::Inline(4));
        assert_eq!(inspection.payload, "deadbeef");
    }

    #[test]
    fn test_encode_small_capacity_spills() {
        let (temp_dir, config) = setup();
        let input = temp_dir.path().join("input.json");
        let dump = temp_dir.path().join("input.cobhan");
        let json = format!(r#"{{"key":"{}"}}"#, "v".repeat(4096));
        fs::write(&input, &json).unwrap();

        let declared = encode(&input, &dump, Some(512), &config).unwrap();
        assert!(declared.is_spilled());

        let inspection = inspect(&dump, PayloadKind::Json, &config).unwrap();
        assert!(inspection.payload.contains("\"key\""));
        assert!(inspection.to_string().contains("(spilled)"));
    }

    #[test]
    fn test_encode_without_temp_files_fails() {
        let (temp_dir, config) = setup();
        let config = config.with_temp_files(false);
        let input = temp_dir.path().join("input.txt");
        let dump = temp_dir.path().join("input.cobhan");
        fs::write(&input, "too long for the buffer").unwrap();

        let err = encode(&input, &dump, Some(4), &config).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CobhanError>(),
            Some(&CobhanError::BufferTooSmall)
        );
        assert!(!dump.exists());
    }

    #[test]
    fn test_inspect_rejects_short_file() {
        let (temp_dir, config) = setup();
        let dump = temp_dir.path().join("short.cobhan");
        fs::write(&dump, [1, 2, 3]).unwrap();

        assert!(inspect(&dump, PayloadKind::Bytes, &config).is_err());
    }
}
