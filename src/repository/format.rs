//! Plaintext payload format and on-disk write helpers.
//!
//! The decrypted payload of a `.gma.json` file is a UTF-8 JSON object:
//!
//! ```text
//! { "_metadata": { "format_version": "1.0", "encryption": "AES-256-GCM" },
//!   ...record fields... }
//! ```
//!
//! `_metadata` is added on write and stripped on read. Files written
//! before metadata existed have no `_metadata` key and are still readable.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{MacroVaultError, Result};

/// Suffix every macro file must carry.
pub const MACRO_SUFFIX: &str = ".gma.json";

/// Top-level key holding [`EnvelopeMetadata`] inside the payload.
pub const METADATA_KEY: &str = "_metadata";

/// Payload format version written by this crate.
pub const FORMAT_VERSION: &str = "1.0";

/// Envelope metadata embedded in every payload we write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeMetadata {
    pub format_version: String,
    pub encryption: String,
}

impl EnvelopeMetadata {
    pub fn current(algorithm: &str) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            encryption: algorithm.to_string(),
        }
    }
}

/// Returns `true` if the file name ends with `.gma.json`.
pub fn has_macro_suffix(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().ends_with(MACRO_SUFFIX))
        .unwrap_or(false)
}

/// Split a macro file name into its base and extension.
///
/// `m1.gma.json` yields `("m1", Some("gma.json"))`; any other file falls
/// back to the regular stem/extension split.
pub fn split_macro_name(path: &Path) -> (String, Option<String>) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if let Some(base) = name.strip_suffix(MACRO_SUFFIX) {
        return (base.to_string(), Some(MACRO_SUFFIX[1..].to_string()));
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = path.extension().map(|e| e.to_string_lossy().to_string());
    (stem, ext)
}

/// Attach metadata to a record and serialize it to JSON bytes.
pub fn wrap_payload(mut record: Map<String, Value>, algorithm: &str) -> Result<Vec<u8>> {
    let metadata = serde_json::to_value(EnvelopeMetadata::current(algorithm))
        .map_err(|e| MacroVaultError::Persistence(format!("metadata: {e}")))?;
    record.insert(METADATA_KEY.to_string(), metadata);

    serde_json::to_vec(&Value::Object(record))
        .map_err(|e| MacroVaultError::Persistence(format!("record: {e}")))
}

/// Parse decrypted bytes and strip the metadata.
///
/// Returns the bare record plus the metadata, if the payload had any.
pub fn unwrap_payload(bytes: &[u8]) -> Result<(Map<String, Value>, Option<EnvelopeMetadata>)> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| MacroVaultError::CorruptedData(format!("payload is not valid JSON: {e}")))?;

    let Value::Object(mut record) = value else {
        return Err(MacroVaultError::CorruptedData(
            "payload is not a JSON object".into(),
        ));
    };

    let metadata = match record.remove(METADATA_KEY) {
        Some(raw) => Some(serde_json::from_value(raw).map_err(|e| {
            MacroVaultError::CorruptedData(format!("malformed {METADATA_KEY}: {e}"))
        })?),
        None => None,
    };

    Ok((record, metadata))
}

/// Path of the temporary sibling used while writing `path`.
fn temp_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}

/// Write `bytes` to `path` **atomically**.
///
/// The data goes to a temp file in the same directory, is flushed to
/// disk, and is then renamed over the target, so readers see either the
/// old file or the new one, never a torn write.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp_path = temp_path(path);

    let result = (|| -> std::io::Result<()> {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result.map_err(MacroVaultError::from)
}
