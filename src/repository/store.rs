//! File-backed macro repository.
//!
//! `MacroRepository` turns records into encrypted `.gma.json` files and
//! back. It keeps no state between calls: every operation reads or writes
//! the filesystem directly, so listings always reflect the disk at call
//! time. Operations on different paths are independent; callers must
//! serialize operations on the same path themselves.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::crypto::{AesGcmCodec, Codec};
use crate::errors::{MacroVaultError, Result};
use crate::guard::AttemptGuard;

use super::format::{self, has_macro_suffix, FORMAT_VERSION};
use super::info::FileInfo;

/// Encrypted, password-protected record storage keyed by file path.
#[derive(Debug, Clone, Default)]
pub struct MacroRepository<C = AesGcmCodec> {
    codec: C,
}

impl MacroRepository<AesGcmCodec> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Codec> MacroRepository<C> {
    /// Build a repository that encrypts through a different codec.
    pub fn with_codec(codec: C) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    // ------------------------------------------------------------------
    // Save / load
    // ------------------------------------------------------------------

    /// Encrypt `record` under `password` and write it to `path`.
    ///
    /// The record must serialize to a JSON object. Parent directories are
    /// created as needed and the file is replaced atomically.
    pub fn save<T>(&self, record: &T, path: &Path, password: &str) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.codec.validate_password(password)?;

        if !has_macro_suffix(path) {
            return Err(MacroVaultError::InvalidExtension(path.to_path_buf()));
        }

        let value = serde_json::to_value(record)
            .map_err(|e| MacroVaultError::Persistence(format!("cannot serialize record: {e}")))?;
        let Value::Object(map) = value else {
            return Err(MacroVaultError::Persistence(
                "record must serialize to a JSON object".into(),
            ));
        };

        let payload = format::wrap_payload(map, self.codec.algorithm())?;
        let blob = self
            .codec
            .encrypt(&payload, password)
            .map_err(|e| match e {
                MacroVaultError::PasswordPolicy(_) => e,
                other => MacroVaultError::Persistence(format!("encryption failed: {other}")),
            })?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        format::write_atomic(path, &blob)?;

        info!(path = %path.display(), bytes = blob.len(), "saved macro file");
        Ok(())
    }

    /// Read, decrypt and parse the record stored at `path`.
    ///
    /// - missing file: `NotFound`
    /// - wrong password or tampered bytes: `InvalidPassword`
    /// - decrypts but is not a valid record of type `T`: `CorruptedData`
    ///
    /// A password below the policy minimum can never have sealed a file,
    /// so it is reported as `InvalidPassword` without deriving a key.
    pub fn load<T>(&self, path: &Path, password: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        if !path.exists() {
            return Err(MacroVaultError::NotFound(path.to_path_buf()));
        }

        let blob = fs::read(path)?;

        if self.codec.validate_password(password).is_err() {
            debug!(path = %path.display(), "password below policy minimum");
            return Err(MacroVaultError::InvalidPassword);
        }

        let plaintext = self.codec.decrypt(&blob, password)?;
        let (record, metadata) = format::unwrap_payload(&plaintext)?;

        match metadata {
            None => warn!(path = %path.display(), "loading legacy format file without metadata"),
            Some(meta) if meta.format_version != FORMAT_VERSION => warn!(
                path = %path.display(),
                version = %meta.format_version,
                "unknown format version"
            ),
            Some(_) => {}
        }

        let parsed = serde_json::from_value(Value::Object(record))
            .map_err(|e| MacroVaultError::CorruptedData(format!("invalid macro record: {e}")))?;

        info!(path = %path.display(), "loaded macro file");
        Ok(parsed)
    }

    /// [`load`](Self::load) behind an [`AttemptGuard`].
    ///
    /// Checks the guard first, records a failure on `InvalidPassword` and
    /// clears the counter on success. Other errors leave the counter alone.
    pub fn load_guarded<T>(&self, path: &Path, password: &str, guard: &AttemptGuard) -> Result<T>
    where
        T: DeserializeOwned,
    {
        guard.check(path)?;

        match self.load(path, password) {
            Ok(record) => {
                guard.record_success(path);
                Ok(record)
            }
            Err(MacroVaultError::InvalidPassword) => {
                let failures = guard.record_failure(path);
                debug!(path = %path.display(), failures, "failed unlock attempt");
                Err(MacroVaultError::InvalidPassword)
            }
            Err(e) => Err(e),
        }
    }

    // ------------------------------------------------------------------
    // File management
    // ------------------------------------------------------------------

    /// Returns `true` if `path` is an existing regular file.
    pub fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    /// Delete the macro file at `path`.
    ///
    /// Idempotent: a missing file is a success. Returns whether a file
    /// was actually removed.
    pub fn delete(&self, path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(path).map_err(|e| {
            MacroVaultError::Persistence(format!("failed to delete {}: {e}", path.display()))
        })?;

        info!(path = %path.display(), "deleted macro file");
        Ok(true)
    }

    /// List `.gma.json` files in `directory`, newest modification first.
    ///
    /// A missing directory yields an empty list.
    pub fn list_recordings(&self, directory: &Path) -> Result<Vec<PathBuf>> {
        if !directory.is_dir() {
            return Ok(Vec::new());
        }

        let mut found: Vec<(DateTime<Utc>, PathBuf)> = Vec::new();
        for entry in fs::read_dir(directory)? {
            let entry = entry?;
            let path = entry.path();
            if !has_macro_suffix(&path) {
                continue;
            }

            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            found.push((metadata.modified()?.into(), path));
        }

        found.sort_by(|a, b| b.0.cmp(&a.0));

        debug!(directory = %directory.display(), count = found.len(), "listed macro files");
        Ok(found.into_iter().map(|(_, path)| path).collect())
    }

    /// Filesystem metadata for `path`. Nothing is decrypted.
    pub fn file_info(&self, path: &Path) -> Result<FileInfo> {
        if !path.exists() {
            return Err(MacroVaultError::NotFound(path.to_path_buf()));
        }

        let metadata = fs::metadata(path)?;
        Ok(FileInfo {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            size: metadata.len(),
            modified: metadata.modified()?.into(),
            created: metadata.created().ok().map(DateTime::<Utc>::from),
            encrypted: true,
        })
    }
}
