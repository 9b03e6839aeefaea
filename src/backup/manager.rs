//! Generational backups of macro files.
//!
//! Backups live in a `.backups` directory next to the original file and
//! are plain byte copies; nothing here decrypts. After every new backup
//! the oldest generations beyond the retention count are pruned.
//!
//! Pruning and listing never fail the caller: problems are logged and the
//! affected file is skipped.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::entry::{backup_file_name, parse_backup_file_name, BackupEntry, BackupStatistics};
use crate::errors::{MacroVaultError, Result};
use crate::repository::format::split_macro_name;

/// Name of the directory holding backups, next to the original file.
pub const BACKUP_DIR_NAME: &str = ".backups";

/// Generations kept per file unless configured otherwise.
pub const DEFAULT_RETENTION: usize = 5;

/// Creates, lists, restores and prunes backups.
#[derive(Debug, Clone, Copy)]
pub struct BackupManager {
    retention: usize,
}

impl Default for BackupManager {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION)
    }
}

impl BackupManager {
    /// Keep at most `retention` generations per file (minimum 1).
    pub fn new(retention: usize) -> Self {
        Self {
            retention: retention.max(1),
        }
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    /// The `.backups` directory used for `path`.
    pub fn backup_dir(path: &Path) -> PathBuf {
        path.parent()
            .unwrap_or(Path::new("."))
            .join(BACKUP_DIR_NAME)
    }

    // ------------------------------------------------------------------
    // Create / restore / delete
    // ------------------------------------------------------------------

    /// Copy `path` into its backup directory, stamped with the current time.
    pub fn create_backup(&self, path: &Path) -> Result<PathBuf> {
        self.create_backup_at(path, Utc::now().timestamp())
    }

    /// Copy `path` into its backup directory, stamped with `timestamp`.
    ///
    /// A backup with the same timestamp is overwritten. Old generations
    /// are pruned afterwards; pruning failures are only logged.
    pub fn create_backup_at(&self, path: &Path, timestamp: i64) -> Result<PathBuf> {
        if !path.is_file() {
            return Err(MacroVaultError::Backup(format!(
                "source file does not exist: {}",
                path.display()
            )));
        }

        let (base, ext) = split_macro_name(path);
        let backup_dir = Self::backup_dir(path);
        let backup_path = backup_dir.join(backup_file_name(&base, timestamp, ext.as_deref()));

        fs::create_dir_all(&backup_dir).map_err(|e| {
            MacroVaultError::Backup(format!("cannot create {}: {e}", backup_dir.display()))
        })?;
        if let Err(e) = copy_preserving(path, &backup_path) {
            if let Err(cleanup) = fs::remove_file(&backup_path) {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    warn!(backup = %backup_path.display(), error = %cleanup, "cannot remove partial backup");
                }
            }
            return Err(MacroVaultError::Backup(format!(
                "failed to copy {}: {e}",
                path.display()
            )));
        }

        info!(backup = %backup_path.display(), "created backup");

        self.prune(path);
        Ok(backup_path)
    }

    /// Overwrite `target` with the contents of `backup_path`.
    pub fn restore_backup(&self, backup_path: &Path, target: &Path) -> Result<()> {
        if !backup_path.is_file() {
            return Err(MacroVaultError::Backup(format!(
                "backup file does not exist: {}",
                backup_path.display()
            )));
        }

        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    MacroVaultError::Backup(format!("cannot create {}: {e}", parent.display()))
                })?;
            }
        }

        copy_preserving(backup_path, target).map_err(|e| {
            MacroVaultError::Backup(format!("failed to restore {}: {e}", backup_path.display()))
        })?;

        info!(
            backup = %backup_path.display(),
            target = %target.display(),
            "restored backup"
        );
        Ok(())
    }

    /// Delete one backup. A missing backup is a no-op success.
    pub fn delete_backup(&self, backup_path: &Path) -> Result<()> {
        if !backup_path.exists() {
            return Ok(());
        }

        fs::remove_file(backup_path).map_err(|e| {
            MacroVaultError::Backup(format!("failed to delete {}: {e}", backup_path.display()))
        })?;

        debug!(backup = %backup_path.display(), "deleted backup");
        Ok(())
    }

    /// Delete every backup of `path` and return how many were removed.
    ///
    /// Backups that cannot be deleted are logged and skipped.
    pub fn cleanup_all_backups(&self, path: &Path) -> usize {
        let deleted = self.delete_each(self.list_backups(path).iter());
        info!(path = %path.display(), deleted, "cleaned up all backups");
        deleted
    }

    /// Delete generations of `path` beyond the retention count.
    ///
    /// Returns the number of backups removed.
    pub fn prune(&self, path: &Path) -> usize {
        let backups = self.list_backups(path);
        if backups.len() <= self.retention {
            return 0;
        }

        let deleted = self.delete_each(backups.iter().skip(self.retention));
        info!(path = %path.display(), deleted, retention = self.retention, "pruned old backups");
        deleted
    }

    fn delete_each<'a>(&self, entries: impl Iterator<Item = &'a BackupEntry>) -> usize {
        let mut deleted = 0;
        for entry in entries {
            match self.delete_backup(&entry.path) {
                Ok(()) => deleted += 1,
                Err(e) => warn!(backup = %entry.path.display(), error = %e, "skipping backup"),
            }
        }
        deleted
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// All backups of `path`, newest first.
    ///
    /// Entries with equal timestamps keep directory listing order.
    /// Malformed names are skipped; errors yield an empty or partial list.
    pub fn list_backups(&self, path: &Path) -> Vec<BackupEntry> {
        let (base, ext) = split_macro_name(path);
        let backup_dir = Self::backup_dir(path);
        if !backup_dir.is_dir() {
            return Vec::new();
        }

        let read_dir = match fs::read_dir(&backup_dir) {
            Ok(read_dir) => read_dir,
            Err(e) => {
                warn!(dir = %backup_dir.display(), error = %e, "cannot list backups");
                return Vec::new();
            }
        };

        let mut entries = Vec::new();
        for dir_entry in read_dir.flatten() {
            let file_name = dir_entry.file_name().to_string_lossy().to_string();

            let Some(parsed) = parse_backup_file_name(&file_name) else {
                debug!(file = %file_name, "skipping non-backup file");
                continue;
            };
            if parsed.base != base || parsed.ext != ext.as_deref() {
                continue;
            }

            let Some(created) = DateTime::<Utc>::from_timestamp(parsed.timestamp, 0) else {
                debug!(file = %file_name, "skipping backup with out-of-range timestamp");
                continue;
            };

            let size = match dir_entry.metadata() {
                Ok(metadata) if metadata.is_file() => metadata.len(),
                Ok(_) => continue,
                Err(e) => {
                    debug!(file = %file_name, error = %e, "skipping unreadable backup");
                    continue;
                }
            };

            entries.push(BackupEntry {
                path: dir_entry.path(),
                timestamp: parsed.timestamp,
                size,
                created,
            });
        }

        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    /// Summarize the `.backups` directory inside `directory`.
    ///
    /// Backups are grouped by the name portion before `_backup_`.
    pub fn backup_statistics(&self, directory: &Path) -> BackupStatistics {
        let backup_dir = directory.join(BACKUP_DIR_NAME);
        let read_dir = match fs::read_dir(&backup_dir) {
            Ok(read_dir) => read_dir,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(dir = %backup_dir.display(), error = %e, "cannot scan backups");
                }
                return BackupStatistics::default();
            }
        };

        let mut stats = BackupStatistics::default();
        let mut originals = HashSet::new();

        for dir_entry in read_dir.flatten() {
            let file_name = dir_entry.file_name().to_string_lossy().to_string();
            let Some(parsed) = parse_backup_file_name(&file_name) else {
                continue;
            };
            let Ok(metadata) = dir_entry.metadata() else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }

            stats.total_backups += 1;
            stats.total_size += metadata.len();
            originals.insert(parsed.base.to_string());
        }

        stats.unique_originals = originals.len();
        stats
    }
}

/// Byte-for-byte copy that also carries over permissions and mtime.
///
/// The mtime is set through the open write handle and the permissions
/// are applied last, so read-only sources copy cleanly.
fn copy_preserving(src: &Path, dst: &Path) -> io::Result<()> {
    let metadata = fs::metadata(src)?;
    let mut reader = fs::File::open(src)?;
    let mut writer = fs::File::create(dst)?;

    io::copy(&mut reader, &mut writer)?;
    writer.set_modified(metadata.modified()?)?;
    writer.sync_all()?;
    drop(writer);

    fs::set_permissions(dst, metadata.permissions())
}
