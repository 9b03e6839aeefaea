//! Backup file naming and the values reported about backups.
//!
//! A backup of `login.gma.json` taken at unix time 1700000000 is named
//! `login_backup_1700000000.gma.json`. Names that do not follow this
//! pattern are ignored by every listing.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Separates the original base name from the timestamp.
pub const BACKUP_MARKER: &str = "_backup_";

/// Build the file name for a backup of `base` taken at `timestamp`.
pub fn backup_file_name(base: &str, timestamp: i64, ext: Option<&str>) -> String {
    match ext {
        Some(ext) => format!("{base}{BACKUP_MARKER}{timestamp}.{ext}"),
        None => format!("{base}{BACKUP_MARKER}{timestamp}"),
    }
}

/// The pieces of a parsed backup file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBackupName<'a> {
    pub base: &'a str,
    pub timestamp: i64,
    pub ext: Option<&'a str>,
}

/// Parse `{base}_backup_{timestamp}[.{ext}]`.
///
/// The timestamp is the token after the last `_backup_` marker and must
/// be all ASCII digits. Returns `None` for anything else.
pub fn parse_backup_file_name(name: &str) -> Option<ParsedBackupName<'_>> {
    let idx = name.rfind(BACKUP_MARKER)?;
    let base = &name[..idx];
    let rest = &name[idx + BACKUP_MARKER.len()..];

    let (digits, ext) = match rest.split_once('.') {
        Some((digits, ext)) => (digits, Some(ext)),
        None => (rest, None),
    };

    if base.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let timestamp = digits.parse::<i64>().ok()?;
    Some(ParsedBackupName {
        base,
        timestamp,
        ext,
    })
}

/// One generation in a file's backup history.
#[derive(Debug, Clone)]
pub struct BackupEntry {
    pub path: PathBuf,
    /// Unix timestamp embedded in the file name.
    pub timestamp: i64,
    pub size: u64,
    /// `timestamp` as a date.
    pub created: DateTime<Utc>,
}

impl BackupEntry {
    #[allow(clippy::cast_precision_loss)] // backup sizes are far below 2^52
    pub fn size_mb(&self) -> f64 {
        self.size as f64 / (1024.0 * 1024.0)
    }
}

/// Aggregate view of one `.backups` directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackupStatistics {
    pub total_backups: usize,
    pub unique_originals: usize,
    pub total_size: u64,
}

impl BackupStatistics {
    #[allow(clippy::cast_precision_loss)]
    pub fn total_size_mb(&self) -> f64 {
        self.total_size as f64 / (1024.0 * 1024.0)
    }
}
