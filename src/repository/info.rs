//! File metadata returned without decrypting anything.

use chrono::{DateTime, Utc};

/// What `MacroRepository::file_info` can tell about a macro file from the
/// filesystem alone.
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
    /// Birth time; `None` on filesystems that do not record it.
    pub created: Option<DateTime<Utc>>,
    /// Always `true`: every macro file is an encrypted envelope.
    pub encrypted: bool,
}
