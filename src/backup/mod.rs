//! Generational backups stored in a `.backups` directory next to each file.

pub mod entry;
pub mod manager;

pub use entry::{BackupEntry, BackupStatistics};
pub use manager::{BackupManager, BACKUP_DIR_NAME, DEFAULT_RETENTION};
