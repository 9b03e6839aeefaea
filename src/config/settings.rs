use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backup::{BackupManager, DEFAULT_RETENTION};
use crate::errors::{MacroVaultError, Result};
use crate::guard::{AttemptGuard, LockoutPolicy, DEFAULT_MAX_ATTEMPTS};
use crate::repository::MACRO_SUFFIX;

/// Project-level configuration, loaded from `.macrovault.toml`.
///
/// Every field has a sensible default so MacroVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to project root) where macro files are stored.
    #[serde(default = "default_recordings_dir")]
    pub recordings_dir: String,

    /// Backup generations kept per macro file (default: 5).
    #[serde(default = "default_backup_retention")]
    pub backup_retention: usize,

    /// Failed password attempts before a file locks (default: 3).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Seconds until a locked file accepts attempts again.
    /// Unset means the lock lasts for the whole session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lockout_cooldown_secs: Option<u64>,

    /// Back up an existing file before overwriting it (default: true).
    #[serde(default = "default_backup_before_save")]
    pub backup_before_save: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_recordings_dir() -> String {
    "macros".to_string()
}

fn default_backup_retention() -> usize {
    DEFAULT_RETENTION
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_backup_before_save() -> bool {
    true
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            recordings_dir: default_recordings_dir(),
            backup_retention: default_backup_retention(),
            max_attempts: default_max_attempts(),
            lockout_cooldown_secs: None,
            backup_before_save: default_backup_before_save(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".macrovault.toml";

    /// Load settings from `<project_dir>/.macrovault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed or holds out-of-range
    /// values, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            MacroVaultError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.backup_retention == 0 {
            return Err(MacroVaultError::Config(
                "backup_retention must be at least 1".into(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(MacroVaultError::Config(
                "max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Build the full path to a macro file.
    ///
    /// Example: `project_dir/macros/login.gma.json`
    pub fn recording_path(&self, project_dir: &Path, name: &str) -> PathBuf {
        project_dir
            .join(&self.recordings_dir)
            .join(format!("{name}{MACRO_SUFFIX}"))
    }

    pub fn lockout_policy(&self) -> LockoutPolicy {
        LockoutPolicy {
            max_attempts: self.max_attempts,
            cooldown: self.lockout_cooldown_secs.map(Duration::from_secs),
        }
    }

    pub fn attempt_guard(&self) -> AttemptGuard {
        AttemptGuard::new(self.lockout_policy())
    }

    pub fn backup_manager(&self) -> BackupManager {
        BackupManager::new(self.backup_retention)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
