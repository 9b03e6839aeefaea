use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in MacroVault.
#[derive(Debug, Error)]
pub enum MacroVaultError {
    // --- Password / crypto errors ---
    #[error("Password rejected: {0}")]
    PasswordPolicy(String),

    #[error("Incorrect password")]
    InvalidPassword,

    #[error("Macro file is corrupted: {0}")]
    CorruptedData(String),

    #[error("Maximum password attempts exceeded for {path} ({attempts} failed)")]
    AttemptsExceeded { path: PathBuf, attempts: u32 },

    // --- Repository errors ---
    #[error("Macro file not found at {0}")]
    NotFound(PathBuf),

    #[error("Macro files must use the .gma.json extension: {0}")]
    InvalidExtension(PathBuf),

    #[error("Persistence failed: {0}")]
    Persistence(String),

    // --- Backup errors ---
    #[error("Backup failed: {0}")]
    Backup(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Flat classification of [`MacroVaultError`] for callers that map
/// failures onto user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    PasswordPolicy,
    InvalidPassword,
    CorruptedData,
    NotFound,
    AttemptsExceeded,
    Backup,
    Io,
    Persistence,
    Config,
    Command,
}

impl ErrorKind {
    /// Whether the user can retry (new password, other file) after this error.
    pub fn is_recoverable(self) -> bool {
        matches!(
            self,
            Self::PasswordPolicy | Self::InvalidPassword | Self::NotFound | Self::Command
        )
    }
}

impl MacroVaultError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PasswordPolicy(_) => ErrorKind::PasswordPolicy,
            Self::InvalidPassword => ErrorKind::InvalidPassword,
            Self::CorruptedData(_) => ErrorKind::CorruptedData,
            Self::AttemptsExceeded { .. } => ErrorKind::AttemptsExceeded,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidExtension(_) | Self::Persistence(_) => ErrorKind::Persistence,
            Self::Backup(_) => ErrorKind::Backup,
            Self::Config(_) => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
            Self::CommandFailed(_) => ErrorKind::Command,
        }
    }
}

/// Convenience type alias for MacroVault results.
pub type Result<T> = std::result::Result<T, MacroVaultError>;
