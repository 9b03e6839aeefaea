//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::validate_password;
use crate::errors::{MacroVaultError, Result};
use crate::repository::MACRO_SUFFIX;

/// Environment variable that supplies the password non-interactively.
pub const PASSWORD_ENV: &str = "MACROVAULT_PASSWORD";

/// MacroVault CLI: password-protected macro storage with backups.
#[derive(Parser)]
#[command(
    name = "macrovault",
    about = "Password-protected macro storage with automatic backups",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project directory holding .macrovault.toml (default: current dir)
    #[arg(short = 'C', long, default_value = ".", global = true)]
    pub project_dir: String,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Encrypt a JSON macro record into a .gma.json file
    Save {
        /// JSON file holding the record (`-` reads stdin)
        input: String,
        /// Target macro name or .gma.json path
        target: String,
        /// Overwrite an existing file without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Decrypt a macro file and print its record
    Show {
        /// Macro name or .gma.json path
        file: String,
    },

    /// List macro files, newest first
    List {
        /// Directory to scan (default: configured recordings dir)
        dir: Option<String>,
    },

    /// Show file details without decrypting
    Info {
        /// Macro name or .gma.json path
        file: String,
    },

    /// Delete a macro file
    Delete {
        /// Macro name or .gma.json path
        file: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Manage backups (create, list, restore, delete, clean, stats)
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

/// Backup subcommands.
#[derive(clap::Subcommand)]
pub enum BackupAction {
    /// Back up a macro file now
    Create {
        /// Macro name or .gma.json path
        file: String,
    },

    /// List backups of a macro file, newest first
    List {
        /// Macro name or .gma.json path
        file: String,
    },

    /// Restore a backup over a macro file
    Restore {
        /// Path to the backup file
        backup: String,
        /// Macro name or .gma.json path to overwrite
        target: String,
    },

    /// Delete a single backup file
    Delete {
        /// Path to the backup file
        backup: String,
    },

    /// Delete every backup of a macro file
    Clean {
        /// Macro name or .gma.json path
        file: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Summarize backups in a directory
    Stats {
        /// Directory to scan (default: configured recordings dir)
        dir: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings from the project directory given on the command line.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    Settings::load(Path::new(&cli.project_dir))
}

/// Turn a command-line file argument into a macro file path.
///
/// Bare names (`login`) resolve into the configured recordings directory;
/// anything with a path separator or the `.gma.json` suffix is used as is.
pub fn resolve_macro_path(cli: &Cli, settings: &Settings, arg: &str) -> PathBuf {
    if arg.ends_with(MACRO_SUFFIX) || arg.contains('/') || arg.contains('\\') {
        PathBuf::from(arg)
    } else {
        settings.recording_path(Path::new(&cli.project_dir), arg)
    }
}

/// Directory argument or the configured recordings directory.
pub fn resolve_dir(cli: &Cli, settings: &Settings, arg: Option<&str>) -> PathBuf {
    match arg {
        Some(dir) => PathBuf::from(dir),
        None => Path::new(&cli.project_dir).join(&settings.recordings_dir),
    }
}

/// Password from `MACROVAULT_PASSWORD`, if set and non-empty.
pub fn password_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Get the password for an existing macro file.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password(file_name: &str) -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt(format!("Password for {file_name}"))
        .interact()
        .map_err(|e| MacroVaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password with confirmation.
///
/// Also respects `MACROVAULT_PASSWORD` for scripted usage. Enforces the
/// minimum password length.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        validate_password(&pw)?;
        return Ok(pw);
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose a password")
            .with_confirmation("Confirm password", "Passwords do not match, try again")
            .interact()
            .map_err(|e| MacroVaultError::CommandFailed(format!("password prompt: {e}")))?;

        if let Err(e) = validate_password(&password) {
            output::warning(&format!("{e}. Try again."));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

/// Ask a yes/no question, defaulting to "no".
pub fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| MacroVaultError::CommandFailed(format!("confirm prompt: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("macrovault").chain(args.iter().copied()))
    }

    #[test]
    fn bare_names_resolve_into_recordings_dir() {
        let cli = cli(&["-C", "/proj", "show", "login"]);
        let settings = Settings::default();
        assert_eq!(
            resolve_macro_path(&cli, &settings, "login"),
            PathBuf::from("/proj/macros/login.gma.json")
        );
    }

    #[test]
    fn explicit_paths_are_kept() {
        let cli = cli(&["show", "x"]);
        let settings = Settings::default();
        assert_eq!(
            resolve_macro_path(&cli, &settings, "other/m1.gma.json"),
            PathBuf::from("other/m1.gma.json")
        );
        assert_eq!(
            resolve_macro_path(&cli, &settings, "m1.gma.json"),
            PathBuf::from("m1.gma.json")
        );
    }

    #[test]
    fn dir_defaults_to_recordings_dir() {
        let cli = cli(&["-C", "/proj", "list"]);
        let settings = Settings::default();
        assert_eq!(resolve_dir(&cli, &settings, None), PathBuf::from("/proj/macros"));
        assert_eq!(
            resolve_dir(&cli, &settings, Some("/elsewhere")),
            PathBuf::from("/elsewhere")
        );
    }
}
