//! `macrovault save`: encrypt a JSON record into a macro file.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use serde_json::Value;

use crate::backup::BackupManager;
use crate::cli::output;
use crate::cli::{confirm, load_settings, prompt_new_password, resolve_macro_path, Cli};
use crate::errors::{MacroVaultError, Result};
use crate::repository::{MacroRepository, Record};

/// Execute the `save` command.
pub fn execute(cli: &Cli, input: &str, target: &str, force: bool) -> Result<()> {
    let settings = load_settings(cli)?;
    let path = resolve_macro_path(cli, &settings, target);

    // 1. Read and validate the record before asking for anything.
    let record = read_record(input)?;

    let repo = MacroRepository::new();

    // 2. Confirm the overwrite and take a backup of the current version.
    if repo.exists(&path) {
        if !force && !confirm(&format!("{} exists. Overwrite?", path.display()))? {
            output::info("Cancelled.");
            return Ok(());
        }
        if settings.backup_before_save {
            backup_existing(&settings.backup_manager(), &path);
        }
    }

    // 3. Choose a password and write the encrypted file.
    let password = prompt_new_password()?;
    repo.save(&record, &path, &password)?;

    output::success(&format!("Saved {}", path.display()));
    output::tip("Keep your password safe: it cannot be recovered.");

    Ok(())
}

/// Read a JSON object from a file, or from stdin when `input` is `-`.
fn read_record(input: &str) -> Result<Record> {
    let text = if input == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(input)?
    };

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(_) => Err(MacroVaultError::CommandFailed(
            "the record must be a JSON object".into(),
        )),
        Err(e) => Err(MacroVaultError::CommandFailed(format!(
            "cannot parse {input} as JSON: {e}"
        ))),
    }
}

/// Back up `path` before it is overwritten. Failures only warn.
fn backup_existing(manager: &BackupManager, path: &Path) {
    match manager.create_backup(path) {
        Ok(backup) => output::info(&format!("Backed up previous version to {}", backup.display())),
        Err(e) => output::warning(&format!("{e} (continuing without backup)")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn read_record_accepts_objects() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("r.json");
        fs::write(&file, r#"{"name": "m1", "operations": []}"#).unwrap();

        let record = read_record(file.to_str().unwrap()).unwrap();
        assert_eq!(record["name"], "m1");
    }

    #[test]
    fn read_record_rejects_arrays_and_garbage() {
        let dir = TempDir::new().unwrap();
        let array = dir.path().join("a.json");
        fs::write(&array, "[1, 2]").unwrap();
        assert!(read_record(array.to_str().unwrap()).is_err());

        let garbage = dir.path().join("g.json");
        fs::write(&garbage, "{not json").unwrap();
        assert!(read_record(garbage.to_str().unwrap()).is_err());
    }
}
