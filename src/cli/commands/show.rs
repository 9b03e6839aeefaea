//! `macrovault show`: decrypt a macro file and print its record.
//!
//! Password prompts repeat until the file opens or the attempt guard
//! locks it. Once locked, the command stops without prompting again.

use crate::cli::output;
use crate::cli::{load_settings, password_from_env, prompt_password, resolve_macro_path, Cli};
use crate::errors::{MacroVaultError, Result};
use crate::repository::{MacroRepository, Record};

/// Execute the `show` command.
pub fn execute(cli: &Cli, file: &str) -> Result<()> {
    let settings = load_settings(cli)?;
    let path = resolve_macro_path(cli, &settings, file);
    let guard = settings.attempt_guard();
    let repo = MacroRepository::new();

    if !repo.exists(&path) {
        return Err(MacroVaultError::NotFound(path));
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let non_interactive = password_from_env().is_some();

    let record: Record = loop {
        guard.check(&path)?;
        let password = prompt_password(&file_name)?;

        match repo.load_guarded(&path, &password, &guard) {
            Ok(record) => break record,
            Err(MacroVaultError::InvalidPassword) if !non_interactive => {
                let remaining = guard.remaining(&path);
                if remaining > 0 {
                    output::warning(&format!(
                        "Incorrect password ({remaining} attempt(s) left)"
                    ));
                }
            }
            Err(e) => return Err(e),
        }
    };

    let pretty = serde_json::to_string_pretty(&record)
        .map_err(|e| MacroVaultError::CommandFailed(format!("cannot render record: {e}")))?;
    println!("{pretty}");

    Ok(())
}
