//! `macrovault delete`: remove a macro file.

use crate::cli::output;
use crate::cli::{confirm, load_settings, resolve_macro_path, Cli};
use crate::errors::Result;
use crate::repository::MacroRepository;

/// Execute the `delete` command.
///
/// Backups are left in place so the file can still be restored.
pub fn execute(cli: &Cli, file: &str, force: bool) -> Result<()> {
    let settings = load_settings(cli)?;
    let path = resolve_macro_path(cli, &settings, file);

    if !force && !confirm(&format!("Delete {}?", path.display()))? {
        output::info("Cancelled.");
        return Ok(());
    }

    if MacroRepository::new().delete(&path)? {
        output::success(&format!("Deleted {}", path.display()));
        output::tip("Backups were kept; use `macrovault backup list` to find them.");
    } else {
        output::info(&format!("{} did not exist", path.display()));
    }

    Ok(())
}
