//! `macrovault info`: file details and backup history, no password needed.

use crate::cli::output;
use crate::cli::{load_settings, resolve_macro_path, Cli};
use crate::errors::Result;
use crate::repository::MacroRepository;

/// Execute the `info` command.
pub fn execute(cli: &Cli, file: &str) -> Result<()> {
    let settings = load_settings(cli)?;
    let path = resolve_macro_path(cli, &settings, file);

    let info = MacroRepository::new().file_info(&path)?;
    let backups = settings.backup_manager().list_backups(&path);

    println!("Name:      {}", info.name);
    println!("Path:      {}", path.display());
    println!("Size:      {}", output::format_size(info.size));
    println!("Modified:  {}", info.modified.format("%Y-%m-%d %H:%M:%S"));
    match info.created {
        Some(created) => println!("Created:   {}", created.format("%Y-%m-%d %H:%M:%S")),
        None => println!("Created:   unknown"),
    }
    println!("Encrypted: {}", if info.encrypted { "yes" } else { "no" });
    println!("Backups:   {}", backups.len());

    Ok(())
}
