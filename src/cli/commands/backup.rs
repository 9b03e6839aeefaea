//! `macrovault backup`: manage generational backups.
//!
//! Subcommands:
//! - `macrovault backup create <file>`: back up a macro file now
//! - `macrovault backup list <file>`: list its backups, newest first
//! - `macrovault backup restore <backup> <file>`: overwrite a file from a backup
//! - `macrovault backup delete <backup>`: remove one backup
//! - `macrovault backup clean <file>`: remove all backups of a file
//! - `macrovault backup stats [dir]`: totals for a directory

use std::path::Path;

use crate::cli::output;
use crate::cli::{confirm, load_settings, resolve_dir, resolve_macro_path, BackupAction, Cli};
use crate::errors::Result;

/// Execute a `backup` subcommand.
pub fn execute(cli: &Cli, action: &BackupAction) -> Result<()> {
    let settings = load_settings(cli)?;
    let manager = settings.backup_manager();

    match action {
        BackupAction::Create { file } => {
            let path = resolve_macro_path(cli, &settings, file);
            let backup = manager.create_backup(&path)?;
            output::success(&format!("Backup created at {}", backup.display()));
            output::tip(&format!(
                "Keeping the newest {} backup(s) per file.",
                manager.retention()
            ));
        }
        BackupAction::List { file } => {
            let path = resolve_macro_path(cli, &settings, file);
            let backups = manager.list_backups(&path);
            output::info(&format!(
                "{} backup(s) of {}",
                backups.len(),
                path.display()
            ));
            output::print_backups_table(&backups);
        }
        BackupAction::Restore { backup, target } => {
            let target = resolve_macro_path(cli, &settings, target);
            manager.restore_backup(Path::new(backup), &target)?;
            output::success(&format!("Restored {} from {backup}", target.display()));
        }
        BackupAction::Delete { backup } => {
            manager.delete_backup(Path::new(backup))?;
            output::success(&format!("Deleted backup {backup}"));
        }
        BackupAction::Clean { file, force } => {
            let path = resolve_macro_path(cli, &settings, file);
            if !force && !confirm(&format!("Delete all backups of {}?", path.display()))? {
                output::info("Cancelled.");
                return Ok(());
            }
            let deleted = manager.cleanup_all_backups(&path);
            output::success(&format!("Deleted {deleted} backup(s)"));
        }
        BackupAction::Stats { dir } => {
            let directory = resolve_dir(cli, &settings, dir.as_deref());
            let stats = manager.backup_statistics(&directory);
            println!("Backups:         {}", stats.total_backups);
            println!("Macro files:     {}", stats.unique_originals);
            println!("Total size:      {}", output::format_size(stats.total_size));
        }
    }

    Ok(())
}
