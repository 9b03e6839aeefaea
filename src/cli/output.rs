//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::backup::BackupEntry;
use crate::repository::FileInfo;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of macro files (Name, Size, Modified).
pub fn print_recordings_table(files: &[FileInfo]) {
    if files.is_empty() {
        info("No macro files found.");
        tip("Run `macrovault save <record.json> <name>` to store your first macro.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Size", "Modified"]);

    for f in files {
        table.add_row(vec![
            f.name.clone(),
            format_size(f.size),
            f.modified.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }

    println!("{table}");
}

/// Print a table of backups (#, Created, Size, Path).
pub fn print_backups_table(backups: &[BackupEntry]) {
    if backups.is_empty() {
        info("No backups yet.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Created", "Size", "Path"]);

    for (i, b) in backups.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            b.created.format("%Y-%m-%d %H:%M:%S").to_string(),
            format_size(b.size),
            b.path.display().to_string(),
        ]);
    }

    println!("{table}");
}

/// Format file size in human-readable form.
#[allow(clippy::cast_precision_loss)] // File sizes are well within f64 precision range
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
