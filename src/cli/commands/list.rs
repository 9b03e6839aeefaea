//! `macrovault list`: display macro files in a table.

use crate::cli::output;
use crate::cli::{load_settings, resolve_dir, Cli};
use crate::errors::Result;
use crate::repository::MacroRepository;

/// Execute the `list` command.
pub fn execute(cli: &Cli, dir: Option<&str>) -> Result<()> {
    let settings = load_settings(cli)?;
    let directory = resolve_dir(cli, &settings, dir);
    let repo = MacroRepository::new();

    let files = repo
        .list_recordings(&directory)?
        .iter()
        .map(|path| repo.file_info(path))
        .collect::<Result<Vec<_>>>()?;

    output::info(&format!(
        "{}: {} macro file(s)",
        directory.display(),
        files.len()
    ));
    output::print_recordings_table(&files);

    Ok(())
}
