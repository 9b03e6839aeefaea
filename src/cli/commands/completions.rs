//! `macrovault completions`: print a shell completion script.
//!
//!   macrovault completions bash > ~/.local/share/bash-completion/completions/macrovault
//!   macrovault completions zsh > "${fpath[1]}/_macrovault"

use std::io::{self, Write};

use clap::{CommandFactory, ValueEnum};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::{MacroVaultError, Result};

/// Execute the `completions` command.
pub fn execute(shell: &str) -> Result<()> {
    let shell = parse_shell(shell)?;
    write_completions(shell, &mut io::stdout().lock());
    Ok(())
}

/// Render the completion script for `shell` into `out`.
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin, out);
}

/// Case-insensitive shell lookup; `ps` is accepted for PowerShell.
fn parse_shell(name: &str) -> Result<Shell> {
    if name.eq_ignore_ascii_case("ps") {
        return Ok(Shell::PowerShell);
    }

    Shell::from_str(name, true).map_err(|_| {
        let supported: Vec<String> = Shell::value_variants()
            .iter()
            .filter_map(|s| s.to_possible_value())
            .map(|v| v.get_name().to_string())
            .collect();
        MacroVaultError::CommandFailed(format!(
            "unknown shell '{name}' (supported: {})",
            supported.join(", ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_shells_parse_in_any_case() {
        assert_eq!(parse_shell("bash").unwrap(), Shell::Bash);
        assert_eq!(parse_shell("ZSH").unwrap(), Shell::Zsh);
        assert_eq!(parse_shell("ps").unwrap(), Shell::PowerShell);
    }

    #[test]
    fn unknown_shell_lists_supported_ones() {
        let err = parse_shell("tcsh").unwrap_err().to_string();
        assert!(err.contains("tcsh"));
        assert!(err.contains("bash"));
        assert!(parse_shell("").is_err());
    }

    #[test]
    fn bash_script_covers_backup_subcommands() {
        let mut buf = Vec::new();
        write_completions(Shell::Bash, &mut buf);
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("macrovault"));
        assert!(script.contains("restore"));
        assert!(script.contains("stats"));
    }
}
