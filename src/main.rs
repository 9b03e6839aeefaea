use clap::Parser;
use macrovault::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

/// Route library logs to stderr, filtered by `MACROVAULT_LOG` (default: warn).
fn init_logging() {
    let filter =
        EnvFilter::try_from_env("MACROVAULT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Save {
            ref input,
            ref target,
            force,
        } => macrovault::cli::commands::save::execute(&cli, input, target, force),
        Commands::Show { ref file } => macrovault::cli::commands::show::execute(&cli, file),
        Commands::List { ref dir } => {
            macrovault::cli::commands::list::execute(&cli, dir.as_deref())
        }
        Commands::Info { ref file } => macrovault::cli::commands::info::execute(&cli, file),
        Commands::Delete { ref file, force } => {
            macrovault::cli::commands::delete::execute(&cli, file, force)
        }
        Commands::Backup { ref action } => {
            macrovault::cli::commands::backup::execute(&cli, action)
        }
        Commands::Completions { ref shell } => {
            macrovault::cli::commands::completions::execute(shell)
        }
    };

    if let Err(e) = result {
        macrovault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
