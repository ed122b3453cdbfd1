use clap::Parser;
use coldvault::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    // Quiet unless RUST_LOG asks for more.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Create {
            ref prefix,
            ref suffix,
            ref memo,
            workers,
        } => coldvault::cli::commands::create::execute(&cli, prefix, suffix, memo, workers),
        Commands::Import { ref memo } => coldvault::cli::commands::import_cmd::execute(&cli, memo),
        Commands::List => coldvault::cli::commands::list::execute(&cli),
        Commands::Show { ref address } => coldvault::cli::commands::show::execute(&cli, address),
        Commands::Passwd { ref address } => {
            coldvault::cli::commands::passwd::execute(&cli, address)
        }
        Commands::Delete { ref address, force } => {
            coldvault::cli::commands::delete::execute(&cli, address, force)
        }
        Commands::Sign { ref files } => coldvault::cli::commands::sign::execute(&cli, files),
        Commands::Check { ref text } => coldvault::cli::commands::check::execute(text),
    };

    if let Err(e) = result {
        coldvault::cli::output::error(&e.to_string());
        // Invariant violations get their own exit code.
        std::process::exit(if e.is_fatal() { 2 } else { 1 });
    }
}
