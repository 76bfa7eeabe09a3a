use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "bolt", about = "Inspect LLM providers, credentials and models")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a one-shot prompt to a model
    Ask(commands::ask::AskArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// List models and manage API keys
    Models(commands::models::ModelsArgs),
    /// List providers and their credential status
    Providers(commands::providers::ProvidersArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Ask(args) => commands::ask::run(args).await,
        Commands::Config(args) => commands::config::run(args),
        Commands::Models(args) => commands::models::run(args).await,
        Commands::Providers(args) => commands::providers::run(args),
    }
}
