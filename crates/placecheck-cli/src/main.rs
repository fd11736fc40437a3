mod commands;
mod console;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "placecheck")]
#[command(about = "Cross-checks a place's location across two map providers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for a place and render the dual-surface comparison.
    Search {
        query: String,
        /// Also reveal the correction overlay on the primary surface.
        #[arg(long)]
        reveal: bool,
    },
    /// Fetch autocomplete suggestions for a partial query.
    Suggest { text: String },
    /// Show which provider credentials the backend provisions.
    Keys,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = placecheck_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search { query, reveal } => commands::run_search(&config, &query, reveal).await,
        Commands::Suggest { text } => commands::run_suggest(&config, &text).await,
        Commands::Keys => commands::run_keys(&config).await,
    }
}
