//! tripscan CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tripscan_cli::cmd;
use tripscan_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so `--json` output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Search {
            destination,
            sort,
            min_rating,
            limit,
            json,
        } => {
            let opts = cmd::search::SearchOptions {
                sort,
                min_rating,
                limit,
                json,
            };
            cmd::search::search(&global, &destination, &opts).await
        }
        Commands::Shell => cmd::shell::shell(&global).await,
        Commands::Suggest { text, limit } => cmd::suggest::suggest(&text, limit),
        Commands::Sources => cmd::sources::sources(&global),
        Commands::Config { init } => cmd::config::config(&global, init),
    }
}
