//! tripscan - compare travel packages across booking sites
#![allow(missing_docs)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
//!
//! Fans a destination search out to every configured provider at once,
//! merges and de-duplicates what comes back, and lets you sort, filter and
//! open the results from the terminal.
//!
//! # Directory Layout
//!
//! ```text
//! ~/.tripscan/
//! └── config.toml   # sources, timeouts, live/mock mode
//! ```

pub mod cmd;
pub mod ui;

pub use tripscan_core::USER_AGENT;
pub use tripscan_core::paths::*;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tripscan_schema::SortKey;

#[derive(Debug, Parser)]
#[command(name = "tripscan")]
#[command(author, version, about = "tripscan - compare travel packages across booking sites")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Config file (defaults to ~/.tripscan/config.toml)
    #[arg(long, global = true, env = "TRIPSCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Use simulated sources instead of live endpoints
    #[arg(long, global = true, env = "TRIPSCAN_MOCK")]
    pub mock: bool,

    /// Per-source timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search every source for a destination
    Search {
        /// Destination, e.g. "Goa"
        destination: String,
        /// Sort order
        #[arg(long, short, default_value = "price")]
        sort: SortKey,
        /// Hide packages rated below this (0-5)
        #[arg(long, default_value_t = 0.0)]
        min_rating: f64,
        /// Show at most this many packages
        #[arg(long, short)]
        limit: Option<usize>,
        /// Print the session snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive search session
    Shell,
    /// Suggest destinations matching a partial name
    Suggest {
        /// Partial destination name
        text: String,
        /// Maximum number of suggestions
        #[arg(long, short, default_value_t = 5)]
        limit: usize,
    },
    /// List configured sources
    Sources,
    /// Show the effective configuration
    Config {
        /// Write a default config file instead
        #[arg(long)]
        init: bool,
    },
}
