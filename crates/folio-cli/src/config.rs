//! CLI configuration and argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Version string shown by `--version`.
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Incremental Google Books search from the command line.
#[derive(Parser, Debug)]
#[command(
    name = "folio",
    version = version_info(),
    about = "Search the Google Books catalog, one page at a time"
)]
pub struct Config {
    /// Base URL of the catalog API
    #[arg(long, env = "FOLIO_BASE_URL")]
    pub base_url: Option<String>,

    /// Path to catalog.toml (defaults to the user config directory)
    #[arg(long, env = "FOLIO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search the catalog and page through results
    #[command(after_help = "Examples:
  folio search \"dune\"
  folio search \"rust programming\" --pages 3
  folio search \"tolkien\" --page-size 20")]
    Search {
        /// Search terms
        query: String,

        /// Pages to fetch: the first page plus load-more rounds
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// Items per page (defaults to the configured page size)
        #[arg(long)]
        page_size: Option<u32>,
    },
}
