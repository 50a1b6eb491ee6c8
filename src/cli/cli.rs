use std::path::PathBuf;

use clap::Parser;

use crate::application::data::{Listing, LogLevel};

/// Loads a directory snapshot under limits and prints one of its listings.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// TOML snapshot of the volume to inspect
    pub snapshot: PathBuf,
    #[clap(long, default_value = "dfs", value_enum)]
    pub listing: Listing,
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Overrides `max_depth` of the snapshot
    #[clap(long)]
    pub max_depth: Option<usize>,
    /// Overrides `count_limit` of the snapshot
    #[clap(long)]
    pub count_limit: Option<u64>,
    /// Overrides `size_limit` of the snapshot
    #[clap(long)]
    pub size_limit: Option<u64>,
}
