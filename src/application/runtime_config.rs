use std::path::PathBuf;

use dirtree::LoadLimits;

use crate::application::data::Listing;
use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub snapshot: PathBuf,
    pub listing: Listing,
    pub max_depth: Option<usize>,
    pub count_limit: Option<u64>,
    pub size_limit: Option<u64>,
}

impl RuntimeConfig {
    /// Command line limits win over the ones stored in the snapshot.
    pub fn effective_limits(&self, snapshot_limits: LoadLimits) -> LoadLimits {
        LoadLimits {
            max_depth: self.max_depth.or(snapshot_limits.max_depth),
            count_limit: self.count_limit.or(snapshot_limits.count_limit),
            size_limit: self.size_limit.or(snapshot_limits.size_limit),
        }
    }
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            snapshot: cli.snapshot,
            listing: cli.listing,
            max_depth: cli.max_depth,
            count_limit: cli.count_limit,
            size_limit: cli.size_limit,
        }
    }
}
