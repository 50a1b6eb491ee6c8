use snafu::Snafu;

use crate::filesystem::EntryId;

/// Errors raised while filling, loading or walking a directory tree.
///
/// Every error is terminal for the operation that raised it. Errors returned
/// by a retrieval function or a visitor are handed back to the caller as-is.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TreeError {
    #[snafu(display("Directory {} is already loaded", id))]
    AlreadyLoadedError { id: EntryId },
    #[snafu(display("Directory {} is not loaded", id))]
    NotLoadedError { id: EntryId },
    #[snafu(display("Directory {} needs loading but no retrieval function was given", id))]
    NoRetrievalFunctionError { id: EntryId },
    #[snafu(display("Entry {} is not a folder", id))]
    NotAFolderError { id: EntryId },
    #[snafu(display("Max path depth reached: depth {} >= limit {}", depth, max_depth))]
    MaxDepthExceededError { depth: usize, max_depth: usize },
    #[snafu(display("File count limit reached: {} > {}", total_count, count_limit))]
    FileCountExceededError { total_count: u64, count_limit: u64 },
    #[snafu(display("Total size limit reached: {} > {}", total_size, size_limit))]
    TotalSizeExceededError { total_size: u64, size_limit: u64 },
    #[snafu(display("Operation was cancelled"))]
    CancelledError,
    #[snafu(display("External callback failed"))]
    ExternalError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl TreeError {
    /// Wraps an error produced by a retrieval function or a visitor.
    pub fn external(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        TreeError::ExternalError {
            source: error.into(),
        }
    }
}
