//! Depth-first loading of a tree under depth, count and size limits.

mod bounded_load;

pub use bounded_load::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_TOTAL_COUNT, LoadLimits, LoadTotals, NextLevel,
    RetrieveNextLevel,
};
