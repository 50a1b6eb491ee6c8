//! Backing stores that answer next-level retrievals.

mod memory_store;

pub use memory_store::{MemoryStore, StoreError};
