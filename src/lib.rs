//! Lazily loaded directory trees backed by a remote store.
//!
//! A [`TreeNode`] starts out knowing only its own descriptor. Its children
//! are fetched level by level, either one folder at a time through
//! [`TreeNode::fill_direct`] or recursively through
//! [`TreeNode::bounded_load`], which stops at configurable depth, count and
//! size limits. Loaded trees can be walked and listed depth first or breadth
//! first without further I/O.

#![allow(clippy::enum_variant_names)]

pub mod config;
pub mod context;
pub mod error;
pub mod filesystem;
pub mod loader;
pub mod store;
pub mod traversal;

pub use context::CancelContext;
pub use error::TreeError;
pub use filesystem::{EntryId, EntryKind, NodeDescriptor, TreeNode, VolumeId};
pub use loader::{LoadLimits, LoadTotals, NextLevel, RetrieveNextLevel};
pub use traversal::DirVisitor;
