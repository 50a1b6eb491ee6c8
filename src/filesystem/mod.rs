//! Directory tree representation with lazy, level-by-level loading.
//!
//! Entries of the backing store are described by [`NodeDescriptor`]s, and
//! folders are wrapped into [`TreeNode`]s that own the children discovered
//! so far.

mod descriptor;
mod tree;

pub use descriptor::{EntryId, EntryKind, NodeDescriptor, VolumeId};
pub use tree::TreeNode;
