use hashlink::LinkedHashMap;
use snafu::{OptionExt, Snafu, ensure};
use tracing::{debug, trace};

use crate::context::CancelContext;
use crate::error::TreeError;
use crate::filesystem::{EntryId, EntryKind, NodeDescriptor, TreeNode, VolumeId};
use crate::loader::{NextLevel, RetrieveNextLevel};

/// In-memory backing store of one volume.
///
/// Children are kept in insertion order, which is the order retrievals
/// hand them out in. Any id `<= 0` is accepted as a virtual parent.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    volume_id: VolumeId,
    entries: LinkedHashMap<EntryId, NodeDescriptor>,
    children: LinkedHashMap<EntryId, Vec<EntryId>>,
}

impl MemoryStore {
    pub fn new(volume_id: VolumeId) -> Self {
        Self {
            volume_id,
            entries: LinkedHashMap::new(),
            children: LinkedHashMap::new(),
        }
    }

    pub fn volume_id(&self) -> VolumeId {
        self.volume_id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds an entry below its parent. Parents have to be inserted first.
    pub fn insert(&mut self, descriptor: NodeDescriptor) -> Result<(), StoreError> {
        let id = descriptor.id();
        ensure!(!id.is_virtual(), VirtualEntrySnafu { id });
        ensure!(
            descriptor.volume_id() == self.volume_id,
            ForeignVolumeSnafu {
                id,
                volume_id: descriptor.volume_id(),
                expected: self.volume_id,
            }
        );
        ensure!(!self.entries.contains_key(&id), DuplicateEntrySnafu { id });

        let parent = descriptor.parent_id().context(MissingParentSnafu { id })?;
        if !parent.is_virtual() {
            let parent_entry = self
                .entries
                .get(&parent)
                .context(UnknownParentSnafu { id, parent })?;
            ensure!(
                parent_entry.is_folder(),
                ParentNotFolderSnafu { id, parent }
            );
        }

        trace!("Inserting {} {} below {}", descriptor.kind(), id, parent);
        match self.children.get_mut(&parent) {
            Some(siblings) => siblings.push(id),
            None => {
                self.children.insert(parent, vec![id]);
            }
        }
        self.entries.insert(id, descriptor);
        Ok(())
    }

    pub fn descriptor(&self, id: EntryId) -> Option<&NodeDescriptor> {
        self.entries.get(&id)
    }

    /// Direct children of `folder_id`, split into files and folders.
    /// Unknown ids have no children.
    pub fn children(&self, folder_id: EntryId) -> NextLevel {
        let mut level = NextLevel::default();
        let child_ids = self
            .children
            .get(&folder_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for child in child_ids.iter().filter_map(|id| self.entries.get(id)) {
            if child.is_folder() {
                level.folders.push(child.clone());
            } else {
                level.files.push(child.clone());
            }
        }
        level
    }

    /// Builds the root node of a traversal: a virtual root for ids `<= 0`,
    /// otherwise the stored folder with that id at depth 0.
    pub fn root_node(&self, root_id: EntryId) -> Result<TreeNode, StoreError> {
        if root_id.is_virtual() {
            return TreeNode::new_virtual(root_id, self.volume_id, EntryKind::Folder)
                .context(RootNotFolderSnafu { id: root_id });
        }
        let descriptor = self
            .entries
            .get(&root_id)
            .context(UnknownRootSnafu { id: root_id })?;
        TreeNode::new(descriptor.clone(), 0, None, None).context(RootNotFolderSnafu { id: root_id })
    }

    /// Sample volume used across the crate's tests: virtual root 0 with 19
    /// entries, ten one-byte files, four levels deep.
    #[cfg(test)]
    pub(crate) fn reference_layout(volume_id: VolumeId) -> Self {
        const LAYOUT: &[(i64, i64, EntryKind)] = &[
            (10, 0, EntryKind::File),
            (11, 0, EntryKind::File),
            (12, 0, EntryKind::Folder),
            (13, 0, EntryKind::Folder),
            (20, 12, EntryKind::File),
            (21, 12, EntryKind::File),
            (22, 12, EntryKind::Folder),
            (23, 12, EntryKind::Folder),
            (24, 13, EntryKind::Folder),
            (30, 22, EntryKind::File),
            (31, 22, EntryKind::File),
            (32, 22, EntryKind::File),
            (33, 22, EntryKind::Folder),
            (34, 23, EntryKind::File),
            (35, 23, EntryKind::Folder),
            (36, 23, EntryKind::Folder),
            (37, 24, EntryKind::Folder),
            (41, 33, EntryKind::File),
            (42, 37, EntryKind::File),
        ];

        let mut store = Self::new(volume_id);
        for &(id, parent, kind) in LAYOUT {
            let (id, parent) = (EntryId(id), Some(EntryId(parent)));
            let descriptor = match kind {
                EntryKind::File => NodeDescriptor::file(id, parent, volume_id, 1),
                EntryKind::Folder => NodeDescriptor::folder(id, parent, volume_id),
            };
            store
                .insert(
                    descriptor
                        .with_name(format!("{}-{}", parent.unwrap_or(EntryId(0)), id))
                        .with_version(1),
                )
                .unwrap();
        }
        store
    }
}

impl RetrieveNextLevel for MemoryStore {
    fn retrieve(
        &mut self,
        ctx: &CancelContext,
        volume_id: VolumeId,
        folder_id: EntryId,
    ) -> Result<NextLevel, TreeError> {
        ctx.check()?;
        if volume_id != self.volume_id {
            return Err(TreeError::external(StoreError::ForeignVolumeError {
                id: folder_id,
                volume_id,
                expected: self.volume_id,
            }));
        }
        if !folder_id.is_virtual() && !self.entries.contains_key(&folder_id) {
            return Err(TreeError::external(StoreError::UnknownFolderError {
                id: folder_id,
            }));
        }

        let level = self.children(folder_id);
        debug!(
            "Memory store served folder {}: {} files, {} folders",
            folder_id,
            level.files.len(),
            level.folders.len()
        );
        Ok(level)
    }
}

#[derive(Debug, Snafu)]
pub enum StoreError {
    #[snafu(display("Entry {} uses an id reserved for virtual roots", id))]
    VirtualEntryError { id: EntryId },
    #[snafu(display("Entry {} belongs to volume {}, expected volume {}", id, volume_id, expected))]
    ForeignVolumeError {
        id: EntryId,
        volume_id: VolumeId,
        expected: VolumeId,
    },
    #[snafu(display("Entry {} is defined multiple times", id))]
    DuplicateEntryError { id: EntryId },
    #[snafu(display("Entry {} has no parent", id))]
    MissingParentError { id: EntryId },
    #[snafu(display("Parent {} of entry {} is not defined before it", parent, id))]
    UnknownParentError { id: EntryId, parent: EntryId },
    #[snafu(display("Parent {} of entry {} is not a folder", parent, id))]
    ParentNotFolderError { id: EntryId, parent: EntryId },
    #[snafu(display("Folder {} is not in the store", id))]
    UnknownFolderError { id: EntryId },
    #[snafu(display("Root {} is not in the store", id))]
    UnknownRootError { id: EntryId },
    #[snafu(display("Root {} is not a folder", id))]
    RootNotFolderError { id: EntryId },
}
