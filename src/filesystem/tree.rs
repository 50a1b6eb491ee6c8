use snafu::ensure;
use tracing::debug;

use crate::error::{AlreadyLoadedSnafu, NotAFolderSnafu, TreeError};
use crate::filesystem::{EntryId, EntryKind, NodeDescriptor, VolumeId};

/// A folder of the directory tree together with the part of its content
/// that has been discovered so far.
///
/// The tree is folder based: sub-folders are nested `TreeNode`s, plain files
/// are kept as descriptors. A node starts unloaded and becomes loaded exactly
/// once, when its direct children are filled in.
///
/// ```text
///   0 (virtual)
///   |--- 10, 11         files
///   |--- 12 (dir)
///   |     |--- 20, 21
///   |     |--- 22 (dir)
///   |     `--- 23 (dir)
///   `--- 13 (dir)
///         `--- 24 (dir)
/// ```
#[derive(Debug, Clone)]
pub struct TreeNode {
    descriptor: NodeDescriptor,
    sub_dirs: Vec<TreeNode>,
    sub_files: Vec<NodeDescriptor>,
    depth: usize,
    count: Option<u64>,
    size: Option<u64>,
    loaded: bool,
}

impl TreeNode {
    /// Wraps a folder descriptor. Returns `None` for anything but a folder.
    pub fn new(
        descriptor: NodeDescriptor,
        depth: usize,
        count: Option<u64>,
        size: Option<u64>,
    ) -> Option<Self> {
        if !descriptor.is_folder() {
            return None;
        }
        Some(TreeNode {
            descriptor,
            sub_dirs: Vec::new(),
            sub_files: Vec::new(),
            depth,
            count,
            size,
            loaded: false,
        })
    }

    /// Creates a root that does not exist in the backing store, such as the
    /// root of a volume.
    ///
    /// Only use it as the top-level traversal root. A virtual root is left
    /// out of folder enumerations and does not count towards totals, but its
    /// children are handled like any other.
    pub fn new_virtual(virtual_id: EntryId, volume_id: VolumeId, kind: EntryKind) -> Option<Self> {
        Self::new(
            NodeDescriptor::new(virtual_id, None, volume_id, kind),
            0,
            None,
            None,
        )
    }

    pub fn is_virtual(&self) -> bool {
        self.descriptor.id().is_virtual()
    }

    /// Fills this level with already known children, without recursing.
    ///
    /// Sub-folders become unloaded child nodes one level deeper.
    pub fn fill_direct(
        &mut self,
        files: Vec<NodeDescriptor>,
        folders: Vec<NodeDescriptor>,
    ) -> Result<(), TreeError> {
        ensure!(!self.loaded, AlreadyLoadedSnafu { id: self.id() });
        if let Some(not_folder) = folders.iter().find(|folder| !folder.is_folder()) {
            return NotAFolderSnafu {
                id: not_folder.id(),
            }
            .fail();
        }

        let child_depth = self.depth + 1;
        let sub_dirs = folders
            .into_iter()
            .filter_map(|folder| TreeNode::new(folder, child_depth, None, None))
            .collect::<Vec<_>>();

        self.count = Some((files.len() + sub_dirs.len()) as u64);
        self.size = Some(
            files
                .iter()
                .map(NodeDescriptor::size)
                .fold(0, u64::saturating_add),
        );
        self.sub_files = files;
        self.sub_dirs = sub_dirs;
        self.loaded = true;

        debug!(
            "Filled directory {} at depth {}: {} files, {} folders",
            self.id(),
            self.depth,
            self.sub_files.len(),
            self.sub_dirs.len()
        );
        Ok(())
    }

    pub fn descriptor(&self) -> &NodeDescriptor {
        &self.descriptor
    }

    pub fn id(&self) -> EntryId {
        self.descriptor.id()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of direct children, `None` until loaded.
    pub fn count(&self) -> Option<u64> {
        self.count
    }

    /// Size of the direct child files, `None` until loaded.
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn sub_dirs(&self) -> &[TreeNode] {
        &self.sub_dirs
    }

    pub(crate) fn sub_dirs_mut(&mut self) -> &mut [TreeNode] {
        &mut self.sub_dirs
    }

    /// Direct child files, not recursive.
    pub fn sub_files(&self) -> &[NodeDescriptor] {
        &self.sub_files
    }

    /// Direct child folders, not recursive.
    pub fn sub_folders(&self) -> Vec<&NodeDescriptor> {
        self.sub_dirs.iter().map(TreeNode::descriptor).collect()
    }

    /// Direct child folders followed by direct child files.
    pub fn sub_folders_and_files(&self) -> Vec<&NodeDescriptor> {
        self.sub_dirs
            .iter()
            .map(TreeNode::descriptor)
            .chain(self.sub_files.iter())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOLUME: VolumeId = VolumeId(1);

    fn file(id: i64, parent: i64, size: u64) -> NodeDescriptor {
        NodeDescriptor::file(EntryId(id), Some(EntryId(parent)), VOLUME, size)
    }

    fn folder(id: i64, parent: i64) -> NodeDescriptor {
        NodeDescriptor::folder(EntryId(id), Some(EntryId(parent)), VOLUME)
    }

    fn virtual_root() -> TreeNode {
        TreeNode::new_virtual(EntryId(0), VOLUME, EntryKind::Folder).unwrap()
    }

    #[test]
    fn test_new_rejects_files() {
        assert!(TreeNode::new(file(10, 0, 1), 0, None, None).is_none());
        assert!(TreeNode::new_virtual(EntryId(0), VOLUME, EntryKind::File).is_none());
    }

    #[test]
    fn test_new_node_is_unloaded() {
        let node = TreeNode::new(folder(12, 0), 1, None, None).unwrap();

        assert!(!node.is_loaded());
        assert!(!node.is_virtual());
        assert_eq!(node.depth(), 1);
        assert_eq!(node.count(), None);
        assert_eq!(node.size(), None);
        assert!(node.sub_dirs().is_empty());
        assert!(node.sub_files().is_empty());
    }

    #[test]
    fn test_virtual_root_has_no_parent() {
        let root = virtual_root();

        assert!(root.is_virtual());
        assert_eq!(root.depth(), 0);
        assert_eq!(root.descriptor().parent_id(), None);
        assert_eq!(root.descriptor().volume_id(), VOLUME);
    }

    #[test]
    fn test_fill_direct_sets_stats_and_children() {
        let mut root = virtual_root();
        root.fill_direct(
            vec![file(10, 0, 1), file(11, 0, 5)],
            vec![folder(12, 0), folder(13, 0)],
        )
        .unwrap();

        assert!(root.is_loaded());
        assert_eq!(root.count(), Some(4));
        assert_eq!(root.size(), Some(6));

        let child_ids = root.sub_dirs().iter().map(TreeNode::id).collect::<Vec<_>>();
        assert_eq!(child_ids, vec![EntryId(12), EntryId(13)]);
        for child in root.sub_dirs() {
            assert_eq!(child.depth(), 1);
            assert!(!child.is_loaded());
            assert_eq!(child.count(), None);
        }

        let combined = root
            .sub_folders_and_files()
            .into_iter()
            .map(NodeDescriptor::id)
            .collect::<Vec<_>>();
        assert_eq!(
            combined,
            vec![EntryId(12), EntryId(13), EntryId(10), EntryId(11)]
        );
    }

    #[test]
    fn test_fill_direct_twice_fails() {
        let mut root = virtual_root();
        root.fill_direct(vec![], vec![]).unwrap();

        let result = root.fill_direct(vec![file(10, 0, 1)], vec![]);

        assert!(matches!(
            result,
            Err(TreeError::AlreadyLoadedError { id }) if id == EntryId(0)
        ));
        assert_eq!(root.count(), Some(0));
    }

    #[test]
    fn test_fill_direct_rejects_file_in_folders() {
        let mut root = virtual_root();

        let result = root.fill_direct(vec![], vec![folder(12, 0), file(10, 0, 1)]);

        assert!(matches!(
            result,
            Err(TreeError::NotAFolderError { id }) if id == EntryId(10)
        ));
        assert!(!root.is_loaded());
    }

    #[test]
    fn test_fill_direct_size_saturates() {
        let mut root = virtual_root();
        root.fill_direct(vec![file(10, 0, u64::MAX), file(11, 0, 2)], vec![])
            .unwrap();

        assert_eq!(root.size(), Some(u64::MAX));
        assert_eq!(root.count(), Some(2));
    }

    #[test]
    fn test_empty_fill_loads_with_zero_stats() {
        let mut node = TreeNode::new(folder(35, 23), 3, None, None).unwrap();
        node.fill_direct(vec![], vec![]).unwrap();

        assert!(node.is_loaded());
        assert_eq!(node.count(), Some(0));
        assert_eq!(node.size(), Some(0));
    }
}
