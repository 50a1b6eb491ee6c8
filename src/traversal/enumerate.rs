use crate::error::TreeError;
use crate::filesystem::{NodeDescriptor, TreeNode};
use crate::loader::LoadTotals;

/// Listings of an already loaded subtree. None of these trigger I/O; they
/// fail with [`TreeError::NotLoadedError`] when they reach an unloaded folder.
///
/// A virtual root never appears in the results, while a real root is always
/// listed first.
impl TreeNode {
    /// Every plain file, depth first.
    pub fn all_pure_files(&self) -> Result<Vec<&NodeDescriptor>, TreeError> {
        let mut files: Vec<&NodeDescriptor> = Vec::new();
        self.walk_depth_first(
            &mut |dir| {
                files.extend(dir.sub_files());
                Ok(())
            },
            &mut |_| Ok(()),
        )?;
        Ok(files)
    }

    /// Every folder, depth first.
    pub fn all_folders(&self) -> Result<Vec<&NodeDescriptor>, TreeError> {
        let mut folders = self.own_entry();
        self.walk_depth_first(
            &mut |dir| {
                folders.extend(dir.sub_folders());
                Ok(())
            },
            &mut |_| Ok(()),
        )?;
        Ok(folders)
    }

    /// Every folder and file, depth first. Each folder contributes its
    /// sub-folders first, then its files.
    pub fn all_folders_and_files(&self) -> Result<Vec<&NodeDescriptor>, TreeError> {
        let mut entries = self.own_entry();
        self.walk_depth_first(
            &mut |dir| {
                entries.extend(dir.sub_folders_and_files());
                Ok(())
            },
            &mut |_| Ok(()),
        )?;
        Ok(entries)
    }

    /// Same contributions as [`all_folders_and_files`](Self::all_folders_and_files),
    /// in breadth-first order.
    pub fn all_folders_and_files_bfs(&self) -> Result<Vec<&NodeDescriptor>, TreeError> {
        let mut entries = self.own_entry();
        self.walk_breadth_first(&mut |dir| {
            entries.extend(dir.sub_folders_and_files());
            Ok(())
        })?;
        Ok(entries)
    }

    /// Breadth-first entries grouped by level.
    ///
    /// A real root makes up the first level on its own. For a virtual root
    /// that level is skipped, so the first group holds the root's children.
    /// Groups run from the first to the deepest level reached, and a level
    /// without entries is an empty group.
    pub fn all_folders_and_files_by_level(&self) -> Result<Vec<Vec<&NodeDescriptor>>, TreeError> {
        let (min_level, mut levels) = if self.is_virtual() {
            (self.depth() + 1, Vec::new())
        } else {
            (self.depth(), vec![vec![self.descriptor()]])
        };

        self.walk_breadth_first(&mut |dir| {
            let index = dir.depth() + 1 - min_level;
            if levels.len() <= index {
                levels.resize_with(index + 1, Vec::new);
            }
            levels[index].extend(dir.sub_folders_and_files());
            Ok(())
        })?;
        Ok(levels)
    }

    /// Sums every loaded folder's direct size and count.
    ///
    /// A real root adds one to the count for itself, matching the totals
    /// returned by a bounded load. Sums saturate at `u64::MAX`.
    pub fn total_size_and_count(&self) -> Result<LoadTotals, TreeError> {
        let mut totals = LoadTotals::default();
        if !self.is_virtual() {
            totals.total_count += 1;
        }
        self.walk_depth_first(
            &mut |dir| {
                totals.total_size = totals.total_size.saturating_add(dir.size().unwrap_or(0));
                totals.total_count = totals.total_count.saturating_add(dir.count().unwrap_or(0));
                Ok(())
            },
            &mut |_| Ok(()),
        )?;
        Ok(totals)
    }

    fn own_entry(&self) -> Vec<&NodeDescriptor> {
        if self.is_virtual() {
            Vec::new()
        } else {
            vec![self.descriptor()]
        }
    }
}
