use snafu::{OptionExt, ensure};
use tracing::{debug, warn};

use crate::context::CancelContext;
use crate::error::{
    FileCountExceededSnafu, MaxDepthExceededSnafu, NoRetrievalFunctionSnafu, NotAFolderSnafu,
    TotalSizeExceededSnafu, TreeError,
};
use crate::filesystem::{EntryId, NodeDescriptor, TreeNode, VolumeId};
use crate::traversal::DirVisitor;

/// Depth used when no max depth is given. Guards against malformed or
/// cyclic backing data.
pub const DEFAULT_MAX_DEPTH: usize = 100;
/// Count limit used when none is given.
pub const DEFAULT_MAX_TOTAL_COUNT: u64 = 100_000;

/// Direct children of one folder, split by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NextLevel {
    pub files: Vec<NodeDescriptor>,
    pub folders: Vec<NodeDescriptor>,
}

/// Fetches the direct children of a folder from the backing store.
///
/// Implementations must return only the direct children of `folder_id`,
/// never the folder itself, and must put every entry in the right list:
/// the loader does not re-check kinds. Any error aborts the running load and
/// is returned to its caller unchanged.
///
/// Implemented for every
/// `FnMut(&CancelContext, VolumeId, EntryId) -> Result<NextLevel, TreeError>`.
pub trait RetrieveNextLevel {
    fn retrieve(
        &mut self,
        ctx: &CancelContext,
        volume_id: VolumeId,
        folder_id: EntryId,
    ) -> Result<NextLevel, TreeError>;
}

impl<F> RetrieveNextLevel for F
where
    F: FnMut(&CancelContext, VolumeId, EntryId) -> Result<NextLevel, TreeError>,
{
    fn retrieve(
        &mut self,
        ctx: &CancelContext,
        volume_id: VolumeId,
        folder_id: EntryId,
    ) -> Result<NextLevel, TreeError> {
        self(ctx, volume_id, folder_id)
    }
}

/// Limits of a bounded load. Unset depth and count fall back to
/// [`DEFAULT_MAX_DEPTH`] and [`DEFAULT_MAX_TOTAL_COUNT`]; an unset size
/// means the total size is not limited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadLimits {
    pub max_depth: Option<usize>,
    pub count_limit: Option<u64>,
    pub size_limit: Option<u64>,
}

impl LoadLimits {
    /// Builds limits from signed values where a negative number means unset.
    pub fn from_signed(max_depth: i64, count_limit: i64, size_limit: i64) -> Self {
        Self {
            max_depth: usize::try_from(max_depth).ok(),
            count_limit: u64::try_from(count_limit).ok(),
            size_limit: u64::try_from(size_limit).ok(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_count_limit(mut self, count_limit: u64) -> Self {
        self.count_limit = Some(count_limit);
        self
    }

    pub fn with_size_limit(mut self, size_limit: u64) -> Self {
        self.size_limit = Some(size_limit);
        self
    }

    pub fn effective_max_depth(&self) -> usize {
        self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH)
    }

    pub fn effective_count_limit(&self) -> u64 {
        self.count_limit.unwrap_or(DEFAULT_MAX_TOTAL_COUNT)
    }
}

/// Size and entry count accumulated over a whole tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadTotals {
    pub total_size: u64,
    pub total_count: u64,
}

/// State shared by every folder of one bounded load.
struct LoadPass<'a> {
    ctx: &'a CancelContext,
    max_depth: usize,
    count_limit: u64,
    size_limit: Option<u64>,
    totals: LoadTotals,
    retrieve: Option<&'a mut dyn RetrieveNextLevel>,
    pre_visit: Option<&'a mut dyn DirVisitor>,
    post_visit: Option<&'a mut dyn DirVisitor>,
}

impl LoadPass<'_> {
    fn load_dir(&mut self, dir: &mut TreeNode) -> Result<(), TreeError> {
        ensure!(
            dir.descriptor().is_folder(),
            NotAFolderSnafu { id: dir.id() }
        );

        if dir.depth() >= self.max_depth {
            warn!(
                "Max recursion depth reached at directory {}: depth={}, max_depth={}",
                dir.id(),
                dir.depth(),
                self.max_depth
            );
            return MaxDepthExceededSnafu {
                depth: dir.depth(),
                max_depth: self.max_depth,
            }
            .fail();
        }

        if let Some(visitor) = self.pre_visit.as_mut() {
            visitor.visit(self.ctx, dir)?;
        }

        if !dir.is_loaded() {
            let retrieve = self
                .retrieve
                .as_mut()
                .context(NoRetrievalFunctionSnafu { id: dir.id() })?;
            let descriptor = dir.descriptor();
            let level = retrieve.retrieve(self.ctx, descriptor.volume_id(), descriptor.id())?;
            debug!(
                "Retrieved {} files and {} folders for directory {}",
                level.files.len(),
                level.folders.len(),
                dir.id()
            );
            dir.fill_direct(level.files, level.folders)?;
        }

        // Totals saturate at u64::MAX
        self.totals.total_count = self
            .totals
            .total_count
            .saturating_add(dir.count().unwrap_or(0));
        self.totals.total_size = self
            .totals
            .total_size
            .saturating_add(dir.size().unwrap_or(0));

        if self.totals.total_count > self.count_limit {
            warn!(
                "File count limit reached at directory {}: total_count={}, count_limit={}",
                dir.id(),
                self.totals.total_count,
                self.count_limit
            );
            return FileCountExceededSnafu {
                total_count: self.totals.total_count,
                count_limit: self.count_limit,
            }
            .fail();
        }

        if let Some(size_limit) = self.size_limit {
            if self.totals.total_size > size_limit {
                warn!(
                    "Total size limit reached at directory {}: total_size={}, size_limit={}",
                    dir.id(),
                    self.totals.total_size,
                    size_limit
                );
                return TotalSizeExceededSnafu {
                    total_size: self.totals.total_size,
                    size_limit,
                }
                .fail();
            }
        }

        for sub_dir in dir.sub_dirs_mut() {
            self.load_dir(sub_dir)?;
        }

        if let Some(visitor) = self.post_visit.as_mut() {
            visitor.visit(self.ctx, dir)?;
        }

        Ok(())
    }
}

impl TreeNode {
    /// Loads this folder and its descendants depth first, fetching every
    /// unloaded folder through `retrieve`.
    ///
    /// `pre_visit` runs on a folder before its children are fetched and
    /// `post_visit` after all of its sub-folders are done. Limits are checked
    /// after a folder's children are counted and before descending, so the
    /// folder that crosses a limit is part of the reported totals. Folders
    /// at `max_depth` or deeper are never expanded.
    ///
    /// A real root counts as one entry of its own. Folders filled before an
    /// error stay loaded; the error is the only result.
    pub fn bounded_load<'a>(
        &mut self,
        ctx: &'a CancelContext,
        limits: &LoadLimits,
        retrieve: Option<&'a mut dyn RetrieveNextLevel>,
        pre_visit: Option<&'a mut dyn DirVisitor>,
        post_visit: Option<&'a mut dyn DirVisitor>,
    ) -> Result<LoadTotals, TreeError> {
        let mut pass = LoadPass {
            ctx,
            max_depth: limits.effective_max_depth(),
            count_limit: limits.effective_count_limit(),
            size_limit: limits.size_limit,
            totals: LoadTotals::default(),
            retrieve,
            pre_visit,
            post_visit,
        };
        if !self.is_virtual() {
            pass.totals.total_count += 1;
        }

        debug!(
            "Starting bounded load of directory {}: max_depth={}, count_limit={}, size_limit={:?}",
            self.id(),
            pass.max_depth,
            pass.count_limit,
            pass.size_limit
        );
        pass.load_dir(self)?;
        debug!(
            "Bounded load of directory {} finished: {:?}",
            self.id(),
            pass.totals
        );
        Ok(pass.totals)
    }
}
