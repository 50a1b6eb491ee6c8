use snafu::ensure;

use crate::context::CancelContext;
use crate::error::{NotLoadedSnafu, TreeError};
use crate::filesystem::TreeNode;

/// Callback invoked on directories during a walk or a bounded load.
///
/// Implemented for every `FnMut(&CancelContext, &TreeNode) -> Result<(), TreeError>`.
/// Returning an error aborts the walk, and the error reaches the caller unchanged.
pub trait DirVisitor {
    fn visit(&mut self, ctx: &CancelContext, dir: &TreeNode) -> Result<(), TreeError>;
}

impl<F> DirVisitor for F
where
    F: FnMut(&CancelContext, &TreeNode) -> Result<(), TreeError>,
{
    fn visit(&mut self, ctx: &CancelContext, dir: &TreeNode) -> Result<(), TreeError> {
        self(ctx, dir)
    }
}

impl TreeNode {
    /// Depth-first walk over the loaded folders, calling `pre_visit` before
    /// and `post_visit` after a folder's children.
    ///
    /// Does no I/O. Fails with [`TreeError::NotLoadedError`] on the first
    /// folder that has not been loaded yet.
    pub fn dfs_walk(
        &self,
        ctx: &CancelContext,
        mut pre_visit: Option<&mut dyn DirVisitor>,
        mut post_visit: Option<&mut dyn DirVisitor>,
    ) -> Result<(), TreeError> {
        self.walk_depth_first(
            &mut |dir| match pre_visit.as_mut() {
                Some(visitor) => visitor.visit(ctx, dir),
                None => Ok(()),
            },
            &mut |dir| match post_visit.as_mut() {
                Some(visitor) => visitor.visit(ctx, dir),
                None => Ok(()),
            },
        )
    }

    pub fn dfs_preorder(
        &self,
        ctx: &CancelContext,
        visitor: &mut dyn DirVisitor,
    ) -> Result<(), TreeError> {
        self.dfs_walk(ctx, Some(visitor), None)
    }

    pub fn dfs_postorder(
        &self,
        ctx: &CancelContext,
        visitor: &mut dyn DirVisitor,
    ) -> Result<(), TreeError> {
        self.dfs_walk(ctx, None, Some(visitor))
    }

    /// Level-order walk over the loaded folders.
    ///
    /// Every folder of the current frontier is visited in order; the next
    /// frontier holds their sub-folders, parent by parent.
    pub fn bfs_walk(
        &self,
        ctx: &CancelContext,
        visitor: &mut dyn DirVisitor,
    ) -> Result<(), TreeError> {
        self.walk_breadth_first(&mut |dir| visitor.visit(ctx, dir))
    }

    pub(crate) fn walk_depth_first<'a, Pre, Post>(
        &'a self,
        pre_visit: &mut Pre,
        post_visit: &mut Post,
    ) -> Result<(), TreeError>
    where
        Pre: FnMut(&'a TreeNode) -> Result<(), TreeError>,
        Post: FnMut(&'a TreeNode) -> Result<(), TreeError>,
    {
        ensure!(self.is_loaded(), NotLoadedSnafu { id: self.id() });
        pre_visit(self)?;
        for dir in self.sub_dirs() {
            dir.walk_depth_first(pre_visit, post_visit)?;
        }
        post_visit(self)
    }

    pub(crate) fn walk_breadth_first<'a, F>(&'a self, visit: &mut F) -> Result<(), TreeError>
    where
        F: FnMut(&'a TreeNode) -> Result<(), TreeError>,
    {
        let mut frontier: Vec<&'a TreeNode> = vec![self];

        while !frontier.is_empty() {
            let mut next_frontier: Vec<&'a TreeNode> = Vec::new();
            for dir in frontier {
                ensure!(dir.is_loaded(), NotLoadedSnafu { id: dir.id() });
                visit(dir)?;
                next_frontier.extend(dir.sub_dirs());
            }
            frontier = next_frontier;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::{EntryId, EntryKind, NodeDescriptor, VolumeId};

    const VOLUME: VolumeId = VolumeId(1);

    fn folder(id: i64, parent: i64) -> NodeDescriptor {
        NodeDescriptor::folder(EntryId(id), Some(EntryId(parent)), VOLUME)
    }

    /// root(0) -> 12 -> 22, root(0) -> 13; every folder loaded.
    fn small_tree() -> TreeNode {
        let mut root = TreeNode::new_virtual(EntryId(0), VOLUME, EntryKind::Folder).unwrap();
        root.fill_direct(vec![], vec![folder(12, 0), folder(13, 0)])
            .unwrap();
        root.sub_dirs_mut()[0]
            .fill_direct(vec![], vec![folder(22, 12)])
            .unwrap();
        root.sub_dirs_mut()[0].sub_dirs_mut()[0]
            .fill_direct(vec![], vec![])
            .unwrap();
        root.sub_dirs_mut()[1].fill_direct(vec![], vec![]).unwrap();
        root
    }

    fn noop(_: &CancelContext, _: &TreeNode) -> Result<(), TreeError> {
        Ok(())
    }

    fn ids(recorded: &[EntryId]) -> Vec<i64> {
        recorded.iter().map(|id| id.0).collect()
    }

    #[test]
    fn test_dfs_walk_orders() {
        let tree = small_tree();
        let ctx = CancelContext::new();
        let mut pre = Vec::new();
        let mut post = Vec::new();

        tree.dfs_walk(
            &ctx,
            Some(&mut |_: &CancelContext, dir: &TreeNode| -> Result<(), TreeError> {
                pre.push(dir.id());
                Ok(())
            }),
            Some(&mut |_: &CancelContext, dir: &TreeNode| -> Result<(), TreeError> {
                post.push(dir.id());
                Ok(())
            }),
        )
        .unwrap();

        assert_eq!(ids(&pre), vec![0, 12, 22, 13]);
        assert_eq!(ids(&post), vec![22, 12, 13, 0]);
    }

    #[test]
    fn test_bfs_walk_order() {
        let tree = small_tree();
        let mut visited = Vec::new();

        tree.bfs_walk(
            &CancelContext::new(),
            &mut |_: &CancelContext, dir: &TreeNode| -> Result<(), TreeError> {
                visited.push(dir.id());
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(ids(&visited), vec![0, 12, 13, 22]);
    }

    #[test]
    fn test_walks_require_loaded_root() {
        let root = TreeNode::new_virtual(EntryId(0), VOLUME, EntryKind::Folder).unwrap();
        let ctx = CancelContext::new();

        assert!(matches!(
            root.dfs_walk(&ctx, None, None),
            Err(TreeError::NotLoadedError { .. })
        ));
        assert!(matches!(
            root.bfs_walk(&ctx, &mut noop),
            Err(TreeError::NotLoadedError { .. })
        ));
    }

    #[test]
    fn test_walks_stop_at_unloaded_child() {
        let mut root = TreeNode::new_virtual(EntryId(0), VOLUME, EntryKind::Folder).unwrap();
        root.fill_direct(vec![], vec![folder(12, 0)]).unwrap();
        let ctx = CancelContext::new();

        let dfs = root.dfs_walk(&ctx, None, None);
        let bfs = root.bfs_walk(&ctx, &mut noop);

        assert!(matches!(dfs, Err(TreeError::NotLoadedError { id }) if id == EntryId(12)));
        assert!(matches!(bfs, Err(TreeError::NotLoadedError { id }) if id == EntryId(12)));
    }

    #[test]
    fn test_visitor_error_aborts_walk() {
        let tree = small_tree();
        let mut visited = Vec::new();

        let result = tree.dfs_preorder(
            &CancelContext::new(),
            &mut |_: &CancelContext, dir: &TreeNode| -> Result<(), TreeError> {
                visited.push(dir.id());
                if dir.id() == EntryId(12) {
                    return Err(TreeError::external("stop here"));
                }
                Ok(())
            },
        );

        assert!(matches!(result, Err(TreeError::ExternalError { .. })));
        assert_eq!(ids(&visited), vec![0, 12]);
    }

    #[test]
    fn test_postorder_shortcut() {
        let tree = small_tree();
        let mut visited = Vec::new();

        tree.dfs_postorder(
            &CancelContext::new(),
            &mut |_: &CancelContext, dir: &TreeNode| -> Result<(), TreeError> {
                visited.push(dir.id());
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(ids(&visited), vec![22, 12, 13, 0]);
    }

    #[test]
    fn test_visitor_sees_cancelled_context() {
        let tree = small_tree();
        let ctx = CancelContext::new();
        ctx.cancel();

        let result = tree.bfs_walk(&ctx, &mut |ctx: &CancelContext, _: &TreeNode| ctx.check());

        assert!(matches!(result, Err(TreeError::CancelledError)));
    }
}
