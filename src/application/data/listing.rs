use clap::ValueEnum;

/// Which view of the loaded tree the inspector prints.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum Listing {
    /// Plain files only, depth first
    PureFiles,
    /// Folders only, depth first
    Folders,
    /// Folders and files, depth first
    #[default]
    Dfs,
    /// Folders and files, breadth first
    Bfs,
    /// Folders and files grouped by level
    Levels,
    /// Folders in the order a pre-order walk visits them
    Preorder,
    /// Folders in the order a post-order walk visits them
    Postorder,
}
