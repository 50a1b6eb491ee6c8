use std::io::Write;

use colored::Colorize;
use dirtree::config::{Snapshot, SnapshotError};
use dirtree::store::StoreError;
use dirtree::{CancelContext, NodeDescriptor, TreeError, TreeNode};
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::application::data::Listing;

pub struct Application;

impl Application {
    pub fn run(runtime_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let runtime_config: RuntimeConfig = runtime_config.into();
        if supports_color::on(supports_color::Stream::Stdout).is_none() {
            colored::control::set_override(false);
        }

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        Self::inspect(&runtime_config, &mut out)
    }

    fn inspect(runtime_config: &RuntimeConfig, out: &mut impl Write) -> Result<(), ApplicationError> {
        let Snapshot {
            root,
            limits,
            mut store,
        } = Snapshot::from_path(&runtime_config.snapshot).context(SnapshotSnafu)?;
        let limits = runtime_config.effective_limits(limits);
        debug!("Effective load limits: {:?}", limits);

        let mut tree = store.root_node(root).context(RootSnafu)?;
        let ctx = CancelContext::new();
        let totals = tree
            .bounded_load(&ctx, &limits, Some(&mut store), None, None)
            .context(LoadSnafu)?;
        info!(
            "Loaded {} entries ({} bytes) below {}",
            totals.total_count,
            totals.total_size,
            tree.id()
        );

        let lines = Self::render(&tree, runtime_config.listing).context(ListingSnafu)?;
        for line in lines {
            writeln!(out, "{line}").context(OutputSnafu)?;
        }
        writeln!(
            out,
            "{} {} entries, {} bytes",
            "total:".bold(),
            totals.total_count,
            totals.total_size
        )
        .context(OutputSnafu)?;

        Ok(())
    }

    fn render(tree: &TreeNode, listing: Listing) -> Result<Vec<String>, TreeError> {
        let lines = match listing {
            Listing::PureFiles => Self::entry_lines(tree.all_pure_files()?),
            Listing::Folders => Self::entry_lines(tree.all_folders()?),
            Listing::Dfs => Self::entry_lines(tree.all_folders_and_files()?),
            Listing::Bfs => Self::entry_lines(tree.all_folders_and_files_bfs()?),
            Listing::Levels => {
                let mut lines = Vec::new();
                for (index, level) in tree.all_folders_and_files_by_level()?.into_iter().enumerate() {
                    lines.push(format!("level {index}:").bold().to_string());
                    lines.extend(
                        Self::entry_lines(level)
                            .into_iter()
                            .map(|line| format!("  {line}")),
                    );
                }
                lines
            }
            Listing::Preorder | Listing::Postorder => {
                let ctx = CancelContext::new();
                let mut lines = Vec::new();
                let mut visitor = |_: &CancelContext, dir: &TreeNode| -> Result<(), TreeError> {
                    lines.push(Self::dir_line(dir));
                    Ok(())
                };
                if listing == Listing::Preorder {
                    tree.dfs_preorder(&ctx, &mut visitor)?;
                } else {
                    tree.dfs_postorder(&ctx, &mut visitor)?;
                }
                lines
            }
        };
        Ok(lines)
    }

    fn entry_lines(entries: Vec<&NodeDescriptor>) -> Vec<String> {
        entries.into_iter().map(Self::entry_line).collect()
    }

    fn entry_line(entry: &NodeDescriptor) -> String {
        if entry.is_folder() {
            format!("{:<6} {:>6}  {}", entry.kind_label(), entry.id(), entry.name().blue().bold())
        } else {
            format!(
                "{:<6} {:>6}  {} {}",
                entry.kind_label(),
                entry.id(),
                entry.name(),
                format!("({} bytes)", entry.size()).dimmed()
            )
        }
    }

    fn dir_line(dir: &TreeNode) -> String {
        let name = if dir.is_virtual() {
            format!("<virtual {}>", dir.id())
        } else {
            dir.descriptor().name().to_string()
        };
        format!(
            "{}{} {}",
            "  ".repeat(dir.depth()),
            name.blue().bold(),
            format!(
                "({} entries, {} bytes)",
                dir.count().unwrap_or(0),
                dir.size().unwrap_or(0)
            )
            .dimmed()
        )
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while reading the snapshot"))]
    SnapshotError { source: SnapshotError },
    #[snafu(display("Snapshot root cannot be used as a traversal root"))]
    RootError { source: StoreError },
    #[snafu(display("Critical failure encountered while loading the tree"))]
    LoadError { source: TreeError },
    #[snafu(display("Critical failure encountered while listing the tree"))]
    ListingError { source: TreeError },
    #[snafu(display("Failed to write the listing"))]
    OutputError { source: std::io::Error },
}
