use std::path::{Path, PathBuf};

use serde::Deserialize;
use snafu::prelude::*;
use tracing::debug;

use crate::filesystem::{EntryId, EntryKind, NodeDescriptor, VolumeId};
use crate::loader::LoadLimits;
use crate::store::{MemoryStore, StoreError};

/// A volume stored on disk as TOML: the traversal root, optional load limits
/// and every entry listed parent first.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub root: EntryId,
    pub limits: LoadLimits,
    pub store: MemoryStore,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSnapshot {
    volume: i64,
    #[serde(default)]
    root: i64,
    #[serde(default)]
    limits: RawLimits,
    #[serde(default)]
    entries: Vec<RawEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLimits {
    max_depth: Option<usize>,
    count_limit: Option<u64>,
    size_limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntry {
    id: i64,
    parent: i64,
    kind: EntryKind,
    #[serde(default)]
    size: u64,
    name: Option<String>,
    #[serde(default)]
    version: i64,
}

impl RawEntry {
    fn into_descriptor(self, volume_id: VolumeId) -> NodeDescriptor {
        let (id, parent) = (EntryId(self.id), Some(EntryId(self.parent)));
        let descriptor = match self.kind {
            EntryKind::File => NodeDescriptor::file(id, parent, volume_id, self.size),
            EntryKind::Folder => NodeDescriptor::folder(id, parent, volume_id),
        };
        let name = self.name.unwrap_or_else(|| format!("{}-{}", self.parent, self.id));
        descriptor.with_name(name).with_version(self.version)
    }
}

impl Snapshot {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        debug!("Reading snapshot file: {}", path.display());
        let contents = std::fs::read_to_string(path).context(ReadSnafu {
            file_path: path.to_path_buf(),
        })?;
        debug!("Successfully read snapshot file: {} bytes", contents.len());
        contents.as_str().try_into()
    }
}

impl TryFrom<&str> for Snapshot {
    type Error = SnapshotError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let raw: RawSnapshot = toml::from_str(contents).context(ParseSnafu)?;
        let volume_id = VolumeId(raw.volume);

        let mut store = MemoryStore::new(volume_id);
        for entry in raw.entries {
            store
                .insert(entry.into_descriptor(volume_id))
                .context(InvalidEntrySnafu)?;
        }
        debug!("Snapshot of volume {} holds {} entries", volume_id, store.len());

        Ok(Snapshot {
            root: EntryId(raw.root),
            limits: LoadLimits {
                max_depth: raw.limits.max_depth,
                count_limit: raw.limits.count_limit,
                size_limit: raw.limits.size_limit,
            },
            store,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum SnapshotError {
    #[snafu(display("Failed to read the snapshot file: {}", file_path.display()))]
    ReadError {
        file_path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the snapshot file"))]
    ParseError { source: toml::de::Error },
    #[snafu(display("Snapshot contains an invalid entry"))]
    InvalidEntryError { source: StoreError },
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use rstest::*;

    use super::*;

    const SMALL_SNAPSHOT: &str = r#"
volume = 7
root = 0

[limits]
max_depth = 4
count_limit = 50

[[entries]]
id = 10
parent = 0
kind = "file"
size = 3

[[entries]]
id = 12
parent = 0
kind = "folder"
name = "docs"
version = 2

[[entries]]
id = 20
parent = 12
kind = "file"
size = 5
"#;

    #[rstest]
    fn snapshot_returns_error_on_nonexistent_file() {
        let result = Snapshot::from_path("nonexistent.toml");
        assert!(matches!(result, Err(SnapshotError::ReadError { .. })));
    }

    #[rstest]
    #[case("volume = [unclosed")]
    #[case("root = 0")]
    #[case("volume = 1\nunknown = true")]
    #[case("volume = 1\n[[entries]]\nid = 1\nparent = 0\nkind = \"link\"")]
    fn snapshot_returns_parse_error(#[case] contents: &str) {
        let result: Result<Snapshot, _> = contents.try_into();
        assert!(matches!(result, Err(SnapshotError::ParseError { .. })));
    }

    #[rstest]
    #[case("volume = 1\n[[entries]]\nid = 5\nparent = 4\nkind = \"file\"")]
    #[case("volume = 1\n[[entries]]\nid = 5\nparent = 0\nkind = \"file\"\n[[entries]]\nid = 5\nparent = 0\nkind = \"folder\"")]
    fn snapshot_returns_invalid_entry_error(#[case] contents: &str) {
        let result: Result<Snapshot, _> = contents.try_into();
        assert!(matches!(result, Err(SnapshotError::InvalidEntryError { .. })));
    }

    #[rstest]
    fn snapshot_parses_entries_and_limits() {
        let snapshot: Snapshot = SMALL_SNAPSHOT.try_into().unwrap();

        assert_eq!(snapshot.root, EntryId(0));
        assert_eq!(snapshot.store.volume_id(), VolumeId(7));
        assert_eq!(snapshot.limits.max_depth, Some(4));
        assert_eq!(snapshot.limits.count_limit, Some(50));
        assert_eq!(snapshot.limits.size_limit, None);
        assert_eq!(snapshot.store.len(), 3);

        let docs = snapshot.store.descriptor(EntryId(12)).unwrap();
        assert_eq!(docs.name(), "docs");
        assert_eq!(docs.version(), 2);
        assert!(docs.is_folder());

        let file = snapshot.store.descriptor(EntryId(10)).unwrap();
        assert_eq!(file.name(), "0-10");
        assert_eq!(file.size(), 3);
    }

    #[rstest]
    fn snapshot_without_limits_uses_defaults() {
        let snapshot: Snapshot = "volume = 1".try_into().unwrap();

        assert_eq!(snapshot.limits, LoadLimits::default());
        assert!(snapshot.store.is_empty());
    }

    #[rstest]
    fn snapshot_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SMALL_SNAPSHOT.as_bytes()).unwrap();

        let snapshot = Snapshot::from_path(file.path()).unwrap();

        assert_eq!(snapshot.store.len(), 3);
        assert_eq!(snapshot.store.children(EntryId(12)).files.len(), 1);
    }
}
