use derive_more::{Display, From};
use serde::Deserialize;

/// Opaque identifier of an entry in the backing store.
///
/// Ids `<= 0` never name a stored entry and are reserved for virtual roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From)]
pub struct EntryId(pub i64);

impl EntryId {
    pub fn is_virtual(self) -> bool {
        self.0 <= 0
    }
}

/// Namespace that a group of entries belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From)]
pub struct VolumeId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[display("file")]
    File,
    #[display("folder")]
    Folder,
}

impl EntryKind {
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Folder => "folder",
        }
    }
}

/// Immutable description of one file or folder as known to the backing store.
///
/// Folders always report a size of 0 here; the size of a folder's content is
/// tracked by the [`TreeNode`](crate::filesystem::TreeNode) wrapping it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDescriptor {
    id: EntryId,
    parent_id: Option<EntryId>,
    volume_id: VolumeId,
    name: String,
    kind: EntryKind,
    version: i64,
    size: u64,
    created_at: Option<i64>,
    created_by: Option<i64>,
    modified_at: Option<i64>,
    modified_by: Option<i64>,
}

impl NodeDescriptor {
    /// Creates a nameless descriptor of the given kind with size 0.
    pub fn new(
        id: EntryId,
        parent_id: Option<EntryId>,
        volume_id: VolumeId,
        kind: EntryKind,
    ) -> Self {
        Self {
            id,
            parent_id,
            volume_id,
            name: String::new(),
            kind,
            version: 0,
            size: 0,
            created_at: None,
            created_by: None,
            modified_at: None,
            modified_by: None,
        }
    }

    pub fn file(id: EntryId, parent_id: Option<EntryId>, volume_id: VolumeId, size: u64) -> Self {
        Self {
            size,
            ..Self::new(id, parent_id, volume_id, EntryKind::File)
        }
    }

    pub fn folder(id: EntryId, parent_id: Option<EntryId>, volume_id: VolumeId) -> Self {
        Self::new(id, parent_id, volume_id, EntryKind::Folder)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    pub fn with_created(mut self, at: i64, by: i64) -> Self {
        self.created_at = Some(at);
        self.created_by = Some(by);
        self
    }

    pub fn with_modified(mut self, at: i64, by: i64) -> Self {
        self.modified_at = Some(at);
        self.modified_by = Some(by);
        self
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Parent entry, `None` for roots.
    pub fn parent_id(&self) -> Option<EntryId> {
        self.parent_id
    }

    pub fn volume_id(&self) -> VolumeId {
        self.volume_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn created_at(&self) -> Option<i64> {
        self.created_at
    }

    pub fn created_by(&self) -> Option<i64> {
        self.created_by
    }

    pub fn modified_at(&self) -> Option<i64> {
        self.modified_at
    }

    pub fn modified_by(&self) -> Option<i64> {
        self.modified_by
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }

    pub fn kind_label(&self) -> &'static str {
        self.kind.label()
    }
}
