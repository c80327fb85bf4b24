use serde::{Deserialize, Serialize};
use std::fmt;

/*
 * An opaque identifier for a folder in the tree.
 * Ids are allocated by `FolderTree` from a monotonically increasing counter and are
 * never reused within a session. They are also the keys the platform layer uses to
 * address rows, so no separate row-id mapping is needed.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(pub u64);

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/*
 * Represents a single folder in the in-memory tree.
 * The node does not own its children; it only lists their ids in display order.
 * `parent` is a non-owning back-link used for navigation. Ownership of every node
 * lives in the `FolderTree` arena, which keeps `children` and `parent` in agreement.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct FolderNode {
    pub id: FolderId,
    pub name: String,
    pub is_open: bool,
    pub is_hide: bool,
    pub(crate) parent: Option<FolderId>,
    pub(crate) children: Vec<FolderId>,
}

impl FolderNode {
    /*
     * Creates a closed, visible node with no parent and no children.
     * The tree is responsible for linking it into place.
     */
    pub fn new(id: FolderId, name: String) -> Self {
        FolderNode {
            id,
            name,
            is_open: false,
            is_hide: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<FolderId> {
        self.parent
    }

    pub fn children(&self) -> &[FolderId] {
        &self.children
    }

    // A node without children never shows an expand affordance.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /*
     * Case-insensitive substring match against the folder name.
     * `keyword_lower` must already be lowercased by the caller so that a search over
     * the whole tree lowercases the keyword only once.
     */
    pub fn name_matches(&self, keyword_lower: &str) -> bool {
        self.name.to_lowercase().contains(keyword_lower)
    }

    pub fn to_record(&self) -> FolderRecord {
        FolderRecord {
            id: self.id,
            name: self.name.clone(),
            is_open: self.is_open,
            is_hide: self.is_hide,
            parent: self.parent,
            children: self.children.clone(),
        }
    }
}

/*
 * The persisted shape of a folder, as exchanged with the storage collaborator.
 * It mirrors `FolderNode` field by field. `#[serde(default)]` on the flags keeps older
 * documents that predate a flag loadable.
 */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderRecord {
    pub id: FolderId,
    pub name: String,
    #[serde(default)]
    pub is_open: bool,
    #[serde(default)]
    pub is_hide: bool,
    #[serde(default)]
    pub parent: Option<FolderId>,
    #[serde(default)]
    pub children: Vec<FolderId>,
}

impl FolderRecord {
    #[cfg(test)]
    pub fn new_test(id: u64, name: &str, parent: Option<u64>, children: &[u64]) -> Self {
        FolderRecord {
            id: FolderId(id),
            name: name.to_string(),
            is_open: false,
            is_hide: false,
            parent: parent.map(FolderId),
            children: children.iter().copied().map(FolderId).collect(),
        }
    }
}
