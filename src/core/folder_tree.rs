/*
 * The folder tree store: the single authoritative, explicitly owned in-memory tree.
 * Nodes live in an arena keyed by `FolderId`; parent/child edges are id lists, so the
 * parent link never owns anything and there are no reference cycles to manage.
 * Every mutation keeps `children` and the children's `parent` links in agreement.
 * Persistence is not done here; the presenter asks the storage collaborator to save
 * the `to_records()` snapshot after each mutation.
 */
use super::folder_node::{FolderId, FolderNode, FolderRecord};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    DuplicateId(FolderId),
    MissingParent { child: FolderId, parent: FolderId },
    MissingChild { parent: FolderId, child: FolderId },
    InconsistentLink { parent: FolderId, child: FolderId },
    Cycle(FolderId),
    // A stored id leaves no room for allocating new ones.
    IdSpaceExhausted(FolderId),
}

impl std::fmt::Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeError::DuplicateId(id) => write!(f, "Duplicate folder id {id}"),
            TreeError::MissingParent { child, parent } => {
                write!(f, "Folder {child} refers to missing parent {parent}")
            }
            TreeError::MissingChild { parent, child } => {
                write!(f, "Folder {parent} lists missing child {child}")
            }
            TreeError::InconsistentLink { parent, child } => write!(
                f,
                "Folder {child} and its parent {parent} disagree about their relationship"
            ),
            TreeError::Cycle(id) => write!(f, "Folder {id} is part of a parent cycle"),
            TreeError::IdSpaceExhausted(id) => {
                write!(f, "Folder {id} uses the largest possible id, no new folders could be added")
            }
        }
    }
}

impl std::error::Error for TreeError {}

pub type Result<T> = std::result::Result<T, TreeError>;

#[derive(Debug)]
pub struct FolderTree {
    nodes: HashMap<FolderId, FolderNode>,
    roots: Vec<FolderId>,
    next_id: u64,
}

impl Default for FolderTree {
    fn default() -> Self {
        FolderTree::new()
    }
}

impl FolderTree {
    pub fn new() -> Self {
        FolderTree {
            nodes: HashMap::new(),
            roots: Vec::new(),
            next_id: 1,
        }
    }

    /*
     * Rebuilds a tree from persisted records.
     * Roots are the parentless records in the order given (the storage collaborator
     * returns them sorted by name). Child order comes from each parent's stored
     * `children` list. Any record set that would corrupt the tree is rejected:
     * duplicate ids, dangling links, parent/children disagreement, or a cycle.
     */
    pub fn from_records(records: Vec<FolderRecord>) -> Result<Self> {
        let mut nodes: HashMap<FolderId, FolderNode> = HashMap::with_capacity(records.len());
        let mut roots = Vec::new();
        let mut max_id: u64 = 0;

        for record in records {
            if nodes.contains_key(&record.id) {
                return Err(TreeError::DuplicateId(record.id));
            }
            max_id = max_id.max(record.id.0);
            if record.parent.is_none() {
                roots.push(record.id);
            }
            let node = FolderNode {
                id: record.id,
                name: record.name,
                is_open: record.is_open,
                is_hide: record.is_hide,
                parent: record.parent,
                children: record.children,
            };
            nodes.insert(node.id, node);
        }

        let mut claimed: HashSet<FolderId> = HashSet::new();
        for node in nodes.values() {
            if let Some(parent_id) = node.parent {
                let parent = nodes.get(&parent_id).ok_or(TreeError::MissingParent {
                    child: node.id,
                    parent: parent_id,
                })?;
                if !parent.children.contains(&node.id) {
                    return Err(TreeError::InconsistentLink {
                        parent: parent_id,
                        child: node.id,
                    });
                }
            }
            for child_id in &node.children {
                let child = nodes.get(child_id).ok_or(TreeError::MissingChild {
                    parent: node.id,
                    child: *child_id,
                })?;
                if child.parent != Some(node.id) || !claimed.insert(*child_id) {
                    return Err(TreeError::InconsistentLink {
                        parent: node.id,
                        child: *child_id,
                    });
                }
            }
        }

        let next_id = max_id
            .checked_add(1)
            .ok_or(TreeError::IdSpaceExhausted(FolderId(max_id)))?;
        let tree = FolderTree {
            nodes,
            roots,
            next_id,
        };

        // With consistent links, a node unreachable from the roots can only sit on a cycle.
        let mut reachable = HashSet::with_capacity(tree.nodes.len());
        let mut stack: Vec<FolderId> = tree.roots.clone();
        while let Some(id) = stack.pop() {
            if reachable.insert(id) {
                stack.extend(tree.children_of(id).iter().copied());
            }
        }
        if let Some(orphan) = tree.nodes.keys().find(|id| !reachable.contains(*id)) {
            log::error!("FolderTree: Rejecting records, folder {orphan} is on a cycle.");
            return Err(TreeError::Cycle(*orphan));
        }

        log::debug!(
            "FolderTree: Rebuilt tree with {} folders ({} roots).",
            tree.nodes.len(),
            tree.roots.len()
        );
        Ok(tree)
    }

    /*
     * Snapshot of every node in root-major pre-order, the shape handed to the storage
     * collaborator's `save`.
     */
    pub fn to_records(&self) -> Vec<FolderRecord> {
        let mut records = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<FolderId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get(&id) {
                records.push(node.to_record());
                stack.extend(node.children.iter().rev().copied());
            }
        }
        records
    }

    // `None` once the id space is used up; the counter never wraps around.
    fn allocate_id(&mut self) -> Option<FolderId> {
        let id = FolderId(self.next_id);
        self.next_id = self.next_id.checked_add(1)?;
        Some(id)
    }

    /*
     * Appends a new closed, visible folder to the root collection.
     * An empty name is rejected with a warning and `None`; callers are expected to
     * validate input before submitting it.
     */
    pub fn add_root_folder(&mut self, name: &str) -> Option<FolderId> {
        if name.is_empty() {
            log::warn!("FolderTree: Ignoring request to add a root folder with an empty name.");
            return None;
        }
        let Some(id) = self.allocate_id() else {
            log::warn!("FolderTree: No folder id left for root folder '{name}'.");
            return None;
        };
        self.nodes.insert(id, FolderNode::new(id, name.to_string()));
        self.roots.push(id);
        log::debug!("FolderTree: Added root folder '{name}' as {id}.");
        Some(id)
    }

    /*
     * Appends a new folder under `parent` and opens the parent so that the new child
     * is visible without further interaction.
     */
    pub fn add_child_folder(&mut self, parent: FolderId, name: &str) -> Option<FolderId> {
        if name.is_empty() {
            log::warn!(
                "FolderTree: Ignoring request to add a child folder with an empty name under {parent}."
            );
            return None;
        }
        if !self.nodes.contains_key(&parent) {
            log::warn!("FolderTree: Cannot add child folder '{name}', parent {parent} not found.");
            return None;
        }
        let Some(id) = self.allocate_id() else {
            log::warn!("FolderTree: No folder id left for child folder '{name}'.");
            return None;
        };
        let mut child = FolderNode::new(id, name.to_string());
        child.parent = Some(parent);
        self.nodes.insert(id, child);
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
            parent_node.is_open = true;
        }
        log::debug!("FolderTree: Added child folder '{name}' as {id} under {parent}.");
        Some(id)
    }

    /*
     * Flips `is_open` on a single node. Returns false if the node does not exist.
     */
    pub fn toggle_open(&mut self, id: FolderId) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.is_open = !node.is_open;
                log::trace!("FolderTree: Folder {id} is_open -> {}.", node.is_open);
                true
            }
            None => {
                log::warn!("FolderTree: toggle_open on unknown folder {id}.");
                false
            }
        }
    }

    // Sets `is_open` directly. Returns false if the node does not exist.
    pub fn set_open(&mut self, id: FolderId, is_open: bool) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.is_open = is_open;
                true
            }
            None => false,
        }
    }

    /*
     * Flips the per-node hide flag. Returns the new value, or `None` if the node is
     * unknown.
     */
    pub fn toggle_hide(&mut self, id: FolderId) -> Option<bool> {
        let node = self.nodes.get_mut(&id)?;
        node.is_hide = !node.is_hide;
        log::trace!("FolderTree: Folder {id} is_hide -> {}.", node.is_hide);
        Some(node.is_hide)
    }

    /*
     * Removes a folder together with its whole subtree and detaches it from its parent
     * (or from the root list). Returns every removed id in pre-order; empty if the
     * folder was unknown.
     */
    pub fn delete_node(&mut self, id: FolderId) -> Vec<FolderId> {
        let Some(node) = self.nodes.get(&id) else {
            log::warn!("FolderTree: delete_node on unknown folder {id}.");
            return Vec::new();
        };
        match node.parent {
            Some(parent_id) => {
                if let Some(parent) = self.nodes.get_mut(&parent_id) {
                    parent.children.retain(|child| *child != id);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }

        let mut removed = Vec::new();
        self.remove_node_recursive(id, &mut removed);
        log::debug!(
            "FolderTree: Deleted folder {id} and {} descendant(s).",
            removed.len().saturating_sub(1)
        );
        removed
    }

    fn remove_node_recursive(&mut self, id: FolderId, removed: &mut Vec<FolderId>) {
        if let Some(node) = self.nodes.remove(&id) {
            removed.push(id);
            for child_id in node.children {
                self.remove_node_recursive(child_id, removed);
            }
        }
    }

    pub fn get(&self, id: FolderId) -> Option<&FolderNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: FolderId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn roots(&self) -> &[FolderId] {
        &self.roots
    }

    pub fn children_of(&self, id: FolderId) -> &[FolderId] {
        self.nodes
            .get(&id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent_of(&self, id: FolderId) -> Option<FolderId> {
        self.nodes.get(&id).and_then(FolderNode::parent)
    }

    // Chain from the outermost root down to, but excluding, `id`.
    pub fn ancestors(&self, id: FolderId) -> Vec<FolderId> {
        let mut chain = Vec::new();
        let mut current = self.parent_of(id);
        while let Some(ancestor) = current {
            chain.push(ancestor);
            current = self.parent_of(ancestor);
        }
        chain.reverse();
        chain
    }

    // Roots are at depth 0.
    pub fn depth(&self, id: FolderId) -> usize {
        self.ancestors(id).len()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A{B, C{D}}, all closed.
    fn sample_tree() -> (FolderTree, [FolderId; 4]) {
        let mut tree = FolderTree::new();
        let a = tree.add_root_folder("A").unwrap();
        let b = tree.add_child_folder(a, "B").unwrap();
        let c = tree.add_child_folder(a, "C").unwrap();
        let d = tree.add_child_folder(c, "D").unwrap();
        tree.set_open(a, false);
        tree.set_open(c, false);
        (tree, [a, b, c, d])
    }

    #[test]
    fn test_add_root_folder_defaults() {
        let mut tree = FolderTree::new();
        let id = tree.add_root_folder("Inbox").expect("root should be added");
        let node = tree.get(id).unwrap();
        assert_eq!(node.name, "Inbox");
        assert!(!node.is_open);
        assert!(!node.is_hide);
        assert_eq!(node.parent(), None);
        assert_eq!(tree.roots(), &[id]);
    }

    #[test]
    fn test_add_root_folder_rejects_empty_name() {
        let mut tree = FolderTree::new();
        assert_eq!(tree.add_root_folder(""), None);
        assert!(tree.is_empty());
        assert!(tree.roots().is_empty());
    }

    #[test]
    fn test_add_child_folder_links_and_opens_parent() {
        let mut tree = FolderTree::new();
        let parent = tree.add_root_folder("Work").unwrap();
        assert!(!tree.get(parent).unwrap().is_open);

        let child = tree.add_child_folder(parent, "Reports").unwrap();

        let parent_node = tree.get(parent).unwrap();
        assert!(parent_node.is_open);
        assert_eq!(parent_node.children(), &[child]);
        assert_eq!(tree.get(child).unwrap().name, "Reports");
        assert_eq!(tree.parent_of(child), Some(parent));
        assert_eq!(tree.roots(), &[parent]);
    }

    #[test]
    fn test_add_child_folder_to_unknown_parent_is_ignored() {
        let mut tree = FolderTree::new();
        assert_eq!(tree.add_child_folder(FolderId(42), "Lost"), None);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_toggle_open_only_touches_target() {
        let (mut tree, [a, b, c, d]) = sample_tree();
        assert!(tree.toggle_open(c));
        assert!(tree.get(c).unwrap().is_open);
        for other in [a, b, d] {
            assert!(!tree.get(other).unwrap().is_open);
        }
        assert!(tree.toggle_open(c));
        assert!(!tree.get(c).unwrap().is_open);
        assert!(!tree.toggle_open(FolderId(999)));
    }

    #[test]
    fn test_toggle_hide() {
        let (mut tree, [_, b, _, _]) = sample_tree();
        assert_eq!(tree.toggle_hide(b), Some(true));
        assert!(tree.get(b).unwrap().is_hide);
        assert_eq!(tree.toggle_hide(b), Some(false));
        assert_eq!(tree.toggle_hide(FolderId(999)), None);
    }

    #[test]
    fn test_delete_node_removes_subtree_and_detaches() {
        let (mut tree, [a, b, c, d]) = sample_tree();
        let removed = tree.delete_node(c);
        assert_eq!(removed, vec![c, d]);
        assert!(!tree.contains(c));
        assert!(!tree.contains(d));
        assert_eq!(tree.children_of(a), &[b]);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_delete_root_removes_from_roots() {
        let (mut tree, [a, ..]) = sample_tree();
        let other = tree.add_root_folder("Z").unwrap();
        let removed = tree.delete_node(a);
        assert_eq!(removed.len(), 4);
        assert_eq!(tree.roots(), &[other]);
        assert!(tree.delete_node(a).is_empty());
    }

    #[test]
    fn test_depth_and_ancestors() {
        let (tree, [a, b, c, d]) = sample_tree();
        assert_eq!(tree.depth(a), 0);
        assert_eq!(tree.depth(b), 1);
        assert_eq!(tree.depth(d), 2);
        assert_eq!(tree.ancestors(d), vec![a, c]);
        assert!(tree.ancestors(b).contains(&a));
        assert!(!tree.ancestors(b).contains(&c));
    }

    #[test]
    fn test_records_rebuild_same_tree() {
        let (mut tree, [a, b, c, d]) = sample_tree();
        tree.toggle_hide(b);
        tree.set_open(c, true);

        let rebuilt = FolderTree::from_records(tree.to_records()).unwrap();
        assert_eq!(rebuilt.roots(), &[a]);
        assert_eq!(rebuilt.children_of(a), &[b, c]);
        assert_eq!(rebuilt.children_of(c), &[d]);
        assert!(rebuilt.get(b).unwrap().is_hide);
        assert!(rebuilt.get(c).unwrap().is_open);

        // Ids allocated after a reload never collide with persisted ones.
        let mut rebuilt = rebuilt;
        let fresh = rebuilt.add_root_folder("E").unwrap();
        assert!(fresh.0 > d.0);
    }

    #[test]
    fn test_from_records_rejects_duplicate_ids() {
        let records = vec![
            FolderRecord::new_test(1, "A", None, &[]),
            FolderRecord::new_test(1, "B", None, &[]),
        ];
        assert_eq!(
            FolderTree::from_records(records).unwrap_err(),
            TreeError::DuplicateId(FolderId(1))
        );
    }

    #[test]
    fn test_from_records_rejects_missing_parent() {
        let records = vec![FolderRecord::new_test(2, "B", Some(1), &[])];
        assert_eq!(
            FolderTree::from_records(records).unwrap_err(),
            TreeError::MissingParent {
                child: FolderId(2),
                parent: FolderId(1)
            }
        );
    }

    #[test]
    fn test_from_records_rejects_disagreeing_links() {
        // B claims A as parent but A does not list B.
        let records = vec![
            FolderRecord::new_test(1, "A", None, &[]),
            FolderRecord::new_test(2, "B", Some(1), &[]),
        ];
        assert!(matches!(
            FolderTree::from_records(records),
            Err(TreeError::InconsistentLink { .. })
        ));

        // A lists a child that does not exist.
        let records = vec![FolderRecord::new_test(1, "A", None, &[5])];
        assert!(matches!(
            FolderTree::from_records(records),
            Err(TreeError::MissingChild { .. })
        ));
    }

    #[test]
    fn test_default_tree_allocates_from_one() {
        let mut tree = FolderTree::default();
        assert_eq!(tree.add_root_folder("First"), Some(FolderId(1)));
    }

    #[test]
    fn test_from_records_rejects_largest_id() {
        let records = vec![FolderRecord::new_test(u64::MAX, "Max", None, &[])];
        assert_eq!(
            FolderTree::from_records(records).unwrap_err(),
            TreeError::IdSpaceExhausted(FolderId(u64::MAX))
        );
    }

    #[test]
    fn test_add_folder_fails_when_ids_run_out() {
        let records = vec![FolderRecord::new_test(u64::MAX - 1, "Almost", None, &[])];
        let mut tree = FolderTree::from_records(records).unwrap();
        assert_eq!(tree.add_root_folder("Last"), None);
        assert_eq!(tree.add_child_folder(FolderId(u64::MAX - 1), "Child"), None);
        assert_eq!(tree.len(), 1);
        assert!(tree.children_of(FolderId(u64::MAX - 1)).is_empty());
    }

    #[test]
    fn test_from_records_rejects_cycle() {
        let records = vec![
            FolderRecord::new_test(1, "Root", None, &[]),
            FolderRecord::new_test(2, "X", Some(3), &[3]),
            FolderRecord::new_test(3, "Y", Some(2), &[2]),
        ];
        assert!(matches!(
            FolderTree::from_records(records),
            Err(TreeError::Cycle(_))
        ));
    }

    #[test]
    fn test_from_records_keeps_root_order() {
        let records = vec![
            FolderRecord::new_test(3, "Alpha", None, &[]),
            FolderRecord::new_test(1, "Beta", None, &[]),
        ];
        let tree = FolderTree::from_records(records).unwrap();
        assert_eq!(tree.roots(), &[FolderId(3), FolderId(1)]);
    }
}
