/*
 * Converts the folder tree into the ordered, linear row list the slide menu displays.
 * Three steps compose the view: `flatten` (open-state aware pre-order walk),
 * `flatten_with_search` (keyword filter that keeps ancestors of matches and opens them)
 * with its read-only counterpart `search_rows`, and `visible_data` (the hide-mode
 * post-filter).
 */
use super::folder_node::FolderId;
use super::folder_tree::FolderTree;
use serde::{Deserialize, Serialize};

/*
 * Controls whether `flatten` descends into closed folders.
 * The menu uses `RespectOpenState`. `ExpandAll` shows every folder regardless of its
 * `is_open` flag and is kept as a separately selectable behavior.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlattenPolicy {
    #[default]
    RespectOpenState,
    ExpandAll,
}

// A flattened entry together with its nesting level, used for indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlattenedRow {
    pub id: FolderId,
    pub depth: usize,
}

/*
 * Depth-first, pre-order, root-major walk over the tree in stored child order.
 * Each visited folder appears exactly once. Children are visited only when the parent
 * is open, unless the policy is `ExpandAll`.
 */
pub fn flatten(tree: &FolderTree, policy: FlattenPolicy) -> Vec<FlattenedRow> {
    fn recurse(
        tree: &FolderTree,
        ids: &[FolderId],
        depth: usize,
        policy: FlattenPolicy,
        result: &mut Vec<FlattenedRow>,
    ) {
        for &id in ids {
            let Some(node) = tree.get(id) else {
                continue;
            };
            result.push(FlattenedRow { id, depth });
            let descend = match policy {
                FlattenPolicy::RespectOpenState => node.is_open,
                FlattenPolicy::ExpandAll => true,
            };
            if descend {
                recurse(tree, node.children(), depth + 1, policy, result);
            }
        }
    }

    let mut result = Vec::with_capacity(tree.len());
    recurse(tree, tree.roots(), 0, policy, &mut result);
    result
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchOutcome {
    pub rows: Vec<FlattenedRow>,
    // Folders whose `is_open` flipped from false to true during the search.
    pub opened: Vec<FolderId>,
}

/*
 * Filters the tree by a case-insensitive substring of the folder name.
 * A folder is kept if it matches or if any descendant is kept, so every match is shown
 * beneath its full ancestor chain. Ancestors of kept folders get `is_open = true` as a
 * side effect; this intentionally mutates the stored open state, so the call is not
 * idempotent with respect to `is_open`. An empty keyword matches every folder.
 * Returns the kept rows in parent-before-children order, plus the ids that were opened.
 */
pub fn flatten_with_search(tree: &mut FolderTree, keyword: &str) -> SearchOutcome {
    // Returns whether the subtree under `id` holds a match.
    fn open_towards_matches(
        tree: &mut FolderTree,
        id: FolderId,
        keyword_lower: &str,
        opened: &mut Vec<FolderId>,
    ) -> bool {
        let children = tree.children_of(id).to_vec();
        let mut child_kept = false;
        for child in children {
            child_kept |= open_towards_matches(tree, child, keyword_lower, opened);
        }
        let Some(node) = tree.get(id) else {
            return false;
        };
        let match_self = keyword_lower.is_empty() || node.name_matches(keyword_lower);
        if child_kept && !node.is_open {
            opened.push(id);
            tree.set_open(id, true);
        }
        match_self || child_kept
    }

    let keyword_lower = keyword.to_lowercase();
    let mut opened = Vec::new();
    for root in tree.roots().to_vec() {
        open_towards_matches(tree, root, &keyword_lower, &mut opened);
    }
    if !opened.is_empty() {
        log::debug!(
            "Flatten: Search '{keyword}' opened {} folder(s) to reveal matches.",
            opened.len()
        );
    }
    SearchOutcome {
        rows: search_rows(tree, keyword),
        opened,
    }
}

/*
 * The read-only half of the search: keeps folders that match or lead to a match, without
 * touching open state. A kept folder that is closed hides its kept descendants. Right
 * after `flatten_with_search` every kept ancestor is open, so both agree; later calls
 * during the same search honor folders the user collapsed since.
 */
pub fn search_rows(tree: &FolderTree, keyword: &str) -> Vec<FlattenedRow> {
    // Appends the kept rows of the subtree to `out` and returns whether any were kept.
    fn recurse(
        tree: &FolderTree,
        id: FolderId,
        depth: usize,
        keyword_lower: &str,
        out: &mut Vec<FlattenedRow>,
    ) -> bool {
        let Some(node) = tree.get(id) else {
            return false;
        };
        let start = out.len();
        out.push(FlattenedRow { id, depth });
        let mut child_kept = false;
        for &child in node.children() {
            child_kept |= recurse(tree, child, depth + 1, keyword_lower, out);
        }
        if !node.is_open {
            out.truncate(start + 1);
        }
        let keep = child_kept || keyword_lower.is_empty() || node.name_matches(keyword_lower);
        if !keep {
            out.truncate(start);
        }
        keep
    }

    let keyword_lower = keyword.to_lowercase();
    let mut out = Vec::new();
    for &root in tree.roots() {
        recurse(tree, root, 0, &keyword_lower, &mut out);
    }
    out
}

/*
 * Hide-mode post-filter. With hide mode on, drops every folder whose own `is_hide` flag
 * is set. It is a plain filter over the flat list, not tree-aware: descendants of a hidden
 * folder stay in the list if they were flattened in.
 */
pub fn visible_data(
    tree: &FolderTree,
    flat: Vec<FlattenedRow>,
    hide_mode: bool,
) -> Vec<FlattenedRow> {
    if !hide_mode {
        return flat;
    }
    flat.into_iter()
        .filter(|row| tree.get(row.id).is_some_and(|node| !node.is_hide))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

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

    fn ids(rows: &[FlattenedRow]) -> Vec<FolderId> {
        rows.iter().map(|row| row.id).collect()
    }

    fn random_tree(rng: &mut impl Rng, size: usize) -> (FolderTree, Vec<FolderId>) {
        let mut tree = FolderTree::new();
        let mut ids: Vec<FolderId> = Vec::new();
        for i in 0..size {
            let name = format!("folder{i}");
            let id = if ids.is_empty() || rng.random_bool(0.25) {
                tree.add_root_folder(&name).unwrap()
            } else {
                let parent = ids[rng.random_range(0..ids.len())];
                tree.add_child_folder(parent, &name).unwrap()
            };
            ids.push(id);
        }
        for id in &ids {
            tree.set_open(*id, rng.random_bool(0.5));
        }
        (tree, ids)
    }

    // Reference pre-order over every node, ignoring open state.
    fn preorder_all(tree: &FolderTree) -> Vec<FolderId> {
        fn walk(tree: &FolderTree, ids: &[FolderId], out: &mut Vec<FolderId>) {
            for id in ids {
                out.push(*id);
                walk(tree, tree.children_of(*id), out);
            }
        }
        let mut out = Vec::new();
        walk(tree, tree.roots(), &mut out);
        out
    }

    #[test]
    fn test_flatten_closed_tree_returns_roots_only() {
        let (tree, [a, b, c, _]) = sample_tree();
        assert_eq!(ids(&flatten(&tree, FlattenPolicy::RespectOpenState)), vec![a]);

        let mut tree = tree;
        tree.set_open(a, true);
        assert_eq!(
            ids(&flatten(&tree, FlattenPolicy::RespectOpenState)),
            vec![a, b, c]
        );
    }

    #[test]
    fn test_flatten_scenario_open_c_reveals_d() {
        let (mut tree, [a, b, c, d]) = sample_tree();
        tree.set_open(a, true);
        assert_eq!(
            ids(&flatten(&tree, FlattenPolicy::RespectOpenState)),
            vec![a, b, c]
        );
        tree.set_open(c, true);
        assert_eq!(
            ids(&flatten(&tree, FlattenPolicy::RespectOpenState)),
            vec![a, b, c, d]
        );
    }

    #[test]
    fn test_flatten_expand_all_ignores_open_state() {
        let (tree, [a, b, c, d]) = sample_tree();
        assert_eq!(
            ids(&flatten(&tree, FlattenPolicy::ExpandAll)),
            vec![a, b, c, d]
        );
    }

    #[test]
    fn test_flatten_rows_carry_depth() {
        let (tree, [a, b, c, d]) = sample_tree();
        let rows = flatten(&tree, FlattenPolicy::ExpandAll);
        let depths: Vec<(FolderId, usize)> = rows.iter().map(|r| (r.id, r.depth)).collect();
        assert_eq!(depths, vec![(a, 0), (b, 1), (c, 1), (d, 2)]);
    }

    #[test]
    fn test_flatten_random_trees_preorder_and_unique() {
        let mut rng = rand::rng();
        for _ in 0..50 {
            let size = rng.random_range(1..40);
            let (tree, _) = random_tree(&mut rng, size);

            let all_rows = flatten(&tree, FlattenPolicy::ExpandAll);
            let all = ids(&all_rows);
            assert_eq!(all, preorder_all(&tree));
            assert_eq!(all.len(), tree.len());
            for row in &all_rows {
                assert_eq!(row.depth, tree.depth(row.id));
            }

            // The open-state walk is the full pre-order with closed subtrees removed.
            let open_only = ids(&flatten(&tree, FlattenPolicy::RespectOpenState));
            let expected: Vec<FolderId> = all
                .iter()
                .copied()
                .filter(|id| {
                    tree.ancestors(*id)
                        .iter()
                        .all(|ancestor| tree.get(*ancestor).unwrap().is_open)
                })
                .collect();
            assert_eq!(open_only, expected);
        }
    }

    #[test]
    fn test_flatten_all_closed_random_trees_yield_roots() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let size = rng.random_range(1..30);
            let (mut tree, all_ids) = random_tree(&mut rng, size);
            for id in all_ids {
                tree.set_open(id, false);
            }
            assert_eq!(
                ids(&flatten(&tree, FlattenPolicy::RespectOpenState)),
                tree.roots().to_vec()
            );
        }
    }

    #[test]
    fn test_search_scenario_reveals_and_opens_ancestors() {
        let (mut tree, [a, _, c, d]) = sample_tree();
        let outcome = flatten_with_search(&mut tree, "D");
        assert_eq!(ids(&outcome.rows), vec![a, c, d]);
        assert_eq!(outcome.rows[2].depth, 2);
        assert!(tree.get(c).unwrap().is_open);
        assert!(tree.get(a).unwrap().is_open);
        assert_eq!(outcome.opened, vec![c, a]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut tree = FolderTree::new();
        let root = tree.add_root_folder("Projects").unwrap();
        let child = tree.add_child_folder(root, "Rust Notes").unwrap();
        let _other = tree.add_child_folder(root, "Recipes").unwrap();
        tree.set_open(root, false);

        let outcome = flatten_with_search(&mut tree, "NOTES");
        assert_eq!(ids(&outcome.rows), vec![root, child]);
    }

    #[test]
    fn test_search_without_match_returns_nothing_and_opens_nothing() {
        let (mut tree, all_ids) = sample_tree();
        let outcome = flatten_with_search(&mut tree, "zzz");
        assert!(outcome.rows.is_empty());
        assert!(outcome.opened.is_empty());
        for id in all_ids {
            assert!(!tree.get(id).unwrap().is_open);
        }
    }

    #[test]
    fn test_search_empty_keyword_keeps_everything() {
        let (mut tree, [a, b, c, d]) = sample_tree();
        let outcome = flatten_with_search(&mut tree, "");
        assert_eq!(ids(&outcome.rows), vec![a, b, c, d]);
    }

    #[test]
    fn test_search_rows_leave_open_state_alone() {
        let (mut tree, [a, _, c, d]) = sample_tree();
        assert_eq!(ids(&search_rows(&tree, "d")), vec![a]);
        assert!(!tree.get(a).unwrap().is_open);

        flatten_with_search(&mut tree, "d");
        assert_eq!(ids(&search_rows(&tree, "d")), vec![a, c, d]);

        // Collapsing a kept ancestor hides the match below it.
        tree.set_open(c, false);
        assert_eq!(ids(&search_rows(&tree, "d")), vec![a, c]);
        assert!(!tree.get(c).unwrap().is_open);
    }

    #[test]
    fn test_search_results_match_or_lead_to_match() {
        let mut rng = rand::rng();
        for _ in 0..30 {
            let size = rng.random_range(1..40);
            let (mut tree, _) = random_tree(&mut rng, size);
            let keyword = format!("{}", rng.random_range(0..10));
            let outcome = flatten_with_search(&mut tree, &keyword);
            let kept = ids(&outcome.rows);

            for id in &kept {
                let self_matches = tree.get(*id).unwrap().name_matches(&keyword);
                let has_matching_descendant = kept.iter().any(|other| {
                    tree.ancestors(*other).contains(id)
                        && tree.get(*other).unwrap().name_matches(&keyword)
                });
                assert!(self_matches || has_matching_descendant);
            }
            assert_eq!(search_rows(&tree, &keyword), outcome.rows);
        }
    }

    #[test]
    fn test_visible_data_filters_hidden_nodes_in_hide_mode() {
        let (mut tree, [a, b, c, _]) = sample_tree();
        tree.set_open(a, true);
        tree.toggle_hide(b);
        let flat = flatten(&tree, FlattenPolicy::RespectOpenState);
        assert_eq!(ids(&visible_data(&tree, flat.clone(), true)), vec![a, c]);
        assert_eq!(ids(&visible_data(&tree, flat, false)), vec![a, b, c]);
    }

    #[test]
    fn test_visible_data_is_not_tree_aware() {
        let (mut tree, [a, b, c, d]) = sample_tree();
        tree.toggle_hide(c);
        let flat = flatten(&tree, FlattenPolicy::ExpandAll);
        let visible = visible_data(&tree, flat, true);
        assert_eq!(ids(&visible), vec![a, b, d]);
        assert_eq!(visible[2].depth, 2);
    }
}
