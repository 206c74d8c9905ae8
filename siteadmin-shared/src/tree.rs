//! Generic in-memory forest
//!
//! Menus and categories are both stored as a forest of owned nodes: every
//! node lives in exactly one place, either in the root list or in its
//! parent's `children`. The `parent_id` field on a node is a back-reference
//! only and never used for traversal.
//!
//! # Projections
//!
//! - [`build_tree`]: active nodes only, siblings sorted by `order`, at every level
//! - [`flatten`]: every node (active or not) in pre-order, children detached
//!
//! # Example
//!
//! ```no_run
//! use siteadmin_shared::tree::{Forest, TreeNode};
//! use siteadmin_shared::services::category::seed_categories;
//!
//! let forest = Forest::new(seed_categories());
//! let visible = forest.build_tree();
//! assert!(visible.iter().all(|c| c.is_active()));
//! assert_eq!(forest.flatten().len(), forest.len());
//! ```

/// A node that can be stored in a [`Forest`]
pub trait TreeNode: Clone {
    /// Unique identifier across the whole forest
    fn id(&self) -> &str;

    /// Sort key among siblings (ascending)
    fn order(&self) -> i32;

    /// Whether the node shows up in [`build_tree`]
    fn is_active(&self) -> bool;

    /// Flips the active flag
    fn set_active(&mut self, active: bool);

    /// Owned child nodes
    fn children(&self) -> &[Self];

    /// Mutable access to the owned child nodes
    fn children_mut(&mut self) -> &mut Vec<Self>;
}

/// Error type for forest mutations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Insert referenced a parent that is not in the forest
    #[error("Parent node not found: {0}")]
    ParentNotFound(String),
}

/// Owned forest of [`TreeNode`]s
#[derive(Debug, Clone)]
pub struct Forest<T> {
    roots: Vec<T>,
}

impl<T> Default for Forest<T> {
    fn default() -> Self {
        Self { roots: Vec::new() }
    }
}

impl<T: TreeNode> Forest<T> {
    /// Creates a forest from its root nodes
    pub fn new(roots: Vec<T>) -> Self {
        Self { roots }
    }

    /// Top-level nodes in insertion order
    pub fn roots(&self) -> &[T] {
        &self.roots
    }

    /// Attaches `node` under `parent_id`, or at the root when `None`
    ///
    /// # Errors
    ///
    /// Returns `TreeError::ParentNotFound` if `parent_id` does not resolve;
    /// the forest is left untouched in that case.
    pub fn insert(&mut self, node: T, parent_id: Option<&str>) -> Result<(), TreeError> {
        match parent_id {
            None => {
                self.roots.push(node);
                Ok(())
            }
            Some(parent_id) => {
                let parent = self
                    .find_by_id_mut(parent_id)
                    .ok_or_else(|| TreeError::ParentNotFound(parent_id.to_string()))?;
                parent.children_mut().push(node);
                Ok(())
            }
        }
    }

    /// Depth-first pre-order lookup
    pub fn find_by_id(&self, id: &str) -> Option<&T> {
        find_in(&self.roots, id)
    }

    /// Depth-first pre-order lookup returning a mutable reference
    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut T> {
        find_in_mut(&mut self.roots, id)
    }

    /// Number of direct children under `parent_id` (roots when `None`)
    pub fn child_count(&self, parent_id: Option<&str>) -> Option<usize> {
        match parent_id {
            None => Some(self.roots.len()),
            Some(id) => self.find_by_id(id).map(|parent| parent.children().len()),
        }
    }

    /// Physically removes a node, at any depth, together with its subtree
    pub fn remove(&mut self, id: &str) -> Option<T> {
        remove_in(&mut self.roots, id)
    }

    /// Marks a node and every descendant inactive; `false` if not found
    pub fn deactivate_subtree(&mut self, id: &str) -> bool {
        match self.find_by_id_mut(id) {
            Some(node) => {
                deactivate(node);
                true
            }
            None => false,
        }
    }

    /// Active-only, order-sorted projection
    pub fn build_tree(&self) -> Vec<T> {
        build_tree(&self.roots)
    }

    /// Pre-order list of every node
    pub fn flatten(&self) -> Vec<T> {
        flatten(&self.roots)
    }

    /// Total number of nodes at every depth
    pub fn len(&self) -> usize {
        count_nodes(&self.roots)
    }

    /// Whether the forest has no nodes
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Filters to active nodes and sorts siblings by `order`, recursively
///
/// The sort is stable, so siblings with equal `order` keep their insertion order.
pub fn build_tree<T: TreeNode>(nodes: &[T]) -> Vec<T> {
    let mut visible: Vec<T> = nodes
        .iter()
        .filter(|node| node.is_active())
        .map(|node| with_children(node, build_tree(node.children())))
        .collect();
    visible.sort_by_key(|node| node.order());
    visible
}

/// Emits every node in pre-order, parent before children
///
/// Each emitted node has its `children` cleared so that no node appears twice.
pub fn flatten<T: TreeNode>(nodes: &[T]) -> Vec<T> {
    fn walk<T: TreeNode>(nodes: &[T], out: &mut Vec<T>) {
        for node in nodes {
            out.push(with_children(node, Vec::new()));
            walk(node.children(), out);
        }
    }

    let mut out = Vec::with_capacity(count_nodes(nodes));
    walk(nodes, &mut out);
    out
}

/// Counts nodes at every depth
pub fn count_nodes<T: TreeNode>(nodes: &[T]) -> usize {
    nodes
        .iter()
        .map(|node| 1 + count_nodes(node.children()))
        .sum()
}

/// Copies a node, replacing its children
pub(crate) fn with_children<T: TreeNode>(node: &T, children: Vec<T>) -> T {
    let mut copy = node.clone();
    *copy.children_mut() = children;
    copy
}

fn find_in<'a, T: TreeNode>(nodes: &'a [T], id: &str) -> Option<&'a T> {
    for node in nodes {
        if node.id() == id {
            return Some(node);
        }
        if let Some(found) = find_in(node.children(), id) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a, T: TreeNode>(nodes: &'a mut [T], id: &str) -> Option<&'a mut T> {
    for node in nodes {
        if node.id() == id {
            return Some(node);
        }
        if let Some(found) = find_in_mut(node.children_mut(), id) {
            return Some(found);
        }
    }
    None
}

fn remove_in<T: TreeNode>(nodes: &mut Vec<T>, id: &str) -> Option<T> {
    if let Some(position) = nodes.iter().position(|node| node.id() == id) {
        return Some(nodes.remove(position));
    }
    nodes
        .iter_mut()
        .find_map(|node| remove_in(node.children_mut(), id))
}

fn deactivate<T: TreeNode>(node: &mut T) {
    node.set_active(false);
    for child in node.children_mut() {
        deactivate(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Node {
        id: String,
        order: i32,
        active: bool,
        children: Vec<Node>,
    }

    impl TreeNode for Node {
        fn id(&self) -> &str {
            &self.id
        }
        fn order(&self) -> i32 {
            self.order
        }
        fn is_active(&self) -> bool {
            self.active
        }
        fn set_active(&mut self, active: bool) {
            self.active = active;
        }
        fn children(&self) -> &[Self] {
            &self.children
        }
        fn children_mut(&mut self) -> &mut Vec<Self> {
            &mut self.children
        }
    }

    fn node(id: &str, order: i32, active: bool, children: Vec<Node>) -> Node {
        Node {
            id: id.to_string(),
            order,
            active,
            children,
        }
    }

    /// a(2) [a1(2), a2(1, inactive) [a2x(1)]], b(1) [b1(3) [b1x(1)]], c(0, inactive)
    fn sample() -> Forest<Node> {
        Forest::new(vec![
            node(
                "a",
                2,
                true,
                vec![
                    node("a1", 2, true, vec![]),
                    node("a2", 1, false, vec![node("a2x", 1, true, vec![])]),
                ],
            ),
            node(
                "b",
                1,
                true,
                vec![node("b1", 3, true, vec![node("b1x", 1, true, vec![])])],
            ),
            node("c", 0, false, vec![]),
        ])
    }

    fn ids(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|n| n.id.as_str()).collect()
    }

    fn assert_active_and_sorted(nodes: &[Node]) {
        assert!(nodes.iter().all(|n| n.active));
        assert!(nodes.windows(2).all(|w| w[0].order <= w[1].order));
        for n in nodes {
            assert_active_and_sorted(&n.children);
        }
    }

    #[test]
    fn test_default_forest_needs_no_default_nodes() {
        // Node has no Default impl
        let mut forest: Forest<Node> = Forest::default();
        assert!(forest.is_empty());

        forest.insert(node("a", 1, true, vec![]), None).unwrap();
        assert_eq!(forest.len(), 1);
    }

    #[test]
    fn test_insert_at_root_and_under_parent() {
        let mut forest = sample();
        forest.insert(node("d", 9, true, vec![]), None).unwrap();
        forest.insert(node("b1y", 2, true, vec![]), Some("b1")).unwrap();

        assert_eq!(forest.roots().len(), 4);
        let b1 = forest.find_by_id("b1").unwrap();
        assert_eq!(ids(&b1.children), vec!["b1x", "b1y"]);
    }

    #[test]
    fn test_insert_with_unknown_parent_fails_without_orphan() {
        let mut forest = sample();
        let before = forest.len();

        let result = forest.insert(node("orphan", 1, true, vec![]), Some("missing"));

        assert_eq!(result, Err(TreeError::ParentNotFound("missing".to_string())));
        assert_eq!(forest.len(), before);
        assert!(forest.find_by_id("orphan").is_none());
    }

    #[test]
    fn test_find_by_id_reaches_every_depth() {
        let forest = sample();
        for id in ["a", "a1", "a2", "a2x", "b", "b1", "b1x", "c"] {
            assert_eq!(forest.find_by_id(id).map(|n| n.id.as_str()), Some(id));
        }
        assert!(forest.find_by_id("zzz").is_none());
    }

    #[test]
    fn test_build_tree_filters_inactive_at_every_level() {
        let tree = sample().build_tree();

        assert_eq!(ids(&tree), vec!["b", "a"]);
        assert_eq!(ids(&tree[1].children), vec!["a1"]);
        assert_eq!(ids(&tree[0].children[0].children), vec!["b1x"]);
        assert_active_and_sorted(&tree);
    }

    #[test]
    fn test_build_tree_is_stable_for_equal_order() {
        let forest = Forest::new(vec![
            node("first", 1, true, vec![]),
            node("second", 1, true, vec![]),
            node("zero", 0, true, vec![]),
        ]);
        assert_eq!(ids(&forest.build_tree()), vec!["zero", "first", "second"]);
    }

    #[test]
    fn test_flatten_is_preorder_and_complete() {
        let forest = sample();
        let flat = forest.flatten();

        assert_eq!(
            ids(&flat),
            vec!["a", "a1", "a2", "a2x", "b", "b1", "b1x", "c"]
        );
        assert_eq!(flat.len(), forest.len());
        assert!(flat.iter().all(|n| n.children.is_empty()));
    }

    #[test]
    fn test_remove_at_any_depth() {
        let mut forest = sample();

        let removed = forest.remove("b1").unwrap();
        assert_eq!(ids(&removed.children), vec!["b1x"]);
        assert!(forest.find_by_id("b1x").is_none());

        assert!(forest.remove("a2x").is_some());
        assert!(forest.remove("c").is_some());
        assert!(forest.remove("c").is_none());
        assert_eq!(forest.len(), 4);
    }

    #[test]
    fn test_deactivate_subtree_reaches_grandchildren() {
        let mut forest = sample();
        assert!(forest.deactivate_subtree("b"));

        let flat = forest.flatten();
        for id in ["b", "b1", "b1x"] {
            assert!(!flat.iter().find(|n| n.id == id).unwrap().active);
        }
        assert!(!forest.deactivate_subtree("missing"));
    }

    #[test]
    fn test_child_count() {
        let forest = sample();
        assert_eq!(forest.child_count(None), Some(3));
        assert_eq!(forest.child_count(Some("a")), Some(2));
        assert_eq!(forest.child_count(Some("missing")), None);
    }
}
