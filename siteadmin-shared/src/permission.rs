//! Role-based tree pruning
//!
//! Computes the part of a menu tree a given role may see. A node survives
//! when it is active and its permission list contains the role; surviving
//! nodes keep their position and have their children filtered the same way.
//! A parent whose children are all pruned still survives with an empty
//! child list.

use crate::tree::{with_children, TreeNode};

/// A node guarded by an allow-list of role names
pub trait HasPermissions {
    /// Role names allowed to see this node
    fn permissions(&self) -> &[String];

    /// Whether `role` is in the allow-list
    fn allows(&self, role: &str) -> bool {
        self.permissions().iter().any(|allowed| allowed == role)
    }
}

/// Keeps only active nodes visible to `role`, recursively
pub fn filter_by_role<T>(nodes: &[T], role: &str) -> Vec<T>
where
    T: TreeNode + HasPermissions,
{
    nodes
        .iter()
        .filter(|node| node.is_active() && node.allows(role))
        .map(|node| with_children(node, filter_by_role(node.children(), role)))
        .collect()
}
