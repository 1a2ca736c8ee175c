//! Macro-link propagation
//!
//! Post-order pass: a jump node links to itself, any other node inherits
//! the link of its children. When several children carry a link, the last
//! one in insertion order wins. Every jump node below a node is a valid
//! delegate for its queries, so the choice only has to be deterministic.

use tracing::debug;

use super::JumpNodes;
use crate::{
    tree::{DepthFirst, RootedTree, Visit},
    NodeId,
};

/// Nearest-jump-descendant link per node; `None` marks micro nodes.
#[derive(Debug, Clone)]
pub struct MacroLinks {
    links: Vec<Option<NodeId>>,
}

impl MacroLinks {
    /// Propagate links bottom-up from the jump nodes.
    pub fn propagate(tree: &RootedTree, jump_nodes: &JumpNodes) -> Self {
        let mut links: Vec<Option<NodeId>> = vec![None; tree.len()];

        for visit in DepthFirst::new(tree.adjacency(), tree.root()) {
            let Visit::Exit(node) = visit else {
                continue;
            };

            let mut found = jump_nodes.contains(node).then_some(node);
            for &child in tree.children(node) {
                if let Some(link) = links[child] {
                    found = Some(link);
                }
            }
            links[node] = found;
        }

        let macro_links = Self { links };
        debug!(
            macro_nodes = macro_links.macro_count(),
            micro_nodes = tree.len() - macro_links.macro_count(),
            "macro links propagated"
        );
        macro_links
    }

    /// Jump node delegated to by `node`, `None` inside micro trees.
    #[inline]
    pub fn link(&self, node: NodeId) -> Option<NodeId> {
        self.links[node]
    }

    /// True when `node` has a jump-node descendant (itself included).
    #[inline]
    pub fn is_macro(&self, node: NodeId) -> bool {
        self.links[node].is_some()
    }

    /// Number of nodes with a link
    pub fn macro_count(&self) -> usize {
        self.links.iter().filter(|link| link.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeBuilder;

    fn tree(n: usize, edges: &[(NodeId, NodeId)]) -> RootedTree {
        let mut builder = TreeBuilder::new(n);
        for &(p, c) in edges {
            builder.add_edge(p, c).unwrap();
        }
        builder.into_tree(0).unwrap()
    }

    #[test]
    fn test_links_point_to_descendant_jump_nodes() {
        //       0
        //     /   \
        //    1     2
        //   / \    |
        //  3   4   5
        //  |
        //  6
        let t = tree(7, &[(0, 1), (0, 2), (1, 3), (1, 4), (2, 5), (3, 6)]);
        let jumps = JumpNodes::identify(&t, 2);
        let links = MacroLinks::propagate(&t, &jumps);

        // Jump nodes at B = 2: 3 (size 2, child size 1) and 2 (size 2).
        assert!(jumps.contains(3));
        assert!(jumps.contains(2));

        assert_eq!(links.link(3), Some(3));
        assert_eq!(links.link(1), Some(3));
        assert_eq!(links.link(2), Some(2));
        assert_eq!(links.link(6), None);
        assert_eq!(links.link(4), None);
        assert_eq!(links.link(5), None);

        // Both children of the root carry a link: the last child wins.
        assert_eq!(links.link(0), Some(2));
        assert_eq!(links.macro_count(), 4);
    }

    #[test]
    fn test_every_link_is_jump_descendant() {
        let edges: Vec<_> = (1..40).map(|i| ((i - 1) / 3, i)).collect();
        let t = tree(40, &edges);
        let jumps = JumpNodes::identify(&t, 3);
        let links = MacroLinks::propagate(&t, &jumps);

        for node in 0..t.len() {
            if let Some(jump) = links.link(node) {
                assert!(jumps.contains(jump));
                assert_eq!(t.naive_ancestor(jump, t.depth(node)), Some(node));
            } else {
                assert!(t.subtree_size(node) < jumps.block_size());
            }
        }
        assert!(links.is_macro(t.root()));
    }
}
