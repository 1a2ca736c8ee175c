//! Micro trees ("Four Russians" tier)
//!
//! Nodes without a macro link form small subtrees hanging off the macro
//! skeleton. Each one has fewer than `B` nodes. A micro tree is:
//! - enumerated in pre-order (local index = DFS rank)
//! - encoded as a [`ShapeCode`]
//! - pointed at one shared [`MicroTable`] per distinct code
//!
//! A query inside a micro tree is then one table read plus one
//! local-to-global translation.

mod scratch;
mod shape;

pub use scratch::LocalIndexBuffer;
pub use shape::{MicroTable, ShapeCode, ShapeId, ShapeLibrary};

use tracing::debug;

use crate::{
    jump::MacroLinks,
    tree::{DepthFirst, RootedTree, Visit},
    NodeId,
};

/// One micro-tree instance.
#[derive(Debug, Clone)]
pub struct MicroTree {
    /// Shape table shared with structurally identical micro trees
    pub shape: ShapeId,

    /// Local index -> global node id (pre-order; index 0 is the root)
    pub nodes: Box<[NodeId]>,
}

impl MicroTree {
    /// Root of the micro tree
    #[inline]
    pub fn root(&self) -> NodeId {
        self.nodes[0]
    }

    /// Number of nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Micro trees always contain their root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Position of a micro node: owning micro tree and local rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MicroSlot {
    /// Index into the forest's micro-tree list
    pub tree: usize,

    /// Pre-order rank inside that micro tree
    pub rank: usize,
}

/// Outcome of a micro-tier lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicroLookup {
    /// Target depth lies inside the micro tree.
    Resolved(NodeId),

    /// Target lies above; continue from this micro root's parent.
    Escaped(NodeId),
}

/// All micro trees plus the shape library they share.
#[derive(Debug)]
pub struct MicroForest {
    slots: Vec<Option<MicroSlot>>,
    trees: Vec<MicroTree>,
    shapes: ShapeLibrary,
}

impl MicroForest {
    /// Enumerate, encode and tabulate every micro tree.
    pub fn build(tree: &RootedTree, links: &MacroLinks) -> Self {
        let n = tree.len();
        let mut slots = vec![None; n];
        let mut trees = Vec::new();
        let mut shapes = ShapeLibrary::new();
        let mut scratch = LocalIndexBuffer::new(n);

        for node in 0..n {
            let is_micro_root = !links.is_macro(node)
                && (node == tree.root() || links.is_macro(tree.parent(node)));
            if !is_micro_root {
                continue;
            }

            let (nodes, code) = walk_micro_tree(tree, links, node);
            let shape = shapes.intern(code, || {
                scratch.bind(&nodes);
                let table = tabulate(tree, &scratch, &nodes);
                scratch.release(&nodes);
                table
            });

            let id = trees.len();
            for (rank, &member) in nodes.iter().enumerate() {
                slots[member] = Some(MicroSlot { tree: id, rank });
            }
            trees.push(MicroTree {
                shape,
                nodes: nodes.into_boxed_slice(),
            });
        }

        debug_assert!(scratch.is_clear());
        debug!(
            micro_trees = trees.len(),
            unique_shapes = shapes.len(),
            table_cells = shapes.total_cells(),
            "micro trees encoded"
        );

        Self {
            slots,
            trees,
            shapes,
        }
    }

    /// Micro slot of `node`, `None` for macro nodes.
    #[inline]
    pub fn slot(&self, node: NodeId) -> Option<MicroSlot> {
        self.slots[node]
    }

    /// Root of the micro tree containing `node`
    pub fn root_of(&self, node: NodeId) -> Option<NodeId> {
        self.slots[node].map(|slot| self.trees[slot.tree].root())
    }

    /// Answer a query for a micro node `node` in O(1).
    ///
    /// Returns `None` when `node` is a macro node or `target_depth` lies
    /// below `node`.
    pub fn lookup(
        &self,
        tree: &RootedTree,
        node: NodeId,
        target_depth: usize,
    ) -> Option<MicroLookup> {
        let slot = self.slots[node]?;
        let distance = tree.depth(node).checked_sub(target_depth)?;
        let micro = &self.trees[slot.tree];
        let root = micro.root();

        if target_depth < tree.depth(root) {
            return Some(MicroLookup::Escaped(root));
        }

        let local = self.shapes.table(micro.shape).ancestor(slot.rank, distance);
        Some(MicroLookup::Resolved(micro.nodes[local]))
    }

    /// All micro trees, in root-id order
    pub fn trees(&self) -> &[MicroTree] {
        &self.trees
    }

    /// Shared shape tables
    pub fn shapes(&self) -> &ShapeLibrary {
        &self.shapes
    }

    /// Number of micro nodes
    pub fn node_count(&self) -> usize {
        self.trees.iter().map(MicroTree::len).sum()
    }
}

/// Pre-order node list and shape code of the micro tree at `root`.
fn walk_micro_tree(
    tree: &RootedTree,
    links: &MacroLinks,
    root: NodeId,
) -> (Vec<NodeId>, ShapeCode) {
    let mut nodes = Vec::new();
    let mut code = ShapeCode::anchor();

    let walk = DepthFirst::filtered(tree.adjacency(), root, |child| !links.is_macro(child));
    for visit in walk {
        match visit {
            Visit::Enter(node) => {
                nodes.push(node);
                if node != root {
                    code.descend();
                }
            }
            Visit::Exit(node) => {
                if node != root {
                    code.ascend();
                }
            }
        }
    }

    (nodes, code)
}

/// Brute-force table for `nodes`, which must currently be bound in `scratch`.
fn tabulate(tree: &RootedTree, scratch: &LocalIndexBuffer, nodes: &[NodeId]) -> MicroTable {
    let local_parent: Vec<usize> = nodes
        .iter()
        .enumerate()
        .map(|(local, &node)| scratch.local(tree.parent(node)).unwrap_or(local))
        .collect();
    MicroTable::from_parents(&local_parent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jump::JumpNodes;
    use crate::tree::TreeBuilder;

    fn forest(
        n: usize,
        edges: &[(NodeId, NodeId)],
        block_size: usize,
    ) -> (RootedTree, MacroLinks, MicroForest) {
        let mut builder = TreeBuilder::new(n);
        for &(p, c) in edges {
            builder.add_edge(p, c).unwrap();
        }
        let tree = builder.into_tree(0).unwrap();
        let jumps = JumpNodes::identify(&tree, block_size);
        let links = MacroLinks::propagate(&tree, &jumps);
        let micro = MicroForest::build(&tree, &links);
        (tree, links, micro)
    }

    #[test]
    fn test_identical_shapes_share_table() {
        // Root 0 with a spine 0-1-2-3-4-5-6 and two identical 3-node forks
        // hanging from 1 and 2.
        let edges = [
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 4),
            (4, 5),
            (5, 6),
            (1, 7),
            (7, 8),
            (7, 9),
            (2, 10),
            (10, 11),
            (10, 12),
        ];
        let (tree, links, micro) = forest(13, &edges, 4);

        let fork_a = micro.slot(7).unwrap().tree;
        let fork_b = micro.slot(10).unwrap().tree;
        assert_ne!(fork_a, fork_b);
        assert_eq!(micro.trees()[fork_a].shape, micro.trees()[fork_b].shape);
        assert_eq!(&*micro.trees()[fork_a].nodes, &[7, 8, 9]);

        for member in [7, 8, 9, 10, 11, 12] {
            assert!(!links.is_macro(member));
            assert!(micro.slot(member).is_some());
        }
        assert!(micro.shapes().len() < micro.trees().len());
        assert_eq!(
            micro.node_count(),
            (0..tree.len()).filter(|&v| !links.is_macro(v)).count()
        );
    }

    #[test]
    fn test_micro_trees_are_smaller_than_block() {
        let edges: Vec<_> = (1..60).map(|i| ((i - 1) / 2, i)).collect();
        let block_size = 5;
        let (tree, links, micro) = forest(60, &edges, block_size);

        for micro_tree in micro.trees() {
            assert!(micro_tree.len() < block_size);
            let root = micro_tree.root();
            assert!(root == tree.root() || links.is_macro(tree.parent(root)));
        }
    }

    #[test]
    fn test_lookup_resolves_and_escapes() {
        let edges = [(0, 1), (1, 2), (2, 3), (3, 4), (0, 5), (5, 6), (6, 7)];
        let (tree, _links, micro) = forest(8, &edges, 4);

        // Subtree of 5 has 3 nodes < 4: micro tree rooted at 5.
        assert_eq!(micro.root_of(7), Some(5));
        assert_eq!(micro.lookup(&tree, 7, 2), Some(MicroLookup::Resolved(6)));
        assert_eq!(micro.lookup(&tree, 7, 1), Some(MicroLookup::Resolved(5)));
        assert_eq!(micro.lookup(&tree, 7, 0), Some(MicroLookup::Escaped(5)));
        assert_eq!(micro.lookup(&tree, 1, 0), None);
    }

    #[test]
    fn test_lookup_below_node_is_none() {
        let edges = [(0, 1), (1, 2), (2, 3), (3, 4), (0, 5), (5, 6), (6, 7)];
        let (tree, _links, micro) = forest(8, &edges, 4);

        assert_eq!(tree.depth(7), 3);
        assert_eq!(micro.lookup(&tree, 7, 3), Some(MicroLookup::Resolved(7)));
        assert_eq!(micro.lookup(&tree, 7, 4), None);
        assert_eq!(micro.lookup(&tree, 7, 5), None);
        assert_eq!(micro.lookup(&tree, 5, usize::MAX), None);
    }

    #[test]
    fn test_whole_tree_micro_when_block_exceeds_size() {
        let edges = [(0, 1), (0, 2), (2, 3)];
        let (tree, links, micro) = forest(4, &edges, 100);

        assert!(!links.is_macro(0));
        assert_eq!(micro.trees().len(), 1);
        assert_eq!(micro.root_of(3), Some(0));
        assert_eq!(micro.lookup(&tree, 3, 0), Some(MicroLookup::Resolved(0)));
        assert_eq!(micro.lookup(&tree, 3, 1), Some(MicroLookup::Resolved(2)));
    }
}
