//! # Level Ancestor queries in O(1) after O(N) preprocessing
//!
//! Given a static rooted tree, answers "which ancestor of `u` sits at depth
//! `d`?" in constant time.
//!
//! ## Core Algorithm
//!
//! 1. **Basic traversal**: depth, parent, height, subtree size, long-path child
//! 2. **Ladders**: long paths doubled upward, O(1) climbs within a ladder
//! 3. **Jump nodes**: maximally deep nodes with ≥ B descendants, B = max(1, ⌊log N / 4⌋)
//! 4. **Jump pointers**: binary lifting on jump nodes only, O(N) total
//! 5. **Macro links**: every other node delegates to a jump node below it
//! 6. **Micro trees**: subtrees below the skeleton share brute-force tables
//!    keyed by their shape ("Four Russians")
//!
//! A query is one micro-table read, or one jump pointer followed by one
//! ladder read.
//!
//! ## Usage Example
//!
//! ```
//! use level_ancestor::LevelAncestor;
//!
//! let mut builder = LevelAncestor::new(4);
//! builder.add_edge(0, 1)?;
//! builder.add_edge(1, 2)?;
//! builder.add_edge(1, 3)?;
//! let la = builder.preprocess(0)?;
//!
//! assert_eq!(la.query(3, 1), Some(1));
//! assert_eq!(la.query(3, 3), None);
//! # Ok::<(), level_ancestor::LevelAncestorError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod jump; // Jump nodes, jump pointers, macro links
pub mod ladder; // Long-path decomposition
pub mod micro; // Micro trees and shape tables
pub mod space; // Storage accounting
pub mod tree; // Builder, basic traversal

pub use ladder::LadderDecomposition;
pub use space::StorageProfile;
pub use tree::{RootedTree, TreeBuilder};

use thiserror::Error;
use tracing::{debug, info_span};

use jump::{JumpNodes, JumpPointers, MacroLinks};
use micro::{MicroForest, MicroLookup};

/// Node identifier in `0..N`
pub type NodeId = usize;

/// Configuration parameters for preprocessing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelAncestorConfig {
    /// Micro block threshold B; `None` derives `max(1, log_bits(N) / 4)`.
    pub block_size: Option<usize>,
}

impl LevelAncestorConfig {
    /// Override the micro block threshold.
    ///
    /// The derived B is 1 for N < 128, which leaves no micro trees at all;
    /// a larger value forces the micro tier on small inputs.
    pub fn with_block_size(mut self, block_size: usize) -> Result<Self, LevelAncestorError> {
        if block_size == 0 {
            return Err(LevelAncestorError::InvalidConfiguration(
                "block size must be > 0".to_string(),
            ));
        }
        self.block_size = Some(block_size);
        Ok(self)
    }

    /// Effective `(log_n, block_size)` for a tree of `nodes_count` nodes.
    pub fn resolve(&self, nodes_count: usize) -> (usize, usize) {
        let log_n = jump::log_bits(nodes_count);
        let block_size = self
            .block_size
            .unwrap_or_else(|| jump::block_threshold(nodes_count));
        (log_n, block_size)
    }
}

/// Errors raised while building the structure or addressing nodes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelAncestorError {
    /// Node id outside `0..nodes_count`
    #[error("node {node} out of range for a tree of {nodes_count} nodes")]
    NodeOutOfRange {
        /// Offending id
        node: NodeId,
        /// Number of nodes in the tree
        nodes_count: usize,
    },

    /// Edge from a node to itself
    #[error("self loop on node {node}")]
    SelfLoop {
        /// Node on both ends of the edge
        node: NodeId,
    },

    /// Second incoming edge for a node
    #[error("node {child} already has parent {existing}, cannot attach it to {requested}")]
    DuplicateParent {
        /// Node receiving a second parent
        child: NodeId,
        /// Parent registered first
        existing: NodeId,
        /// Parent of the rejected edge
        requested: NodeId,
    },

    /// The chosen root has an incoming edge
    #[error("root {root} has parent {parent}")]
    RootHasParent {
        /// Requested root
        root: NodeId,
        /// Its registered parent
        parent: NodeId,
    },

    /// Some nodes cannot be reached from the root (forest or detached cycle)
    #[error("only {reachable} of {nodes_count} nodes are reachable from the root")]
    Unreachable {
        /// Nodes visited from the root
        reachable: usize,
        /// Number of nodes in the tree
        nodes_count: usize,
    },

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Preprocessed Level Ancestor structure
///
/// Immutable after construction; queries take `&self` and can be served
/// from many threads at once.
#[derive(Debug)]
pub struct LevelAncestor {
    tree: RootedTree,
    ladders: LadderDecomposition,
    jump_nodes: JumpNodes,
    jump_pointers: JumpPointers,
    macro_links: MacroLinks,
    micro: MicroForest,
    log_n: usize,
}

impl LevelAncestor {
    /// Start building a structure over `nodes_count` nodes.
    #[allow(clippy::new_ret_no_self)]
    pub fn new(nodes_count: usize) -> TreeBuilder {
        TreeBuilder::new(nodes_count)
    }

    /// Run every preprocessing tier over an analyzed tree.
    ///
    /// Order matters: jump pointers read ladders, micro trees read macro
    /// links, and macro links read the jump-node set.
    pub(crate) fn from_tree(
        tree: RootedTree,
        config: LevelAncestorConfig,
    ) -> Result<Self, LevelAncestorError> {
        if let Some(0) = config.block_size {
            return Err(LevelAncestorError::InvalidConfiguration(
                "block size must be > 0".to_string(),
            ));
        }

        let (log_n, block_size) = config.resolve(tree.len());
        let span = info_span!("preprocess", nodes = tree.len(), root = tree.root());
        let _guard = span.enter();

        let ladders = LadderDecomposition::build(&tree);
        let jump_nodes = JumpNodes::identify(&tree, block_size);
        let jump_pointers = JumpPointers::build(&tree, &ladders, &jump_nodes, log_n);
        let macro_links = MacroLinks::propagate(&tree, &jump_nodes);
        let micro = MicroForest::build(&tree, &macro_links);

        debug!(block_size, log_n, "preprocessing complete");
        Ok(Self {
            tree,
            ladders,
            jump_nodes,
            jump_pointers,
            macro_links,
            micro,
            log_n,
        })
    }

    /// Ancestor of `node` at depth `target_depth`.
    ///
    /// Returns `node` itself when `target_depth == depth(node)` and `None`
    /// when `target_depth > depth(node)`.
    ///
    /// # Panics
    ///
    /// Panics if `node >= self.len()`; see [`try_query`](Self::try_query).
    pub fn query(&self, node: NodeId, target_depth: usize) -> Option<NodeId> {
        let tree = &self.tree;
        let mut node = node;

        if tree.depth(node) < target_depth {
            return None;
        }
        if tree.depth(node) == target_depth {
            return Some(node);
        }

        // Micro tier: one table read, or climb out to the skeleton.
        if let Some(lookup) = self.micro.lookup(tree, node, target_depth) {
            match lookup {
                MicroLookup::Resolved(ancestor) => return Some(ancestor),
                MicroLookup::Escaped(micro_root) => {
                    node = tree.parent(micro_root);
                    if tree.depth(node) == target_depth {
                        return Some(node);
                    }
                }
            }
        }

        // Macro tier: delegate to a jump node below, take the largest
        // power-of-two jump, finish on the landing node's ladder.
        // Every node outside the micro trees carries a link.
        let Some(jump) = self.macro_links.link(node) else {
            unreachable!("node {} is neither micro nor macro-linked", node);
        };

        let distance = tree.depth(jump) - target_depth;
        let level = distance.ilog2() as usize;
        let landing = self.jump_pointers.pointer(jump, level);

        let remaining = tree.depth(landing) - target_depth;
        Some(self.ladders.ancestor(tree, landing, remaining))
    }

    /// [`query`](Self::query) for signed depths; negative depths yield `None`.
    pub fn query_signed(&self, node: NodeId, target_depth: i64) -> Option<NodeId> {
        let target_depth = usize::try_from(target_depth).ok()?;
        self.query(node, target_depth)
    }

    /// [`query`](Self::query) that reports an out-of-range node instead of
    /// panicking.
    pub fn try_query(
        &self,
        node: NodeId,
        target_depth: usize,
    ) -> Result<Option<NodeId>, LevelAncestorError> {
        self.check_node(node)?;
        Ok(self.query(node, target_depth))
    }

    /// Ancestor `distance` levels above `node`, `None` past the root.
    pub fn ancestor(&self, node: NodeId, distance: usize) -> Option<NodeId> {
        let target_depth = self.tree.depth(node).checked_sub(distance)?;
        self.query(node, target_depth)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Always false: preprocessing requires a root.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Root node id
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Depth of `node`
    pub fn depth(&self, node: NodeId) -> usize {
        self.tree.depth(node)
    }

    /// Parent of `node`, `None` for the root
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        (node != self.tree.root()).then(|| self.tree.parent(node))
    }

    /// Micro block threshold in effect
    pub fn block_size(&self) -> usize {
        self.jump_nodes.block_size()
    }

    /// Entries per jump-pointer row
    pub fn log_n(&self) -> usize {
        self.log_n
    }

    /// Is `node` a jump node?
    pub fn is_jump_node(&self, node: NodeId) -> bool {
        self.jump_nodes.contains(node)
    }

    /// Jump node that `node` delegates to; `None` for micro nodes.
    pub fn macro_link(&self, node: NodeId) -> Option<NodeId> {
        self.macro_links.link(node)
    }

    /// Does `node` belong to a micro tree?
    pub fn is_micro(&self, node: NodeId) -> bool {
        self.micro.slot(node).is_some()
    }

    /// Underlying tree with its basic attributes
    pub fn tree(&self) -> &RootedTree {
        &self.tree
    }

    /// Ladder decomposition
    pub fn ladders(&self) -> &LadderDecomposition {
        &self.ladders
    }

    /// Micro-tree tier
    pub fn micro(&self) -> &MicroForest {
        &self.micro
    }

    /// Storage used by each tier
    pub fn storage_profile(&self) -> StorageProfile {
        StorageProfile {
            nodes: self.len(),
            block_size: self.block_size(),
            log_n: self.log_n,
            ladders: self.ladders.ladder_count(),
            ladder_cells: self.ladders.total_cells(),
            jump_nodes: self.jump_nodes.len(),
            jump_pointer_cells: self.jump_pointers.total_cells(),
            macro_nodes: self.macro_links.macro_count(),
            micro_nodes: self.micro.node_count(),
            micro_trees: self.micro.trees().len(),
            unique_shapes: self.micro.shapes().len(),
            micro_table_cells: self.micro.shapes().total_cells(),
        }
    }

    fn check_node(&self, node: NodeId) -> Result<(), LevelAncestorError> {
        if node >= self.len() {
            return Err(LevelAncestorError::NodeOutOfRange {
                node,
                nodes_count: self.len(),
            });
        }
        Ok(())
    }
}
