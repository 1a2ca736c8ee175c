//! Rooted static tree and its basic per-node attributes
//!
//! One explicit-stack DFS computes, for every node:
//! - depth (edges from the root)
//! - parent (the root is its own parent)
//! - height (nodes on the longest downward path, leaves = 1)
//! - long-path child (child of maximum height, first one wins on ties)
//! - subtree size

mod builder;
mod traversal;

pub use builder::TreeBuilder;
pub use traversal::{DepthFirst, Visit};

use crate::{LevelAncestorError, NodeId};

/// Immutable rooted tree with precomputed basic attributes.
#[derive(Debug, Clone)]
pub struct RootedTree {
    root: NodeId,
    children: Vec<Vec<NodeId>>,
    parent: Vec<NodeId>,
    depth: Vec<usize>,
    height: Vec<usize>,
    long_path_child: Vec<Option<NodeId>>,
    subtree_size: Vec<usize>,
}

impl RootedTree {
    /// Run the basic traversal over `children` starting at `root`.
    ///
    /// `children` must already satisfy in-degree ≤ 1 (guaranteed by
    /// [`TreeBuilder`]); this pass detects nodes that are not reachable.
    pub(crate) fn analyze(
        children: Vec<Vec<NodeId>>,
        root: NodeId,
    ) -> Result<Self, LevelAncestorError> {
        let n = children.len();
        if root >= n {
            return Err(LevelAncestorError::NodeOutOfRange {
                node: root,
                nodes_count: n,
            });
        }

        let mut parent = vec![root; n];
        let mut depth = vec![0; n];
        let mut height = vec![0; n];
        let mut long_path_child = vec![None; n];
        let mut subtree_size = vec![0; n];
        let mut reachable = 0;

        for visit in DepthFirst::new(&children, root) {
            match visit {
                Visit::Enter(node) => {
                    reachable += 1;
                    for &child in &children[node] {
                        parent[child] = node;
                        depth[child] = depth[node] + 1;
                    }
                }
                Visit::Exit(node) => {
                    let mut size = 1;
                    let mut best = 0;
                    let mut heaviest = None;
                    for &child in &children[node] {
                        size += subtree_size[child];
                        if height[child] > best {
                            best = height[child];
                            heaviest = Some(child);
                        }
                    }
                    subtree_size[node] = size;
                    height[node] = best + 1;
                    long_path_child[node] = heaviest;
                }
            }
        }

        if reachable != n {
            return Err(LevelAncestorError::Unreachable {
                reachable,
                nodes_count: n,
            });
        }

        Ok(Self {
            root,
            children,
            parent,
            depth,
            height,
            long_path_child,
            subtree_size,
        })
    }

    /// Number of nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Trees built by [`TreeBuilder`] always hold at least the root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Root node id
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Children in edge-insertion order
    #[inline]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.children[node]
    }

    /// Full adjacency list, indexed by node id
    pub(crate) fn adjacency(&self) -> &[Vec<NodeId>] {
        &self.children
    }

    /// Parent pointer; the root points at itself.
    #[inline]
    pub fn parent(&self, node: NodeId) -> NodeId {
        self.parent[node]
    }

    /// Distance from the root
    #[inline]
    pub fn depth(&self, node: NodeId) -> usize {
        self.depth[node]
    }

    /// Number of nodes on the longest downward path starting at `node`.
    #[inline]
    pub fn height(&self, node: NodeId) -> usize {
        self.height[node]
    }

    /// Child rooting the tallest subtree, `None` for leaves.
    #[inline]
    pub fn long_path_child(&self, node: NodeId) -> Option<NodeId> {
        self.long_path_child[node]
    }

    /// Number of nodes in the subtree of `node`, itself included.
    #[inline]
    pub fn subtree_size(&self, node: NodeId) -> usize {
        self.subtree_size[node]
    }

    /// Reference answer by walking parent pointers one step at a time.
    ///
    /// Time: O(depth(node)). Used for verification only.
    pub fn naive_ancestor(&self, node: NodeId, target_depth: usize) -> Option<NodeId> {
        if target_depth > self.depth[node] {
            return None;
        }
        let mut current = node;
        for _ in target_depth..self.depth[node] {
            current = self.parent[current];
        }
        Some(current)
    }
}
