//! Shared helpers for integration tests

#![allow(dead_code)]

use level_ancestor::{LevelAncestor, LevelAncestorConfig, NodeId, TreeBuilder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Block sizes every scenario is replayed with: the derived default plus
/// overrides that force micro trees of various sizes.
pub const BLOCK_SIZES: [Option<usize>; 5] = [None, Some(2), Some(3), Some(4), Some(8)];

/// Build and preprocess a tree, panicking on invalid input.
pub fn build(n: usize, edges: &[(NodeId, NodeId)], root: NodeId) -> LevelAncestor {
    build_with_block(n, edges, root, None)
}

/// Build with an optional block-size override.
pub fn build_with_block(
    n: usize,
    edges: &[(NodeId, NodeId)],
    root: NodeId,
    block_size: Option<usize>,
) -> LevelAncestor {
    let mut config = LevelAncestorConfig::default();
    if let Some(block_size) = block_size {
        config = config.with_block_size(block_size).expect("valid block size");
    }

    let mut builder = TreeBuilder::with_config(n, config);
    for &(parent, child) in edges {
        builder.add_edge(parent, child).expect("valid edge");
    }
    builder.preprocess(root).expect("valid tree")
}

/// Edges of the chain `0 -> 1 -> ... -> n-1`.
pub fn chain_edges(n: usize) -> Vec<(NodeId, NodeId)> {
    (0..n.saturating_sub(1)).map(|i| (i, i + 1)).collect()
}

/// Random recursive tree: node `i` hangs below a uniform node `< i`.
pub fn random_edges(n: usize, seed: u64) -> Vec<(NodeId, NodeId)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (1..n).map(|child| (rng.gen_range(0..child), child)).collect()
}

/// Parent array (root points to itself) from an edge list.
pub fn parent_array(n: usize, edges: &[(NodeId, NodeId)], root: NodeId) -> Vec<NodeId> {
    let mut parents = vec![root; n];
    for &(parent, child) in edges {
        parents[child] = parent;
    }
    parents
}

/// Depth by walking to the root.
pub fn naive_depth(parents: &[NodeId], root: NodeId, node: NodeId) -> usize {
    let mut depth = 0;
    let mut current = node;
    while current != root {
        current = parents[current];
        depth += 1;
    }
    depth
}

/// Ancestor by walking one parent at a time.
pub fn naive_ancestor(
    parents: &[NodeId],
    root: NodeId,
    node: NodeId,
    target_depth: usize,
) -> Option<NodeId> {
    let mut depth = naive_depth(parents, root, node);
    if target_depth > depth {
        return None;
    }
    let mut current = node;
    while depth > target_depth {
        current = parents[current];
        depth -= 1;
    }
    Some(current)
}

/// Compare every `(node, depth)` pair, including one past the node's depth.
pub fn assert_all_queries_match(la: &LevelAncestor, parents: &[NodeId]) {
    let root = la.root();
    for node in 0..la.len() {
        let depth = naive_depth(parents, root, node);
        assert_eq!(la.depth(node), depth, "depth of node {}", node);
        for target in 0..=depth + 1 {
            assert_eq!(
                la.query(node, target),
                naive_ancestor(parents, root, node, target),
                "node {} target depth {} (block size {})",
                node,
                target,
                la.block_size()
            );
        }
    }
}
