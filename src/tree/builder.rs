//! Edge collection before preprocessing
//!
//! Validation happens at the door: every `add_edge` checks ranges, self
//! loops and a second parent, so the only defect left for `preprocess` to
//! find is a node the root cannot reach.

use tracing::trace;

use super::RootedTree;
use crate::{LevelAncestor, LevelAncestorConfig, LevelAncestorError, NodeId};

/// Mutable construction phase of a [`LevelAncestor`].
///
/// Consumed by [`TreeBuilder::preprocess`], so edges cannot be added once
/// the query structure exists.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    children: Vec<Vec<NodeId>>,
    parent: Vec<Option<NodeId>>,
    config: LevelAncestorConfig,
}

impl TreeBuilder {
    /// Builder for `nodes_count` nodes with ids `0..nodes_count`.
    pub fn new(nodes_count: usize) -> Self {
        Self::with_config(nodes_count, LevelAncestorConfig::default())
    }

    /// Builder with an explicit configuration.
    pub fn with_config(nodes_count: usize, config: LevelAncestorConfig) -> Self {
        Self {
            children: vec![Vec::new(); nodes_count],
            parent: vec![None; nodes_count],
            config,
        }
    }

    /// Number of nodes the builder was sized for
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True when sized for zero nodes
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Configuration that `preprocess` will use
    pub fn config(&self) -> &LevelAncestorConfig {
        &self.config
    }

    /// Register the directed edge `parent -> child`.
    ///
    /// Children keep insertion order; that order drives long-path
    /// tie-breaking and micro-tree shape encoding.
    pub fn add_edge(&mut self, parent: NodeId, child: NodeId) -> Result<(), LevelAncestorError> {
        self.check_range(parent)?;
        self.check_range(child)?;

        if parent == child {
            return Err(LevelAncestorError::SelfLoop { node: child });
        }
        if let Some(existing) = self.parent[child] {
            return Err(LevelAncestorError::DuplicateParent {
                child,
                existing,
                requested: parent,
            });
        }

        trace!(parent, child, "edge added");
        self.parent[child] = Some(parent);
        self.children[parent].push(child);
        Ok(())
    }

    /// Validate the edge set and run the full preprocessing pipeline.
    pub fn preprocess(self, root: NodeId) -> Result<LevelAncestor, LevelAncestorError> {
        let config = self.config.clone();
        let tree = self.into_tree(root)?;
        LevelAncestor::from_tree(tree, config)
    }

    /// Validate the edge set and run only the basic traversal.
    pub fn into_tree(self, root: NodeId) -> Result<RootedTree, LevelAncestorError> {
        self.check_range(root)?;
        if let Some(parent) = self.parent[root] {
            return Err(LevelAncestorError::RootHasParent { root, parent });
        }
        RootedTree::analyze(self.children, root)
    }

    fn check_range(&self, node: NodeId) -> Result<(), LevelAncestorError> {
        if node >= self.children.len() {
            return Err(LevelAncestorError::NodeOutOfRange {
                node,
                nodes_count: self.children.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range() {
        let mut builder = TreeBuilder::new(3);
        let err = builder.add_edge(0, 3).unwrap_err();
        assert!(matches!(
            err,
            LevelAncestorError::NodeOutOfRange {
                node: 3,
                nodes_count: 3
            }
        ));
    }

    #[test]
    fn test_rejects_second_parent() {
        let mut builder = TreeBuilder::new(3);
        builder.add_edge(0, 2).unwrap();
        let err = builder.add_edge(1, 2).unwrap_err();
        assert!(matches!(
            err,
            LevelAncestorError::DuplicateParent {
                child: 2,
                existing: 0,
                requested: 1
            }
        ));
    }

    #[test]
    fn test_rejects_self_loop() {
        let mut builder = TreeBuilder::new(2);
        assert!(matches!(
            builder.add_edge(1, 1),
            Err(LevelAncestorError::SelfLoop { node: 1 })
        ));
    }

    #[test]
    fn test_rejects_root_with_parent() {
        let mut builder = TreeBuilder::new(2);
        builder.add_edge(0, 1).unwrap();
        assert!(matches!(
            builder.into_tree(1),
            Err(LevelAncestorError::RootHasParent { root: 1, parent: 0 })
        ));
    }

    #[test]
    fn test_detects_detached_cycle() {
        // 0 -> 1, and 2 -> 3 -> 2 never touches the root.
        let mut builder = TreeBuilder::new(4);
        builder.add_edge(0, 1).unwrap();
        builder.add_edge(2, 3).unwrap();
        builder.add_edge(3, 2).unwrap();
        assert!(matches!(
            builder.into_tree(0),
            Err(LevelAncestorError::Unreachable {
                reachable: 2,
                nodes_count: 4
            })
        ));
    }

    #[test]
    fn test_empty_builder_has_no_root() {
        let builder = TreeBuilder::new(0);
        assert!(builder.is_empty());
        assert!(matches!(
            builder.into_tree(0),
            Err(LevelAncestorError::NodeOutOfRange { .. })
        ));
    }
}
