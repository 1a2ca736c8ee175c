//! Explicit-stack depth-first traversal
//!
//! Every preprocessing pass walks the tree through this iterator instead of
//! recursing, so path-like trees with hundreds of thousands of levels cannot
//! overflow the call stack. Each frame carries a visit-state tag that
//! records whether the node has been entered and which child comes next.

use crate::NodeId;

/// Event emitted by [`DepthFirst`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Node is entered (pre-order position).
    Enter(NodeId),

    /// All accepted children of the node are finished (post-order position).
    Exit(NodeId),
}

/// Per-frame visit state
#[derive(Debug, Clone, Copy)]
enum FrameState {
    /// Node not yet reported
    Fresh,

    /// Next child index to inspect
    Children(usize),
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    node: NodeId,
    state: FrameState,
}

fn keep_all(_: NodeId) -> bool {
    true
}

/// Depth-first walk over an adjacency list, children in insertion order.
///
/// Stack depth: O(height)
/// Per-frame: one node id + one child cursor
#[derive(Debug)]
pub struct DepthFirst<'a, F> {
    children: &'a [Vec<NodeId>],
    stack: Vec<Frame>,
    accept: F,
}

impl<'a> DepthFirst<'a, fn(NodeId) -> bool> {
    /// Walk the whole subtree of `start`.
    pub fn new(children: &'a [Vec<NodeId>], start: NodeId) -> Self {
        DepthFirst::filtered(children, start, keep_all as fn(NodeId) -> bool)
    }
}

impl<'a, F> DepthFirst<'a, F>
where
    F: FnMut(NodeId) -> bool,
{
    /// Walk the subtree of `start`, descending only into children for which
    /// `accept` returns true. `start` itself is always visited.
    pub fn filtered(children: &'a [Vec<NodeId>], start: NodeId, accept: F) -> Self {
        Self {
            children,
            stack: vec![Frame {
                node: start,
                state: FrameState::Fresh,
            }],
            accept,
        }
    }

    /// Number of open frames (current depth below `start`, plus one).
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl<'a, F> Iterator for DepthFirst<'a, F>
where
    F: FnMut(NodeId) -> bool,
{
    type Item = Visit;

    fn next(&mut self) -> Option<Visit> {
        let children = self.children;

        loop {
            let frame = self.stack.last_mut()?;
            match frame.state {
                FrameState::Fresh => {
                    frame.state = FrameState::Children(0);
                    return Some(Visit::Enter(frame.node));
                }
                FrameState::Children(mut cursor) => {
                    let kids = &children[frame.node];
                    while cursor < kids.len() && !(self.accept)(kids[cursor]) {
                        cursor += 1;
                    }

                    if cursor < kids.len() {
                        frame.state = FrameState::Children(cursor + 1);
                        let child = kids[cursor];
                        self.stack.push(Frame {
                            node: child,
                            state: FrameState::Fresh,
                        });
                    } else {
                        let node = frame.node;
                        self.stack.pop();
                        return Some(Visit::Exit(node));
                    }
                }
            }
        }
    }
}
