//! Index-based arena owning every node of a trie.
//!
//! Nodes refer to their children by [`NodeId`] rather than by reference, so
//! growing the arena while a parent is being updated never invalidates
//! anything.

use super::node::Node;

/// Handle to a node in a [`NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node, always the first one allocated.
    pub const ROOT: NodeId = NodeId(0);

    pub(crate) fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// Position of the node in allocation order.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A growable arena of nodes.
///
/// Nodes are only appended. A child is always allocated after its parent,
/// so every child id is greater than its parent's id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    /// Creates an arena holding only the root node.
    pub fn new() -> Self {
        NodeArena {
            nodes: vec![Node::new(0)],
        }
    }

    /// Id the next call to [`alloc`](NodeArena::alloc) will return.
    pub fn next_id(&self) -> NodeId {
        NodeId(self.nodes.len())
    }

    /// Appends `node` and returns its id.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = self.next_id();
        self.nodes.push(node);
        id
    }

    /// Returns the node for `id`.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Returns the node for `id` mutably.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Returns the number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Iterates all ids in allocation order.
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = NodeId> + ExactSizeIterator {
        (0..self.nodes.len()).map(NodeId)
    }
}
