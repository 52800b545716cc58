use smallvec::SmallVec;

use super::node_arena::NodeId;

/// A Unicode code point, or any value decoded from an input byte sequence.
pub type CodePoint = u32;

/// Outcome of looking up a code point among a node's sorted children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Search {
    /// The child at this index carries the code point.
    Found(usize),
    /// No child carries the code point; inserting it before this index keeps
    /// the children sorted.
    Insert(usize),
}

/// The children of a node as `(code point, node)` edges, strictly sorted by
/// code point.
///
/// Most nodes in a word list have one or two children, so those are kept
/// inline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Children(SmallVec<[(CodePoint, NodeId); 2]>);

impl Children {
    /// Binary searches for `code_point`.
    #[inline]
    pub fn search(&self, code_point: CodePoint) -> Search {
        match self.0.binary_search_by_key(&code_point, |&(cp, _)| cp) {
            Ok(index) => Search::Found(index),
            Err(index) => Search::Insert(index),
        }
    }

    /// Gets the edge at the specified index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<(CodePoint, NodeId)> {
        self.0.get(index).copied()
    }

    /// Returns the node that `code_point`'s edge leads to.
    #[inline]
    pub fn find(&self, code_point: CodePoint) -> Option<NodeId> {
        match self.search(code_point) {
            Search::Found(index) => Some(self.0[index].1),
            Search::Insert(_) => None,
        }
    }

    /// Returns the child at `index`, which must be in bounds.
    #[inline]
    pub(crate) fn node(&self, index: usize) -> NodeId {
        self.0[index].1
    }

    /// Inserts an edge at a position previously returned by
    /// [`search`](Children::search) as [`Search::Insert`].
    pub(crate) fn insert_at(&mut self, index: usize, code_point: CodePoint, node: NodeId) {
        debug_assert!(index == 0 || self.0[index - 1].0 < code_point);
        debug_assert!(index == self.0.len() || code_point < self.0[index].0);
        self.0.insert(index, (code_point, node));
    }

    /// Returns the number of edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the edges in ascending code point order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (CodePoint, NodeId)> + ExactSizeIterator + '_ {
        self.0.iter().copied()
    }

    /// Iterates the child nodes in ascending code point order.
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = NodeId> + ExactSizeIterator + '_ {
        self.0.iter().map(|&(_, node)| node)
    }
}

/// A node in the trie: one code point on the path from the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    code_point: CodePoint,
    children: Children,
    terminal: bool,
}

impl Node {
    /// Creates a non-terminal node without children.
    pub fn new(code_point: CodePoint) -> Self {
        Node {
            code_point,
            children: Children::default(),
            terminal: false,
        }
    }

    /// The code point on the edge leading to this node. Zero for the root.
    #[inline]
    pub fn code_point(&self) -> CodePoint {
        self.code_point
    }

    /// True if an inserted entry ends at this node.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Returns the children of this node.
    #[inline]
    pub fn children(&self) -> &Children {
        &self.children
    }

    /// Returns the number of children.
    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns the node that `code_point`'s edge leads to, or None if no such
    /// edge exists.
    #[inline]
    pub fn get(&self, code_point: CodePoint) -> Option<NodeId> {
        self.children.find(code_point)
    }

    pub(crate) fn children_mut(&mut self) -> &mut Children {
        &mut self.children
    }

    pub(crate) fn set_terminal(&mut self) {
        self.terminal = true;
    }
}
