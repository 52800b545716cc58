use super::node::{CodePoint, Node};
use super::node_arena::{NodeArena, NodeId};

/// A finished, read-only trie.
///
/// Produced by [`Builder::build`](super::builder::Builder::build). Nodes are
/// addressed by [`NodeId`]; [`NodeId::ROOT`] is the root, whose code point is
/// zero.
///
/// # Examples
///
/// ```
/// use libcptrie::trie::builder::build_trie;
///
/// let trie = build_trie(["BAKE", "CAKE", "FAKE", "LAKE", "MAKE"]).unwrap();
/// assert!(trie.contains("CAKE"));
/// assert!(!trie.contains("AKE"));
/// assert_eq!(trie.words(), ["BAKE", "CAKE", "FAKE", "LAKE", "MAKE"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trie {
    arena: NodeArena,
}

impl Trie {
    pub(crate) fn from_arena(arena: NodeArena) -> Self {
        Trie { arena }
    }

    /// Returns the root node.
    #[inline]
    pub fn root(&self) -> &Node {
        self.arena.get(NodeId::ROOT)
    }

    /// Returns the node for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this trie.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }

    /// Returns the number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Iterates all node ids in allocation order. Every child comes after its
    /// parent.
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = NodeId> + ExactSizeIterator {
        self.arena.ids()
    }

    /// Walks `path` from the root and returns the node it ends at.
    pub fn find(&self, path: impl IntoIterator<Item = CodePoint>) -> Option<NodeId> {
        path.into_iter()
            .try_fold(NodeId::ROOT, |id, cp| self.node(id).get(cp))
    }

    /// Returns true if `word` was inserted.
    pub fn contains(&self, word: &str) -> bool {
        self.contains_code_points(word.chars().map(CodePoint::from))
    }

    /// Returns true if the code point sequence `word` was inserted.
    pub fn contains_code_points(&self, word: impl IntoIterator<Item = CodePoint>) -> bool {
        self.find(word).is_some_and(|id| self.node(id).is_terminal())
    }

    /// Iterates node ids in pre-order: each node before its children,
    /// children in ascending code point order.
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder {
            trie: self,
            stack: vec![NodeId::ROOT],
        }
    }

    /// Returns every inserted entry as code points, sorted.
    pub fn entries(&self) -> Vec<Vec<CodePoint>> {
        let mut entries = Vec::new();
        let mut prefix = Vec::new();
        // Pending nodes, each with the length of `prefix` at its parent.
        let mut stack = vec![(NodeId::ROOT, 0)];
        while let Some((id, depth)) = stack.pop() {
            let node = self.node(id);
            prefix.truncate(depth);
            if id != NodeId::ROOT {
                prefix.push(node.code_point());
            }
            if node.is_terminal() {
                entries.push(prefix.clone());
            }
            let depth = prefix.len();
            stack.extend(node.children().nodes().rev().map(|child| (child, depth)));
        }
        entries
    }

    /// Returns every inserted entry as a string, sorted. Values that are not
    /// Unicode scalar values become U+FFFD.
    pub fn words(&self) -> Vec<String> {
        self.entries()
            .iter()
            .map(|entry| {
                entry
                    .iter()
                    .map(|&cp| char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER))
                    .collect()
            })
            .collect()
    }
}

/// Pre-order iterator over the nodes of a [`Trie`].
#[derive(Clone, Debug)]
pub struct PreOrder<'t> {
    trie: &'t Trie,
    stack: Vec<NodeId>,
}

impl<'t> Iterator for PreOrder<'t> {
    type Item = (NodeId, &'t Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.trie.node(id);
        self.stack.extend(node.children().nodes().rev());
        Some((id, node))
    }
}
