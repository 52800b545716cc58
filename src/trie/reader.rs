//! Lookups directly over an encoded trie, without deserializing it.
//!
//! All reads are bounds checked, so a truncated or corrupt buffer produces a
//! [`ReadError`] rather than a panic. Child offsets always point forward,
//! which guarantees every traversal terminates.

use byteorder::{BigEndian, ByteOrder};
use thiserror::Error;

use super::encode::{TERMINAL_FLAG, WORD_SIZE};
use super::node::CodePoint;

/// Completions returned by [`TrieView::complete`] unless asked otherwise.
pub const DEFAULT_COMPLETION_LIMIT: usize = 100;

const CODE_POINT_MASK: u32 = TERMINAL_FLAG - 1;

/// The buffer is not a valid encoded trie.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// A word would be read past the end of the buffer.
    #[error("word at byte {offset} is past the end of the {len}-byte trie")]
    OutOfBounds {
        /// Byte offset of the word.
        offset: usize,
        /// Length of the buffer.
        len: usize,
    },

    /// A child offset does not fit in the address space.
    #[error("child offset of the node at byte {offset} overflows")]
    OffsetOverflow {
        /// Byte offset of the parent node.
        offset: usize,
    },

    /// A child index past the node's child count.
    #[error("child {index} requested from a node with {count} children")]
    ChildIndex {
        /// Requested index.
        index: usize,
        /// Children the node has.
        count: usize,
    },
}

fn read_word(data: &[u8], offset: usize) -> Result<u32, ReadError> {
    offset
        .checked_add(WORD_SIZE)
        .and_then(|end| data.get(offset..end))
        .map(BigEndian::read_u32)
        .ok_or(ReadError::OutOfBounds {
            offset,
            len: data.len(),
        })
}

/// A node inside an encoded trie.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeRef<'a> {
    data: &'a [u8],
    offset: usize,
    header: u32,
}

impl<'a> NodeRef<'a> {
    fn at(data: &'a [u8], offset: usize) -> Result<Self, ReadError> {
        let header = read_word(data, offset)?;
        Ok(NodeRef {
            data,
            offset,
            header,
        })
    }

    /// Byte offset of this node's header.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The code point on the edge leading to this node.
    #[inline]
    pub fn code_point(&self) -> CodePoint {
        self.header & CODE_POINT_MASK
    }

    /// True if an entry ends at this node.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.header & TERMINAL_FLAG != 0
    }

    /// Returns the number of children.
    #[inline]
    pub fn child_count(&self) -> usize {
        (self.header >> 24) as usize
    }

    /// Returns the child at `index`, counted in ascending code point order.
    pub fn child(&self, index: usize) -> Result<NodeRef<'a>, ReadError> {
        let count = self.child_count();
        if index >= count {
            return Err(ReadError::ChildIndex { index, count });
        }
        let delta = if index == 0 {
            0
        } else {
            read_word(self.data, self.offset + index * WORD_SIZE)? as usize
        };
        // Child subtrees start after the header and the N-1 offset words.
        let child_offset = (count + delta)
            .checked_mul(WORD_SIZE)
            .and_then(|bytes| bytes.checked_add(self.offset))
            .ok_or(ReadError::OffsetOverflow {
                offset: self.offset,
            })?;
        NodeRef::at(self.data, child_offset)
    }

    /// Binary searches the children for `code_point`.
    pub fn get(&self, code_point: CodePoint) -> Result<Option<NodeRef<'a>>, ReadError> {
        let mut low = 0;
        let mut high = self.child_count();
        while low < high {
            let mid = low + (high - low) / 2;
            let child = self.child(mid)?;
            match code_point.cmp(&child.code_point()) {
                std::cmp::Ordering::Equal => return Ok(Some(child)),
                std::cmp::Ordering::Less => high = mid,
                std::cmp::Ordering::Greater => low = mid + 1,
            }
        }
        Ok(None)
    }

    /// Iterates the children in ascending code point order.
    pub fn children(&self) -> impl Iterator<Item = Result<NodeRef<'a>, ReadError>> + 'a {
        let node = *self;
        (0..node.child_count()).map(move |index| node.child(index))
    }
}

/// Read-only view of an encoded trie.
///
/// # Examples
///
/// ```
/// use libcptrie::trie::builder::build_trie;
/// use libcptrie::trie::encode::encode_to_vec;
/// use libcptrie::trie::reader::TrieView;
///
/// let trie = build_trie(["Paris", "Parma", "Prague"]).unwrap();
/// let bytes = encode_to_vec(&trie).unwrap();
/// let view = TrieView::new(&bytes);
///
/// assert!(view.contains("Parma").unwrap());
/// assert_eq!(view.complete("par", 10).unwrap(), ["Paris", "Parma"]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct TrieView<'a> {
    data: &'a [u8],
}

impl<'a> TrieView<'a> {
    /// Wraps an encoded trie. Nothing is read until a lookup.
    pub fn new(data: &'a [u8]) -> Self {
        TrieView { data }
    }

    /// Returns the root node at byte 0.
    pub fn root(&self) -> Result<NodeRef<'a>, ReadError> {
        NodeRef::at(self.data, 0)
    }

    /// Walks `path` from the root and returns the node it ends at.
    pub fn find(
        &self,
        path: impl IntoIterator<Item = CodePoint>,
    ) -> Result<Option<NodeRef<'a>>, ReadError> {
        let mut node = self.root()?;
        for code_point in path {
            match node.get(code_point)? {
                Some(child) => node = child,
                None => return Ok(None),
            }
        }
        Ok(Some(node))
    }

    /// Returns true if `word` is an entry.
    pub fn contains(&self, word: &str) -> Result<bool, ReadError> {
        Ok(self
            .find(word.chars().map(CodePoint::from))?
            .is_some_and(|node| node.is_terminal()))
    }

    /// Returns up to `limit` entries starting with `prefix`, in sorted order.
    ///
    /// Each prefix character is matched exactly if possible, otherwise with
    /// its ASCII case swapped. The returned entries are spelled as stored, so
    /// `"par"` may complete to `"Paris"`.
    pub fn complete(&self, prefix: &str, limit: usize) -> Result<Vec<String>, ReadError> {
        let mut node = self.root()?;
        let mut base = String::with_capacity(prefix.len());
        for ch in prefix.chars() {
            let code_point = CodePoint::from(ch);
            let mut next = node.get(code_point)?;
            if next.is_none() {
                let swapped = swap_ascii_case(code_point);
                if swapped != code_point {
                    next = node.get(swapped)?;
                }
            }
            let Some(child) = next else {
                return Ok(Vec::new());
            };
            base.push(to_char(child.code_point()));
            node = child;
        }

        collect_completions(node, base, limit)
    }
}

/// Collects terminal entries below `start` in pre-order, `word` being the
/// path to `start`.
fn collect_completions(
    start: NodeRef<'_>,
    mut word: String,
    limit: usize,
) -> Result<Vec<String>, ReadError> {
    let mut completions = Vec::new();
    // Pending nodes, each with the length of `word` at its parent.
    let mut stack = Vec::new();
    let mut node = start;
    while completions.len() < limit {
        if node.is_terminal() {
            completions.push(word.clone());
            if completions.len() == limit {
                break;
            }
        }
        let depth = word.len();
        for index in (0..node.child_count()).rev() {
            stack.push((node.child(index)?, depth));
        }
        let Some((next, depth)) = stack.pop() else {
            break;
        };
        word.truncate(depth);
        word.push(to_char(next.code_point()));
        node = next;
    }
    Ok(completions)
}

fn swap_ascii_case(code_point: CodePoint) -> CodePoint {
    match char::from_u32(code_point) {
        Some(ch) if ch.is_ascii_uppercase() => CodePoint::from(ch.to_ascii_lowercase()),
        Some(ch) if ch.is_ascii_lowercase() => CodePoint::from(ch.to_ascii_uppercase()),
        _ => code_point,
    }
}

fn to_char(code_point: CodePoint) -> char {
    char::from_u32(code_point).unwrap_or(char::REPLACEMENT_CHARACTER)
}
