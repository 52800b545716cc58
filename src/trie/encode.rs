//! Serialization of a [`Trie`] into the binary format.
//!
//! ```text
//! node   := header offset{N-1} node{N}
//! header := u32 BE  [31..24] N children | [23] terminal | [22..0] code point
//! offset := u32 BE  words from the start of child 1 to the start of child K+1
//! ```
//!
//! Children follow their parent's offset table in ascending code point order,
//! each written in full before the next. Child 1 starts right after the
//! offset table. The root comes first and there is no file header, so a
//! reader starts at byte 0.

use std::io::{self, Write};

use byteorder::{BigEndian, WriteBytesExt};
use tracing::debug;

use super::node::Node;
use super::node_arena::NodeId;
use super::tree::Trie;
use super::validate::{validate, CapacityError};
use crate::error::Result;

/// Size of a header or offset word in bytes.
pub const WORD_SIZE: usize = 4;

/// Header bit set on nodes that end an entry.
pub const TERMINAL_FLAG: u32 = 0x80_0000;

/// Packs a node's child count, terminal flag and code point into its header.
///
/// The node must have passed [`validate`].
#[inline]
pub fn header_word(node: &Node) -> u32 {
    debug_assert!(node.child_count() <= 0xFF && node.code_point() < TERMINAL_FLAG);
    let terminal = if node.is_terminal() { TERMINAL_FLAG } else { 0 };
    ((node.child_count() as u32) << 24) | terminal | node.code_point()
}

/// Encoded size of every subtree, in words.
///
/// Computed in one bottom-up pass: nodes are visited in reverse allocation
/// order, which reaches every child before its parent.
#[derive(Clone, Debug)]
pub struct SubtreeSizes(Vec<u64>);

impl SubtreeSizes {
    /// Computes the size of every subtree of `trie`.
    pub fn compute(trie: &Trie) -> Self {
        let mut words = vec![0u64; trie.node_count()];
        for id in trie.ids().rev() {
            let children = trie.node(id).children();
            let offsets = children.len().saturating_sub(1) as u64;
            let subtrees: u64 = children.nodes().map(|child| words[child.index()]).sum();
            words[id.index()] = 1 + offsets + subtrees;
        }
        SubtreeSizes(words)
    }

    /// Encoded size of `id`'s subtree in 4-byte words.
    #[inline]
    pub fn words(&self, id: NodeId) -> u64 {
        self.0[id.index()]
    }

    /// Encoded size of `id`'s subtree in bytes.
    #[inline]
    pub fn bytes(&self, id: NodeId) -> u64 {
        self.words(id) * WORD_SIZE as u64
    }
}

/// Writes a validated trie in depth-first order.
#[derive(Debug)]
pub struct Encoder<'t> {
    trie: &'t Trie,
    sizes: SubtreeSizes,
}

impl<'t> Encoder<'t> {
    /// Validates `trie` and computes its subtree sizes.
    ///
    /// # Errors
    ///
    /// Returns a [`CapacityError`] if a node does not fit its header, or if
    /// the encoding is too large for 32-bit word offsets.
    pub fn new(trie: &'t Trie) -> std::result::Result<Self, CapacityError> {
        validate(trie)?;
        let sizes = SubtreeSizes::compute(trie);
        // Every offset is smaller than the whole encoding.
        let words = sizes.words(NodeId::ROOT);
        if words > u64::from(u32::MAX) {
            return Err(CapacityError::OffsetOverflow { words });
        }
        Ok(Encoder { trie, sizes })
    }

    /// Returns the subtree sizes computed by [`new`](Encoder::new).
    pub fn sizes(&self) -> &SubtreeSizes {
        &self.sizes
    }

    /// Total encoded size in bytes.
    pub fn encoded_len(&self) -> u64 {
        self.sizes.bytes(NodeId::ROOT)
    }

    /// Writes the whole trie and returns the number of bytes written.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<u64> {
        self.write_subtree(NodeId::ROOT, out)
    }

    /// Writes the subtree rooted at `id` and returns the number of bytes
    /// written.
    pub fn write_subtree<W: Write>(&self, id: NodeId, out: &mut W) -> io::Result<u64> {
        let mut written = 0;
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let node = self.trie.node(id);
            out.write_u32::<BigEndian>(header_word(node))?;
            written += 1;

            let mut offset = 0u64;
            for child in node.children().nodes().take(node.child_count().saturating_sub(1)) {
                offset += self.sizes.words(child);
                // Bounded by the root size checked in `new`.
                out.write_u32::<BigEndian>(offset as u32)?;
                written += 1;
            }

            stack.extend(node.children().nodes().rev());
        }
        Ok(written * WORD_SIZE as u64)
    }
}

/// Validates and encodes `trie` into `out`, returning the number of bytes
/// written.
///
/// Nothing is written if validation fails.
pub fn encode<W: Write>(trie: &Trie, out: &mut W) -> Result<u64> {
    let encoder = Encoder::new(trie)?;
    let written = encoder.write_to(out)?;
    debug!(nodes = trie.node_count(), bytes = written, "trie encoded");
    Ok(written)
}

/// Validates and encodes `trie` into a new buffer.
///
/// # Errors
///
/// Returns [`TrieError::Capacity`](crate::error::TrieError::Capacity) if the
/// trie does not fit the format.
pub fn encode_to_vec(trie: &Trie) -> Result<Vec<u8>> {
    let encoder = Encoder::new(trie)?;
    let mut buf = Vec::with_capacity(encoder.encoded_len() as usize);
    encoder.write_to(&mut buf)?;
    debug!(nodes = trie.node_count(), bytes = buf.len(), "trie encoded");
    Ok(buf)
}

#[cfg(test)]
mod test {
    use super::super::builder::build_trie;
    use super::*;
    use itertools::Itertools;

    fn words(bytes: &[u8]) -> Vec<u32> {
        bytes
            .chunks_exact(4)
            .map(|w| u32::from_be_bytes([w[0], w[1], w[2], w[3]]))
            .collect()
    }

    #[test]
    fn empty_trie_is_four_zero_bytes() {
        let trie = build_trie(Vec::<&str>::new()).unwrap();
        assert_eq!(encode_to_vec(&trie).unwrap(), [0, 0, 0, 0]);
    }

    #[test]
    fn empty_entry_sets_root_terminal_flag() {
        let trie = build_trie([""]).unwrap();
        assert_eq!(encode_to_vec(&trie).unwrap(), [0x00, 0x80, 0x00, 0x00]);
    }

    #[test]
    fn a_ab_b_layout() {
        let trie = build_trie(["a", "ab", "b"]).unwrap();
        let encoded = words(&encode_to_vec(&trie).unwrap());
        assert_eq!(
            encoded,
            [
                0x0200_0000,                // root: 2 children
                2,                          // 'b' subtree starts 2 words after 'a'
                0x0180_0000 | 0x61,         // 'a': 1 child, terminal
                0x0080_0000 | 0x62,         // 'a' -> 'b': terminal leaf
                0x0080_0000 | 0x62,         // 'b': terminal leaf
            ]
        );
    }

    #[test]
    fn offsets_are_cumulative() {
        let trie = build_trie(["abc", "b", "cd", "d"]).unwrap();
        let encoded = words(&encode_to_vec(&trie).unwrap());
        // root header, then offsets to 'b', 'c', 'd' relative to 'a'.
        assert_eq!(encoded[0] >> 24, 4);
        assert_eq!(&encoded[1..4], [3, 4, 6]);
        assert_eq!(encoded[4] & 0x7F_FFFF, 'a' as u32);
        let first_child = 4;
        for (offset, letter) in [(0, 'a'), (3, 'b'), (4, 'c'), (6, 'd')] {
            assert_eq!(encoded[first_child + offset] & 0x7F_FFFF, letter as u32);
        }
    }

    #[test]
    fn supplementary_plane_code_point() {
        let trie = build_trie(["😀"]).unwrap();
        let encoded = words(&encode_to_vec(&trie).unwrap());
        assert_eq!(encoded, [0x0100_0000, 0x0080_0000 | 0x1F600]);
    }

    #[test]
    fn size_matches_bytes_written_for_every_subtree() {
        let trie = build_trie(["alfa", "alpha", "al", "beta", "bet", "gamma", "ü", "授人"]).unwrap();
        let encoder = Encoder::new(&trie).unwrap();
        for id in trie.ids() {
            let mut buf = Vec::new();
            let written = encoder.write_subtree(id, &mut buf).unwrap();
            assert_eq!(written, buf.len() as u64);
            assert_eq!(written, encoder.sizes().bytes(id));
        }
        assert_eq!(encoder.encoded_len(), encode_to_vec(&trie).unwrap().len() as u64);
    }

    #[test]
    fn insertion_order_does_not_change_output() {
        const WORDS: [&str; 6] = ["ALFA", "ALF", "BRAVO", "BR", "ÅSA", "ÄNG"];
        let expected = encode_to_vec(&build_trie(WORDS).unwrap()).unwrap();
        for order in WORDS.iter().permutations(WORDS.len()) {
            let trie = build_trie(order).unwrap();
            assert_eq!(encode_to_vec(&trie).unwrap(), expected);
        }
    }

    #[test]
    fn capacity_violation_writes_nothing() {
        let trie = build_trie((0x100u32..0x200).map(|cp| vec![cp])).unwrap();
        let mut out = Vec::new();
        let err = encode(&trie, &mut out).unwrap_err();
        assert!(matches!(
            err,
            crate::error::TrieError::Capacity(CapacityError::Children { count: 256, .. })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn encode_to_vec_reports_capacity_errors() {
        let trie = build_trie([[0x80_0000u32]]).unwrap();
        assert!(matches!(
            encode_to_vec(&trie),
            Err(crate::error::TrieError::Capacity(CapacityError::CodePoint {
                code_point: 0x80_0000
            }))
        ));
    }

    #[test]
    fn encode_reports_bytes_written() {
        let trie = build_trie(["ab", "ac"]).unwrap();
        let mut out = Vec::new();
        let written = encode(&trie, &mut out).unwrap();
        assert_eq!(written, out.len() as u64);
        assert_eq!(written, 5 * 4);
    }
}
