use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use smallvec::SmallVec;
use tracing::debug;

use super::node::{CodePoint, Node, Search};
use super::node_arena::{NodeArena, NodeId};
use super::tree::Trie;
use super::utf8::{code_points, DecodeError, DecodeMode};
use crate::error::TrieError;

/// Trait for types that can be inserted into a trie as one entry.
///
/// Strings and byte strings are decoded as UTF-8 according to the builder's
/// [`DecodeMode`]. Slices and arrays of [`CodePoint`] are taken as they are,
/// which allows values the UTF-8 decoder can never produce.
pub trait IntoCodePoints {
    /// Collects this entry into a code point buffer.
    fn collect_code_points(self, mode: DecodeMode) -> Result<SmallVec<[CodePoint; 32]>, DecodeError>;
}

// Byte string types → decoded code points

impl IntoCodePoints for &[u8] {
    fn collect_code_points(self, mode: DecodeMode) -> Result<SmallVec<[CodePoint; 32]>, DecodeError> {
        code_points(self, mode).collect()
    }
}

impl IntoCodePoints for &Vec<u8> {
    fn collect_code_points(self, mode: DecodeMode) -> Result<SmallVec<[CodePoint; 32]>, DecodeError> {
        self.as_slice().collect_code_points(mode)
    }
}

impl IntoCodePoints for Vec<u8> {
    fn collect_code_points(self, mode: DecodeMode) -> Result<SmallVec<[CodePoint; 32]>, DecodeError> {
        self.as_slice().collect_code_points(mode)
    }
}

impl IntoCodePoints for &str {
    fn collect_code_points(self, mode: DecodeMode) -> Result<SmallVec<[CodePoint; 32]>, DecodeError> {
        self.as_bytes().collect_code_points(mode)
    }
}

impl IntoCodePoints for &&str {
    fn collect_code_points(self, mode: DecodeMode) -> Result<SmallVec<[CodePoint; 32]>, DecodeError> {
        self.as_bytes().collect_code_points(mode)
    }
}

impl IntoCodePoints for String {
    fn collect_code_points(self, mode: DecodeMode) -> Result<SmallVec<[CodePoint; 32]>, DecodeError> {
        self.as_bytes().collect_code_points(mode)
    }
}

impl IntoCodePoints for &String {
    fn collect_code_points(self, mode: DecodeMode) -> Result<SmallVec<[CodePoint; 32]>, DecodeError> {
        self.as_bytes().collect_code_points(mode)
    }
}

// Code point sequences → as is

impl IntoCodePoints for &[CodePoint] {
    fn collect_code_points(self, _: DecodeMode) -> Result<SmallVec<[CodePoint; 32]>, DecodeError> {
        Ok(self.iter().copied().collect())
    }
}

impl IntoCodePoints for Vec<CodePoint> {
    fn collect_code_points(self, _: DecodeMode) -> Result<SmallVec<[CodePoint; 32]>, DecodeError> {
        Ok(self.into_iter().collect())
    }
}

impl<const N: usize> IntoCodePoints for [CodePoint; N] {
    fn collect_code_points(self, _: DecodeMode) -> Result<SmallVec<[CodePoint; 32]>, DecodeError> {
        Ok(self.into_iter().collect())
    }
}

impl<const N: usize> IntoCodePoints for &[CodePoint; N] {
    fn collect_code_points(self, _: DecodeMode) -> Result<SmallVec<[CodePoint; 32]>, DecodeError> {
        Ok(self.iter().copied().collect())
    }
}

/// Builds a trie by inserting entries one at a time, in any order.
///
/// Children are kept sorted as they are inserted, so the finished trie does
/// not depend on insertion order.
#[derive(Debug)]
pub struct Builder {
    arena: NodeArena,
    mode: DecodeMode,
    entries: usize,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Creates a builder decoding strings with [`DecodeMode::Permissive`].
    pub fn new() -> Self {
        Self::with_mode(DecodeMode::default())
    }

    /// Creates a builder decoding strings with `mode`.
    pub fn with_mode(mode: DecodeMode) -> Self {
        Builder {
            arena: NodeArena::new(),
            mode,
            entries: 0,
        }
    }

    /// Inserts an entry.
    ///
    /// The entry is decoded completely before the trie is touched, so a
    /// decoding error leaves the builder unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the entry is not decodable in the
    /// builder's mode.
    pub fn insert(&mut self, word: impl IntoCodePoints) -> Result<(), DecodeError> {
        let word = word.collect_code_points(self.mode)?;
        self.insert_code_points(&word);
        Ok(())
    }

    fn insert_code_points(&mut self, word: &[CodePoint]) {
        let mut current = NodeId::ROOT;
        for &code_point in word {
            current = self.child_or_insert(current, code_point);
        }
        self.arena.get_mut(current).set_terminal();
        self.entries += 1;
    }

    fn child_or_insert(&mut self, parent: NodeId, code_point: CodePoint) -> NodeId {
        let next_id = self.arena.next_id();
        let children = self.arena.get_mut(parent).children_mut();
        match children.search(code_point) {
            Search::Found(index) => children.node(index),
            Search::Insert(index) => {
                // Link before allocating; the parent borrow ends here.
                children.insert_at(index, code_point, next_id);
                self.arena.alloc(Node::new(code_point))
            }
        }
    }

    /// Number of [`insert`](Builder::insert) calls that succeeded, duplicates
    /// included.
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Number of nodes so far, root included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Freezes the trie.
    pub fn build(self) -> Trie {
        debug!(
            entries = self.entries,
            nodes = self.arena.len(),
            "trie built"
        );
        Trie::from_arena(self.arena)
    }
}

/// Builds a trie from an iterator of entries, decoding strings permissively.
///
/// # Examples
///
/// ```
/// use libcptrie::trie::builder::build_trie;
///
/// let trie = build_trie(["APPLE", "BANANA", "CHERRY"]).unwrap();
/// assert!(trie.contains("BANANA"));
/// assert!(!trie.contains("APRICOT"));
/// ```
pub fn build_trie<W: IntoCodePoints>(
    words: impl IntoIterator<Item = W>,
) -> Result<Trie, DecodeError> {
    build_trie_with_mode(DecodeMode::default(), words)
}

/// Builds a trie from an iterator of entries using the given decode mode.
pub fn build_trie_with_mode<W: IntoCodePoints>(
    mode: DecodeMode,
    words: impl IntoIterator<Item = W>,
) -> Result<Trie, DecodeError> {
    let mut builder = Builder::with_mode(mode);
    for word in words {
        builder.insert(word)?;
    }
    Ok(builder.build())
}

/// Builds a trie from newline separated entries.
///
/// Lines are split on `\n`, which is stripped; nothing else is trimmed.
/// Empty lines insert the empty entry. A final line without a terminating
/// newline is still an entry.
///
/// # Errors
///
/// Returns [`TrieError::Decode`] with the 1-based line number on a decoding
/// error, or [`TrieError::Io`] if reading fails.
pub fn build_trie_from_reader<R: BufRead>(mut reader: R, mode: DecodeMode) -> Result<Trie, TrieError> {
    let mut builder = Builder::with_mode(mode);

    // Reuse one buffer for every line instead of allocating per line.
    let mut buf = Vec::with_capacity(80);
    let mut line = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line += 1;
        let word = buf.strip_suffix(b"\n").unwrap_or(&buf);
        builder
            .insert(word)
            .map_err(|source| TrieError::Decode { line, source })?;
    }
    Ok(builder.build())
}

/// Builds a trie from a word list file, one entry per line.
///
/// # Examples
///
/// ```no_run
/// use libcptrie::trie::builder::build_trie_from_file;
/// use libcptrie::trie::DecodeMode;
///
/// let trie = build_trie_from_file("dictionary.txt", DecodeMode::Strict).unwrap();
/// ```
pub fn build_trie_from_file(path: impl AsRef<Path>, mode: DecodeMode) -> Result<Trie, TrieError> {
    let file = File::open(path)?;
    build_trie_from_reader(BufReader::new(file), mode)
}
