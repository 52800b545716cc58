//! # libcptrie
//!
//! Compiles a word list into a compact binary [trie](https://en.wikipedia.org/wiki/Trie)
//! keyed on Unicode code points, laid out so that a lookup engine can scan it
//! in place (for example from a memory map) without parsing it first.
//!
//! ## Pipeline
//!
//! 1. [`Builder`](trie::Builder) decodes each entry into code points and
//!    inserts it, keeping every node's children sorted.
//! 2. [`validate`](trie::validate::validate) checks that every node fits the
//!    format's 23-bit code point and 8-bit child count fields.
//! 3. [`Encoder`](trie::encode::Encoder) computes each subtree's size bottom-up
//!    and writes the nodes depth-first, each followed by relative offsets to
//!    its children.
//!
//! [`TrieView`](trie::reader::TrieView) reads the result back.
//!
//! ## Quick Start
//!
//! ```
//! use libcptrie::trie::builder::build_trie;
//! use libcptrie::trie::encode::encode_to_vec;
//! use libcptrie::trie::reader::TrieView;
//!
//! let trie = build_trie(["BAKE", "BAKER", "CAKE"]).unwrap();
//! assert!(trie.contains("BAKER"));
//!
//! let bytes = encode_to_vec(&trie).unwrap();
//! let view = TrieView::new(&bytes);
//! assert!(view.contains("CAKE").unwrap());
//! assert_eq!(view.complete("BA", 10).unwrap(), ["BAKE", "BAKER"]);
//! ```
//!
//! ## Binary format
//!
//! Big-endian 32-bit words. Each node is a header (child count in bits
//! 31–24, terminal flag in bit 23, code point in bits 22–0), then for `N`
//! children `N - 1` cumulative word offsets from the first child's subtree
//! to each later one, then the `N` child subtrees in code point order. The
//! root, code point 0, starts at byte 0. See [`trie::encode`].

#![warn(missing_docs)]

/// Crate error type.
pub mod error;
/// Code point trie: construction, validation, encoding and reading.
pub mod trie;

pub use error::{Result, TrieError};

#[cfg(test)]
mod proptests;
