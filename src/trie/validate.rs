//! Checks that a trie fits the field widths of the binary format.

use thiserror::Error;
use tracing::warn;

use super::node::CodePoint;
use super::tree::Trie;

/// Largest code point the 23-bit header field can hold.
pub const MAX_CODE_POINT: CodePoint = 0x7F_FFFF;

/// Largest child count the 8-bit header field can hold.
pub const MAX_CHILDREN: usize = 0xFF;

/// The trie cannot be represented in the binary format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapacityError {
    /// A code point wider than 23 bits.
    #[error("node with too large code point {code_point:#x} (maximum {max:#x})", max = MAX_CODE_POINT)]
    CodePoint {
        /// The offending code point.
        code_point: CodePoint,
    },

    /// More than 255 children.
    #[error("node {code_point:#x} has too many children: {count} (maximum {max})", max = MAX_CHILDREN)]
    Children {
        /// Code point of the parent.
        code_point: CodePoint,
        /// Its child count.
        count: usize,
    },

    /// The encoding is too large for 32-bit offsets.
    #[error("encoded trie of {words} words does not fit 32-bit offsets")]
    OffsetOverflow {
        /// Encoded size in words.
        words: u64,
    },
}

/// Checks every node's code point and child count.
///
/// Stops at the first violation in pre-order.
pub fn validate(trie: &Trie) -> Result<(), CapacityError> {
    for (_, node) in trie.pre_order() {
        let code_point = node.code_point();
        if code_point > MAX_CODE_POINT {
            warn!(code_point, "node with too large code point");
            return Err(CapacityError::CodePoint { code_point });
        }
        let count = node.child_count();
        if count > MAX_CHILDREN {
            warn!(code_point, count, "node with too many children");
            return Err(CapacityError::Children { code_point, count });
        }
    }
    Ok(())
}
