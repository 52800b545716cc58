use thiserror::Error;

use crate::trie::reader::ReadError;
use crate::trie::utf8::DecodeError;
use crate::trie::validate::CapacityError;

/// Errors from building, encoding or reading a trie.
#[derive(Error, Debug)]
pub enum TrieError {
    /// An input line is not decodable.
    #[error("line {line}: {source}")]
    Decode {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        #[source]
        source: DecodeError,
    },

    /// The trie does not fit the binary format.
    #[error(transparent)]
    Capacity(#[from] CapacityError),

    /// An encoded trie is malformed.
    #[error(transparent)]
    Read(#[from] ReadError),

    /// Reading input or writing output failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying error.
        #[from]
        source: std::io::Error,
    },
}

/// Result type alias for trie operations.
pub type Result<T> = std::result::Result<T, TrieError>;
