/// Trie construction from word lists.
pub mod builder;
/// Depth-first serialization into the binary format.
pub mod encode;
/// Trie nodes and their sorted children.
pub mod node;
/// Index arena owning the nodes.
pub(crate) mod node_arena;
/// Lookups over an encoded trie.
pub mod reader;
/// The finished, read-only trie.
pub mod tree;
/// UTF-8 decoding.
pub mod utf8;
/// Format capacity checks.
pub mod validate;

pub use builder::{Builder, IntoCodePoints};
pub use node::{CodePoint, Node};
pub use node_arena::NodeId;
pub use tree::Trie;
pub use utf8::DecodeMode;
