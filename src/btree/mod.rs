//! Arena-based B+-tree used as the storage backend for both clustered and
//! non-clustered indexes.

mod node;
mod tree;

pub use tree::{BPlusTree, DEFAULT_ORDER};
