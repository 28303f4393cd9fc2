//! B+ tree: the ordered container every index in this crate is built from.
//!
//! See spec.md §4.1. Fan-out defaults to `ORDER = 4` (see
//! [`crate::config::DEFAULT_TREE_ORDER`]) but is parameterised per-tree so
//! tests can exercise split/merge/redistribution without huge key counts.

mod node;
mod tree;

pub use tree::{BPlusTree, Iter};
