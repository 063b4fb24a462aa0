//! Arena node types for the B+-tree.
//!
//! Nodes live in a flat `Vec` owned by the tree and reference each other by
//! `NodeId` rather than by pointer or `Rc`. There are no parent
//! back-pointers: split propagation during insert carries the descent path
//! as an explicit stack instead (see `tree.rs`), so no node ever needs to
//! find its own parent.

use serde::{Deserialize, Serialize};

/// Index into the tree's node arena.
pub type NodeId = usize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct InternalNode<K> {
    /// Separator keys, `keys.len() + 1 == children.len()`.
    pub keys: Vec<K>,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LeafNode<K, V> {
    pub keys: Vec<K>,
    pub values: Vec<V>,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) enum Node<K, V> {
    Internal(InternalNode<K>),
    Leaf(LeafNode<K, V>),
}

impl<K, V> Node<K, V> {
    pub(crate) fn as_leaf(&self) -> &LeafNode<K, V> {
        match self {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => unreachable!("expected leaf node"),
        }
    }

    pub(crate) fn as_leaf_mut(&mut self) -> &mut LeafNode<K, V> {
        match self {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => unreachable!("expected leaf node"),
        }
    }

    pub(crate) fn as_internal(&self) -> &InternalNode<K> {
        match self {
            Node::Internal(internal) => internal,
            Node::Leaf(_) => unreachable!("expected internal node"),
        }
    }

    pub(crate) fn as_internal_mut(&mut self) -> &mut InternalNode<K> {
        match self {
            Node::Internal(internal) => internal,
            Node::Leaf(_) => unreachable!("expected internal node"),
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }
}
