//! Clustered and non-clustered indexes backed by the arena B+-tree.
//!
//! A clustered index maps a table's primary key directly to its row body
//! (serialized as JSON bytes); a non-clustered index maps an indexed
//! column's value to the packed list of primary keys of rows holding that
//! value. The two are modeled as a tagged enum rather than a trait object
//! because their key types differ (`Pk` vs `Value`) and nothing above this
//! layer needs to treat them uniformly.

use crate::btree::BPlusTree;
use crate::types::{Pk, Value};

/// Packs a primary-key list as 32-bit little-endian integers with no length
/// prefix, matching GatorDB's historical `np.int32` PK encoding.
pub fn encode_pk_list(pks: &[Pk]) -> Vec<u8> {
    let mut out = Vec::with_capacity(pks.len() * 4);
    for pk in pks {
        out.extend_from_slice(&pk.to_le_bytes());
    }
    out
}

/// Unpacks a primary-key list previously produced by `encode_pk_list`.
///
/// Ignores a trailing partial chunk rather than panicking; a correctly
/// written index file never produces one, but a truncated/corrupted read
/// should not crash the process.
pub fn decode_pk_list(bytes: &[u8]) -> Vec<Pk> {
    bytes
        .chunks_exact(4)
        .map(|chunk| Pk::from_le_bytes(chunk.try_into().expect("chunks_exact(4) yields len 4")))
        .collect()
}

/// A single column's on-disk index.
pub enum Index {
    /// Primary key → serialized row body.
    Clustered(BPlusTree<Pk, Vec<u8>>),
    /// Column value → packed list of primary keys holding that value.
    NonClustered(BPlusTree<Value, Vec<u8>>),
}

impl Index {
    pub fn new_clustered(order: usize) -> Self {
        Index::Clustered(BPlusTree::new(order))
    }

    pub fn new_non_clustered(order: usize) -> Self {
        Index::NonClustered(BPlusTree::new(order))
    }

    pub fn is_clustered(&self) -> bool {
        matches!(self, Index::Clustered(_))
    }

    fn as_clustered(&self) -> &BPlusTree<Pk, Vec<u8>> {
        match self {
            Index::Clustered(tree) => tree,
            Index::NonClustered(_) => unreachable!("expected clustered index"),
        }
    }

    fn as_clustered_mut(&mut self) -> &mut BPlusTree<Pk, Vec<u8>> {
        match self {
            Index::Clustered(tree) => tree,
            Index::NonClustered(_) => unreachable!("expected clustered index"),
        }
    }

    fn as_non_clustered(&self) -> &BPlusTree<Value, Vec<u8>> {
        match self {
            Index::NonClustered(tree) => tree,
            Index::Clustered(_) => unreachable!("expected non-clustered index"),
        }
    }

    fn as_non_clustered_mut(&mut self) -> &mut BPlusTree<Value, Vec<u8>> {
        match self {
            Index::NonClustered(tree) => tree,
            Index::Clustered(_) => unreachable!("expected non-clustered index"),
        }
    }

    /// Stores a row body under its primary key. Panics if called on a
    /// non-clustered index.
    pub fn put_row(&mut self, pk: Pk, row_bytes: Vec<u8>) {
        self.as_clustered_mut().insert(pk, row_bytes);
    }

    /// Fetches a row body by primary key. Panics if called on a
    /// non-clustered index.
    pub fn get_row(&self, pk: &Pk) -> Option<&Vec<u8>> {
        self.as_clustered().get(pk)
    }

    /// Removes a row body by primary key, returning it if present. Panics
    /// if called on a non-clustered index.
    pub fn remove_row(&mut self, pk: &Pk) -> Option<Vec<u8>> {
        self.as_clustered_mut().delete(pk)
    }

    /// Iterates `(pk, row_bytes)` pairs in primary-key order. Panics if
    /// called on a non-clustered index.
    pub fn iter_rows(&self) -> impl Iterator<Item = (&Pk, &Vec<u8>)> {
        self.as_clustered().iter()
    }

    /// Records that `pk` holds `value` in this indexed column, appending to
    /// the existing PK list for `value` if one exists. Panics if called on
    /// a clustered index.
    pub fn add_value(&mut self, value: Value, pk: Pk) {
        let tree = self.as_non_clustered_mut();
        let mut pks = tree.get(&value).map(|bytes| decode_pk_list(bytes)).unwrap_or_default();
        if !pks.contains(&pk) {
            pks.push(pk);
        }
        tree.insert(value, encode_pk_list(&pks));
    }

    /// Removes `pk` from the PK list recorded for `value`, dropping the
    /// entry entirely once its list is empty. Panics if called on a
    /// clustered index.
    pub fn remove_value(&mut self, value: &Value, pk: Pk) {
        let tree = self.as_non_clustered_mut();
        if let Some(bytes) = tree.get(value) {
            let mut pks = decode_pk_list(bytes);
            pks.retain(|&p| p != pk);
            if pks.is_empty() {
                tree.delete(value);
            } else {
                tree.insert(value.clone(), encode_pk_list(&pks));
            }
        }
    }

    /// Returns the primary keys recorded for `value`. Panics if called on
    /// a clustered index.
    pub fn lookup_value(&self, value: &Value) -> Vec<Pk> {
        self.as_non_clustered()
            .get(value)
            .map(|bytes| decode_pk_list(bytes))
            .unwrap_or_default()
    }
}
