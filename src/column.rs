//! Column descriptors and their backing on-disk index files.
//!
//! Each table column persists as a pair of files under the table's
//! directory: `<name>.col` holds the column's `ColumnInfo` descriptor
//! (serde_json), and `<name>.tree` holds the serialized B+-tree backing
//! that column's index (clustered for the primary key, non-clustered for
//! every other column).

use crate::btree::BPlusTree;
use crate::error::GatorResult;
use crate::index::Index;
use crate::types::{DbType, Pk, Value};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Fan-out used for every table-backed B+-tree.
pub const TABLE_TREE_ORDER: usize = crate::btree::DEFAULT_ORDER;

/// A column's declared shape, independent of its index contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dbtype: DbType,
    pub is_primary_key: bool,
}

/// A column: its descriptor plus the index backing its values.
pub struct Column {
    pub info: ColumnInfo,
    pub index: Index,
}

impl Column {
    /// Creates the table's primary-key column, backed by a clustered index.
    pub fn new_primary_key(name: impl Into<String>, dbtype: DbType) -> Self {
        Self {
            info: ColumnInfo {
                name: name.into(),
                dbtype,
                is_primary_key: true,
            },
            index: Index::new_clustered(TABLE_TREE_ORDER),
        }
    }

    /// Creates a regular column, backed by a non-clustered index.
    pub fn new_secondary(name: impl Into<String>, dbtype: DbType) -> Self {
        Self {
            info: ColumnInfo {
                name: name.into(),
                dbtype,
                is_primary_key: false,
            },
            index: Index::new_non_clustered(TABLE_TREE_ORDER),
        }
    }

    fn descriptor_path(dir: &Path, name: &str) -> std::path::PathBuf {
        dir.join(format!("{name}.col"))
    }

    fn tree_path(dir: &Path, name: &str) -> std::path::PathBuf {
        dir.join(format!("{name}.tree"))
    }

    /// Writes this column's descriptor and tree to `dir`.
    pub fn save(&self, dir: &Path) -> GatorResult<()> {
        let descriptor_bytes = serde_json::to_vec(&self.info)?;
        fs::write(Self::descriptor_path(dir, &self.info.name), descriptor_bytes)?;

        let tree_bytes = match &self.index {
            Index::Clustered(tree) => serde_json::to_vec(tree)?,
            Index::NonClustered(tree) => serde_json::to_vec(tree)?,
        };
        fs::write(Self::tree_path(dir, &self.info.name), tree_bytes)?;
        Ok(())
    }

    /// Loads a column's descriptor and tree from `dir`, given its name.
    pub fn load(dir: &Path, name: &str) -> GatorResult<Self> {
        let descriptor_bytes = fs::read(Self::descriptor_path(dir, name))?;
        let info: ColumnInfo = serde_json::from_slice(&descriptor_bytes)?;

        let tree_bytes = fs::read(Self::tree_path(dir, name))?;
        let index = if info.is_primary_key {
            let tree: BPlusTree<Pk, Vec<u8>> = serde_json::from_slice(&tree_bytes)?;
            Index::Clustered(tree)
        } else {
            let tree: BPlusTree<Value, Vec<u8>> = serde_json::from_slice(&tree_bytes)?;
            Index::NonClustered(tree)
        };

        Ok(Self { info, index })
    }
}
