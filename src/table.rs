//! A single table: an ordered set of columns, one of them the primary key,
//! each backed by its own on-disk index.

use crate::column::Column;
use crate::error::{GatorError, GatorResult};
use crate::types::{DbType, Pk, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// An unordered mapping from column name to typed value — one row.
pub type Row = HashMap<String, Value>;

/// The only comparison this engine supports when filtering rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionType {
    Equals,
}

/// A single-column equality filter consumed by `filter`.
#[derive(Debug, Clone)]
pub struct Condition {
    pub column: String,
    pub value: Value,
    pub condition_type: ConditionType,
}

/// A single column assignment applied by `update`.
#[derive(Debug, Clone)]
pub struct Change {
    pub column: String,
    pub value: Value,
}

fn manifest_path(dir: &Path) -> PathBuf {
    dir.join("cols")
}

/// A table's on-disk directory layout: a `cols` manifest naming its columns
/// in declaration order, plus one `<column>.col`/`<column>.tree` pair per
/// column (written by `Column::save`).
pub struct Table {
    name: String,
    dir: PathBuf,
    /// Column names in declaration order.
    order: Vec<String>,
    columns: HashMap<String, Column>,
    primary_key: Option<String>,
}

impl Table {
    /// Creates a new, empty table rooted at `dir` (the directory is not
    /// created until `save` is called).
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            order: Vec::new(),
            columns: HashMap::new(),
            primary_key: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn column(&self, name: &str) -> GatorResult<&Column> {
        self.columns.get(name).ok_or_else(|| GatorError::ColumnNotFound {
            table: self.name.clone(),
            column: name.to_string(),
        })
    }

    fn column_mut(&mut self, name: &str) -> GatorResult<&mut Column> {
        let table = self.name.clone();
        self.columns
            .get_mut(name)
            .ok_or(GatorError::ColumnNotFound { table, column: name.to_string() })
    }

    fn pk_column(&self) -> GatorResult<&Column> {
        let name = self
            .primary_key
            .as_ref()
            .ok_or_else(|| GatorError::PrimaryKeyNotInTable(self.name.clone()))?;
        self.column(name)
    }

    fn pk_column_mut(&mut self) -> GatorResult<&mut Column> {
        let name = self
            .primary_key
            .clone()
            .ok_or_else(|| GatorError::PrimaryKeyNotInTable(self.name.clone()))?;
        self.column_mut(&name)
    }

    /// Adds a column to the table's declared shape.
    ///
    /// A column becomes the primary key when either `primary_key` is set, or
    /// it is the first column ever added and no PK has been designated yet.
    /// A second designation fails with `PrimaryKeyAlreadySet`.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        dbtype: DbType,
        primary_key: bool,
    ) -> GatorResult<()> {
        let name = name.into();
        let designate = primary_key || (self.order.is_empty() && self.primary_key.is_none());
        if designate && self.primary_key.is_some() {
            return Err(GatorError::PrimaryKeyAlreadySet(self.name.clone()));
        }

        let column = if designate {
            Column::new_primary_key(&name, dbtype)
        } else {
            Column::new_secondary(&name, dbtype)
        };
        self.columns.insert(name.clone(), column);
        self.order.push(name.clone());
        if designate {
            self.primary_key = Some(name);
        }
        Ok(())
    }

    /// Designates an already-added column as the primary key, demoting the
    /// table's previous primary key (if any) back to a plain secondary
    /// column. Fails with `PrimaryKeyNotInTable` if `name` is not a
    /// declared column; unlike `add_column`, re-designation is not an
    /// error here.
    pub fn set_primary_key(&mut self, name: &str) -> GatorResult<()> {
        let dbtype = self
            .columns
            .get(name)
            .ok_or_else(|| GatorError::PrimaryKeyNotInTable(name.to_string()))?
            .info
            .dbtype;

        if self.primary_key.as_deref() == Some(name) {
            return Ok(());
        }
        if let Some(old_name) = self.primary_key.take() {
            let old_dbtype = self.column(&old_name)?.info.dbtype;
            self.columns
                .insert(old_name.clone(), Column::new_secondary(&old_name, old_dbtype));
        }

        self.columns
            .insert(name.to_string(), Column::new_primary_key(name, dbtype));
        self.primary_key = Some(name.to_string());
        Ok(())
    }

    fn is_valid_shape(&self, row: &Row) -> bool {
        row.len() == self.order.len() && self.order.iter().all(|c| row.contains_key(c))
    }

    fn row_pk(&self, row: &Row) -> GatorResult<Pk> {
        let pk_name = self
            .primary_key
            .as_ref()
            .ok_or_else(|| GatorError::PrimaryKeyNotInTable(self.name.clone()))?;
        row.get(pk_name)
            .expect("shape already validated")
            .as_pk(pk_name)
    }

    /// Inserts a fully-typed row, indexing it under every column. Purely
    /// additive: re-inserting under a primary key that already holds a row
    /// overwrites the clustered entry but does not remove the old row's
    /// secondary-index edges, matching `DBTable.insert`'s behavior.
    #[instrument(skip(self, row), fields(table = %self.name))]
    pub fn insert(&mut self, row: Row) -> GatorResult<()> {
        if !self.is_valid_shape(&row) {
            return Err(GatorError::InvalidShape {
                table: self.name.clone(),
            });
        }
        let pk = self.row_pk(&row)?;

        let bytes = serde_json::to_vec(&row)?;
        self.pk_column_mut()?.index.put_row(pk, bytes);
        self.index_secondary(&row, pk)?;
        Ok(())
    }

    /// Inserts a row built from positional literals in column-declaration
    /// order, coercing each to its column's declared type.
    pub fn insert_values(&mut self, values: &[String]) -> GatorResult<()> {
        if values.len() != self.order.len() {
            return Err(GatorError::InvalidShape {
                table: self.name.clone(),
            });
        }
        let mut row = Row::new();
        for (name, literal) in self.order.clone().iter().zip(values) {
            let dbtype = self.column(name)?.info.dbtype;
            row.insert(name.clone(), Value::coerce(dbtype, name, literal)?);
        }
        self.insert(row)
    }

    fn secondary_names(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|c| self.primary_key.as_deref() != Some(c.as_str()))
            .cloned()
            .collect()
    }

    fn index_secondary(&mut self, row: &Row, pk: Pk) -> GatorResult<()> {
        for name in self.secondary_names() {
            let value = row.get(&name).expect("shape already validated").clone();
            self.column_mut(&name)?.index.add_value(value, pk);
        }
        Ok(())
    }

    fn unindex_secondary(&mut self, row: &Row, pk: Pk) -> GatorResult<()> {
        for name in self.secondary_names() {
            let value = row.get(&name).expect("shape already validated");
            self.column_mut(&name)?.index.remove_value(value, pk);
        }
        Ok(())
    }

    /// Returns every row in primary-key order.
    pub fn select_all(&self) -> GatorResult<Vec<Row>> {
        let pk_column = self.pk_column()?;
        pk_column
            .index
            .iter_rows()
            .map(|(_, bytes)| Ok(serde_json::from_slice(bytes)?))
            .collect()
    }

    /// Looks each pk in `pks` up in the clustered index and returns the
    /// resulting rows in list order. A pk with no row is silently skipped
    /// (it should not occur if the secondary indexes are consistent).
    pub fn select(&self, pks: &[Pk]) -> GatorResult<Vec<Row>> {
        let pk_column = self.pk_column()?;
        pks.iter()
            .filter_map(|pk| pk_column.index.get_row(pk))
            .map(|bytes| Ok(serde_json::from_slice(bytes)?))
            .collect()
    }

    /// Resolves `condition` to the list of primary keys it matches. A
    /// primary-key condition returns `[val]` directly with no tree access;
    /// any other column consults its non-clustered index.
    pub fn filter(&self, condition: &Condition) -> GatorResult<Vec<Pk>> {
        if condition.condition_type != ConditionType::Equals {
            return Err(GatorError::InvalidCondition);
        }
        let column = self.column(&condition.column)?;
        if column.info.is_primary_key {
            Ok(vec![condition.value.as_pk(&condition.column)?])
        } else {
            Ok(column.index.lookup_value(&condition.value))
        }
    }

    /// For each pk in `pks`, applies `changes` to its row: removes the
    /// stale secondary edge for each changed column, mutates the row, and
    /// reinserts it under the same key. Returns the number of rows touched.
    /// Updating the primary-key column itself is unsupported; behavior is
    /// undefined if attempted.
    #[instrument(skip(self, changes), fields(table = %self.name))]
    pub fn update(&mut self, pks: &[Pk], changes: &[Change]) -> GatorResult<usize> {
        for change in changes {
            self.column(&change.column)?;
        }
        let mut touched = 0;
        for &pk in pks {
            let Some(bytes) = self.pk_column()?.index.get_row(&pk).cloned() else {
                continue;
            };
            let mut row: Row = serde_json::from_slice(&bytes)?;
            for change in changes {
                if self.primary_key.as_deref() != Some(change.column.as_str()) {
                    let old_value = row.get(&change.column).expect("shape already validated");
                    self.column_mut(&change.column)?
                        .index
                        .remove_value(old_value, pk);
                    self.column_mut(&change.column)?
                        .index
                        .add_value(change.value.clone(), pk);
                }
                row.insert(change.column.clone(), change.value.clone());
            }
            let bytes = serde_json::to_vec(&row)?;
            self.pk_column_mut()?.index.put_row(pk, bytes);
            touched += 1;
        }
        Ok(touched)
    }

    /// For each pk in `pks`, removes its secondary edges and its clustered
    /// entry. Returns the number of rows removed.
    #[instrument(skip(self), fields(table = %self.name))]
    pub fn delete(&mut self, pks: &[Pk]) -> GatorResult<usize> {
        let mut removed = 0;
        for &pk in pks {
            let Some(bytes) = self.pk_column()?.index.get_row(&pk).cloned() else {
                continue;
            };
            let row: Row = serde_json::from_slice(&bytes)?;
            self.unindex_secondary(&row, pk)?;
            self.pk_column_mut()?.index.remove_row(&pk);
            removed += 1;
        }
        Ok(removed)
    }

    /// Removes every row from the table, keeping its schema intact.
    pub fn delete_all_rows(&mut self) -> GatorResult<()> {
        for name in self.order.clone() {
            let dbtype = self.column(&name)?.info.dbtype;
            let fresh = if self.primary_key.as_deref() == Some(name.as_str()) {
                Column::new_primary_key(&name, dbtype)
            } else {
                Column::new_secondary(&name, dbtype)
            };
            self.columns.insert(name, fresh);
        }
        Ok(())
    }

    /// Persists the table's manifest and every column's descriptor/tree.
    pub fn save(&self) -> GatorResult<()> {
        fs::create_dir_all(&self.dir)?;
        let manifest = serde_json::to_vec(&self.order)?;
        fs::write(manifest_path(&self.dir), manifest)?;
        for name in &self.order {
            self.column(name)?.save(&self.dir)?;
        }
        Ok(())
    }

    /// Loads a table previously written by `save`.
    pub fn load(name: impl Into<String>, dir: impl Into<PathBuf>) -> GatorResult<Self> {
        let name = name.into();
        let dir = dir.into();
        let manifest_bytes = fs::read(manifest_path(&dir))
            .map_err(|_| GatorError::CorruptedDatabase(name.clone()))?;
        let order: Vec<String> = serde_json::from_slice(&manifest_bytes)?;

        let mut columns = HashMap::new();
        let mut primary_key = None;
        for column_name in &order {
            let column = Column::load(&dir, column_name)?;
            if column.info.is_primary_key {
                primary_key = Some(column_name.clone());
            }
            columns.insert(column_name.clone(), column);
        }

        Ok(Self {
            name,
            dir,
            order,
            columns,
            primary_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_row(id: i64, name: &str, age: i64) -> Row {
        let mut row = Row::new();
        row.insert("id".to_string(), Value::Integer(id));
        row.insert("name".to_string(), Value::Text(name.to_string()));
        row.insert("age".to_string(), Value::Integer(age));
        row
    }

    fn sample_table(dir: &Path) -> Table {
        let mut table = Table::new("people", dir);
        table.add_column("id", DbType::Integer, true).unwrap();
        table.add_column("name", DbType::Text, false).unwrap();
        table.add_column("age", DbType::Integer, false).unwrap();
        table
    }

    #[test]
    fn first_column_becomes_pk_without_explicit_flag() {
        let dir = tempdir().unwrap();
        let mut table = Table::new("t", dir.path());
        table.add_column("id", DbType::Integer, false).unwrap();
        table.add_column("other", DbType::Text, false).unwrap();
        assert_eq!(table.primary_key.as_deref(), Some("id"));
    }

    #[test]
    fn insert_and_select_all_roundtrip() {
        let dir = tempdir().unwrap();
        let mut table = sample_table(dir.path());
        table.insert(sample_row(1, "Ada", 30)).unwrap();
        table.insert(sample_row(2, "Lin", 40)).unwrap();

        let rows = table.select_all().unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn insert_rejects_wrong_shape() {
        let dir = tempdir().unwrap();
        let mut table = sample_table(dir.path());
        let mut row = Row::new();
        row.insert("id".to_string(), Value::Integer(1));
        assert!(matches!(
            table.insert(row),
            Err(GatorError::InvalidShape { .. })
        ));
    }

    #[test]
    fn filter_by_primary_key_returns_value_with_no_tree_access() {
        let dir = tempdir().unwrap();
        let table = sample_table(dir.path());
        let pks = table
            .filter(&Condition {
                column: "id".to_string(),
                value: Value::Integer(2),
                condition_type: ConditionType::Equals,
            })
            .unwrap();
        assert_eq!(pks, vec![2]);
    }

    #[test]
    fn filter_then_select_round_trips() {
        let dir = tempdir().unwrap();
        let mut table = sample_table(dir.path());
        table.insert(sample_row(1, "Ada", 30)).unwrap();
        table.insert(sample_row(2, "Lin", 40)).unwrap();

        let pks = table
            .filter(&Condition {
                column: "id".to_string(),
                value: Value::Integer(2),
                condition_type: ConditionType::Equals,
            })
            .unwrap();
        let rows = table.select(&pks).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some(&Value::Text("Lin".to_string())));
    }

    #[test]
    fn filter_by_secondary_column() {
        let dir = tempdir().unwrap();
        let mut table = sample_table(dir.path());
        table.insert(sample_row(1, "Ada", 30)).unwrap();
        table.insert(sample_row(2, "Lin", 30)).unwrap();

        let pks = table
            .filter(&Condition {
                column: "age".to_string(),
                value: Value::Integer(30),
                condition_type: ConditionType::Equals,
            })
            .unwrap();
        assert_eq!(pks.len(), 2);
        assert_eq!(table.select(&pks).unwrap().len(), 2);
    }

    #[test]
    fn update_reindexes_secondary_columns() {
        let dir = tempdir().unwrap();
        let mut table = sample_table(dir.path());
        table.insert(sample_row(1, "Ada", 30)).unwrap();

        let updated = table
            .update(
                &[1],
                &[Change {
                    column: "age".to_string(),
                    value: Value::Integer(99),
                }],
            )
            .unwrap();
        assert_eq!(updated, 1);

        let fresh = table
            .filter(&Condition {
                column: "age".to_string(),
                value: Value::Integer(99),
                condition_type: ConditionType::Equals,
            })
            .unwrap();
        assert_eq!(fresh, vec![1]);

        let stale = table
            .filter(&Condition {
                column: "age".to_string(),
                value: Value::Integer(30),
                condition_type: ConditionType::Equals,
            })
            .unwrap();
        assert!(stale.is_empty());
    }

    #[test]
    fn delete_removes_row_and_index_entries() {
        let dir = tempdir().unwrap();
        let mut table = sample_table(dir.path());
        table.insert(sample_row(1, "Ada", 30)).unwrap();

        let deleted = table.delete(&[1]).unwrap();
        assert_eq!(deleted, 1);
        assert!(table.select_all().unwrap().is_empty());
        assert!(table
            .filter(&Condition {
                column: "age".to_string(),
                value: Value::Integer(30),
                condition_type: ConditionType::Equals,
            })
            .unwrap()
            .is_empty());
    }

    #[test]
    fn delete_all_rows_clears_table_but_keeps_schema() {
        let dir = tempdir().unwrap();
        let mut table = sample_table(dir.path());
        table.insert(sample_row(1, "Ada", 30)).unwrap();
        table.delete_all_rows().unwrap();
        assert!(table.select_all().unwrap().is_empty());
        table.insert(sample_row(2, "Lin", 40)).unwrap();
        assert_eq!(table.select_all().unwrap().len(), 1);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let table_dir = dir.path().join("people");
        let mut table = sample_table(&table_dir);
        table.insert(sample_row(1, "Ada", 30)).unwrap();
        table.insert(sample_row(2, "Lin", 40)).unwrap();
        table.save().unwrap();

        let loaded = Table::load("people", &table_dir).unwrap();
        let rows = loaded.select_all().unwrap();
        assert_eq!(rows.len(), 2);

        let found = loaded
            .filter(&Condition {
                column: "age".to_string(),
                value: Value::Integer(40),
                condition_type: ConditionType::Equals,
            })
            .unwrap();
        assert_eq!(found, vec![2]);
    }

    #[test]
    fn add_column_second_explicit_pk_errors() {
        let dir = tempdir().unwrap();
        let mut table = Table::new("t", dir.path());
        table.add_column("id", DbType::Integer, true).unwrap();
        assert!(matches!(
            table.add_column("other", DbType::Integer, true),
            Err(GatorError::PrimaryKeyAlreadySet(_))
        ));
    }

    #[test]
    fn set_primary_key_rejects_unknown_column() {
        let dir = tempdir().unwrap();
        let mut table = sample_table(dir.path());
        assert!(matches!(
            table.set_primary_key("missing"),
            Err(GatorError::PrimaryKeyNotInTable(_))
        ));
    }

    #[test]
    fn set_primary_key_redesignates_an_existing_column() {
        let dir = tempdir().unwrap();
        let mut table = sample_table(dir.path());

        table.set_primary_key("age").unwrap();
        assert_eq!(table.primary_key.as_deref(), Some("age"));
        assert!(!table.column("id").unwrap().info.is_primary_key);
        assert!(table.column("age").unwrap().info.is_primary_key);
        assert!(table.column("id").unwrap().index.lookup_value(&Value::Integer(1)).is_empty());

        // Idempotent: re-designating the same column is a no-op, not an error.
        table.set_primary_key("age").unwrap();
        assert_eq!(table.primary_key.as_deref(), Some("age"));
    }
}
