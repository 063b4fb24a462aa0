//! A database: a directory of tables, each table a subdirectory holding its
//! own column descriptors and index trees.

use crate::error::{GatorError, GatorResult};
use crate::table::Table;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::{info, instrument};

pub struct Database {
    dir: PathBuf,
    tables: HashMap<String, Table>,
}

impl Database {
    /// Opens a database directory, loading every table subdirectory found
    /// under it. Creates the directory if it does not exist.
    #[instrument(skip_all)]
    pub fn open(dir: impl Into<PathBuf>) -> GatorResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let mut tables = HashMap::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let table = Table::load(&name, entry.path())?;
            tables.insert(name, table);
        }

        info!(tables = tables.len(), "opened database");
        Ok(Self { dir, tables })
    }

    /// Opens a database rooted at a freshly created temporary directory,
    /// with no tables. Intended for tests and scratch sessions.
    #[cfg(test)]
    pub fn open_in_memory() -> GatorResult<(Self, tempfile::TempDir)> {
        let dir = tempfile::tempdir()?;
        let db = Self::open(dir.path())?;
        Ok((db, dir))
    }

    fn table_dir(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Creates a new, empty table. Fails if a table of this name already
    /// exists.
    #[instrument(skip(self))]
    pub fn create_table(&mut self, name: &str) -> GatorResult<&mut Table> {
        if self.tables.contains_key(name) {
            return Err(GatorError::TableAlreadyExists(name.to_string()));
        }
        let table = Table::new(name, self.table_dir(name));
        self.tables.insert(name.to_string(), table);
        info!(table = name, "created table");
        Ok(self.tables.get_mut(name).expect("just inserted"))
    }

    /// Removes a table and its directory entirely.
    #[instrument(skip(self))]
    pub fn drop_table(&mut self, name: &str) -> GatorResult<()> {
        self.tables
            .remove(name)
            .ok_or_else(|| GatorError::TableNotFound(name.to_string()))?;
        let dir = self.table_dir(name);
        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        info!(table = name, "dropped table");
        Ok(())
    }

    pub fn table(&self, name: &str) -> GatorResult<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| GatorError::TableNotFound(name.to_string()))
    }

    pub fn table_mut(&mut self, name: &str) -> GatorResult<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| GatorError::TableNotFound(name.to_string()))
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|s| s.as_str())
    }

    /// Persists every table to disk.
    pub fn save(&self) -> GatorResult<()> {
        for table in self.tables.values() {
            table.save()?;
        }
        Ok(())
    }
}
