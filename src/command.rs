//! The dispatch boundary between an already-parsed statement and the
//! storage engine. `Command` represents a statement after parsing (SQL text
//! parsing itself is out of scope); `Database::execute` is the single entry
//! point that runs one against a database.

use crate::database::Database;
use crate::error::GatorResult;
use crate::table::{Change, Condition, Row};
use crate::types::DbType;

/// A single column declaration used by `CreateTable`.
#[derive(Debug, Clone)]
pub struct ColumnDecl {
    pub name: String,
    pub dbtype: DbType,
    pub is_primary_key: bool,
}

/// A parsed statement ready for execution against a `Database`.
#[derive(Debug, Clone)]
pub enum Command {
    CreateTable {
        table: String,
        columns: Vec<ColumnDecl>,
    },
    /// `condition = None` selects every row; otherwise rows are resolved via
    /// `filter` then `select`, exactly as in the scenario chaining in the
    /// table-layer documentation.
    Select {
        table: String,
        condition: Option<Condition>,
    },
    InsertInto {
        table: String,
        values: Vec<String>,
    },
    Update {
        table: String,
        condition: Condition,
        changes: Vec<Change>,
    },
    Delete {
        table: String,
        condition: Condition,
    },
    Truncate {
        table: String,
    },
    DropTable {
        table: String,
    },
}

/// The result of executing a `Command`.
#[derive(Debug, Clone)]
pub enum Outcome {
    Rows(Vec<Row>),
    Affected(usize),
    Created,
    Dropped,
}

impl Database {
    /// Executes a single already-parsed command.
    pub fn execute(&mut self, command: Command) -> GatorResult<Outcome> {
        match command {
            Command::CreateTable { table, columns } => {
                let handle = self.create_table(&table)?;
                for column in &columns {
                    handle.add_column(&column.name, column.dbtype, column.is_primary_key)?;
                }
                Ok(Outcome::Created)
            }
            Command::Select { table, condition } => {
                let handle = self.table(&table)?;
                let rows = match condition {
                    None => handle.select_all()?,
                    Some(cond) => {
                        let pks = handle.filter(&cond)?;
                        handle.select(&pks)?
                    }
                };
                Ok(Outcome::Rows(rows))
            }
            Command::InsertInto { table, values } => {
                self.table_mut(&table)?.insert_values(&values)?;
                Ok(Outcome::Affected(1))
            }
            Command::Update {
                table,
                condition,
                changes,
            } => {
                let handle = self.table_mut(&table)?;
                let pks = handle.filter(&condition)?;
                let count = handle.update(&pks, &changes)?;
                Ok(Outcome::Affected(count))
            }
            Command::Delete { table, condition } => {
                let handle = self.table_mut(&table)?;
                let pks = handle.filter(&condition)?;
                let count = handle.delete(&pks)?;
                Ok(Outcome::Affected(count))
            }
            Command::Truncate { table } => {
                self.table_mut(&table)?.delete_all_rows()?;
                Ok(Outcome::Affected(0))
            }
            Command::DropTable { table } => {
                self.drop_table(&table)?;
                Ok(Outcome::Dropped)
            }
        }
    }
}
