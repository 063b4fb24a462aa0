//! # GatorDB
//!
//! GatorDB is a single-node relational store built around a B+-tree storage
//! and indexing engine. Every table has exactly one primary key column,
//! backed by a clustered B+-tree mapping the key directly to its row body;
//! every other column gets a non-clustered B+-tree mapping its value to the
//! primary keys of the rows holding it.
//!
//! ## Quick Start
//!
//! ```rust
//! use gatordb::command::{Command, ColumnDecl, Outcome};
//! use gatordb::types::DbType;
//!
//! # fn main() -> gatordb::error::GatorResult<()> {
//! let dir = tempfile::tempdir()?;
//! let mut db = gatordb::database::Database::open(dir.path())?;
//!
//! db.execute(Command::CreateTable {
//!     table: "users".to_string(),
//!     columns: vec![
//!         ColumnDecl { name: "id".to_string(), dbtype: DbType::Integer, is_primary_key: true },
//!         ColumnDecl { name: "name".to_string(), dbtype: DbType::Text, is_primary_key: false },
//!     ],
//! })?;
//!
//! db.execute(Command::InsertInto {
//!     table: "users".to_string(),
//!     values: vec!["1".to_string(), "Ada".to_string()],
//! })?;
//!
//! if let Outcome::Rows(rows) = db.execute(Command::Select {
//!     table: "users".to_string(),
//!     condition: None,
//! })? {
//!     assert_eq!(rows.len(), 1);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//! - [`btree`] — arena-based B+-tree (the shared storage primitive)
//! - [`types`] — column types and the typed `Value` representation
//! - [`index`] — clustered and non-clustered column indexes
//! - [`column`] — column descriptors and their on-disk files
//! - [`table`] — table schema, row shape, CRUD, and filtering
//! - [`database`] — a directory of tables
//! - [`command`] — the parsed-statement dispatch boundary
//! - [`error`] — the unified error and result types
//! - [`logging`] — optional `tracing` subscriber setup

pub mod btree;
pub mod column;
pub mod command;
pub mod database;
pub mod error;
pub mod index;
pub mod logging;
pub mod table;
pub mod types;

pub use database::Database;
pub use error::{GatorError, GatorResult};
