//! Rules Database Library
//!
//! SQLite storage for normalized SRD rows. One table per entity kind, keyed
//! by slug. [`SqliteDb`] implements both the batch-oriented
//! [`srd::UpsertSink`] (one prepared statement per kind) and the
//! [`RulesRepository`] trait used for bootstrap and read-back.
//!
//! # Example
//!
//! ```no_run
//! use srd_db::{RulesRepository, SqliteDb};
//! use srd::EntityKind;
//!
//! let db = SqliteDb::open("srd.db").unwrap();
//! db.init().unwrap();
//!
//! let monsters = db.count(EntityKind::Monster).unwrap();
//! ```

pub mod repository;
pub mod shared;
pub mod sqlite;

pub use repository::{DbStats, RepoError, RepoResult, RulesRepository};
pub use sqlite::{SqliteDb, SqliteWriter, DEFAULT_DB_PATH};
