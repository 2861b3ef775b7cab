//! Repository trait for the rules database.
//!
//! This trait defines the read and write surface used by the CLI. Batch
//! writes go through [`srd::UpsertSink`] instead, which keeps one prepared
//! statement per kind alive for the whole batch.

use srd::{EntityKind, Row};
use std::collections::BTreeMap;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(String),

    #[error(transparent)]
    Sink(#[from] srd::SinkError),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Row counts per table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbStats {
    pub counts: BTreeMap<EntityKind, i64>,
}

impl DbStats {
    pub fn count(&self, kind: EntityKind) -> i64 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> i64 {
        self.counts.values().sum()
    }
}

pub trait RulesRepository {
    /// Apply the schema. Safe to call on an existing database.
    fn init(&self) -> RepoResult<()>;

    /// Insert or replace a single row
    fn upsert(&self, row: &Row) -> RepoResult<()>;

    /// Get a row by kind and slug
    fn get(&self, kind: EntityKind, slug: &str) -> RepoResult<Option<Row>>;

    /// All rows of a kind, ordered by slug
    fn list(&self, kind: EntityKind) -> RepoResult<Vec<Row>>;

    fn count(&self, kind: EntityKind) -> RepoResult<i64>;

    fn stats(&self) -> RepoResult<DbStats>;
}
