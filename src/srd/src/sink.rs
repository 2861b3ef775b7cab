//! Upsert sink: the store-side seam of the batch driver.
//!
//! Writers are acquired once per entity kind and reused for every row of
//! that kind. Each `upsert` inserts the row keyed by slug or, when the slug
//! already exists, overwrites every non-key column.

use crate::types::{EntityKind, Row};

/// Error writing to the store
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{row} row sent to the {writer} writer")]
    KindMismatch { writer: EntityKind, row: EntityKind },
}

/// Scoped writer for one entity kind
pub trait RowWriter {
    /// Insert or replace the row with the same slug
    fn upsert(&mut self, row: &Row) -> Result<(), SinkError>;
}

/// Store that hands out per-kind writers
pub trait UpsertSink {
    fn prepare(&self, kind: EntityKind) -> Result<Box<dyn RowWriter + '_>, SinkError>;
}
