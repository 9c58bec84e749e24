/// SQLite-backed archive.
pub mod sqlite;

use thiserror::Error;

use crate::{document::Document, types::ImportId};

/// Archive failures.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Database error.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Payload (de)serialization error.
    #[error("payload: {0}")]
    Serde(#[from] serde_json::Error),
    /// Anything else, such as an unknown payload version.
    #[error("{0}")]
    Message(String),
}

/// Result alias for archive operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Destination for decoded documents.
pub trait DocumentSink: Send {
    /// Stores `document`, tagged with where it came from.
    fn append_document(&mut self, document: &Document, source: &str) -> PersistResult<ImportId>;
    /// Makes prior appends durable.
    fn flush(&mut self) -> PersistResult<()> {
        Ok(())
    }
}
