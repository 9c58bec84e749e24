//! ADI encoding.

/// Streaming ADI writer.
pub mod adi;
/// Output options.
pub mod config;

use thiserror::Error;

/// Writer usage and I/O failures.
#[derive(Debug, Error)]
pub enum WriterError {
    /// Write after [`adi::AdiWriter::finish`].
    #[error("writer is closed")]
    Closed,
    /// A second header for the same document.
    #[error("header already written")]
    HeaderAlreadyWritten,
    /// A header after one or more records.
    #[error("header must precede all records")]
    HeaderAfterRecords,
    /// Major version outside the supported set.
    #[error("unsupported ADIF major version {0}")]
    UnsupportedVersion(u8),
    /// A field name that cannot appear inside an ADI tag.
    #[error("invalid ADI field name {0:?}")]
    InvalidFieldName(String),
    /// The sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
