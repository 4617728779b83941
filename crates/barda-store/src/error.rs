use std::io;
use std::path::PathBuf;

use barda_doctype::DocTypeError;
use barda_types::{DocKey, TypeError};

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A cabinet name, key or extension was rejected before touching storage.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The store root does not exist, is not a directory, or cannot be created.
    #[error("store root {} is unavailable: {source}", .path.display())]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Creating the bucket directories or writing the document failed.
    #[error("could not write {}: {source}", .path.display())]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No document exists at the computed path.
    #[error("document not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// The document exists but could not be read.
    #[error("could not read {}: {source}", .path.display())]
    StorageRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The doc type's encode function failed.
    #[error("could not encode document {key} as {doc_type}: {source}")]
    Encode {
        doc_type: String,
        key: DocKey,
        #[source]
        source: DocTypeError,
    },

    /// The doc type's decode function failed.
    #[error("could not decode document {key} as {doc_type}: {source}")]
    Decode {
        doc_type: String,
        key: DocKey,
        #[source]
        source: DocTypeError,
    },

    /// An in-memory backend lock was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),
}

impl StoreError {
    /// Returns `true` for the expected "document does not exist yet" case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<TypeError> for StoreError {
    fn from(err: TypeError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
