use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid document key: {0}")]
    InvalidKey(String),

    #[error("the nil key cannot address a document")]
    NilKey,

    #[error("invalid cabinet name {name:?}: {reason}")]
    InvalidCabinetName { name: String, reason: String },
}
