//! Error types for doc type operations.

use thiserror::Error;

/// Errors that can occur while building, using or resolving a doc type.
#[derive(Debug, Error)]
pub enum DocTypeError {
    /// The doc type name cannot be used as a file extension.
    #[error("invalid doc type name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// The encode function rejected the value.
    #[error("encode failed: {0}")]
    Encode(String),

    /// The decode function rejected the bytes.
    #[error("decode failed: {0}")]
    Decode(String),

    /// No doc type is registered under this name.
    #[error("doc type not registered: {0}")]
    NotRegistered(String),

    /// A doc type with this name is already registered.
    #[error("doc type already registered: {0}")]
    AlreadyRegistered(String),

    /// The registered doc type handles a different value type.
    #[error("doc type {name} does not handle values of type {requested}")]
    TypeMismatch { name: String, requested: String },

    /// No constructor is registered for the requested type.
    #[error("no factory registered for type {0}")]
    NoFactory(String),
}

/// Convenience type alias for doc type operations.
pub type Result<T> = std::result::Result<T, DocTypeError>;
