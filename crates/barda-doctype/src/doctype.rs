//! The [`DocType`] descriptor: a name plus an encode/decode pair.

use std::fmt;
use std::sync::Arc;

use crate::error::{DocTypeError, Result};

/// Name of the built-in raw bytes doc type.
pub const BYTES_DOC_TYPE: &str = "bytes";

/// Name of the built-in UTF-8 text doc type.
pub const TEXT_DOC_TYPE: &str = "txt";

type EncodeFn<T> = dyn Fn(&T) -> Result<Vec<u8>> + Send + Sync;
type DecodeFn<T> = dyn Fn(&[u8]) -> Result<T> + Send + Sync;

/// Describes how one kind of document is turned into bytes and back.
///
/// The name doubles as the file extension of stored documents, so two doc
/// types for the same `T` produce two distinct files for the same key.
/// Callers are expected to supply functions where `decode(encode(x)) == x`;
/// this is not checked.
///
/// A `DocType` is immutable. Cloning it is cheap and clones can be shared
/// freely across threads.
pub struct DocType<T> {
    name: Arc<str>,
    encoder: Arc<EncodeFn<T>>,
    decoder: Arc<DecodeFn<T>>,
}

impl<T> DocType<T> {
    /// Create a doc type from a name and its conversion functions.
    ///
    /// Fails if `name` cannot be used as a file extension.
    pub fn new<E, D>(name: impl Into<String>, encode: E, decode: D) -> Result<Self>
    where
        E: Fn(&T) -> Result<Vec<u8>> + Send + Sync + 'static,
        D: Fn(&[u8]) -> Result<T> + Send + Sync + 'static,
    {
        let name = name.into();
        validate_doc_type_name(&name)?;
        Ok(Self::from_parts(&name, encode, decode))
    }

    /// Build without validating the name; only for names known to be valid.
    pub(crate) fn from_parts<E, D>(name: &str, encode: E, decode: D) -> Self
    where
        E: Fn(&T) -> Result<Vec<u8>> + Send + Sync + 'static,
        D: Fn(&[u8]) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            encoder: Arc::new(encode),
            decoder: Arc::new(decode),
        }
    }

    /// Short name of this doc type, also the stored file extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Convert a value into its stored bytes.
    pub fn encode(&self, value: &T) -> Result<Vec<u8>> {
        (self.encoder)(value)
    }

    /// Convert stored bytes back into a value.
    pub fn decode(&self, bytes: &[u8]) -> Result<T> {
        (self.decoder)(bytes)
    }
}

impl DocType<Vec<u8>> {
    /// The raw bytes doc type: identity conversion, extension `bytes`.
    pub fn bytes() -> Self {
        Self::from_parts(
            BYTES_DOC_TYPE,
            |value: &Vec<u8>| Ok(value.clone()),
            |bytes: &[u8]| Ok(bytes.to_vec()),
        )
    }
}

impl DocType<String> {
    /// UTF-8 text documents, extension `txt`.
    pub fn text() -> Self {
        Self::from_parts(
            TEXT_DOC_TYPE,
            |value: &String| Ok(value.as_bytes().to_vec()),
            |bytes: &[u8]| {
                String::from_utf8(bytes.to_vec()).map_err(|e| DocTypeError::Decode(e.to_string()))
            },
        )
    }
}

impl<T> Clone for DocType<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            encoder: Arc::clone(&self.encoder),
            decoder: Arc::clone(&self.decoder),
        }
    }
}

impl<T> fmt::Debug for DocType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocType")
            .field("name", &self.name)
            .field("value_type", &std::any::type_name::<T>())
            .finish()
    }
}

/// Validate a doc type name, returning `Ok(())` if it is usable as an extension.
///
/// Valid names are non-empty and contain no `.`, path separators, NUL or
/// whitespace.
pub fn validate_doc_type_name(name: &str) -> Result<()> {
    let invalid = |reason: String| DocTypeError::InvalidName {
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("doc type name must not be empty".into()));
    }

    if let Some(ch) = name
        .chars()
        .find(|c| matches!(c, '.' | '/' | '\\' | '\0') || c.is_whitespace())
    {
        return Err(invalid(format!("contains forbidden character: {ch:?}")));
    }

    Ok(())
}
