//! Encoded documents and the builder that produces them.

use std::fmt;
use std::sync::Arc;

use barda_doctype::{DocType, BYTES_DOC_TYPE};
use barda_types::DocKey;

use crate::error::{StoreError, StoreResult};

/// A document already turned into bytes, ready to be written.
#[derive(Clone, PartialEq, Eq)]
pub struct Doc {
    key: DocKey,
    doc_type: String,
    content: Vec<u8>,
}

impl Doc {
    /// A raw document stored under the `bytes` extension.
    pub fn raw(key: DocKey, content: Vec<u8>) -> Self {
        Self::from_parts(key, BYTES_DOC_TYPE, content)
    }

    pub(crate) fn from_parts(key: DocKey, doc_type: &str, content: Vec<u8>) -> Self {
        Self {
            key,
            doc_type: doc_type.to_string(),
            content,
        }
    }

    pub fn key(&self) -> &DocKey {
        &self.key
    }

    /// Name of the doc type that produced the content.
    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn into_content(self) -> Vec<u8> {
        self.content
    }

    /// Decode the content with `doc_type`.
    pub fn decode<T>(&self, doc_type: &DocType<T>) -> StoreResult<T> {
        doc_type.decode(&self.content).map_err(|source| StoreError::Decode {
            doc_type: doc_type.name().to_string(),
            key: self.key,
            source,
        })
    }
}

impl fmt::Debug for Doc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Doc")
            .field("key", &self.key)
            .field("doc_type", &self.doc_type)
            .field("len", &self.content.len())
            .finish()
    }
}

type IdGenerator<T> = Arc<dyn Fn(&T) -> DocKey + Send + Sync>;

/// Turns values of one type into [`Doc`]s.
///
/// Keys come from the id generator when one is set, otherwise every built
/// document gets a fresh random key.
pub struct DocBuilder<T> {
    doc_type: DocType<T>,
    id_generator: Option<IdGenerator<T>>,
}

impl<T> DocBuilder<T> {
    pub fn new(doc_type: DocType<T>) -> Self {
        Self {
            doc_type,
            id_generator: None,
        }
    }

    /// Derive each document's key from its value.
    pub fn with_id<F>(mut self, id_generator: F) -> Self
    where
        F: Fn(&T) -> DocKey + Send + Sync + 'static,
    {
        self.id_generator = Some(Arc::new(id_generator));
        self
    }

    pub fn doc_type(&self) -> &DocType<T> {
        &self.doc_type
    }

    /// Key and encode `value`.
    pub fn build(&self, value: &T) -> StoreResult<Doc> {
        let key = match &self.id_generator {
            Some(generate) => generate(value),
            None => DocKey::new(),
        };
        key.ensure_addressable()?;
        let content = self.doc_type.encode(value).map_err(|source| StoreError::Encode {
            doc_type: self.doc_type.name().to_string(),
            key,
            source,
        })?;
        Ok(Doc::from_parts(key, self.doc_type.name(), content))
    }
}

impl<T> Clone for DocBuilder<T> {
    fn clone(&self) -> Self {
        Self {
            doc_type: self.doc_type.clone(),
            id_generator: self.id_generator.clone(),
        }
    }
}

impl<T> fmt::Debug for DocBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocBuilder")
            .field("doc_type", &self.doc_type.name())
            .field("has_id_generator", &self.id_generator.is_some())
            .finish()
    }
}
