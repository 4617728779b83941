use barda_doctype::{DocType, BYTES_DOC_TYPE};
use barda_types::{validate_cabinet_name, DocKey};

use crate::cabinet::Cabinet;
use crate::document::Doc;
use crate::error::{StoreError, StoreResult};

/// Keyed document storage partitioned into cabinets.
///
/// A document is addressed by `(cabinet, key, extension)`. All implementations
/// must satisfy these invariants:
/// - The location of a document is a pure function of its address. No index
///   or lookup table is consulted.
/// - Writing an existing address replaces its content (last writer wins).
/// - Reading an address that was never written fails with
///   [`StoreError::NotFound`], never with a generic error.
/// - Invalid cabinet names, nil keys and invalid extensions are rejected with
///   [`StoreError::InvalidArgument`] before any storage is touched.
/// - The store never interprets document bytes.
pub trait DocStore: Send + Sync {
    /// Write `bytes` as the document at `(cabinet, key, extension)`.
    fn write_raw(&self, cabinet: &str, key: &DocKey, extension: &str, bytes: &[u8])
        -> StoreResult<()>;

    /// Read the bytes of the document at `(cabinet, key, extension)`.
    fn read_raw(&self, cabinet: &str, key: &DocKey, extension: &str) -> StoreResult<Vec<u8>>;

    /// Check whether a document exists at `(cabinet, key, extension)`.
    fn contains(&self, cabinet: &str, key: &DocKey, extension: &str) -> StoreResult<bool>;

    /// Store raw bytes under the `bytes` extension.
    fn store_bytes(&self, cabinet: &str, key: &DocKey, value: &[u8]) -> StoreResult<()> {
        self.write_raw(cabinet, key, BYTES_DOC_TYPE, value)
    }

    /// Read raw bytes stored under the `bytes` extension.
    fn get_bytes(&self, cabinet: &str, key: &DocKey) -> StoreResult<Vec<u8>> {
        self.read_raw(cabinet, key, BYTES_DOC_TYPE)
    }
}

/// Typed operations available on every [`DocStore`], including trait objects.
pub trait DocStoreExt: DocStore {
    /// Encode `value` with `doc_type` and store it under the doc type's name.
    ///
    /// Nothing is written if the arguments are invalid or encoding fails.
    fn store<T>(&self, cabinet: &str, key: &DocKey, value: &T, doc_type: &DocType<T>) -> StoreResult<()> {
        validate_cabinet_name(cabinet)?;
        key.ensure_addressable()?;
        let bytes = doc_type.encode(value).map_err(|source| StoreError::Encode {
            doc_type: doc_type.name().to_string(),
            key: *key,
            source,
        })?;
        self.write_raw(cabinet, key, doc_type.name(), &bytes)
    }

    /// Read the document stored under `doc_type`'s name and decode it.
    fn get<T>(&self, cabinet: &str, key: &DocKey, doc_type: &DocType<T>) -> StoreResult<T> {
        let bytes = self.read_raw(cabinet, key, doc_type.name())?;
        doc_type.decode(&bytes).map_err(|source| StoreError::Decode {
            doc_type: doc_type.name().to_string(),
            key: *key,
            source,
        })
    }

    /// Check whether a document exists under `doc_type`'s name.
    fn exists<T>(&self, cabinet: &str, key: &DocKey, doc_type: &DocType<T>) -> StoreResult<bool> {
        self.contains(cabinet, key, doc_type.name())
    }

    /// Write an already encoded [`Doc`].
    fn put_doc(&self, cabinet: &str, doc: &Doc) -> StoreResult<()> {
        self.write_raw(cabinet, doc.key(), doc.doc_type(), doc.content())
    }

    /// Read the raw document stored for `key` under `doc_type_name`.
    fn fetch_doc(&self, cabinet: &str, key: &DocKey, doc_type_name: &str) -> StoreResult<Doc> {
        let content = self.read_raw(cabinet, key, doc_type_name)?;
        Ok(Doc::from_parts(*key, doc_type_name, content))
    }

    /// Handle scoped to one cabinet.
    fn cabinet(&self, name: &str) -> StoreResult<Cabinet<'_, Self>> {
        Cabinet::new(self, name)
    }
}

impl<S: DocStore + ?Sized> DocStoreExt for S {}
