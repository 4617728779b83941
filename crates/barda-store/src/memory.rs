use std::collections::HashMap;
use std::sync::RwLock;

use barda_doctype::validate_doc_type_name;
use barda_types::{CabinetName, DocKey};

use crate::error::{StoreError, StoreResult};
use crate::layout;
use crate::traits::DocStore;

type Address = (CabinetName, DocKey, String);

/// In-memory, HashMap-based document store.
///
/// Intended for tests and embedding. Addressing, validation and error
/// semantics match [`FanningDocStore`](crate::FanningDocStore); `NotFound`
/// errors carry the path the document would have on disk, relative to the
/// store root.
pub struct InMemoryDocStore {
    documents: RwLock<HashMap<Address, Vec<u8>>>,
}

impl InMemoryDocStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read_lock()?.len())
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read_lock()?.is_empty())
    }

    /// Remove all documents.
    pub fn clear(&self) -> StoreResult<()> {
        self.write_lock()?.clear();
        Ok(())
    }

    fn read_lock(
        &self,
    ) -> StoreResult<std::sync::RwLockReadGuard<'_, HashMap<Address, Vec<u8>>>> {
        self.documents
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write_lock(
        &self,
    ) -> StoreResult<std::sync::RwLockWriteGuard<'_, HashMap<Address, Vec<u8>>>> {
        self.documents
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

fn address(cabinet: &str, key: &DocKey, extension: &str) -> StoreResult<Address> {
    let cabinet = CabinetName::new(cabinet)?;
    key.ensure_addressable()?;
    validate_doc_type_name(extension).map_err(|e| StoreError::InvalidArgument(e.to_string()))?;
    Ok((cabinet, *key, extension.to_string()))
}

impl Default for InMemoryDocStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocStore for InMemoryDocStore {
    fn write_raw(
        &self,
        cabinet: &str,
        key: &DocKey,
        extension: &str,
        bytes: &[u8],
    ) -> StoreResult<()> {
        let address = address(cabinet, key, extension)?;
        self.write_lock()?.insert(address, bytes.to_vec());
        Ok(())
    }

    fn read_raw(&self, cabinet: &str, key: &DocKey, extension: &str) -> StoreResult<Vec<u8>> {
        let address = address(cabinet, key, extension)?;
        let documents = self.read_lock()?;
        documents
            .get(&address)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                path: layout::document_path(&address.0, key, extension),
            })
    }

    fn contains(&self, cabinet: &str, key: &DocKey, extension: &str) -> StoreResult<bool> {
        let address = address(cabinet, key, extension)?;
        Ok(self.read_lock()?.contains_key(&address))
    }
}

impl std::fmt::Debug for InMemoryDocStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.documents.read().map(|d| d.len()).ok();
        f.debug_struct("InMemoryDocStore")
            .field("document_count", &count)
            .finish()
    }
}
