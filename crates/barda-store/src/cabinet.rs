use barda_doctype::DocType;
use barda_types::{CabinetName, DocKey};

use crate::document::Doc;
use crate::error::StoreResult;
use crate::traits::{DocStore, DocStoreExt};

/// A store handle bound to one cabinet.
///
/// ```no_run
/// use barda_store::{DocStoreExt, FanningDocStore};
/// use barda_types::DocKey;
///
/// let store = FanningDocStore::rooted_at("/data/store")?;
/// let orders = store.cabinet("orders")?;
/// let key = DocKey::new();
/// orders.store_bytes(&key, b"payload")?;
/// assert_eq!(orders.get_bytes(&key)?, b"payload");
/// # Ok::<(), barda_store::StoreError>(())
/// ```
pub struct Cabinet<'s, S: ?Sized> {
    store: &'s S,
    name: CabinetName,
}

impl<'s, S: DocStore + ?Sized> Cabinet<'s, S> {
    /// Bind `store` to the cabinet `name`, validating the name.
    pub fn new(store: &'s S, name: &str) -> StoreResult<Self> {
        Ok(Self {
            store,
            name: CabinetName::new(name)?,
        })
    }

    pub fn name(&self) -> &CabinetName {
        &self.name
    }

    pub fn store_bytes(&self, key: &DocKey, value: &[u8]) -> StoreResult<()> {
        self.store.store_bytes(self.name.as_str(), key, value)
    }

    pub fn get_bytes(&self, key: &DocKey) -> StoreResult<Vec<u8>> {
        self.store.get_bytes(self.name.as_str(), key)
    }

    pub fn store<T>(&self, key: &DocKey, value: &T, doc_type: &DocType<T>) -> StoreResult<()> {
        DocStoreExt::store(self.store, self.name.as_str(), key, value, doc_type)
    }

    pub fn get<T>(&self, key: &DocKey, doc_type: &DocType<T>) -> StoreResult<T> {
        DocStoreExt::get(self.store, self.name.as_str(), key, doc_type)
    }

    pub fn exists<T>(&self, key: &DocKey, doc_type: &DocType<T>) -> StoreResult<bool> {
        self.store.exists(self.name.as_str(), key, doc_type)
    }

    /// Write an encoded document under its own key and doc type.
    pub fn put(&self, doc: &Doc) -> StoreResult<()> {
        self.store.put_doc(self.name.as_str(), doc)
    }

    /// Read the encoded document stored for `key` under `doc_type_name`.
    pub fn fetch(&self, key: &DocKey, doc_type_name: &str) -> StoreResult<Doc> {
        self.store.fetch_doc(self.name.as_str(), key, doc_type_name)
    }
}

impl<S: ?Sized> Clone for Cabinet<'_, S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store,
            name: self.name.clone(),
        }
    }
}

impl<S: ?Sized> std::fmt::Debug for Cabinet<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cabinet").field("name", &self.name).finish()
    }
}
