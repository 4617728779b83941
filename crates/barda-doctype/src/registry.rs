//! Explicit registry of doc types and value constructors.
//!
//! Applications register every doc type they use once at startup and later
//! resolve them by name, e.g. when the doc type to use is only known from
//! configuration or from a stored file's extension. Constructors registered
//! per value type let callers create blank, writable values without knowing
//! the concrete type's construction details.
//!
//! The store itself never consults a registry: callers always pass a
//! [`DocType`] explicitly.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::doctype::DocType;
use crate::error::{DocTypeError, Result};

type Factory<T> = Arc<dyn Fn() -> T + Send + Sync>;

struct Registered {
    value_type: &'static str,
    doc_type: Box<dyn Any + Send + Sync>,
}

/// Name-keyed collection of doc types plus per-type constructors.
#[derive(Default)]
pub struct DocTypeRegistry {
    doc_types: RwLock<HashMap<String, Registered>>,
    factories: RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl DocTypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in `bytes` and `txt` doc types.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        // Fresh registry: the two built-in names cannot collide.
        let _ = registry.register(DocType::bytes());
        let _ = registry.register(DocType::text());
        registry
    }

    /// Register a doc type under its name.
    ///
    /// Fails with [`DocTypeError::AlreadyRegistered`] if the name is taken,
    /// whatever value type the existing entry handles.
    pub fn register<T: 'static>(&self, doc_type: DocType<T>) -> Result<()> {
        let mut doc_types = self.doc_types.write().unwrap_or_else(PoisonError::into_inner);
        let name = doc_type.name().to_string();
        if doc_types.contains_key(&name) {
            return Err(DocTypeError::AlreadyRegistered(name));
        }
        debug!(doc_type = %name, value_type = type_name::<T>(), "registered doc type");
        doc_types.insert(
            name,
            Registered {
                value_type: type_name::<T>(),
                doc_type: Box::new(doc_type),
            },
        );
        Ok(())
    }

    /// Look up a doc type by name for values of type `T`.
    pub fn resolve<T: 'static>(&self, name: &str) -> Result<DocType<T>> {
        let doc_types = self.doc_types.read().unwrap_or_else(PoisonError::into_inner);
        let entry = doc_types
            .get(name)
            .ok_or_else(|| DocTypeError::NotRegistered(name.to_string()))?;
        entry
            .doc_type
            .downcast_ref::<DocType<T>>()
            .cloned()
            .ok_or_else(|| DocTypeError::TypeMismatch {
                name: name.to_string(),
                requested: type_name::<T>().to_string(),
            })
    }

    /// Value type handled by the doc type registered under `name`.
    pub fn value_type_of(&self, name: &str) -> Option<&'static str> {
        let doc_types = self.doc_types.read().unwrap_or_else(PoisonError::into_inner);
        doc_types.get(name).map(|entry| entry.value_type)
    }

    /// Returns `true` if a doc type is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        let doc_types = self.doc_types.read().unwrap_or_else(PoisonError::into_inner);
        doc_types.contains_key(name)
    }

    /// All registered doc type names, sorted.
    pub fn names(&self) -> Vec<String> {
        let doc_types = self.doc_types.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = doc_types.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered doc types.
    pub fn len(&self) -> usize {
        self.doc_types.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if no doc types are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register the constructor used by [`create`](Self::create) for `T`.
    ///
    /// A later registration for the same type replaces the earlier one.
    pub fn register_factory<T, F>(&self, factory: F)
    where
        T: 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let factory: Factory<T> = Arc::new(factory);
        let mut factories = self.factories.write().unwrap_or_else(PoisonError::into_inner);
        debug!(value_type = type_name::<T>(), "registered factory");
        factories.insert(TypeId::of::<T>(), Box::new(factory));
    }

    /// Construct a new `T` through its registered constructor.
    pub fn create<T: 'static>(&self) -> Result<T> {
        let factory = {
            let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
            factories
                .get(&TypeId::of::<T>())
                .and_then(|f| f.downcast_ref::<Factory<T>>())
                .cloned()
                .ok_or_else(|| DocTypeError::NoFactory(type_name::<T>().to_string()))?
        };
        Ok(factory())
    }

    /// Returns `true` if a constructor is registered for `T`.
    pub fn has_factory<T: 'static>(&self) -> bool {
        let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
        factories.contains_key(&TypeId::of::<T>())
    }
}

impl fmt::Debug for DocTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let factory_count = self.factories.read().unwrap_or_else(PoisonError::into_inner).len();
        f.debug_struct("DocTypeRegistry")
            .field("doc_types", &self.names())
            .field("factory_count", &factory_count)
            .finish()
    }
}
