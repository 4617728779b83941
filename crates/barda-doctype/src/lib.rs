//! Typed document descriptors for the Barda document store.
//!
//! A [`DocType`] binds a short name to a pair of conversion functions,
//! `T -> bytes` and `bytes -> T`. The store uses the name as the file
//! extension and delegates all encoding and decoding to the doc type; it
//! never looks inside the values it stores.
//!
//! # Modules
//!
//! - [`doctype`] — The [`DocType`] value and the built-in `bytes`/`txt` types
//! - [`formats`] — Serde-backed JSON and bincode doc types
//! - [`registry`] — [`DocTypeRegistry`] for resolving doc types by name
//! - [`error`] — Error types for doc type operations

pub mod doctype;
pub mod error;
pub mod formats;
pub mod registry;

pub use doctype::{validate_doc_type_name, DocType, BYTES_DOC_TYPE, TEXT_DOC_TYPE};
pub use error::{DocTypeError, Result};
pub use registry::DocTypeRegistry;
