//! Fanned-directory document storage for Barda.
//!
//! Documents are opaque byte payloads, or typed values converted to bytes by
//! a [`DocType`](barda_doctype::DocType), addressed by a cabinet name and a
//! [`DocKey`](barda_types::DocKey). The file holding a document is computed
//! from its address alone:
//!
//! ```text
//! <root>/<cabinet>/<b0>/<b1>/<b2>/<b3>/<key>.<doc type name>
//! ```
//!
//! # Storage Backends
//!
//! All backends implement the [`DocStore`] trait; typed access comes from
//! the blanket [`DocStoreExt`] extension:
//!
//! - [`FanningDocStore`] -- filesystem store with hash-fanned buckets
//! - [`InMemoryDocStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Locations are pure functions of `(cabinet, key, extension)`; there is no index.
//! 2. Writes overwrite unconditionally (last writer wins).
//! 3. A missing document is [`StoreError::NotFound`], never a generic failure.
//! 4. Typed reads use the same extension as typed writes: the doc type's name.
//! 5. The store never interprets document contents.
//! 6. There is no enumeration and no deletion.

pub mod cabinet;
pub mod config;
pub mod document;
pub mod error;
pub mod fanning;
pub mod layout;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use cabinet::Cabinet;
pub use config::{StoreConfig, WriteMode};
pub use document::{Doc, DocBuilder};
pub use error::{StoreError, StoreResult};
pub use fanning::FanningDocStore;
pub use memory::InMemoryDocStore;
pub use traits::{DocStore, DocStoreExt};
