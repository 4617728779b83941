//! Foundation types for the Barda document store.
//!
//! Every document in Barda is addressed by a cabinet name and a 128-bit key.
//! This crate holds those identifiers and the pure function that fans a key
//! out into a four-level directory bucket.
//!
//! # Key Types
//!
//! - [`DocKey`] — UUID document key with a stable 32-bit hash
//! - [`BucketPath`] — Four hex directory levels derived from a key hash
//! - [`CabinetName`] — Validated single-segment namespace name

pub mod bucket;
pub mod cabinet;
pub mod error;
pub mod key;

pub use bucket::{BucketPath, BUCKET_DEPTH};
pub use cabinet::{validate_cabinet_name, CabinetName};
pub use error::TypeError;
pub use key::DocKey;
