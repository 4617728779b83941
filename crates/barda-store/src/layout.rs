//! Relative on-disk layout of stored documents.
//!
//! ```text
//! <cabinet>/<b0>/<b1>/<b2>/<b3>/<key>.<extension>
//! ```
//!
//! `<b0>..<b3>` come from [`BucketPath::for_key`] and `<key>` is the key's
//! canonical lowercase hyphenated form. Every path here is a pure function
//! of its inputs.

use std::path::PathBuf;

use barda_types::{BucketPath, CabinetName, DocKey};

/// Directory holding the documents of `key`, relative to the store root.
pub fn bucket_dir(cabinet: &CabinetName, key: &DocKey) -> PathBuf {
    let mut dir = PathBuf::from(cabinet.as_str());
    dir.push(BucketPath::for_key(key).to_relative_path());
    dir
}

/// File name of a document: `<key>.<extension>`.
pub fn file_name(key: &DocKey, extension: &str) -> String {
    format!("{}.{}", key.file_stem(), extension)
}

/// Path of a document relative to the store root.
pub fn document_path(cabinet: &CabinetName, key: &DocKey, extension: &str) -> PathBuf {
    bucket_dir(cabinet, key).join(file_name(key, extension))
}
