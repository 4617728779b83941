//! Hash-based directory fan-out.
//!
//! A bucket is four nested directories, one per byte of a 32-bit key hash,
//! most significant byte first. Each level is named with two lowercase hex
//! digits, so no directory in the fan ever holds more than 256 children.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::key::DocKey;

/// Number of directory levels in a bucket path.
pub const BUCKET_DEPTH: usize = 4;

/// The four directory levels a key fans out to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BucketPath([u8; BUCKET_DEPTH]);

impl BucketPath {
    /// Split a 32-bit hash into its bucket levels.
    pub const fn from_hash(hash: u32) -> Self {
        Self(hash.to_be_bytes())
    }

    /// The bucket a key is stored under.
    pub fn for_key(key: &DocKey) -> Self {
        Self::from_hash(key.hash_code())
    }

    /// Level bytes, outermost first.
    pub fn levels(&self) -> [u8; BUCKET_DEPTH] {
        self.0
    }

    /// Directory names, outermost first.
    pub fn segments(&self) -> [String; BUCKET_DEPTH] {
        self.0.map(|b| hex::encode([b]))
    }

    /// Relative path `b0/b1/b2/b3`.
    pub fn to_relative_path(&self) -> PathBuf {
        self.segments().iter().collect()
    }
}

impl fmt::Display for BucketPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments().join("/"))
    }
}
