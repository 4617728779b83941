use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TypeError;

/// Key addressing a single document inside a cabinet.
///
/// A `DocKey` is a 128-bit UUID. Its canonical lowercase hyphenated form is
/// the file stem of the stored document, and its [`hash_code`](Self::hash_code)
/// selects the bucket directory the document lives in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocKey(Uuid);

impl DocKey {
    /// Generate a fresh random key (UUID v4).
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Build a key from its two 64-bit halves, most significant first.
    pub const fn from_u64_pair(msb: u64, lsb: u64) -> Self {
        Self(Uuid::from_u64_pair(msb, lsb))
    }

    /// Parse a key from any textual UUID form accepted by [`Uuid::parse_str`].
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| TypeError::InvalidKey(format!("{s:?}: {e}")))
    }

    /// The nil key (all zeros). It never addresses a document.
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Returns `true` if this is the nil key.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Reject the nil key.
    pub fn ensure_addressable(&self) -> Result<(), TypeError> {
        if self.is_nil() {
            return Err(TypeError::NilKey);
        }
        Ok(())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Stable 32-bit hash of the key.
    ///
    /// The two 64-bit halves are XORed together and the result is folded onto
    /// itself. This value decides the on-disk bucket, so it must never change.
    pub fn hash_code(&self) -> u32 {
        let bits = self.0.as_u128();
        let hilo = ((bits >> 64) as u64) ^ (bits as u64);
        ((hilo >> 32) as u32) ^ (hilo as u32)
    }

    /// Canonical lowercase hyphenated form, used as the document file stem.
    pub fn file_stem(&self) -> String {
        self.0.hyphenated().to_string()
    }

    /// Short representation (first 8 characters).
    pub fn short_id(&self) -> String {
        self.file_stem()[..8].to_string()
    }
}

impl Default for DocKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocKey({})", self.short_id())
    }
}

impl fmt::Display for DocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for DocKey {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for DocKey {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<DocKey> for Uuid {
    fn from(key: DocKey) -> Self {
        key.0
    }
}
