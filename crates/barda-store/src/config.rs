use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How document bytes reach the disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Truncate and rewrite the document file in place.
    #[default]
    Direct,
    /// Write a temporary file in the bucket directory, then rename it over
    /// the document. Readers never observe a partially written document.
    AtomicRename,
}

/// Configuration for a [`FanningDocStore`](crate::FanningDocStore).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding one subdirectory per cabinet.
    pub root: PathBuf,
    /// Create `root` (and its parents) when opening if it does not exist.
    pub create_root: bool,
    /// How documents are written.
    pub write_mode: WriteMode,
    /// `fsync` document data before a write returns.
    pub sync_writes: bool,
}

impl StoreConfig {
    /// Default configuration rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_create_root(mut self, create_root: bool) -> Self {
        self.create_root = create_root;
        self
    }

    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("barda-store"),
            create_root: true,
            write_mode: WriteMode::Direct,
            sync_writes: false,
        }
    }
}
