//! Filesystem document store with hash-fanned bucket directories.
//!
//! Each cabinet is a directory under the store root. Below it, documents are
//! spread over four levels of directories named after the bytes of the key
//! hash, so the full path of any document is computed from its address
//! alone and no directory ever holds more than 256 subdirectories:
//!
//! ```text
//! <root>/orders/4a/e4/55/d2/123e4567-e89b-12d3-a456-426614174000.bytes
//! ```
//!
//! The tree is sparse: for realistic corpus sizes most buckets hold a single
//! document. Keyed access is a single open; scanning is not supported.
//!
//! There is no in-process locking. Writes to different keys never touch the
//! same file, and concurrent writes to the same document race with the last
//! writer winning.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use barda_doctype::validate_doc_type_name;
use barda_types::{CabinetName, DocKey};
use tracing::{debug, info, warn};

use crate::config::{StoreConfig, WriteMode};
use crate::error::{StoreError, StoreResult};
use crate::layout;
use crate::traits::DocStore;

/// Document store laid out as fanned folders of flat files.
#[derive(Debug, Clone)]
pub struct FanningDocStore {
    root: PathBuf,
    config: StoreConfig,
}

impl FanningDocStore {
    /// Open a store with the given configuration.
    ///
    /// The root is created (with its parents) when `create_root` is set.
    /// Fails with [`StoreError::RootUnavailable`] if the root is missing or
    /// is not a directory.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        let unavailable = |source: io::Error| StoreError::RootUnavailable {
            path: config.root.clone(),
            source,
        };

        if config.create_root {
            fs::create_dir_all(&config.root).map_err(unavailable)?;
        }

        let attr = fs::metadata(&config.root).map_err(unavailable)?;
        if !attr.is_dir() {
            return Err(unavailable(io::Error::other(
                "store root must be a directory",
            )));
        }

        let root = std::path::absolute(&config.root).map_err(unavailable)?;
        info!(
            root = %root.display(),
            write_mode = ?config.write_mode,
            sync_writes = config.sync_writes,
            "opened document store"
        );
        Ok(Self { root, config })
    }

    /// Open a store at `root` with the default configuration.
    pub fn rooted_at(root: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::open(StoreConfig::new(root))
    }

    /// Absolute store root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Bucket directory for `key` in `cabinet`.
    ///
    /// Pure path computation; nothing is created.
    pub fn locate_bucket(&self, cabinet: &str, key: &DocKey) -> StoreResult<PathBuf> {
        let cabinet = CabinetName::new(cabinet)?;
        Ok(self.root.join(layout::bucket_dir(&cabinet, key)))
    }

    /// Full path of the document `(cabinet, key, extension)`.
    ///
    /// Pure path computation; nothing is created.
    pub fn locate_file(&self, cabinet: &str, key: &DocKey, extension: &str) -> StoreResult<PathBuf> {
        let (bucket, file) = self.resolve(cabinet, key, extension)?;
        Ok(bucket.join(file))
    }

    /// Validate an address and split its path into bucket directory and file name.
    fn resolve(&self, cabinet: &str, key: &DocKey, extension: &str) -> StoreResult<(PathBuf, String)> {
        let cabinet = CabinetName::new(cabinet)?;
        key.ensure_addressable()?;
        validate_doc_type_name(extension).map_err(|e| StoreError::InvalidArgument(e.to_string()))?;
        Ok((
            self.root.join(layout::bucket_dir(&cabinet, key)),
            layout::file_name(key, extension),
        ))
    }

    fn write_direct(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(bytes)?;
        if self.config.sync_writes {
            file.sync_all()?;
        }
        Ok(())
    }

    fn write_atomic(&self, bucket: &Path, file_name: &str, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{file_name}."))
            .suffix(".tmp")
            .tempfile_in(bucket)?;
        tmp.write_all(bytes)?;
        if self.config.sync_writes {
            tmp.as_file().sync_all()?;
        }
        tmp.persist(path).map(|_| ()).map_err(|e| {
            let tmp_path = e.file.path().to_path_buf();
            if let Err(cleanup) = e.file.close() {
                warn!(path = %tmp_path.display(), error = %cleanup, "could not remove temporary document");
            }
            e.error
        })
    }
}

impl DocStore for FanningDocStore {
    fn write_raw(
        &self,
        cabinet: &str,
        key: &DocKey,
        extension: &str,
        bytes: &[u8],
    ) -> StoreResult<()> {
        let (bucket, file_name) = self.resolve(cabinet, key, extension)?;

        // Creating directories that already exist is not an error, so
        // concurrent writers into the same bucket are fine.
        fs::create_dir_all(&bucket).map_err(|source| StoreError::StorageWrite {
            path: bucket.clone(),
            source,
        })?;

        let path = bucket.join(&file_name);
        let written = match self.config.write_mode {
            WriteMode::Direct => self.write_direct(&path, bytes),
            WriteMode::AtomicRename => self.write_atomic(&bucket, &file_name, &path, bytes),
        };
        written.map_err(|source| StoreError::StorageWrite {
            path: path.clone(),
            source,
        })?;

        debug!(cabinet, key = %key, extension, len = bytes.len(), "stored document");
        Ok(())
    }

    fn read_raw(&self, cabinet: &str, key: &DocKey, extension: &str) -> StoreResult<Vec<u8>> {
        let path = self.locate_file(cabinet, key, extension)?;
        match fs::read(&path) {
            Ok(bytes) => {
                debug!(cabinet, key = %key, extension, len = bytes.len(), "read document");
                Ok(bytes)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound { path }),
            Err(source) => Err(StoreError::StorageRead { path, source }),
        }
    }

    fn contains(&self, cabinet: &str, key: &DocKey, extension: &str) -> StoreResult<bool> {
        let path = self.locate_file(cabinet, key, extension)?;
        match fs::metadata(&path) {
            Ok(attr) => Ok(attr.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::StorageRead { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::DocStoreExt;
    use barda_doctype::{formats, DocType, DocTypeError};
    use proptest::prelude::*;
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tempfile::TempDir;
    use walkdir::WalkDir;

    const SAMPLE_KEY: &str = "123e4567-e89b-12d3-a456-426614174000";

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Order {
        number: u32,
        customer: String,
        total_cents: i64,
    }

    fn order() -> Order {
        Order {
            number: 1001,
            customer: "ACME".into(),
            total_cents: 129_99,
        }
    }

    fn open_store() -> (TempDir, FanningDocStore) {
        let dir = TempDir::new().unwrap();
        let store = FanningDocStore::rooted_at(dir.path()).unwrap();
        (dir, store)
    }

    fn sample_key() -> DocKey {
        DocKey::parse(SAMPLE_KEY).unwrap()
    }

    // -----------------------------------------------------------------------
    // Opening
    // -----------------------------------------------------------------------

    #[test]
    fn open_creates_missing_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("a").join("b").join("store");
        let store = FanningDocStore::rooted_at(&root).unwrap();
        assert!(root.is_dir());
        assert!(store.root().is_absolute());
    }

    #[test]
    fn open_without_create_requires_root() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::new(dir.path().join("missing")).with_create_root(false);
        let err = FanningDocStore::open(config).unwrap_err();
        assert!(matches!(err, StoreError::RootUnavailable { .. }));
    }

    #[test]
    fn open_rejects_file_root() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, b"x").unwrap();
        let err = FanningDocStore::rooted_at(&file).unwrap_err();
        assert!(matches!(err, StoreError::RootUnavailable { .. }));
    }

    // -----------------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------------

    #[test]
    fn sample_document_lands_on_expected_path() {
        let (dir, store) = open_store();
        let key = sample_key();
        store.store_bytes("orders", &key, &[0x00, 0x01, 0x02]).unwrap();

        let expected = store
            .root()
            .join("orders/4a/e4/55/d2")
            .join(format!("{SAMPLE_KEY}.bytes"));
        assert_eq!(store.locate_file("orders", &key, "bytes").unwrap(), expected);
        assert_eq!(fs::read(&expected).unwrap(), vec![0x00, 0x01, 0x02]);
        assert_eq!(store.get_bytes("orders", &key).unwrap(), vec![0x00, 0x01, 0x02]);
        drop(dir);
    }

    #[test]
    fn locate_bucket_is_parent_of_document() {
        let (_dir, store) = open_store();
        let key = DocKey::new();
        let bucket = store.locate_bucket("c", &key).unwrap();
        let file = store.locate_file("c", &key, "json").unwrap();
        assert_eq!(file.parent().unwrap(), bucket);
        assert!(!bucket.exists());
    }

    #[test]
    fn paths_are_stable_across_store_instances() {
        let (dir, store) = open_store();
        let key = sample_key();
        let first = store.locate_file("orders", &key, "bytes").unwrap();
        let second = store.locate_file("orders", &key, "bytes").unwrap();
        let reopened = FanningDocStore::rooted_at(dir.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, reopened.locate_file("orders", &key, "bytes").unwrap());
    }

    #[test]
    fn fan_out_is_bounded() {
        let (dir, store) = open_store();
        for _ in 0..2000 {
            store.store_bytes("wide", &DocKey::new(), b"x").unwrap();
        }

        let cabinet = dir.path().join("wide");
        let mut children: HashMap<PathBuf, usize> = HashMap::new();
        let mut documents = 0;
        for entry in WalkDir::new(&cabinet).min_depth(1) {
            let entry = entry.unwrap();
            let depth = entry.depth();
            if entry.file_type().is_dir() {
                assert!(depth <= 4, "bucket deeper than four levels");
                let name = entry.file_name().to_string_lossy().into_owned();
                assert_eq!(name.len(), 2);
                assert!(name.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
                let parent = entry.path().parent().unwrap().to_path_buf();
                *children.entry(parent).or_default() += 1;
            } else {
                assert_eq!(depth, 5, "documents live in the fourth bucket level");
                documents += 1;
            }
        }
        assert_eq!(documents, 2000);
        assert!(children.values().all(|&n| n <= 256));
    }

    // -----------------------------------------------------------------------
    // Raw bytes
    // -----------------------------------------------------------------------

    #[test]
    fn empty_payload_roundtrip() {
        let (_dir, store) = open_store();
        let key = DocKey::new();
        store.store_bytes("c", &key, &[]).unwrap();
        assert!(store.get_bytes("c", &key).unwrap().is_empty());
    }

    #[test]
    fn overwrite_leaves_no_trace() {
        let (_dir, store) = open_store();
        let key = DocKey::new();
        store.store_bytes("c", &key, b"a much longer first version").unwrap();
        store.store_bytes("c", &key, b"v2").unwrap();
        assert_eq!(store.get_bytes("c", &key).unwrap(), b"v2");
    }

    #[test]
    fn cabinets_are_isolated() {
        let (_dir, store) = open_store();
        let key = DocKey::new();
        store.store_bytes("c1", &key, b"v1").unwrap();
        store.store_bytes("c2", &key, b"v2").unwrap();
        assert_eq!(store.get_bytes("c1", &key).unwrap(), b"v1");
        assert_eq!(store.get_bytes("c2", &key).unwrap(), b"v2");
        assert!(store.get_bytes("c3", &key).unwrap_err().is_not_found());
    }

    #[test]
    fn missing_document_is_not_found() {
        let (_dir, store) = open_store();
        let key = DocKey::new();
        let err = store.get_bytes("c", &key).unwrap_err();
        assert!(err.is_not_found());
        match err {
            StoreError::NotFound { path } => {
                assert_eq!(path, store.locate_file("c", &key, "bytes").unwrap())
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert!(!store.contains("c", &key, "bytes").unwrap());
    }

    #[test]
    fn contains_tracks_writes() {
        let (_dir, store) = open_store();
        let key = DocKey::new();
        assert!(!store.contains("c", &key, "bytes").unwrap());
        store.store_bytes("c", &key, b"x").unwrap();
        assert!(store.contains("c", &key, "bytes").unwrap());
        assert!(!store.contains("c", &key, "json").unwrap());
    }

    #[test]
    fn unreadable_document_is_read_error() {
        let (_dir, store) = open_store();
        let key = DocKey::new();
        // A directory where the document file should be.
        fs::create_dir_all(store.locate_file("c", &key, "bytes").unwrap()).unwrap();
        let err = store.get_bytes("c", &key).unwrap_err();
        assert!(matches!(err, StoreError::StorageRead { .. }));
    }

    // -----------------------------------------------------------------------
    // Typed documents
    // -----------------------------------------------------------------------

    #[test]
    fn typed_roundtrip_uses_doc_type_extension() {
        let (_dir, store) = open_store();
        let key = DocKey::new();
        let json = formats::json::<Order>().unwrap();

        store.store("orders", &key, &order(), &json).unwrap();
        assert_eq!(store.get("orders", &key, &json).unwrap(), order());

        let file = store.locate_file("orders", &key, "Order").unwrap();
        assert!(file.is_file());
        assert!(file.to_string_lossy().ends_with(".Order"));
        assert!(store.exists("orders", &key, &json).unwrap());
    }

    #[test]
    fn doc_types_coexist_under_one_key() {
        let (_dir, store) = open_store();
        let key = DocKey::new();
        let json = formats::json_named::<Order>("json").unwrap();
        let bin = formats::bincode_named::<Order>("bin").unwrap();

        store.store("orders", &key, &order(), &json).unwrap();
        let mut other = order();
        other.number = 2;
        store.store("orders", &key, &other, &bin).unwrap();

        assert_eq!(store.get("orders", &key, &json).unwrap(), order());
        assert_eq!(store.get("orders", &key, &bin).unwrap(), other);
        assert!(store.get_bytes("orders", &key).unwrap_err().is_not_found());
    }

    #[test]
    fn typed_get_does_not_fall_back_to_bytes() {
        let (_dir, store) = open_store();
        let key = DocKey::new();
        store.store_bytes("c", &key, b"hello").unwrap();
        let err = store.get("c", &key, &DocType::text()).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.get("c", &key, &DocType::bytes()).unwrap(), b"hello");
    }

    #[test]
    fn decode_failure_is_tagged() {
        let (_dir, store) = open_store();
        let key = DocKey::new();
        store.write_raw("orders", &key, "json", b"{ broken").unwrap();
        let json = formats::json_named::<Order>("json").unwrap();
        match store.get("orders", &key, &json).unwrap_err() {
            StoreError::Decode { doc_type, key: k, .. } => {
                assert_eq!(doc_type, "json");
                assert_eq!(k, key);
            }
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn encode_failure_creates_nothing() {
        let (dir, store) = open_store();
        let failing = DocType::<Order>::new(
            "fail",
            |_| Err(DocTypeError::Encode("refused".into())),
            |_| Err(DocTypeError::Decode("refused".into())),
        )
        .unwrap();
        let err = store.store("orders", &DocKey::new(), &order(), &failing).unwrap_err();
        assert!(matches!(err, StoreError::Encode { .. }));
        assert!(!dir.path().join("orders").exists());
    }

    // -----------------------------------------------------------------------
    // Invalid arguments and write failures
    // -----------------------------------------------------------------------

    #[test]
    fn invalid_arguments_create_nothing() {
        let (dir, store) = open_store();
        for cabinet in ["", ".", "..", "a/b", "a\\b"] {
            assert!(matches!(
                store.store_bytes(cabinet, &DocKey::new(), b"x"),
                Err(StoreError::InvalidArgument(_))
            ));
        }
        assert!(matches!(
            store.store_bytes("c", &DocKey::nil(), b"x"),
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.write_raw("c", &DocKey::new(), "", b"x"),
            Err(StoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.get_bytes("..", &DocKey::new()),
            Err(StoreError::InvalidArgument(_))
        ));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn file_in_place_of_cabinet_is_write_error() {
        let (dir, store) = open_store();
        fs::write(dir.path().join("blocked"), b"not a directory").unwrap();
        let err = store.store_bytes("blocked", &DocKey::new(), b"x").unwrap_err();
        assert!(matches!(err, StoreError::StorageWrite { .. }));
    }

    // -----------------------------------------------------------------------
    // Write modes
    // -----------------------------------------------------------------------

    #[test]
    fn atomic_rename_mode_roundtrip_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::new(dir.path())
            .with_write_mode(WriteMode::AtomicRename)
            .with_sync_writes(true);
        let store = FanningDocStore::open(config).unwrap();
        let key = DocKey::new();

        store.store_bytes("c", &key, b"one").unwrap();
        store.store_bytes("c", &key, b"two").unwrap();
        assert_eq!(store.get_bytes("c", &key).unwrap(), b"two");

        let bucket = store.locate_bucket("c", &key).unwrap();
        let names: Vec<String> = fs::read_dir(&bucket)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![format!("{key}.bytes")]);
    }

    #[test]
    fn synced_direct_writes() {
        let dir = TempDir::new().unwrap();
        let store = FanningDocStore::open(StoreConfig::new(dir.path()).with_sync_writes(true)).unwrap();
        let key = DocKey::new();
        store.store_bytes("c", &key, b"durable").unwrap();
        assert_eq!(store.get_bytes("c", &key).unwrap(), b"durable");
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_writers_on_distinct_keys() {
        let (_dir, store) = open_store();
        let store = Arc::new(store);
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    let keys: Vec<DocKey> = (0..25).map(|_| DocKey::new()).collect();
                    for key in &keys {
                        store.store_bytes("shared", key, &[i]).unwrap();
                    }
                    (keys, i)
                })
            })
            .collect();
        for h in handles {
            let (keys, i) = h.join().unwrap();
            for key in keys {
                assert_eq!(store.get_bytes("shared", &key).unwrap(), vec![i]);
            }
        }
    }

    #[test]
    fn concurrent_writers_on_same_key_leave_one_version() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::new(dir.path()).with_write_mode(WriteMode::AtomicRename);
        let store = Arc::new(FanningDocStore::open(config).unwrap());
        let key = DocKey::new();
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.store_bytes("race", &key, &[i; 64]).unwrap())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let bytes = store.get_bytes("race", &key).unwrap();
        assert_eq!(bytes.len(), 64);
        assert!(bytes.iter().all(|&b| b == bytes[0]));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn raw_roundtrip_on_disk(bytes in proptest::collection::vec(any::<u8>(), 0..2048), msb in 1u64.., lsb in any::<u64>()) {
            let (_dir, store) = open_store();
            let key = DocKey::from_u64_pair(msb, lsb);
            store.store_bytes("prop", &key, &bytes).unwrap();
            prop_assert_eq!(store.get_bytes("prop", &key).unwrap(), bytes);
        }
    }
}
