//! Where packages go.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use tokio::sync::Mutex;

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};

/// Characters escaped in the path of a `file://` URL.
const PATH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Object storage for generated packages.
#[async_trait]
pub trait PackageStorage: Send + Sync {
    /// Store `bytes` at `path`, replacing any existing object.
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()>;

    /// A time-limited download URL for an uploaded object.
    async fn create_signed_url(&self, path: &str, ttl_secs: u64) -> Result<String>;
}

/// Packages stored under a local directory.
///
/// Signed URLs are `file://` URLs carrying the expiry as a query parameter;
/// nothing enforces it, so this backend suits single-user setups and tests.
#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
    clock: Arc<dyn Clock>,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an object path below the root, refusing anything that could
    /// escape it.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let safe = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(Error::Storage(format!("invalid object path: {path}")));
        }
        Ok(self.root.join(relative))
    }
}

impl std::fmt::Debug for LocalStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStorage").field("root", &self.root).finish()
    }
}

#[async_trait]
impl PackageStorage for LocalStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, _content_type: &str) -> Result<()> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::Storage(format!("create {}: {e}", parent.display())))?;
        }
        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| Error::Storage(format!("write {}: {e}", target.display())))?;
        tracing::debug!(path, "package stored");
        Ok(())
    }

    async fn create_signed_url(&self, path: &str, ttl_secs: u64) -> Result<String> {
        let target = self.resolve(path)?;
        if !tokio::fs::try_exists(&target).await.unwrap_or(false) {
            return Err(Error::Storage(format!("no object at {path}")));
        }
        let absolute = std::path::absolute(&target)
            .map_err(|e| Error::Storage(format!("resolve {}: {e}", target.display())))?;
        let expires = self
            .clock
            .now()
            .timestamp()
            .saturating_add(i64::try_from(ttl_secs).unwrap_or(i64::MAX));

        let path_str = absolute.to_string_lossy().replace('\\', "/");
        let encoded = utf8_percent_encode(&path_str, PATH_ENCODE_SET);
        let sep = if path_str.starts_with('/') { "" } else { "/" };
        Ok(format!("file://{sep}{encoded}?expires={expires}"))
    }
}

/// A stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// In-memory storage, with switchable failures for exercising error paths.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    fail_uploads: bool,
    fail_signing: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every upload fails.
    pub fn failing_uploads() -> Self {
        Self {
            fail_uploads: true,
            ..Self::default()
        }
    }

    /// Uploads succeed, URL signing fails.
    pub fn failing_signing() -> Self {
        Self {
            fail_signing: true,
            ..Self::default()
        }
    }

    pub async fn get(&self, path: &str) -> Option<StoredObject> {
        self.objects.lock().await.get(path).cloned()
    }

    pub async fn paths(&self) -> Vec<String> {
        self.objects.lock().await.keys().cloned().collect()
    }
}

#[async_trait]
impl PackageStorage for MemoryStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        if self.fail_uploads {
            return Err(Error::Storage(format!("upload rejected: {path}")));
        }
        self.objects.lock().await.insert(
            path.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn create_signed_url(&self, path: &str, ttl_secs: u64) -> Result<String> {
        if self.fail_signing {
            return Err(Error::Storage(format!("signing rejected: {path}")));
        }
        if !self.objects.lock().await.contains_key(path) {
            return Err(Error::Storage(format!("no object at {path}")));
        }
        Ok(format!("memory://{path}?expires_in={ttl_secs}"))
    }
}

#[async_trait]
impl<T: PackageStorage + ?Sized> PackageStorage for Arc<T> {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        (**self).upload(path, bytes, content_type).await
    }

    async fn create_signed_url(&self, path: &str, ttl_secs: u64) -> Result<String> {
        (**self).create_signed_url(path, ttl_secs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    #[tokio::test]
    async fn test_local_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).with_clock(FixedClock::at_timestamp(1_000));
        storage
            .upload("scorm-exports/org/a b.zip", b"PK".to_vec(), "application/zip")
            .await
            .unwrap();
        let stored = std::fs::read(dir.path().join("scorm-exports/org/a b.zip")).unwrap();
        assert_eq!(stored, b"PK");

        let url = storage
            .create_signed_url("scorm-exports/org/a b.zip", 3600)
            .await
            .unwrap();
        assert!(url.starts_with("file:///"));
        assert!(url.ends_with("/scorm-exports/org/a%20b.zip?expires=4600"));
    }

    #[tokio::test]
    async fn test_local_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        for path in ["../x.zip", "/etc/x.zip", "a/../../x.zip", ""] {
            assert!(matches!(
                storage.upload(path, Vec::new(), "application/zip").await,
                Err(Error::Storage(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_local_signing_requires_object() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        assert!(storage.create_signed_url("missing.zip", 60).await.is_err());
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();
        storage.upload("p/x.zip", vec![1, 2], "application/zip").await.unwrap();
        assert_eq!(storage.get("p/x.zip").await.unwrap().content_type, "application/zip");
        assert_eq!(
            storage.create_signed_url("p/x.zip", 60).await.unwrap(),
            "memory://p/x.zip?expires_in=60"
        );
        assert!(MemoryStorage::failing_uploads().upload("p", vec![], "x").await.is_err());
    }
}
