use {
    crate::error::StoreError,
    std::{
        fs,
        path::{Path, PathBuf},
        sync::{
            atomic::{AtomicBool, AtomicUsize, Ordering},
            Arc, Mutex,
        },
    },
};

/// Durable storage for the sent-store snapshot
///
/// The snapshot is an opaque JSON document; backends only move bytes.
/// Every save rewrites the whole document.
pub trait SnapshotBackend: Send {
    /// Read the snapshot. `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Replace the snapshot with `contents`
    fn save(&mut self, contents: &str) -> Result<(), StoreError>;

    /// Copy the current snapshot aside, returning where it went.
    /// `Ok(None)` when there is nothing to back up or the backend can't.
    fn backup(&self, _stamp: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    /// Human-readable location for logs and stats
    fn location(&self) -> String;
}

/// Snapshot stored as a pretty-printed JSON file
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_path(&self, stamp: &str) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "snapshot".to_string());
        self.path.with_file_name(format!("{}_backup_{}.json", stem, stamp))
    }
}

impl SnapshotBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<String>, StoreError> {
        if !self.path.exists() {
            log::info!("No existing snapshot file found: {}", self.path.display());
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)?;
        Ok(Some(json))
    }

    fn save(&mut self, contents: &str) -> Result<(), StoreError> {
        fs::write(&self.path, contents)?;
        log::debug!("Saved snapshot to {}", self.path.display());
        Ok(())
    }

    fn backup(&self, stamp: &str) -> Result<Option<String>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let target = self.backup_path(stamp);
        fs::copy(&self.path, &target)?;
        Ok(Some(target.display().to_string()))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory backend
///
/// Clones share the same contents, so a test can keep a handle and inspect
/// what the store wrote.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    contents: Arc<Mutex<Option<String>>>,
    saves: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        let backend = Self::default();
        *backend.lock() = Some(contents.into());
        backend
    }

    /// Current snapshot contents
    pub fn contents(&self) -> Option<String> {
        self.lock().clone()
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Make subsequent saves fail with an IO error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.contents.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SnapshotBackend for MemoryBackend {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.contents())
    }

    fn save(&mut self, contents: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "writes disabled",
            )));
        }

        *self.lock() = Some(contents.to_string());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
