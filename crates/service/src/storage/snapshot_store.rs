use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::{fs, sync::RwLock};
use tracing::warn;

use super::snapshot::Snapshot;
use crate::errors::ServiceError;

/// Load-time policy for the snapshot store.
#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
    /// Substitute the default empty snapshot when the backing file cannot be
    /// parsed, instead of refusing to start. A missing file always starts
    /// empty regardless of this flag.
    pub default_on_corrupt: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { default_on_corrupt: true }
    }
}

/// JSON file-backed store for the application [`Snapshot`].
///
/// The snapshot is held fully materialized behind an `RwLock` and the whole
/// file is rewritten on every mutation; there is no delta or append log.
/// [`SnapshotStore::update`] keeps the write lock across the mutate-and-save
/// cycle, so only one read-modify-write can be in flight at a time even on a
/// multi-threaded runtime.
#[derive(Clone)]
pub struct SnapshotStore {
    inner: Arc<RwLock<Snapshot>>,
    file_path: PathBuf,
}

impl SnapshotStore {
    /// Open the store at `path`, creating the containing directory if needed.
    ///
    /// A missing backing file yields the default empty snapshot, which is
    /// materialized to disk immediately; an unparsable file is governed by
    /// [`StoreOptions::default_on_corrupt`].
    pub async fn open<P: Into<PathBuf>>(path: P, opts: StoreOptions) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let snapshot = match fs::read(&file_path).await {
            Ok(bytes) => match serde_json::from_slice::<Snapshot>(&bytes) {
                Ok(snapshot) => snapshot,
                Err(e) if opts.default_on_corrupt => {
                    warn!(path = %file_path.display(), error = %e, "store file unreadable; starting from empty snapshot");
                    Snapshot::default()
                }
                Err(e) => return Err(ServiceError::Store(e.to_string())),
            },
            Err(_) => Snapshot::default(),
        };

        let store = Self { inner: Arc::new(RwLock::new(snapshot)), file_path };
        store.save().await?;
        Ok(Arc::new(store))
    }

    /// Run `f` against the current snapshot under a read lock.
    pub async fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&Snapshot) -> T,
    {
        let snapshot = self.inner.read().await;
        f(&snapshot)
    }

    /// Mutate the snapshot and persist it as one critical section.
    ///
    /// The write lock is held until the file rewrite completes, so concurrent
    /// handlers serialize on the whole read-mutate-save cycle. If `f` returns
    /// an error the snapshot is not persisted; if the write itself fails the
    /// error propagates to the caller and no retry is attempted.
    pub async fn update<F, T>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut Snapshot) -> Result<T, ServiceError>,
    {
        let mut snapshot = self.inner.write().await;
        let out = f(&mut snapshot)?;
        persist(&self.file_path, &snapshot).await?;
        Ok(out)
    }

    /// Serialize the full snapshot and replace the backing file.
    pub async fn save(&self) -> Result<(), ServiceError> {
        let snapshot = self.inner.read().await;
        persist(&self.file_path, &snapshot).await
    }

    /// Path of the backing file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

/// Full-file rewrite, staged through a sibling temp file. The rename is
/// atomic on the same filesystem, so a crash mid-write never leaves a
/// truncated store behind.
async fn persist(path: &Path, snapshot: &Snapshot) -> Result<(), ServiceError> {
    let data = serde_json::to_vec_pretty(snapshot).map_err(|e| ServiceError::Store(e.to_string()))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &data).await.map_err(|e| ServiceError::Store(e.to_string()))?;
    fs::rename(&tmp, path).await.map_err(|e| ServiceError::Store(e.to_string()))?;
    Ok(())
}
