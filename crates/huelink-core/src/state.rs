// ── Persisted gateway state ──
//
// The credential and the favorite set are the only durable state. They live
// in one JSON document behind the `StateStore` trait; `SharedState` owns the
// in-memory copy. Other processes may share the file, so every write reloads
// the document under the store's lock first.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use fs4::fs_std::FileExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::CoreError;

// ── Document ─────────────────────────────────────────────────────────

/// The persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub favorite_rooms: FavoriteRooms,
    /// Unix seconds of the last save.
    #[serde(default)]
    pub updated_at: Option<i64>,
}

impl PersistedState {
    /// The stored credential, trimmed; blank counts as absent.
    pub fn username(&self) -> Option<&str> {
        self.username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

/// `favoriteRooms` as found on disk.
///
/// Anything that is not a list of strings is kept verbatim as `Malformed`
/// so that loading never fails; the favorites store repairs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FavoriteRooms {
    List(Vec<String>),
    Malformed(Value),
}

impl Default for FavoriteRooms {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

// ── Store abstraction ────────────────────────────────────────────────

/// Load/save boundary for [`PersistedState`].
///
/// Implementations may block; `SharedState` only calls them from the
/// blocking thread pool.
pub trait StateStore: Send + Sync {
    /// Best effort: a missing or unreadable document yields defaults.
    fn load(&self) -> PersistedState;

    /// Replace the whole document.
    fn save(&self, state: &PersistedState) -> Result<(), CoreError>;

    /// Exclusive access for one load/save cycle, released on drop. Stores
    /// that no other process can reach need none.
    fn lock(&self) -> Result<Option<StoreLock>, CoreError> {
        Ok(None)
    }
}

/// An advisory lock on a store's lock file.
#[derive(Debug)]
pub struct StoreLock {
    _file: File,
}

/// JSON file store with write-to-temp-then-rename saves.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    fn lock_path(&self) -> PathBuf {
        self.sibling(".lock")
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn create_parent(&self) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> PersistedState {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no state file yet");
                return PersistedState::default();
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "state file unreadable, using defaults"
                );
                return PersistedState::default();
            }
        };
        serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!(
                path = %self.path.display(),
                error = %e,
                "state file malformed, using defaults"
            );
            PersistedState::default()
        })
    }

    fn save(&self, state: &PersistedState) -> Result<(), CoreError> {
        self.create_parent()?;
        let json = serde_json::to_string_pretty(state)?;
        let temp = self.temp_path();
        std::fs::write(&temp, json)?;
        std::fs::rename(&temp, &self.path)?;
        debug!(path = %self.path.display(), "state saved");
        Ok(())
    }

    fn lock(&self) -> Result<Option<StoreLock>, CoreError> {
        self.create_parent()?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        FileExt::lock_exclusive(&file)?;
        Ok(Some(StoreLock { _file: file }))
    }
}

/// In-memory store holding the serialized document.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: StdMutex<Option<String>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an arbitrary JSON document, as if read from disk.
    pub fn with_document(document: &Value) -> Self {
        Self {
            document: StdMutex::new(Some(document.to_string())),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The last saved document, parsed.
    pub fn document(&self) -> Option<Value> {
        let guard = self.document.lock().ok()?;
        guard.as_deref().and_then(|s| serde_json::from_str(s).ok())
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> PersistedState {
        self.document
            .lock()
            .ok()
            .and_then(|guard| guard.as_deref().and_then(|s| serde_json::from_str(s).ok()))
            .unwrap_or_default()
    }

    fn save(&self, state: &PersistedState) -> Result<(), CoreError> {
        let json = serde_json::to_string(state)?;
        let mut guard = self.document.lock().map_err(|_| CoreError::Persistence {
            message: "memory store lock poisoned".into(),
        })?;
        *guard = Some(json);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ── SharedState ──────────────────────────────────────────────────────

/// Owner of the in-memory copy of the persisted state.
///
/// Every mutation runs under the in-process mutex and the store's lock:
/// reload, mutate, stamp, save, and only then publish. A failed save leaves
/// both memory and disk as they were. Reads are served from memory and may
/// lag behind writes made by another process until the next update.
pub struct SharedState {
    store: Arc<dyn StateStore>,
    state: Mutex<PersistedState>,
}

impl SharedState {
    /// Load the initial state from `store`.
    pub fn load(store: Arc<dyn StateStore>) -> Self {
        let state = store.load();
        Self {
            store,
            state: Mutex::new(state),
        }
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> PersistedState {
        self.state.lock().await.clone()
    }

    /// Read without copying the whole document.
    pub async fn read<R>(&self, f: impl FnOnce(&PersistedState) -> R) -> R {
        f(&*self.state.lock().await)
    }

    /// Read-modify-write. `f` returns its result plus whether anything
    /// changed; unchanged state is not written back.
    pub async fn update<R>(
        &self,
        f: impl FnOnce(&mut PersistedState) -> (R, bool),
    ) -> Result<R, CoreError> {
        let mut guard = self.state.lock().await;

        let store = Arc::clone(&self.store);
        let (lock, current) = blocking(move || {
            let lock = store.lock()?;
            Ok((lock, store.load()))
        })
        .await?;

        let mut next = current.clone();
        let (result, changed) = f(&mut next);
        if !changed {
            drop(lock);
            *guard = current;
            return Ok(result);
        }

        next.updated_at = Some(Utc::now().timestamp());
        let store = Arc::clone(&self.store);
        *guard = blocking(move || {
            store.save(&next)?;
            drop(lock);
            Ok(next)
        })
        .await?;
        Ok(result)
    }
}

async fn blocking<T: Send + 'static>(
    f: impl FnOnce() -> Result<T, CoreError> + Send + 'static,
) -> Result<T, CoreError> {
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CoreError::Persistence {
            message: format!("state task failed: {e}"),
        })?
}
