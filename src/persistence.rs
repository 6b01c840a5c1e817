//! Snapshot persistence
//!
//! A snapshot is stored as two independent scalar items in a string key/value
//! [`Storage`]: the remaining seconds as decimal text and the phase as a JSON
//! boolean (`true` for work, `false` for break). [`FileStorage`] keeps one file
//! per key under a state directory.
//!
//! Loading is forgiving. A missing item, an unparsable item or a zero
//! countdown all count as "no snapshot", and the caller starts fresh.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::{debug, warn};

use crate::{
    error::{ClockError, Result},
    state::{Phase, Snapshot},
};

pub const REMAINING_SECONDS_KEY: &str = "remaining_seconds";
pub const WORK_PHASE_KEY: &str = "work_phase";

/// String key/value storage
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: Storage + ?Sized> Storage for Box<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }
}

/// One file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<local data dir>/session-clock`, when the platform has one
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join("session-clock"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ClockError::PersistenceUnavailable(e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// In-process storage, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|e| ClockError::StateLock(e.to_string()))
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Loads and saves [`Snapshot`]s through a [`Storage`]
#[derive(Debug)]
pub struct SnapshotStore<S> {
    storage: S,
}

impl<S: Storage> SnapshotStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        self.storage
            .set_item(REMAINING_SECONDS_KEY, &snapshot.remaining_seconds.to_string())?;
        self.storage
            .set_item(WORK_PHASE_KEY, &snapshot.phase.is_work().to_string())?;
        debug!(
            "Saved snapshot: {} phase, {}s remaining",
            snapshot.phase, snapshot.remaining_seconds
        );
        Ok(())
    }

    /// Read a snapshot; `Ok(None)` when nothing usable is stored
    pub fn load(&self) -> Result<Option<Snapshot>> {
        let remaining = self.storage.get_item(REMAINING_SECONDS_KEY)?;
        let work_phase = self.storage.get_item(WORK_PHASE_KEY)?;

        let (Some(remaining), Some(work_phase)) = (remaining, work_phase) else {
            debug!("No stored snapshot");
            return Ok(None);
        };

        let remaining_seconds = match remaining.trim().parse::<u64>() {
            Ok(0) => {
                debug!("Stored countdown is zero, ignoring snapshot");
                return Ok(None);
            }
            Ok(seconds) => seconds,
            Err(e) => {
                warn!("Ignoring unparsable stored remaining time {:?}: {}", remaining, e);
                return Ok(None);
            }
        };

        let phase = match serde_json::from_str::<bool>(work_phase.trim()) {
            Ok(true) => Phase::Work,
            Ok(false) => Phase::Break,
            Err(e) => {
                warn!("Ignoring unparsable stored phase {:?}: {}", work_phase, e);
                return Ok(None);
            }
        };

        Ok(Some(Snapshot::new(phase, remaining_seconds)))
    }

    /// Best-effort load: storage failures are logged and treated as absent
    pub fn load_or_default(&self) -> Option<Snapshot> {
        match self.load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Could not load snapshot, starting fresh: {}", e);
                None
            }
        }
    }

    /// Best-effort save: storage failures are logged and swallowed
    pub fn save_best_effort(&self, snapshot: &Snapshot) {
        if let Err(e) = self.save(snapshot) {
            warn!("Could not save snapshot: {}", e);
        }
    }
}
