use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use log::warn;
use thiserror::Error;

use crate::config::{validate_lap_distance, UserProfile, DEFAULT_LAP_DISTANCE};
use crate::session::Session;

pub const SESSION_KEY: &str = "laptrack_session";
pub const DISTANCE_KEY: &str = "laptrack_distance";
pub const PROFILE_KEY: &str = "laptrack_profile";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid stored record: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Opaque key-value persistence owned by the host
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new() -> Self {
        Self::with_dir(Self::default_dir())
    }

    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Platform data directory, falling back to `~/.local/state/laptrack`
    /// and finally the working directory.
    pub fn default_dir() -> PathBuf {
        if let Some(pd) = ProjectDirs::from("", "", "laptrack") {
            pd.data_local_dir().to_path_buf()
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("laptrack")
        } else {
            PathBuf::from(".laptrack")
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)?) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(path, value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)?) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Process-local store for tests and headless hosts
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Load the stored session, paused. `None` when nothing usable is stored.
pub fn load_session(store: &dyn KeyValueStore) -> Option<Session> {
    let bytes = match store.get(SESSION_KEY) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return None,
        Err(e) => {
            warn!("could not read stored session: {e}");
            return None;
        }
    };
    match Session::from_json(&bytes) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!("discarding unreadable stored session: {e}");
            None
        }
    }
}

pub fn save_session(store: &dyn KeyValueStore, session: &Session) -> Result<()> {
    store.set(SESSION_KEY, &session.to_json()?)
}

pub fn clear_session(store: &dyn KeyValueStore) -> Result<()> {
    store.remove(SESSION_KEY)
}

/// Stored lap distance preference, or the default when absent or invalid
pub fn load_lap_distance(store: &dyn KeyValueStore) -> f64 {
    let stored = store
        .get(DISTANCE_KEY)
        .map_err(|e| warn!("could not read lap distance: {e}"))
        .ok()
        .flatten()
        .and_then(|bytes| serde_json::from_slice::<f64>(&bytes).ok());

    match stored.map(validate_lap_distance) {
        Some(Ok(distance)) => distance,
        Some(Err(e)) => {
            warn!("ignoring stored lap distance: {e}");
            DEFAULT_LAP_DISTANCE
        }
        None => DEFAULT_LAP_DISTANCE,
    }
}

pub fn save_lap_distance(store: &dyn KeyValueStore, lap_distance: f64) -> Result<()> {
    store.set(DISTANCE_KEY, &serde_json::to_vec(&lap_distance)?)
}

pub fn load_profile(store: &dyn KeyValueStore) -> Option<UserProfile> {
    let bytes = store
        .get(PROFILE_KEY)
        .map_err(|e| warn!("could not read profile: {e}"))
        .ok()
        .flatten()?;
    serde_json::from_slice(&bytes)
        .map_err(|e| warn!("discarding unreadable profile: {e}"))
        .ok()
}

pub fn save_profile(store: &dyn KeyValueStore, profile: &UserProfile) -> Result<()> {
    store.set(PROFILE_KEY, &serde_json::to_vec(profile)?)
}
