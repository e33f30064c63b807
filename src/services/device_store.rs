//! Persistence of the installation's [`DeviceProfile`].

use crate::model::{default_device_name, DeviceProfile};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("device store I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("device store encoding: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no data directory on this platform")]
    NoDataDir,
}

pub trait DeviceStore: Send + Sync {
    fn load(&self) -> Result<Option<DeviceProfile>, StoreError>;

    fn save(&self, profile: &DeviceProfile) -> Result<(), StoreError>;
}

/// Reads the stored profile, creating and saving a new one on first run.
///
/// An unreadable record is replaced rather than reported.
pub fn load_or_create(store: &dyn DeviceStore) -> Result<DeviceProfile, StoreError> {
    match store.load() {
        Ok(Some(profile)) => return Ok(profile),
        Ok(None) => {}
        Err(StoreError::Json(e)) => warn!(error = %e, "Discarding unreadable device record"),
        Err(e) => return Err(e),
    }
    let profile = DeviceProfile::generate(&default_device_name());
    store.save(&profile)?;
    info!(device_id = %profile.device_id, "Created device profile");
    Ok(profile)
}

/// JSON file, by default `<data_dir>/neon-trace/device.json`.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Result<Self, StoreError> {
        let dir = dirs::data_dir().ok_or(StoreError::NoDataDir)?;
        Ok(Self::new(dir.join("neon-trace").join("device.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DeviceStore for JsonFileStore {
    fn load(&self) -> Result<Option<DeviceProfile>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, profile: &DeviceProfile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(profile)?)?;
        Ok(())
    }
}

/// In-process store, for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    slot: Mutex<Option<DeviceProfile>>,
}

impl MemoryStore {
    pub fn with_profile(profile: DeviceProfile) -> Self {
        Self {
            slot: Mutex::new(Some(profile)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<DeviceProfile>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DeviceStore for MemoryStore {
    fn load(&self) -> Result<Option<DeviceProfile>, StoreError> {
        Ok(self.slot().clone())
    }

    fn save(&self, profile: &DeviceProfile) -> Result<(), StoreError> {
        *self.slot() = Some(profile.clone());
        Ok(())
    }
}
