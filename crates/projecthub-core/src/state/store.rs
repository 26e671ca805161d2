use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::PersistedState;
use crate::error::{ConfigError, CoreError, Result};
use crate::storage::data_dir;

/// Storage key of the persisted UI state.
pub const STORAGE_KEY: &str = "projecthub-storage";

/// Where [`PersistedState`] lives between runs.
pub trait StateStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<PersistedState>>;
    fn save(&mut self, state: &PersistedState) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

/// On-disk envelope, `{"state": {...}, "version": 0}`.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    state: PersistedState,
    #[serde(default)]
    version: u32,
}

/// JSON file named after [`STORAGE_KEY`].
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Store in the application data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be resolved.
    pub fn open() -> Result<Self> {
        Ok(Self::at(data_dir()?.join(format!("{STORAGE_KEY}.json"))))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<Option<PersistedState>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let envelope: Envelope = serde_json::from_str(&content).map_err(|e| {
            CoreError::Config(ConfigError::LoadFailed {
                path: self.path.clone(),
                message: e.to_string(),
            })
        })?;
        Ok(Some(envelope.state))
    }

    fn save(&mut self, state: &PersistedState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let envelope = Envelope {
            state: state.clone(),
            version: 0,
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&envelope)?)?;
        log::debug!("saved UI state to {}", self.path.display());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store, for tests and headless use.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    saved: Option<PersistedState>,
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<Option<PersistedState>> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, state: &PersistedState) -> Result<()> {
        self.saved = Some(state.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.saved = None;
        Ok(())
    }
}
