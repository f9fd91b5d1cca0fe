//! Key-value option storage.
//!
//! Settings the admin edits at runtime (currently only `exclude_tags`)
//! live here rather than in `shopfeed.toml`, so they can change without
//! touching the config file.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Options file name inside the state directory.
pub const OPTIONS_FILE: &str = "options.json";

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("IO error when accessing options `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid options file `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),
}

/// String options keyed by name.
pub trait OptionStore: Send + Sync {
    /// Value for `key`, `None` when never set.
    fn get(&self, key: &str) -> Result<Option<String>, OptionsError>;

    fn set(&self, key: &str, value: &str) -> Result<(), OptionsError>;

    /// Value for `key`, or `default` when unset.
    fn get_or(&self, key: &str, default: &str) -> Result<String, OptionsError> {
        Ok(self.get(key)?.unwrap_or_else(|| default.to_string()))
    }
}

// ============================================================================
// File store
// ============================================================================

/// Options persisted as a JSON object.
#[derive(Debug)]
pub struct FileOptionStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileOptionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    /// Store at `<state_dir>/options.json`.
    pub fn in_dir(state_dir: &Path) -> Self {
        Self::new(state_dir.join(OPTIONS_FILE))
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, OptionsError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let json =
            fs::read_to_string(&self.path).map_err(|e| OptionsError::Io(self.path.clone(), e))?;
        serde_json::from_str(&json).map_err(|e| OptionsError::Json(self.path.clone(), e))
    }
}

impl OptionStore for FileOptionStore {
    fn get(&self, key: &str) -> Result<Option<String>, OptionsError> {
        let _guard = self.lock.read();
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), OptionsError> {
        let _guard = self.lock.write();
        let mut options = self.read_all()?;
        options.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| OptionsError::Io(parent.to_path_buf(), e))?;
        }
        let json = serde_json::to_string_pretty(&options)
            .map_err(|e| OptionsError::Json(self.path.clone(), e))?;
        fs::write(&self.path, json).map_err(|e| OptionsError::Io(self.path.clone(), e))?;

        crate::debug!("options"; "set {} = {:?}", key, value);
        Ok(())
    }
}

// ============================================================================
// Memory store (tests)
// ============================================================================

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryOptionStore {
    values: RwLock<BTreeMap<String, String>>,
}

#[cfg(test)]
impl MemoryOptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.values.write().insert(key.to_string(), value.to_string());
        store
    }
}

#[cfg(test)]
impl OptionStore for MemoryOptionStore {
    fn get(&self, key: &str) -> Result<Option<String>, OptionsError> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), OptionsError> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
