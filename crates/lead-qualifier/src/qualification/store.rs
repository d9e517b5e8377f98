use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::weights::{ScoringMode, WeightConfig, WeightError};

/// Record name under which the weight table is persisted.
pub const WEIGHTS_KEY: &str = "qualificationWeights";

/// Durable string-valued key-value storage. A single `get` or `set` must be atomic.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
    #[error("storage io failure: {0}")]
    Io(#[from] io::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Process-local store, used when no storage directory is configured and in tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key inside a directory.
///
/// Each write goes to its own uniquely named temporary file in the same directory, which is then
/// renamed over the record. Readers see either the previous value or the new one, even when
/// several processes share the directory.
#[derive(Debug)]
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.record_path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.record_path(key)?;
        fs::create_dir_all(&self.root)?;

        let mut temp = NamedTempFile::new_in(&self.root)?;
        temp.write_all(value.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&path).map_err(|err| StoreError::Io(err.error))?;
        debug!(path = %path.display(), "persisted record");
        Ok(())
    }
}

/// Sole reader and writer of the persisted weight table.
pub struct WeightRepository<S> {
    store: Arc<S>,
    mode: ScoringMode,
}

impl<S> Clone for WeightRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            mode: self.mode,
        }
    }
}

impl<S: KeyValueStore> WeightRepository<S> {
    pub fn new(store: Arc<S>, mode: ScoringMode) -> Self {
        Self { store, mode }
    }

    pub fn mode(&self) -> ScoringMode {
        self.mode
    }

    /// The persisted table, or the built-in default when it is absent or unusable. Never fails.
    ///
    /// Lenient reads drop option labels that match nothing and keep the rest of the table; strict
    /// reads treat them as an unusable record.
    pub fn get_weights(&self) -> WeightConfig {
        let raw = match self.store.get(WEIGHTS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return WeightConfig::default(),
            Err(err) => {
                warn!(error = %err, "weight store unreadable; using default weights");
                return WeightConfig::default();
            }
        };

        let mut weights = match serde_json::from_str::<WeightConfig>(&raw) {
            Ok(weights) => weights,
            Err(err) => {
                warn!(error = %err, "persisted weights malformed; using default weights");
                return WeightConfig::default();
            }
        };

        if self.mode == ScoringMode::Lenient {
            for (subcategory, label) in weights.discard_unrecognized() {
                warn!(
                    subcategory = subcategory.key(),
                    label = %label,
                    "ignoring unrecognized persisted weight option"
                );
            }
        }

        if let Err(err) = weights.validate(self.mode) {
            warn!(
                error = %err,
                mode = self.mode.label(),
                "persisted weights rejected; using default weights"
            );
            return WeightConfig::default();
        }

        weights
    }

    /// Persist `weights` verbatim, replacing whatever was stored.
    pub fn update_weights(&self, weights: &WeightConfig) -> Result<(), WeightStoreError> {
        weights.validate(self.mode)?;
        let encoded = serde_json::to_string(weights)?;
        self.store.set(WEIGHTS_KEY, &encoded)?;
        Ok(())
    }

    /// Persist and return the built-in default, discarding any customization.
    pub fn reset_weights(&self) -> Result<WeightConfig, WeightStoreError> {
        let defaults = WeightConfig::default();
        let encoded = serde_json::to_string(&defaults)?;
        self.store.set(WEIGHTS_KEY, &encoded)?;
        Ok(defaults)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WeightStoreError {
    #[error(transparent)]
    Invalid(#[from] WeightError),
    #[error("failed to encode weights: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}
