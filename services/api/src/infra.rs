use lead_qualifier::config::{AppConfig, StorageConfig};
use lead_qualifier::qualification::{
    FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, LeadQualificationService,
    QualificationId, QualificationRecord, QualificationRepository, RepositoryError, StoreError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type ApiService = LeadQualificationService<WeightBackend, InMemoryQualificationRepository>;

/// Qualification records kept for the lifetime of the process, newest last.
#[derive(Default, Clone)]
pub(crate) struct InMemoryQualificationRepository {
    records: Arc<Mutex<Vec<QualificationRecord>>>,
}

impl InMemoryQualificationRepository {
    fn lock(&self) -> Result<MutexGuard<'_, Vec<QualificationRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl QualificationRepository for InMemoryQualificationRepository {
    fn insert(&self, record: QualificationRecord) -> Result<QualificationRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &QualificationId) -> Result<Option<QualificationRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<QualificationRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }
}

/// Weight storage selected by configuration: a directory on disk, or process memory.
pub(crate) enum WeightBackend {
    Memory(InMemoryKeyValueStore),
    File(FileKeyValueStore),
}

impl WeightBackend {
    pub(crate) fn from_config(storage: &StorageConfig) -> Self {
        match &storage.weights_dir {
            Some(dir) => Self::File(FileKeyValueStore::new(dir.clone())),
            None => Self::Memory(InMemoryKeyValueStore::default()),
        }
    }
}

impl KeyValueStore for WeightBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            Self::Memory(store) => store.get(key),
            Self::File(store) => store.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.set(key, value),
            Self::File(store) => store.set(key, value),
        }
    }
}

/// Apply a command-line storage override on top of the loaded configuration.
pub(crate) fn override_weights_dir(config: &mut AppConfig, weights_dir: Option<PathBuf>) {
    if let Some(dir) = weights_dir {
        config.storage.weights_dir = Some(dir);
    }
}

pub(crate) fn build_service(config: &AppConfig) -> Arc<ApiService> {
    let backend = Arc::new(WeightBackend::from_config(&config.storage));
    let records = Arc::new(InMemoryQualificationRepository::default());
    Arc::new(LeadQualificationService::new(
        backend,
        records,
        config.scoring.mode,
    ))
}
