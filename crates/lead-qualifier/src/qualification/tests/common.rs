use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::qualification::answers::LeadAnswers;
use crate::qualification::questionnaire::{
    Authority, BudgetRange, EntityType, IndustryExperience, Specialization, Timeline,
};
use crate::qualification::records::{
    QualificationId, QualificationRecord, QualificationRepository, QualificationSubmission,
    RepositoryError,
};
use crate::qualification::router::qualification_router;
use crate::qualification::service::LeadQualificationService;
use crate::qualification::store::{InMemoryKeyValueStore, KeyValueStore, StoreError};
use crate::qualification::weights::ScoringMode;

/// Scenario A: the strongest answer to every question.
pub(crate) fn strong_answers() -> LeadAnswers {
    LeadAnswers {
        budget: Some(BudgetRange::Over100k),
        industry_experience: Some(IndustryExperience::AdvancedFleet),
        specialization: Some(Specialization::ConstructionInfrastructure),
        entity_type: Some(EntityType::Corporation),
        timeline: Some(Timeline::Immediately),
        authority: Some(Authority::FinalDecisionMaker),
    }
}

/// Scenario B: the weakest answer to every question.
pub(crate) fn weak_answers() -> LeadAnswers {
    LeadAnswers {
        budget: Some(BudgetRange::Under10k),
        industry_experience: Some(IndustryExperience::NoExperience),
        specialization: Some(Specialization::Other),
        entity_type: Some(EntityType::NotEstablished),
        timeline: Some(Timeline::NoSpecificTimeline),
        authority: Some(Authority::Researcher),
    }
}

pub(crate) fn submission(company: &str, answers: LeadAnswers) -> QualificationSubmission {
    QualificationSubmission {
        company: company.to_string(),
        answers: answers.into(),
        notes: None,
    }
}

#[derive(Default, Clone)]
pub(crate) struct MemoryRecords {
    records: Arc<Mutex<Vec<QualificationRecord>>>,
}

impl MemoryRecords {
    pub(crate) fn len(&self) -> usize {
        self.records.lock().expect("lock").len()
    }
}

impl QualificationRepository for MemoryRecords {
    fn insert(
        &self,
        record: QualificationRecord,
    ) -> Result<QualificationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(0, record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &QualificationId) -> Result<Option<QualificationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<QualificationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.iter().take(limit).cloned().collect())
    }
}

pub(crate) struct UnavailableRecords;

impl QualificationRepository for UnavailableRecords {
    fn insert(
        &self,
        _record: QualificationRecord,
    ) -> Result<QualificationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(
        &self,
        _id: &QualificationId,
    ) -> Result<Option<QualificationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<QualificationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Store whose reads always fail and whose writes are counted and dropped.
#[derive(Default)]
pub(crate) struct BrokenStore {
    writes: Mutex<HashMap<String, usize>>,
}

impl BrokenStore {
    pub(crate) fn writes(&self, key: &str) -> usize {
        self.writes
            .lock()
            .expect("lock")
            .get(key)
            .copied()
            .unwrap_or(0)
    }
}

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("storage offline".to_string()))
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), StoreError> {
        *self
            .writes
            .lock()
            .expect("lock")
            .entry(key.to_string())
            .or_insert(0) += 1;
        Ok(())
    }
}

pub(crate) type MemoryService = LeadQualificationService<InMemoryKeyValueStore, MemoryRecords>;

pub(crate) fn build_service(
    mode: ScoringMode,
) -> (Arc<MemoryService>, InMemoryKeyValueStore, MemoryRecords) {
    let store = InMemoryKeyValueStore::default();
    let records = MemoryRecords::default();
    let service = Arc::new(LeadQualificationService::new(
        Arc::new(store.clone()),
        Arc::new(records.clone()),
        mode,
    ));
    (service, store, records)
}

pub(crate) fn router_with_service(service: Arc<MemoryService>) -> axum::Router {
    qualification_router(service)
}
