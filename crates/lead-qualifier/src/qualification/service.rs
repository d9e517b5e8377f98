use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::answers::{AnswerError, AnswerPayload, LeadAnswers};
use super::questionnaire::{questionnaire_view, QuestionView, Subcategory};
use super::records::{
    QualificationId, QualificationRecord, QualificationRepository, QualificationSubmission,
    QualificationSummary, RepositoryError,
};
use super::scoring::{calculate_lead_score, LeadScore};
use super::store::{KeyValueStore, WeightRepository, WeightStoreError};
use super::weights::{ScoringMode, WeightConfig};

/// Service composing the weight accessor, the scoring engine, and the record repository.
///
/// Weights are read from the store on every scoring call, so an update is visible to the very
/// next score.
pub struct LeadQualificationService<S, R> {
    weights: WeightRepository<S>,
    records: Arc<R>,
}

static QUALIFICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_qualification_id() -> QualificationId {
    let id = QUALIFICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    QualificationId(format!("lead-{id:06}"))
}

impl<S, R> LeadQualificationService<S, R>
where
    S: KeyValueStore + 'static,
    R: QualificationRepository + 'static,
{
    pub fn new(store: Arc<S>, records: Arc<R>, mode: ScoringMode) -> Self {
        Self {
            weights: WeightRepository::new(store, mode),
            records,
        }
    }

    pub fn mode(&self) -> ScoringMode {
        self.weights.mode()
    }

    pub fn weights(&self) -> WeightConfig {
        self.weights.get_weights()
    }

    pub fn update_weights(
        &self,
        weights: WeightConfig,
    ) -> Result<WeightConfig, QualificationServiceError> {
        self.weights.update_weights(&weights)?;
        info!("qualification weights replaced");
        Ok(weights)
    }

    pub fn reset_weights(&self) -> Result<WeightConfig, QualificationServiceError> {
        let defaults = self.weights.reset_weights()?;
        info!("qualification weights reset to defaults");
        Ok(defaults)
    }

    /// Change one leaf of the weight table by reading, editing, and writing back the whole table.
    ///
    /// Two editors doing this at once can lose an update.
    pub fn set_weight(
        &self,
        subcategory: Subcategory,
        option: &str,
        points: u32,
    ) -> Result<WeightConfig, QualificationServiceError> {
        let mut weights = self.weights.get_weights();
        weights
            .set_points(subcategory, option, points)
            .map_err(WeightStoreError::from)?;
        self.weights.update_weights(&weights)?;
        info!(subcategory = subcategory.key(), option, points, "qualification weight updated");
        Ok(weights)
    }

    pub fn questionnaire(&self) -> Vec<QuestionView> {
        questionnaire_view(&self.weights.get_weights())
    }

    /// Live score for the current answers against the stored weights.
    pub fn score(&self, answers: &LeadAnswers) -> LeadScore {
        let weights = self.weights.get_weights();
        calculate_lead_score(answers, &weights)
    }

    /// Convert legacy positional answers under this service's scoring mode.
    pub fn parse_positional<K, V>(
        &self,
        answers: impl IntoIterator<Item = (K, V)>,
    ) -> Result<LeadAnswers, QualificationServiceError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Ok(LeadAnswers::from_positional(answers, self.mode())?)
    }

    /// Named answers pass through; positional ones are parsed under this service's scoring mode.
    pub fn resolve_answers(
        &self,
        payload: AnswerPayload,
    ) -> Result<LeadAnswers, QualificationServiceError> {
        Ok(payload.into_answers(self.mode())?)
    }

    /// Score, classify, and persist a submitted lead.
    pub fn submit(
        &self,
        submission: QualificationSubmission,
    ) -> Result<QualificationRecord, QualificationServiceError> {
        let QualificationSubmission {
            company,
            answers,
            notes,
        } = submission;

        let company = company.trim().to_string();
        if company.is_empty() {
            return Err(SubmissionError::MissingCompany.into());
        }
        let answers = self.resolve_answers(answers)?;
        if self.mode() == ScoringMode::Strict && !answers.is_complete() {
            return Err(SubmissionError::IncompleteAnswers {
                answered: answers.answered(),
            }
            .into());
        }

        let notes = notes
            .map(|notes| notes.trim().to_string())
            .filter(|notes| !notes.is_empty());

        let score = self.score(&answers);
        let record = QualificationRecord::new(
            next_qualification_id(),
            company,
            answers,
            score,
            notes,
            Utc::now(),
        );

        let stored = self.records.insert(record)?;
        info!(
            id = %stored.id.0,
            status = stored.status.label(),
            total = stored.score.total,
            "lead qualification recorded"
        );
        Ok(stored)
    }

    pub fn get(
        &self,
        id: &QualificationId,
    ) -> Result<QualificationRecord, QualificationServiceError> {
        let record = self.records.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn recent(
        &self,
        limit: usize,
    ) -> Result<Vec<QualificationRecord>, QualificationServiceError> {
        Ok(self.records.recent(limit)?)
    }

    pub fn summary(&self) -> Result<QualificationSummary, QualificationServiceError> {
        let records = self.records.recent(usize::MAX)?;
        Ok(QualificationSummary::from_records(&records))
    }
}

/// Submission rejected before scoring.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("company name is required")]
    MissingCompany,
    #[error("all six questions must be answered ({answered} answered)")]
    IncompleteAnswers { answered: usize },
}

/// Error raised by the qualification service.
#[derive(Debug, thiserror::Error)]
pub enum QualificationServiceError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Answers(#[from] AnswerError),
    #[error(transparent)]
    Weights(#[from] WeightStoreError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
