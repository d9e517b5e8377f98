use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::answers::{AnswerPayload, LeadAnswers};
use super::classification::QualificationStatus;
use super::scoring::LeadScore;

/// Identifier wrapper for recorded qualifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualificationId(pub String);

/// What the questionnaire hands over when a lead is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualificationSubmission {
    pub company: String,
    /// Named or positional; resolved under the service's scoring mode on submission.
    #[serde(default)]
    pub answers: AnswerPayload,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A scored and classified lead as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualificationRecord {
    pub id: QualificationId,
    pub company: String,
    pub status: QualificationStatus,
    pub date: DateTime<Utc>,
    pub points: u32,
    pub score: LeadScore,
    pub answers: LeadAnswers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl QualificationRecord {
    /// Build a record whose status and points are derived from `score`.
    pub fn new(
        id: QualificationId,
        company: String,
        answers: LeadAnswers,
        score: LeadScore,
        notes: Option<String>,
        date: DateTime<Utc>,
    ) -> Self {
        let status = score.status();
        Self {
            id,
            company,
            status,
            date,
            points: status.points_awarded(),
            score,
            answers,
            notes,
        }
    }
}

/// Storage abstraction for qualification records.
pub trait QualificationRepository: Send + Sync {
    fn insert(&self, record: QualificationRecord)
        -> Result<QualificationRecord, RepositoryError>;
    fn fetch(&self, id: &QualificationId) -> Result<Option<QualificationRecord>, RepositoryError>;
    /// Most recent records first.
    fn recent(&self, limit: usize) -> Result<Vec<QualificationRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Aggregate view over recorded qualifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualificationSummary {
    pub total: usize,
    pub qualified: usize,
    pub in_progress: usize,
    pub disqualified: usize,
    pub points: u32,
    /// Share of qualified records as a whole percentage.
    pub conversion_rate_pct: u32,
}

impl QualificationSummary {
    pub fn from_records(records: &[QualificationRecord]) -> Self {
        let mut summary = QualificationSummary {
            total: records.len(),
            ..QualificationSummary::default()
        };

        for record in records {
            summary.points += record.points;
            match record.status {
                QualificationStatus::Qualified => summary.qualified += 1,
                QualificationStatus::InProgress => summary.in_progress += 1,
                QualificationStatus::Disqualified => summary.disqualified += 1,
            }
        }

        if summary.total > 0 {
            let rate = summary.qualified as f64 / summary.total as f64 * 100.0;
            summary.conversion_rate_pct = rate.round() as u32;
        }

        summary
    }
}
