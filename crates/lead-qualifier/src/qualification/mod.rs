//! Lead qualification: questionnaire, weight table, scoring engine, classification, and the
//! service and HTTP surface that persist qualified leads.

pub mod answers;
pub mod classification;
pub mod questionnaire;
pub mod records;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;
pub mod weights;

#[cfg(test)]
mod tests;

pub use answers::{AnswerError, AnswerPayload, LeadAnswers};
pub use classification::{classify, QualificationStatus, DISQUALIFIED_BELOW, QUALIFIED_THRESHOLD};
pub use questionnaire::{
    questionnaire_view, Authority, BudgetRange, Category, EntityType, IndustryExperience,
    OptionPreview, QuestionDefinition, QuestionOption, QuestionView, Specialization, Subcategory,
    Timeline, QUESTIONNAIRE,
};
pub use records::{
    QualificationId, QualificationRecord, QualificationRepository, QualificationSubmission,
    QualificationSummary, RepositoryError,
};
pub use router::{qualification_router, ScoreResponse};
pub use scoring::{authority_bonus, calculate_lead_score, timeline_bonus, LeadScore};
pub use service::{LeadQualificationService, QualificationServiceError, SubmissionError};
pub use store::{
    FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, StoreError, WeightRepository,
    WeightStoreError, WEIGHTS_KEY,
};
pub use weights::{
    BusinessFitWeights, CapabilityWeights, EngagementWeights, OptionWeights, ScoringMode,
    WeightConfig, WeightError, WeightKey, MAX_OPTION_POINTS,
};
