use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::questionnaire::{
    Authority, BudgetRange, EntityType, IndustryExperience, QuestionOption, Specialization,
    Subcategory, Timeline,
};
use super::weights::ScoringMode;

/// One answer per question, addressed by name rather than by position.
///
/// Unanswered questions are `None`; they contribute no points and no multiplier bonus, which is
/// how the live preview behaves while a questionnaire is still being filled in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LeadAnswers {
    #[serde(default)]
    pub budget: Option<BudgetRange>,
    #[serde(default)]
    pub industry_experience: Option<IndustryExperience>,
    #[serde(default)]
    pub specialization: Option<Specialization>,
    #[serde(default)]
    pub entity_type: Option<EntityType>,
    #[serde(default)]
    pub timeline: Option<Timeline>,
    #[serde(default)]
    pub authority: Option<Authority>,
}

impl LeadAnswers {
    /// Convert the legacy index-to-label form.
    ///
    /// Index 0 is budget, 1 industry experience, 2 specialization, 3 entity type, 4 timeline and
    /// 5 authority. Subcategory keys (`"entityType"`, ...) are accepted in place of an index. In
    /// lenient mode unknown keys and labels are skipped; strict mode rejects them.
    pub fn from_positional<K, V>(
        answers: impl IntoIterator<Item = (K, V)>,
        mode: ScoringMode,
    ) -> Result<Self, AnswerError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut parsed = LeadAnswers::default();

        for (key, label) in answers {
            let key = key.as_ref().trim();
            let label = label.as_ref();

            let Some(subcategory) = key
                .parse::<usize>()
                .ok()
                .and_then(Subcategory::from_question_index)
                .or_else(|| Subcategory::from_key(key))
            else {
                if mode == ScoringMode::Strict {
                    return Err(AnswerError::UnknownQuestion(key.to_string()));
                }
                continue;
            };

            if !parsed.assign(subcategory, label) && mode == ScoringMode::Strict {
                return Err(AnswerError::UnknownOption {
                    subcategory,
                    label: label.to_string(),
                });
            }
        }

        Ok(parsed)
    }

    /// Render back into the legacy index-to-label form, omitting unanswered questions.
    pub fn to_positional(&self) -> BTreeMap<usize, &'static str> {
        let entries = [
            (Subcategory::Budget, self.budget.map(QuestionOption::label)),
            (
                Subcategory::IndustryExperience,
                self.industry_experience.map(QuestionOption::label),
            ),
            (
                Subcategory::Specialization,
                self.specialization.map(QuestionOption::label),
            ),
            (
                Subcategory::EntityType,
                self.entity_type.map(QuestionOption::label),
            ),
            (Subcategory::Timeline, self.timeline.map(QuestionOption::label)),
            (Subcategory::Authority, self.authority.map(QuestionOption::label)),
        ];

        entries
            .into_iter()
            .filter_map(|(subcategory, label)| {
                label.map(|label| (subcategory.question_index(), label))
            })
            .collect()
    }

    pub fn answered(&self) -> usize {
        self.to_positional().len()
    }

    pub fn is_complete(&self) -> bool {
        self.answered() == Subcategory::ALL.len()
    }

    fn assign(&mut self, subcategory: Subcategory, label: &str) -> bool {
        match subcategory {
            Subcategory::Budget => assign_option(&mut self.budget, label),
            Subcategory::IndustryExperience => assign_option(&mut self.industry_experience, label),
            Subcategory::Specialization => assign_option(&mut self.specialization, label),
            Subcategory::EntityType => assign_option(&mut self.entity_type, label),
            Subcategory::Timeline => assign_option(&mut self.timeline, label),
            Subcategory::Authority => assign_option(&mut self.authority, label),
        }
    }
}

fn assign_option<O: QuestionOption>(slot: &mut Option<O>, label: &str) -> bool {
    match O::from_label(label) {
        Some(option) => {
            *slot = Some(option);
            true
        }
        None => false,
    }
}

/// Answers as accepted from callers: named fields, or the legacy `{"0": "...", ...}` map.
///
/// Named answers must use known labels. Anything else falls through to the positional form and is
/// resolved under the service's scoring mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerPayload {
    Named(LeadAnswers),
    Positional(BTreeMap<String, String>),
}

impl Default for AnswerPayload {
    fn default() -> Self {
        Self::Named(LeadAnswers::default())
    }
}

impl From<LeadAnswers> for AnswerPayload {
    fn from(answers: LeadAnswers) -> Self {
        Self::Named(answers)
    }
}

impl AnswerPayload {
    pub fn into_answers(self, mode: ScoringMode) -> Result<LeadAnswers, AnswerError> {
        match self {
            Self::Named(answers) => Ok(answers),
            Self::Positional(map) => LeadAnswers::from_positional(map, mode),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    #[error("'{0}' is not a question (expected an index 0-5 or a subcategory key)")]
    UnknownQuestion(String),
    #[error("'{label}' is not an option of {subcategory:?}")]
    UnknownOption {
        subcategory: Subcategory,
        label: String,
    },
}
