use std::collections::BTreeMap;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::questionnaire::{
    Authority, BudgetRange, EntityType, IndustryExperience, QuestionOption, Specialization,
    Subcategory, Timeline,
};

/// How out-of-contract input is treated.
///
/// Lenient mirrors the historical tool: unknown answers and missing weight entries score zero.
/// Strict rejects unknown answer labels and refuses to persist incomplete weight tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    #[default]
    Lenient,
    Strict,
}

impl ScoringMode {
    pub const fn label(self) -> &'static str {
        match self {
            ScoringMode::Lenient => "lenient",
            ScoringMode::Strict => "strict",
        }
    }
}

/// Highest point value a single option may carry.
pub const MAX_OPTION_POINTS: u32 = 100;

/// Point table for one question, keyed by option.
///
/// Serialized as a map from option label to points. Labels that match no option are kept aside
/// on read so the caller can decide whether to drop them or reject the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionWeights<O: QuestionOption> {
    points: BTreeMap<O, u32>,
    unrecognized: BTreeMap<String, u32>,
}

impl<O: QuestionOption> Default for OptionWeights<O> {
    fn default() -> Self {
        Self {
            points: BTreeMap::new(),
            unrecognized: BTreeMap::new(),
        }
    }
}

impl<O: QuestionOption> Serialize for OptionWeights<O> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.points
                .iter()
                .map(|(option, points)| (option.label(), points)),
        )
    }
}

impl<'de, O: QuestionOption> Deserialize<'de> for OptionWeights<O> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, u32>::deserialize(deserializer)?;
        let mut weights = Self::default();
        for (label, points) in raw {
            if points > MAX_OPTION_POINTS {
                return Err(de::Error::custom(format!(
                    "'{label}' carries {points} points (maximum {MAX_OPTION_POINTS})"
                )));
            }
            match O::from_label(&label) {
                Some(option) => {
                    weights.points.insert(option, points);
                }
                None => {
                    weights.unrecognized.insert(label, points);
                }
            }
        }
        Ok(weights)
    }
}

impl<O: QuestionOption> OptionWeights<O> {
    pub fn from_points(entries: impl IntoIterator<Item = (O, u32)>) -> Self {
        Self {
            points: entries.into_iter().collect(),
            unrecognized: BTreeMap::new(),
        }
    }

    pub fn get(&self, option: O) -> Option<u32> {
        self.points.get(&option).copied()
    }

    /// Points for an answer; unanswered questions and missing entries are worth zero.
    pub fn points(&self, answer: Option<O>) -> u32 {
        answer.and_then(|option| self.get(option)).unwrap_or(0)
    }

    /// Unchecked leaf write; `WeightConfig::set_points` enforces the ceiling.
    pub fn set(&mut self, option: O, points: u32) {
        self.points.insert(option, points);
    }

    pub fn remove(&mut self, option: O) -> Option<u32> {
        self.points.remove(&option)
    }

    pub fn missing(&self) -> Vec<O> {
        O::ALL
            .iter()
            .copied()
            .filter(|option| !self.points.contains_key(option))
            .collect()
    }

    fn get_label(&self, label: &str) -> Option<u32> {
        O::from_label(label).and_then(|option| self.get(option))
    }

    fn set_label(&mut self, label: &str, points: u32) -> bool {
        match O::from_label(label) {
            Some(option) => {
                self.set(option, points);
                true
            }
            None => false,
        }
    }

    fn missing_keys(&self, subcategory: Subcategory) -> Vec<WeightKey> {
        self.missing()
            .into_iter()
            .map(|option| WeightKey {
                subcategory,
                option: option.label(),
            })
            .collect()
    }

    fn unrecognized_labels(&self, subcategory: Subcategory) -> Vec<(Subcategory, String)> {
        self.unrecognized
            .keys()
            .map(|label| (subcategory, label.clone()))
            .collect()
    }

    fn excessive(&self, subcategory: Subcategory) -> Option<WeightError> {
        self.points
            .iter()
            .find(|(_, points)| **points > MAX_OPTION_POINTS)
            .map(|(option, points)| WeightError::OutOfRange {
                subcategory,
                label: option.label().to_string(),
                points: *points,
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessFitWeights {
    pub budget: OptionWeights<BudgetRange>,
    pub entity_type: OptionWeights<EntityType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityWeights {
    pub industry_experience: OptionWeights<IndustryExperience>,
    pub specialization: OptionWeights<Specialization>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementWeights {
    pub timeline: OptionWeights<Timeline>,
    pub authority: OptionWeights<Authority>,
}

/// The full tunable table of point values per category, subcategory, and option.
///
/// Older records used upper-case category keys (`BUSINESS_FIT_WEIGHTS`, ...); they are accepted
/// on read and rewritten in camelCase on the next save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightConfig {
    #[serde(alias = "BUSINESS_FIT_WEIGHTS")]
    pub business_fit: BusinessFitWeights,
    #[serde(alias = "CAPABILITY_WEIGHTS")]
    pub capability: CapabilityWeights,
    #[serde(alias = "ENGAGEMENT_WEIGHTS")]
    pub engagement: EngagementWeights,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            business_fit: BusinessFitWeights {
                budget: OptionWeights::from_points([
                    (BudgetRange::Over100k, 30),
                    (BudgetRange::From50kTo100k, 25),
                    (BudgetRange::From10kTo50k, 20),
                    (BudgetRange::Under10k, 15),
                ]),
                entity_type: OptionWeights::from_points([
                    (EntityType::Corporation, 30),
                    (EntityType::Partnership, 25),
                    (EntityType::SoleProprietorship, 20),
                    (EntityType::NotEstablished, 10),
                ]),
            },
            capability: CapabilityWeights {
                industry_experience: OptionWeights::from_points([
                    (IndustryExperience::AdvancedFleet, 30),
                    (IndustryExperience::CommercialDrones, 25),
                    (IndustryExperience::ConsumerDrones, 20),
                    (IndustryExperience::NoExperience, 10),
                ]),
                specialization: OptionWeights::from_points([
                    (Specialization::ConstructionInfrastructure, 30),
                    (Specialization::IndustrialCleaning, 30),
                    (Specialization::InspectionServices, 30),
                    (Specialization::Other, 15),
                ]),
            },
            engagement: EngagementWeights {
                timeline: OptionWeights::from_points([
                    (Timeline::Immediately, 40),
                    (Timeline::WithinThreeMonths, 35),
                    (Timeline::WithinSixMonths, 25),
                    (Timeline::NoSpecificTimeline, 15),
                ]),
                authority: OptionWeights::from_points([
                    (Authority::FinalDecisionMaker, 40),
                    (Authority::DecisionTeamMember, 35),
                    (Authority::Influencer, 25),
                    (Authority::Researcher, 15),
                ]),
            },
        }
    }
}

impl WeightConfig {
    /// A table with no entries; every answer scores zero until points are set.
    pub fn empty() -> Self {
        Self {
            business_fit: BusinessFitWeights::default(),
            capability: CapabilityWeights::default(),
            engagement: EngagementWeights::default(),
        }
    }

    /// Look up a leaf by its option label. `None` for unknown labels and missing entries.
    pub fn points_for(&self, subcategory: Subcategory, label: &str) -> Option<u32> {
        match subcategory {
            Subcategory::Budget => self.business_fit.budget.get_label(label),
            Subcategory::EntityType => self.business_fit.entity_type.get_label(label),
            Subcategory::IndustryExperience => self.capability.industry_experience.get_label(label),
            Subcategory::Specialization => self.capability.specialization.get_label(label),
            Subcategory::Timeline => self.engagement.timeline.get_label(label),
            Subcategory::Authority => self.engagement.authority.get_label(label),
        }
    }

    /// Replace one leaf value. Points above `MAX_OPTION_POINTS` are rejected.
    pub fn set_points(
        &mut self,
        subcategory: Subcategory,
        label: &str,
        points: u32,
    ) -> Result<(), WeightError> {
        if points > MAX_OPTION_POINTS {
            return Err(WeightError::OutOfRange {
                subcategory,
                label: label.to_string(),
                points,
            });
        }

        let updated = match subcategory {
            Subcategory::Budget => self.business_fit.budget.set_label(label, points),
            Subcategory::EntityType => self.business_fit.entity_type.set_label(label, points),
            Subcategory::IndustryExperience => {
                self.capability.industry_experience.set_label(label, points)
            }
            Subcategory::Specialization => self.capability.specialization.set_label(label, points),
            Subcategory::Timeline => self.engagement.timeline.set_label(label, points),
            Subcategory::Authority => self.engagement.authority.set_label(label, points),
        };

        if updated {
            Ok(())
        } else {
            Err(WeightError::UnknownOption {
                subcategory,
                label: label.to_string(),
            })
        }
    }

    /// Options without an entry, in questionnaire order.
    pub fn missing_entries(&self) -> Vec<WeightKey> {
        let mut missing = Vec::new();
        missing.extend(self.business_fit.budget.missing_keys(Subcategory::Budget));
        missing.extend(
            self.capability
                .industry_experience
                .missing_keys(Subcategory::IndustryExperience),
        );
        missing.extend(
            self.capability
                .specialization
                .missing_keys(Subcategory::Specialization),
        );
        missing.extend(
            self.business_fit
                .entity_type
                .missing_keys(Subcategory::EntityType),
        );
        missing.extend(self.engagement.timeline.missing_keys(Subcategory::Timeline));
        missing.extend(self.engagement.authority.missing_keys(Subcategory::Authority));
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_entries().is_empty()
    }

    /// Labels read from storage that match no option, in questionnaire order.
    pub fn unrecognized_entries(&self) -> Vec<(Subcategory, String)> {
        let mut unrecognized = Vec::new();
        unrecognized.extend(self.business_fit.budget.unrecognized_labels(Subcategory::Budget));
        unrecognized.extend(
            self.capability
                .industry_experience
                .unrecognized_labels(Subcategory::IndustryExperience),
        );
        unrecognized.extend(
            self.capability
                .specialization
                .unrecognized_labels(Subcategory::Specialization),
        );
        unrecognized.extend(
            self.business_fit
                .entity_type
                .unrecognized_labels(Subcategory::EntityType),
        );
        unrecognized.extend(
            self.engagement
                .timeline
                .unrecognized_labels(Subcategory::Timeline),
        );
        unrecognized.extend(
            self.engagement
                .authority
                .unrecognized_labels(Subcategory::Authority),
        );
        unrecognized
    }

    /// Drop unrecognized labels, returning what was dropped.
    pub fn discard_unrecognized(&mut self) -> Vec<(Subcategory, String)> {
        let dropped = self.unrecognized_entries();
        self.business_fit.budget.unrecognized.clear();
        self.business_fit.entity_type.unrecognized.clear();
        self.capability.industry_experience.unrecognized.clear();
        self.capability.specialization.unrecognized.clear();
        self.engagement.timeline.unrecognized.clear();
        self.engagement.authority.unrecognized.clear();
        dropped
    }

    /// Unrecognized labels and values above the ceiling are rejected in both modes; strict mode
    /// also requires an entry for every option.
    pub fn validate(&self, mode: ScoringMode) -> Result<(), WeightError> {
        if let Some((subcategory, label)) = self.unrecognized_entries().into_iter().next() {
            return Err(WeightError::UnknownOption { subcategory, label });
        }

        let excessive = self
            .business_fit
            .budget
            .excessive(Subcategory::Budget)
            .or_else(|| self.business_fit.entity_type.excessive(Subcategory::EntityType))
            .or_else(|| {
                self.capability
                    .industry_experience
                    .excessive(Subcategory::IndustryExperience)
            })
            .or_else(|| self.capability.specialization.excessive(Subcategory::Specialization))
            .or_else(|| self.engagement.timeline.excessive(Subcategory::Timeline))
            .or_else(|| self.engagement.authority.excessive(Subcategory::Authority));
        if let Some(err) = excessive {
            return Err(err);
        }

        if mode == ScoringMode::Lenient {
            return Ok(());
        }

        let missing = self.missing_entries();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(WeightError::Incomplete { missing })
        }
    }
}

/// Address of a single weight table leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeightKey {
    pub subcategory: Subcategory,
    pub option: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum WeightError {
    #[error("'{label}' is not an option of {subcategory:?}")]
    UnknownOption {
        subcategory: Subcategory,
        label: String,
    },
    #[error(
        "{subcategory:?} option '{label}' carries {points} points (maximum {})",
        MAX_OPTION_POINTS
    )]
    OutOfRange {
        subcategory: Subcategory,
        label: String,
        points: u32,
    },
    #[error("weight table is missing {} entr(ies)", missing.len())]
    Incomplete { missing: Vec<WeightKey> },
}
