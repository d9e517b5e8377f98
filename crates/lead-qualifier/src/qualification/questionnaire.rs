//! Static questionnaire: the six questions, their closed option sets, and display metadata.
//!
//! Option labels are the exact strings shown to users and stored in historical records. They double
//! as the keys of the weight tables, so every enum below serializes to its label.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::weights::WeightConfig;

/// A closed set of answers for one question.
pub trait QuestionOption: Copy + Ord + fmt::Debug + 'static {
    /// Every option in questionnaire display order.
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    /// Exact, case-sensitive match against the display labels.
    fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|option| option.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BudgetRange {
    #[serde(rename = "Less than $10,000")]
    Under10k,
    #[serde(rename = "$10,000 - $50,000")]
    From10kTo50k,
    #[serde(rename = "$50,000 - $100,000")]
    From50kTo100k,
    #[serde(rename = "More than $100,000")]
    Over100k,
}

impl QuestionOption for BudgetRange {
    const ALL: &'static [Self] = &[
        Self::Under10k,
        Self::From10kTo50k,
        Self::From50kTo100k,
        Self::Over100k,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Under10k => "Less than $10,000",
            Self::From10kTo50k => "$10,000 - $50,000",
            Self::From50kTo100k => "$50,000 - $100,000",
            Self::Over100k => "More than $100,000",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IndustryExperience {
    #[serde(rename = "No experience")]
    NoExperience,
    #[serde(rename = "Basic consumer drones")]
    ConsumerDrones,
    #[serde(rename = "Commercial drone experience")]
    CommercialDrones,
    #[serde(rename = "Advanced commercial fleet")]
    AdvancedFleet,
}

impl QuestionOption for IndustryExperience {
    const ALL: &'static [Self] = &[
        Self::NoExperience,
        Self::ConsumerDrones,
        Self::CommercialDrones,
        Self::AdvancedFleet,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::NoExperience => "No experience",
            Self::ConsumerDrones => "Basic consumer drones",
            Self::CommercialDrones => "Commercial drone experience",
            Self::AdvancedFleet => "Advanced commercial fleet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Specialization {
    #[serde(rename = "Construction/Infrastructure")]
    ConstructionInfrastructure,
    #[serde(rename = "Industrial Cleaning")]
    IndustrialCleaning,
    #[serde(rename = "Inspection Services")]
    InspectionServices,
    #[serde(rename = "Other")]
    Other,
}

impl QuestionOption for Specialization {
    const ALL: &'static [Self] = &[
        Self::ConstructionInfrastructure,
        Self::IndustrialCleaning,
        Self::InspectionServices,
        Self::Other,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::ConstructionInfrastructure => "Construction/Infrastructure",
            Self::IndustrialCleaning => "Industrial Cleaning",
            Self::InspectionServices => "Inspection Services",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityType {
    #[serde(rename = "LLC/Corporation")]
    Corporation,
    #[serde(rename = "Partnership")]
    Partnership,
    #[serde(rename = "Sole Proprietorship")]
    SoleProprietorship,
    #[serde(rename = "Not yet established")]
    NotEstablished,
}

impl QuestionOption for EntityType {
    const ALL: &'static [Self] = &[
        Self::Corporation,
        Self::Partnership,
        Self::SoleProprietorship,
        Self::NotEstablished,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Corporation => "LLC/Corporation",
            Self::Partnership => "Partnership",
            Self::SoleProprietorship => "Sole Proprietorship",
            Self::NotEstablished => "Not yet established",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Timeline {
    #[serde(rename = "Immediately")]
    Immediately,
    #[serde(rename = "Within 3 months")]
    WithinThreeMonths,
    #[serde(rename = "Within 6 months")]
    WithinSixMonths,
    #[serde(rename = "No specific timeline")]
    NoSpecificTimeline,
}

impl QuestionOption for Timeline {
    const ALL: &'static [Self] = &[
        Self::Immediately,
        Self::WithinThreeMonths,
        Self::WithinSixMonths,
        Self::NoSpecificTimeline,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Immediately => "Immediately",
            Self::WithinThreeMonths => "Within 3 months",
            Self::WithinSixMonths => "Within 6 months",
            Self::NoSpecificTimeline => "No specific timeline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Authority {
    #[serde(rename = "Final decision maker")]
    FinalDecisionMaker,
    #[serde(rename = "Part of decision-making team")]
    DecisionTeamMember,
    #[serde(rename = "Influencer")]
    Influencer,
    #[serde(rename = "Researcher")]
    Researcher,
}

impl QuestionOption for Authority {
    const ALL: &'static [Self] = &[
        Self::FinalDecisionMaker,
        Self::DecisionTeamMember,
        Self::Influencer,
        Self::Researcher,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::FinalDecisionMaker => "Final decision maker",
            Self::DecisionTeamMember => "Part of decision-making team",
            Self::Influencer => "Influencer",
            Self::Researcher => "Researcher",
        }
    }
}

/// Top-level scoring dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    BusinessFit,
    Capability,
    Engagement,
}

impl Category {
    pub const fn label(self) -> &'static str {
        match self {
            Category::BusinessFit => "Business Fit",
            Category::Capability => "Capability",
            Category::Engagement => "Engagement",
        }
    }
}

/// One weighted question. Each category owns exactly two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Subcategory {
    Budget,
    IndustryExperience,
    Specialization,
    EntityType,
    Timeline,
    Authority,
}

impl Subcategory {
    /// Subcategories in question order.
    pub const ALL: [Subcategory; 6] = [
        Subcategory::Budget,
        Subcategory::IndustryExperience,
        Subcategory::Specialization,
        Subcategory::EntityType,
        Subcategory::Timeline,
        Subcategory::Authority,
    ];

    pub const fn category(self) -> Category {
        match self {
            Subcategory::Budget | Subcategory::EntityType => Category::BusinessFit,
            Subcategory::IndustryExperience | Subcategory::Specialization => Category::Capability,
            Subcategory::Timeline | Subcategory::Authority => Category::Engagement,
        }
    }

    /// Position of the question in the legacy positional answer map.
    pub const fn question_index(self) -> usize {
        match self {
            Subcategory::Budget => 0,
            Subcategory::IndustryExperience => 1,
            Subcategory::Specialization => 2,
            Subcategory::EntityType => 3,
            Subcategory::Timeline => 4,
            Subcategory::Authority => 5,
        }
    }

    pub fn from_question_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Key used for this subcategory in the persisted weight table.
    pub const fn key(self) -> &'static str {
        match self {
            Subcategory::Budget => "budget",
            Subcategory::IndustryExperience => "industryExperience",
            Subcategory::Specialization => "specialization",
            Subcategory::EntityType => "entityType",
            Subcategory::Timeline => "timeline",
            Subcategory::Authority => "authority",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|subcategory| subcategory.key().eq_ignore_ascii_case(key.trim()))
    }

    pub fn option_labels(self) -> Vec<&'static str> {
        fn labels<O: QuestionOption>() -> Vec<&'static str> {
            O::ALL.iter().map(|option| option.label()).collect()
        }

        match self {
            Subcategory::Budget => labels::<BudgetRange>(),
            Subcategory::IndustryExperience => labels::<IndustryExperience>(),
            Subcategory::Specialization => labels::<Specialization>(),
            Subcategory::EntityType => labels::<EntityType>(),
            Subcategory::Timeline => labels::<Timeline>(),
            Subcategory::Authority => labels::<Authority>(),
        }
    }
}

/// Display metadata for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionDefinition {
    pub subcategory: Subcategory,
    pub title: &'static str,
    pub prompt: &'static str,
}

pub const QUESTIONNAIRE: [QuestionDefinition; 6] = [
    QuestionDefinition {
        subcategory: Subcategory::Budget,
        title: "Budget Assessment",
        prompt: "What's your current investment in equipment/technology annually?",
    },
    QuestionDefinition {
        subcategory: Subcategory::IndustryExperience,
        title: "Drone Experience",
        prompt: "Have you operated commercial drones before?",
    },
    QuestionDefinition {
        subcategory: Subcategory::Specialization,
        title: "Industry Interest",
        prompt: "Which industry sector best describes your business?",
    },
    QuestionDefinition {
        subcategory: Subcategory::EntityType,
        title: "Business Setup",
        prompt: "What type of business entity do you operate?",
    },
    QuestionDefinition {
        subcategory: Subcategory::Timeline,
        title: "Timeline",
        prompt: "When are you looking to implement drone solutions?",
    },
    QuestionDefinition {
        subcategory: Subcategory::Authority,
        title: "Decision Making",
        prompt: "What is your role in the purchasing process?",
    },
];

/// Question rendered with the point value each option currently carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub index: usize,
    pub category: Category,
    pub subcategory: Subcategory,
    pub title: &'static str,
    pub prompt: &'static str,
    pub options: Vec<OptionPreview>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionPreview {
    pub label: &'static str,
    pub points: u32,
}

/// Render the questionnaire with point previews taken from `weights`.
pub fn questionnaire_view(weights: &WeightConfig) -> Vec<QuestionView> {
    QUESTIONNAIRE
        .iter()
        .map(|question| {
            let subcategory = question.subcategory;
            let options = subcategory
                .option_labels()
                .into_iter()
                .map(|label| OptionPreview {
                    label,
                    points: weights.points_for(subcategory, label).unwrap_or(0),
                })
                .collect();

            QuestionView {
                index: subcategory.question_index(),
                category: subcategory.category(),
                subcategory,
                title: question.title,
                prompt: question.prompt,
                options,
            }
        })
        .collect()
}
