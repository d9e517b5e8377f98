use serde::{Deserialize, Serialize};

use super::answers::LeadAnswers;
use super::classification::{classify, QualificationStatus};
use super::questionnaire::{Authority, Timeline};
use super::weights::WeightConfig;

/// Result of scoring one set of answers. `total` is always derived from the other fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadScore {
    pub business_fit: u32,
    pub capability: u32,
    pub engagement: u32,
    pub multiplier: f64,
    pub total: u32,
}

impl LeadScore {
    pub fn base(&self) -> u32 {
        self.business_fit
            .saturating_add(self.capability)
            .saturating_add(self.engagement)
    }

    pub fn status(&self) -> QualificationStatus {
        classify(self.total)
    }
}

/// Multiplier bonus for purchase urgency. Fixed policy; not part of the weight table.
pub fn timeline_bonus(timeline: Option<Timeline>) -> f64 {
    match timeline {
        Some(Timeline::Immediately) => 0.3,
        Some(Timeline::WithinThreeMonths) => 0.2,
        Some(Timeline::WithinSixMonths) => 0.1,
        Some(Timeline::NoSpecificTimeline) | None => 0.0,
    }
}

/// Multiplier bonus for purchasing authority. Fixed policy; not part of the weight table.
pub fn authority_bonus(authority: Option<Authority>) -> f64 {
    match authority {
        Some(Authority::FinalDecisionMaker) => 0.3,
        Some(Authority::DecisionTeamMember) => 0.2,
        Some(Authority::Influencer) => 0.1,
        Some(Authority::Researcher) | None => 0.0,
    }
}

/// Score a lead against an explicit weight table.
///
/// Every lookup that misses contributes zero, so this never fails. The total is
/// `round(base * multiplier)` with halves rounded away from zero; all inputs are non-negative so
/// that is the same as rounding half up. Sums and the total saturate at `u32::MAX`.
pub fn calculate_lead_score(answers: &LeadAnswers, weights: &WeightConfig) -> LeadScore {
    let business_fit = weights
        .business_fit
        .budget
        .points(answers.budget)
        .saturating_add(weights.business_fit.entity_type.points(answers.entity_type));

    let capability = weights
        .capability
        .industry_experience
        .points(answers.industry_experience)
        .saturating_add(weights.capability.specialization.points(answers.specialization));

    let engagement = weights
        .engagement
        .timeline
        .points(answers.timeline)
        .saturating_add(weights.engagement.authority.points(answers.authority));

    let multiplier = 1.0 + timeline_bonus(answers.timeline) + authority_bonus(answers.authority);

    let base = business_fit
        .saturating_add(capability)
        .saturating_add(engagement);
    let total = (f64::from(base) * multiplier).round() as u32;

    LeadScore {
        business_fit,
        capability,
        engagement,
        multiplier,
        total,
    }
}
