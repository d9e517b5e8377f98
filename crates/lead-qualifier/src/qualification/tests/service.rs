use super::common::*;
use crate::qualification::answers::{AnswerError, AnswerPayload, LeadAnswers};
use crate::qualification::classification::QualificationStatus;
use crate::qualification::questionnaire::{Authority, Subcategory, Timeline};
use crate::qualification::records::{QualificationId, QualificationSubmission, RepositoryError};
use crate::qualification::service::{
    LeadQualificationService, QualificationServiceError, SubmissionError,
};
use crate::qualification::store::{InMemoryKeyValueStore, WeightStoreError};
use crate::qualification::weights::{
    ScoringMode, WeightConfig, WeightError, MAX_OPTION_POINTS,
};
use std::sync::Arc;

#[test]
fn weight_updates_apply_to_the_next_score() {
    let (service, _, _) = build_service(ScoringMode::Lenient);
    let before = service.score(&weak_answers());
    assert_eq!(before.total, 80);

    service
        .set_weight(Subcategory::Authority, "Researcher", 45)
        .expect("leaf update succeeds");

    let after = service.score(&weak_answers());
    assert_eq!(after.engagement, 60);
    assert_eq!(after.total, 110);
}

#[test]
fn weights_read_twice_are_equal() {
    let (service, _, _) = build_service(ScoringMode::Lenient);
    service
        .set_weight(Subcategory::Timeline, "Immediately", 12)
        .expect("leaf update succeeds");

    assert_eq!(service.weights(), service.weights());
}

#[test]
fn reset_restores_built_in_table() {
    let (service, _, _) = build_service(ScoringMode::Lenient);
    service
        .set_weight(Subcategory::Budget, "Less than $10,000", 0)
        .expect("leaf update succeeds");
    assert_ne!(service.weights(), WeightConfig::default());

    let reset = service.reset_weights().expect("reset succeeds");

    assert_eq!(reset, WeightConfig::default());
    assert_eq!(service.weights(), WeightConfig::default());
}

#[test]
fn set_weight_rejects_unknown_option() {
    let (service, _, _) = build_service(ScoringMode::Lenient);

    match service.set_weight(Subcategory::Timeline, "Next decade", 5) {
        Err(QualificationServiceError::Weights(WeightStoreError::Invalid(
            WeightError::UnknownOption { .. },
        ))) => {}
        other => panic!("expected unknown option error, got {other:?}"),
    }
    assert_eq!(service.weights(), WeightConfig::default());
}

#[test]
fn strict_mode_refuses_incomplete_weight_tables() {
    let (service, _, _) = build_service(ScoringMode::Strict);
    let mut weights = WeightConfig::default();
    weights.engagement.timeline.remove(Timeline::WithinSixMonths);

    match service.update_weights(weights.clone()) {
        Err(QualificationServiceError::Weights(WeightStoreError::Invalid(
            WeightError::Incomplete { missing },
        ))) => assert_eq!(missing.len(), 1),
        other => panic!("expected incomplete table error, got {other:?}"),
    }

    let (lenient, _, _) = build_service(ScoringMode::Lenient);
    lenient
        .update_weights(weights.clone())
        .expect("lenient mode stores partial tables");
    assert_eq!(lenient.weights(), weights);
}

#[test]
fn submit_records_status_and_points() {
    let (service, _, records) = build_service(ScoringMode::Lenient);

    let record = service
        .submit(submission("  Skyline Surveys  ", strong_answers()))
        .expect("submission succeeds");

    assert_eq!(record.company, "Skyline Surveys");
    assert_eq!(record.status, QualificationStatus::Qualified);
    assert_eq!(record.points, 100);
    assert_eq!(record.score.total, 320);
    assert_eq!(record.answers, strong_answers());
    assert!(record.notes.is_none());
    assert_eq!(records.len(), 1);

    let fetched = service.get(&record.id).expect("record stored");
    assert_eq!(fetched, record);
}

#[test]
fn submit_classifies_low_scores() {
    let (service, _, _) = build_service(ScoringMode::Lenient);
    let answers = LeadAnswers {
        authority: Some(Authority::Influencer),
        ..LeadAnswers::default()
    };

    let record = service
        .submit(QualificationSubmission {
            company: "Hover Labs".to_string(),
            answers: answers.into(),
            notes: Some("   ".to_string()),
        })
        .expect("submission succeeds");

    // 25 points x 1.1
    assert_eq!(record.score.total, 28);
    assert_eq!(record.status, QualificationStatus::Disqualified);
    assert_eq!(record.points, 25);
    assert!(record.notes.is_none());
}

#[test]
fn submit_requires_company_name() {
    let (service, _, records) = build_service(ScoringMode::Lenient);

    match service.submit(submission("   ", strong_answers())) {
        Err(QualificationServiceError::Submission(SubmissionError::MissingCompany)) => {}
        other => panic!("expected missing company error, got {other:?}"),
    }
    assert_eq!(records.len(), 0);
}

#[test]
fn strict_mode_requires_every_question() {
    let (service, _, _) = build_service(ScoringMode::Strict);
    let answers = LeadAnswers {
        authority: None,
        ..strong_answers()
    };

    match service.submit(submission("Partial Co", answers)) {
        Err(QualificationServiceError::Submission(SubmissionError::IncompleteAnswers {
            answered: 5,
        })) => {}
        other => panic!("expected incomplete answers error, got {other:?}"),
    }
}

#[test]
fn strict_mode_rejects_unknown_positional_labels() {
    let (strict, _, _) = build_service(ScoringMode::Strict);
    match strict.parse_positional([("4", "Someday")]) {
        Err(QualificationServiceError::Answers(AnswerError::UnknownOption { .. })) => {}
        other => panic!("expected unknown option error, got {other:?}"),
    }

    let (lenient, _, _) = build_service(ScoringMode::Lenient);
    let answers = lenient
        .parse_positional([("4", "Someday"), ("5", "Influencer")])
        .expect("lenient parsing never fails");
    let score = lenient.score(&answers);
    assert_eq!(score.engagement, 25);
    assert_eq!(score.total, 28);
}

#[test]
fn get_propagates_not_found() {
    let (service, _, _) = build_service(ScoringMode::Lenient);

    match service.get(&QualificationId("lead-missing".to_string())) {
        Err(QualificationServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn submit_propagates_repository_failures() {
    let service = LeadQualificationService::new(
        Arc::new(InMemoryKeyValueStore::default()),
        Arc::new(UnavailableRecords),
        ScoringMode::Lenient,
    );

    match service.submit(submission("Offline Inc", strong_answers())) {
        Err(QualificationServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected repository failure, got {other:?}"),
    }
}

#[test]
fn recent_and_summary_cover_recorded_leads() {
    let (service, _, _) = build_service(ScoringMode::Lenient);
    service
        .submit(submission("First", strong_answers()))
        .expect("first submission");
    service
        .submit(submission(
            "Second",
            LeadAnswers {
                authority: Some(Authority::Influencer),
                ..LeadAnswers::default()
            },
        ))
        .expect("second submission");
    service
        .submit(submission("Third", weak_answers()))
        .expect("third submission");

    let recent = service.recent(2).expect("recent records");
    let companies: Vec<&str> = recent.iter().map(|record| record.company.as_str()).collect();
    assert_eq!(companies, vec!["Third", "Second"]);

    let summary = service.summary().expect("summary");
    assert_eq!(summary.total, 3);
    assert_eq!(summary.qualified, 2);
    assert_eq!(summary.disqualified, 1);
    assert_eq!(summary.in_progress, 0);
    assert_eq!(summary.points, 225);
    assert_eq!(summary.conversion_rate_pct, 67);
}

#[test]
fn questionnaire_previews_follow_stored_weights() {
    let (service, _, _) = build_service(ScoringMode::Lenient);
    service
        .set_weight(Subcategory::EntityType, "Partnership", 27)
        .expect("leaf update succeeds");

    let questionnaire = service.questionnaire();
    let entity = questionnaire
        .iter()
        .find(|question| question.subcategory == Subcategory::EntityType)
        .expect("entity type question");
    let partnership = entity
        .options
        .iter()
        .find(|option| option.label == "Partnership")
        .expect("partnership option");
    assert_eq!(partnership.points, 27);
}

#[test]
fn set_weight_rejects_points_above_ceiling_and_keeps_table() {
    let (service, _, _) = build_service(ScoringMode::Lenient);

    for subcategory in [Subcategory::Budget, Subcategory::EntityType] {
        let option = match subcategory {
            Subcategory::Budget => "More than $100,000",
            _ => "LLC/Corporation",
        };
        match service.set_weight(subcategory, option, 3_000_000_000) {
            Err(QualificationServiceError::Weights(WeightStoreError::Invalid(
                WeightError::OutOfRange { points: 3_000_000_000, .. },
            ))) => {}
            other => panic!("expected out of range error, got {other:?}"),
        }
    }

    assert_eq!(service.weights(), WeightConfig::default());
    assert_eq!(service.score(&strong_answers()).total, 320);

    service
        .set_weight(Subcategory::Budget, "More than $100,000", MAX_OPTION_POINTS)
        .expect("ceiling itself is allowed");
}

fn positional_payload(entries: &[(&str, &str)]) -> AnswerPayload {
    AnswerPayload::Positional(
        entries
            .iter()
            .map(|(key, label)| (key.to_string(), label.to_string()))
            .collect(),
    )
}

#[test]
fn submit_resolves_positional_answers_under_service_mode() {
    let (lenient, _, records) = build_service(ScoringMode::Lenient);
    let record = lenient
        .submit(QualificationSubmission {
            company: "Acme".to_string(),
            answers: positional_payload(&[("budget", "A lot"), ("timeline", "Immediately")]),
            notes: None,
        })
        .expect("lenient submission succeeds");

    assert_eq!(record.answers.budget, None);
    assert_eq!(record.answers.timeline, Some(Timeline::Immediately));
    // 40 points x 1.3
    assert_eq!(record.score.total, 52);
    assert_eq!(records.len(), 1);

    let (strict, _, records) = build_service(ScoringMode::Strict);
    match strict.submit(QualificationSubmission {
        company: "Acme".to_string(),
        answers: positional_payload(&[("budget", "A lot"), ("timeline", "Immediately")]),
        notes: None,
    }) {
        Err(QualificationServiceError::Answers(AnswerError::UnknownOption {
            subcategory: Subcategory::Budget,
            ..
        })) => {}
        other => panic!("expected unknown option error, got {other:?}"),
    }
    assert_eq!(records.len(), 0);
}
