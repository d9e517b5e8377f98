use serde::{Deserialize, Serialize};

/// Totals at or above this are qualified.
pub const QUALIFIED_THRESHOLD: u32 = 50;
/// Totals below this are disqualified.
pub const DISQUALIFIED_BELOW: u32 = 30;

/// Outcome label for a scored lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualificationStatus {
    Qualified,
    #[serde(rename = "In Progress")]
    InProgress,
    Disqualified,
}

impl QualificationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            QualificationStatus::Qualified => "Qualified",
            QualificationStatus::InProgress => "In Progress",
            QualificationStatus::Disqualified => "Disqualified",
        }
    }

    /// Points credited to the qualifier for recording a lead with this status.
    pub const fn points_awarded(self) -> u32 {
        match self {
            QualificationStatus::Qualified => 100,
            QualificationStatus::InProgress => 50,
            QualificationStatus::Disqualified => 25,
        }
    }
}

/// Classify a score total. The qualified check runs first.
pub fn classify(total: u32) -> QualificationStatus {
    if total >= QUALIFIED_THRESHOLD {
        QualificationStatus::Qualified
    } else if total < DISQUALIFIED_BELOW {
        QualificationStatus::Disqualified
    } else {
        QualificationStatus::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive_at_fifty_and_thirty() {
        assert_eq!(classify(50), QualificationStatus::Qualified);
        assert_eq!(classify(49), QualificationStatus::InProgress);
        assert_eq!(classify(30), QualificationStatus::InProgress);
        assert_eq!(classify(29), QualificationStatus::Disqualified);
        assert_eq!(classify(0), QualificationStatus::Disqualified);
        assert_eq!(classify(320), QualificationStatus::Qualified);
    }

    #[test]
    fn classification_is_idempotent() {
        for total in 0..=120 {
            let first = classify(total);
            assert_eq!(classify(total), first);
        }
    }

    #[test]
    fn status_serializes_to_display_label() {
        for status in [
            QualificationStatus::Qualified,
            QualificationStatus::InProgress,
            QualificationStatus::Disqualified,
        ] {
            let encoded = serde_json::to_value(status).expect("status serializes");
            assert_eq!(encoded, serde_json::Value::from(status.label()));
        }
    }

    #[test]
    fn points_awarded_follow_status() {
        assert_eq!(QualificationStatus::Qualified.points_awarded(), 100);
        assert_eq!(QualificationStatus::InProgress.points_awarded(), 50);
        assert_eq!(QualificationStatus::Disqualified.points_awarded(), 25);
    }
}
