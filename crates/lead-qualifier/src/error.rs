use crate::config::ConfigError;
use crate::qualification::{QualificationServiceError, WeightStoreError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Encode(serde_json::Error),
    Qualification(QualificationServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Encode(err) => write!(f, "encoding error: {}", err),
            AppError::Qualification(err) => write!(f, "qualification error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Encode(err) => Some(err),
            AppError::Qualification(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Qualification(QualificationServiceError::Submission(_))
            | AppError::Qualification(QualificationServiceError::Answers(_))
            | AppError::Qualification(QualificationServiceError::Weights(
                WeightStoreError::Invalid(_),
            )) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Encode(_)
            | AppError::Qualification(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

impl From<QualificationServiceError> for AppError {
    fn from(value: QualificationServiceError) -> Self {
        Self::Qualification(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qualification::{Subcategory, SubmissionError, WeightError};

    #[test]
    fn invalid_input_maps_to_bad_request() {
        let err = AppError::from(QualificationServiceError::from(SubmissionError::MissingCompany));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn rejected_weight_edits_map_to_bad_request() {
        let err = AppError::from(QualificationServiceError::from(WeightStoreError::Invalid(
            WeightError::OutOfRange {
                subcategory: Subcategory::Budget,
                label: "More than $100,000".to_string(),
                points: 3_000_000_000,
            },
        )));
        assert!(err.to_string().contains("maximum 100"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err = AppError::from(QualificationServiceError::from(WeightStoreError::Store(
            crate::qualification::StoreError::Unavailable("offline".to_string()),
        )));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn io_failures_map_to_internal_error() {
        let err = AppError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"));
        assert!(err.to_string().contains("disk gone"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
