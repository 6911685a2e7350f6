use axum::http::StatusCode;
use axum::response::IntoResponse;
use thiserror::Error;

use crate::external::sentiment_model::ModelError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Sentiment classifier unavailable: {0}")]
    Classifier(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
            AppError::Classifier(msg) => (
                StatusCode::BAD_GATEWAY,
                format!("Sentiment analysis failed: {}", msg),
            )
                .into_response(),
            AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

impl From<ModelError> for AppError {
    fn from(value: ModelError) -> Self {
        AppError::Classifier(value.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        AppError::Internal(format!("CSV export failed: {}", value))
    }
}
