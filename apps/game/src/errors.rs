use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::trivia::state::SelectionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Generation failures never reach this type: they are recorded on the round
/// itself and rendered as an error state by the page.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(#[from] SelectionError),

    #[error("Selection was made for round {received}, but the current round is {current:?}")]
    StaleRound {
        received: Uuid,
        current: Option<Uuid>,
    },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::InvalidSelection(_) => (StatusCode::BAD_REQUEST, "INVALID_SELECTION"),
            AppError::StaleRound { .. } => {
                tracing::debug!("Rejected stale selection: {self}");
                (StatusCode::CONFLICT, "STALE_ROUND")
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string()
            }
        }));

        (status, body).into_response()
    }
}
