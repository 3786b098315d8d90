use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ml::ModelError;
use crate::parsing::document::DocumentError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Model(ModelError::NotTrained(model)) => {
                tracing::warn!("Prediction requested before the {model} model was trained");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "MODEL_NOT_READY",
                    format!("The {model} model is not trained yet"),
                )
            }
            AppError::Model(e) => {
                tracing::error!("Model error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MODEL_ERROR",
                    "A model error occurred".to_string(),
                )
            }
            AppError::Document(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "DOCUMENT_ERROR",
                e.to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
