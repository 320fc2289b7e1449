use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum DonationError {
    #[error("invalid `{field}`: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("donation {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),
}

impl DonationError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        DonationError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            DonationError::Validation { .. } | DonationError::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            DonationError::NotFound(_) => StatusCode::NOT_FOUND,
            DonationError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DonationError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let error_body = match self {
            DonationError::Validation { field, message } => ApiErrorBody {
                code: "VALIDATION_ERROR".to_string(),
                message,
                field: Some(field.to_string()),
            },
            DonationError::InvalidBody(message) => ApiErrorBody {
                code: "INVALID_BODY".to_string(),
                message,
                field: None,
            },
            DonationError::NotFound(id) => ApiErrorBody {
                code: "NOT_FOUND".to_string(),
                message: format!("Donation {id} was not found."),
                field: None,
            },
            other => {
                error!(error = %other, "request failed with internal error");
                ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                    field: None,
                }
            }
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
