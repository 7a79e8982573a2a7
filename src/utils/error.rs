use crate::database::StoreError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User already exists")]
    Conflict,

    #[error("User not found")]
    NotFound,

    #[error("Password is incorrect")]
    InvalidCredentials,

    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    /// Detail is for server logs only; clients see a generic message.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            // Lost the race between the existence check and the insert
            StoreError::Duplicate(_) => AuthError::Conflict,
            StoreError::Database(msg) => AuthError::Internal(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut violations: Vec<FieldViolation> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldViolation {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();

        // HashMap order is unstable
        violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));

        AuthError::Validation(violations)
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Conflict => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidCredentials => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AuthError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AuthError::Validation(violations) => serde_json::json!({
                "success": false,
                "errors": violations,
            }),
            AuthError::Internal(_) => serde_json::json!({
                "success": false,
                "error": "Internal server error",
            }),
            other => serde_json::json!({
                "success": false,
                "error": other.to_string(),
            }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
