/*
 * Responsibility
 * - Application-wide AppError
 * - IntoResponse (HTTP status + JSON error body)
 * - Uniform conversion of repo errors and gate rejections
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::AuthzError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },
    #[error("forbidden: {message}")]
    Forbidden { message: String },
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("{code}: {message}")]
    Conflict { code: &'static str, message: String },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            message: message.into(),
        }
    }

    /// Shorthand for DTO `validate()` failures.
    pub fn validation(message: &'static str) -> Self {
        Self::bad_request("VALIDATION_FAILED", message)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self {
            AppError::BadRequest { code, message } => (code, message),
            AppError::Unauthorized { message } => ("UNAUTHORIZED", message),
            AppError::Forbidden { message } => ("FORBIDDEN", message),
            AppError::NotFound { resource } => ("NOT_FOUND", format!("{resource} not found.")),
            AppError::Conflict { code, message } => (code, message),
            AppError::Internal => ("INTERNAL_SERVER_ERROR", "internal server error".into()),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::conflict("CONFLICT", "resource already exists"),
            RepoError::ForeignKey => {
                AppError::conflict("IN_USE", "resource is referenced by other records")
            }
            RepoError::Db(err) => {
                tracing::error!(error = ?err, "database error");
                AppError::Internal
            }
        }
    }
}

impl From<AuthzError> for AppError {
    fn from(e: AuthzError) -> Self {
        match e {
            AuthzError::MissingOrMalformedCredential => {
                AppError::unauthorized("bearer token missing or malformed")
            }
            AuthzError::InvalidOrExpiredCredential { .. } => {
                AppError::unauthorized("invalid or expired token")
            }
            AuthzError::InsufficientRole { allowed, .. } => AppError::forbidden(format!(
                "access denied: only roles {allowed} may perform this action"
            )),
        }
    }
}
