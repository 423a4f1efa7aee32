//! Application error taxonomy.
//!
//! Every fallible operation in the workspace returns [`AppError`]. The
//! variants map one-to-one onto the rejection signals the HTTP boundary
//! produces, so handlers never build status codes themselves.
//!
//! | Variant | Status | Recoverable |
//! |---------|--------|-------------|
//! | [`AppError::Configuration`] | 500 | no, blocks startup |
//! | [`AppError::InvalidCredentials`] | 401 | yes |
//! | [`AppError::InvalidToken`] | 401 | yes, re-authenticate |
//! | [`AppError::RefreshTokenInvalid`] | 400 | yes, re-authenticate |
//! | [`AppError::Persistence`] | 500 | surfaced to caller |
//! | [`AppError::Registration`] | 400 | yes |
//!
//! Display strings are fixed messages. None of them interpolate passwords,
//! tokens or key material.

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

/// A single per-field registration failure, e.g. a duplicate user name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    /// Machine-readable failure code (`DuplicateUserName`, `PasswordTooShort`, ...)
    pub code: String,
    /// Human-readable description safe to return to the client
    pub description: String,
}

impl FieldError {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or unusable signing secret. Fatal at startup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Unknown user name or wrong password. The two are never distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Malformed, forged, wrong-algorithm or wrong-issuer/audience access token.
    #[error("invalid or expired token")]
    InvalidToken,

    /// Refresh token does not match the stored one, or the refresh window closed.
    #[error("invalid refresh token")]
    RefreshTokenInvalid,

    /// Registration rejected with per-field failures.
    #[error("registration failed with {} error(s)", .0.len())]
    Registration(Vec<FieldError>),

    #[error("persistence failure: {0}")]
    Persistence(#[source] anyhow::Error),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn persistence<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Persistence(err.into())
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Internal(err.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::Unprocessable(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::InvalidToken | Self::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::RefreshTokenInvalid | Self::Registration(_) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Configuration(_) | Self::Persistence(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Groups registration failures by code, the shape clients expect.
    fn registration_body(errors: &[FieldError]) -> BTreeMap<&str, Vec<&str>> {
        let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for error in errors {
            grouped
                .entry(error.code.as_str())
                .or_default()
                .push(error.description.as_str());
        }
        grouped
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Self::InvalidCredentials => status.into_response(),
            Self::InvalidToken => (
                status,
                Json(json!({ "error": "Invalid or expired token" })),
            )
                .into_response(),
            Self::RefreshTokenInvalid => (
                status,
                Json(json!({
                    "error": "Invalid client request. The token pair has some invalid values."
                })),
            )
                .into_response(),
            Self::Registration(errors) => (
                status,
                Json(json!({ "errors": Self::registration_body(errors) })),
            )
                .into_response(),
            Self::Configuration(_) | Self::Persistence(_) | Self::Internal(_) => {
                tracing::error!(error = %self, "request failed with a server error");
                (
                    status,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
            Self::BadRequest(message)
            | Self::Unprocessable(message)
            | Self::Unauthorized(message)
            | Self::NotFound(message) => {
                (status, Json(json!({ "error": message }))).into_response()
            }
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}
