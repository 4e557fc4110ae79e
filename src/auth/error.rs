use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use super::dto::ErrorBody;

pub const MSG_MISSING_FIELDS: &str = "Please provide both username/email and password";
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const MSG_LOGIN_FAILED: &str = "Server error during login";
pub const MSG_NO_TOKEN: &str = "No token, authorization denied";
pub const MSG_INVALID_TOKEN: &str = "Token is not valid";
pub const MSG_SERVER_ERROR: &str = "Server error";

/// Login failures. Unknown user and wrong password share `InvalidCredentials`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing username/email or password")]
    Validation,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the caller. Never carries internal details.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::Validation => MSG_MISSING_FIELDS,
            AuthError::InvalidCredentials => MSG_INVALID_CREDENTIALS,
            AuthError::Internal(_) => MSG_LOGIN_FAILED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Internal(e) = &self {
            error!(error = %e, "login failed with internal error");
        }
        (self.status_code(), Json(ErrorBody::new(self.public_message()))).into_response()
    }
}

/// Rejections produced by the session gate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("no token supplied")]
    MissingToken,

    #[error("token rejected")]
    InvalidToken,

    #[error("protected request failed")]
    Internal,
}

impl GateError {
    pub fn public_message(&self) -> &'static str {
        match self {
            GateError::MissingToken => MSG_NO_TOKEN,
            GateError::InvalidToken => MSG_INVALID_TOKEN,
            GateError::Internal => MSG_SERVER_ERROR,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GateError::MissingToken | GateError::InvalidToken => StatusCode::UNAUTHORIZED,
            GateError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorBody::new(self.public_message()))).into_response()
    }
}
