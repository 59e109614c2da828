//! Authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::guard::{LOGIN_PATH, SELECT_ROLE_PATH};
use crate::types::Role;

/// Authentication error
#[derive(Debug)]
pub enum AuthError {
    MissingAuthorization,
    InvalidAuthorizationFormat,
    InvalidToken,
    InvalidUserId,
    MissingEmail,
    UserLoadError,
    UserProvisionFailed,
    /// Session role is unset or outside the route's allowed roles
    RoleNotAllowed { allowed: Vec<Role> },
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::UserLoadError | AuthError::UserProvisionFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AuthError::RoleNotAllowed { .. } => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn code_and_message(&self) -> (&'static str, String) {
        match self {
            AuthError::MissingAuthorization => (
                "MISSING_AUTHORIZATION",
                "Authorization header required".to_string(),
            ),
            AuthError::InvalidAuthorizationFormat => (
                "INVALID_AUTHORIZATION",
                "Invalid authorization header format".to_string(),
            ),
            AuthError::InvalidToken => ("INVALID_TOKEN", "Invalid or expired token".to_string()),
            AuthError::InvalidUserId => ("INVALID_TOKEN", "Invalid user ID in token".to_string()),
            AuthError::MissingEmail => ("INVALID_TOKEN", "Token carries no email".to_string()),
            AuthError::UserLoadError => ("USER_LOAD_ERROR", "Failed to load user".to_string()),
            AuthError::UserProvisionFailed => (
                "USER_PROVISION_FAILED",
                "Failed to create user profile".to_string(),
            ),
            AuthError::RoleNotAllowed { allowed } => {
                let roles: Vec<&str> = allowed.iter().map(Role::as_str).collect();
                (
                    "ROLE_NOT_ALLOWED",
                    format!("This route requires role: {}", roles.join(" or ")),
                )
            }
        }
    }

    /// Where a client should send the user after this rejection
    pub fn redirect_path(&self) -> Option<&'static str> {
        match self.status_code() {
            StatusCode::UNAUTHORIZED => Some(LOGIN_PATH),
            StatusCode::FORBIDDEN => Some(SELECT_ROLE_PATH),
            _ => None,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (code, message) = self.code_and_message();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
                "redirect": self.redirect_path(),
            }
        }));

        (status, body).into_response()
    }
}
