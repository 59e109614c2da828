//! `POST /api/send-invite` relay
//!
//! Thin HTTP front for the configured email provider. Clients hand over a
//! fully-rendered message; the relay only checks it is complete and passes
//! provider failures through with their status.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::{EmailError, EmailService};

pub const MISSING_FIELDS: &str = "Missing to, subject, and text/html";

#[derive(Clone)]
pub struct RelayState {
    pub email: Arc<dyn EmailService>,
}

impl RelayState {
    pub fn new(email: Arc<dyn EmailService>) -> Self {
        Self { email }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SendInviteRequest {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
}

impl SendInviteRequest {
    fn non_blank(field: &Option<String>) -> Option<&str> {
        field.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// `to`, `subject` and one of the bodies must all be present
    pub fn is_complete(&self) -> bool {
        Self::non_blank(&self.to).is_some()
            && Self::non_blank(&self.subject).is_some()
            && (Self::non_blank(&self.text).is_some() || Self::non_blank(&self.html).is_some())
    }
}

/// Relay failures, rendered as `{"error": "..."}`
#[derive(Debug)]
pub struct RelayError {
    status: StatusCode,
    message: String,
}

impl RelayError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<EmailError> for RelayError {
    fn from(err: EmailError) -> Self {
        match err {
            EmailError::Validation(message) => Self::bad_request(message),
            EmailError::Provider { status, message } => Self {
                status: StatusCode::from_u16(status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                message,
            },
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Send one caller-rendered email
pub async fn send_invite(
    State(state): State<RelayState>,
    payload: Result<Json<SendInviteRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, RelayError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected send-invite body");
        RelayError::bad_request(MISSING_FIELDS)
    })?;

    if !request.is_complete() {
        return Err(RelayError::bad_request(MISSING_FIELDS));
    }

    let to = request.to.unwrap_or_default();
    let subject = request.subject.unwrap_or_default();

    let mut message = state.email.compose(to.trim(), &subject);
    if let Some(text) = request.text.filter(|s| !s.trim().is_empty()) {
        message = message.with_text(text);
    }
    if let Some(html) = request.html.filter(|s| !s.trim().is_empty()) {
        message = message.with_html(html);
    }

    let receipt = state.email.send_email(message).await.map_err(|e| {
        tracing::error!(error = %e, to = %to, "Invite relay send failed");
        RelayError::from(e)
    })?;

    tracing::info!(message_id = %receipt.message_id, to = %to, "Invite relayed");

    Ok(Json(json!({ "ok": true })))
}

/// Routes for the relay binary
pub fn routes() -> Router<RelayState> {
    Router::new().route("/api/send-invite", post(send_invite))
}
