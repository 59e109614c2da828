//! Axum extractors for authentication
//!
//! Generic over any state `S` where `AuthBackend: FromRef<S>`.
//! This is axum's idiomatic nested-state pattern.

use axum::{
    extract::{FromRef, FromRequestParts, OptionalFromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::backend::AuthBackend;
use crate::context::Session;
use crate::error::AuthError;
use crate::guard::{self, GuardOutcome};
use crate::jwt::extract_bearer_token;
use crate::types::Role;

async fn authenticate<S>(parts: &Parts, state: &S) -> Result<Session, AuthError>
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    let backend = AuthBackend::from_ref(state);

    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthorization)?;

    let token = extract_bearer_token(auth_header)?;
    backend.authenticate_jwt(&token).await
}

/// Authenticate, then run the route guard for `allowed`.
async fn guarded<S>(parts: &Parts, state: &S, allowed: &[Role]) -> Result<Session, AuthError>
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    let session = authenticate(parts, state).await?;

    match guard::check(Some(&session), Some(allowed)) {
        GuardOutcome::Allow => Ok(session),
        GuardOutcome::RedirectToLogin => Err(AuthError::MissingAuthorization),
        GuardOutcome::RedirectToSelectRole => {
            tracing::debug!(
                user_id = %session.user_id(),
                role = ?session.role(),
                "Route guard rejected role"
            );
            Err(AuthError::RoleNotAllowed {
                allowed: allowed.to_vec(),
            })
        }
    }
}

/// Any signed-in user, whatever their role
#[derive(Debug)]
pub struct AuthUser(pub Session);

impl<S> FromRequestParts<S> for AuthUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        authenticate(parts, state).await.map(AuthUser)
    }
}

/// `Option<AuthUser>`: no Authorization header means no session, any
/// malformed or invalid token is still rejected.
impl<S> OptionalFromRequestParts<S> for AuthUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Option<Self>, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Ok(None);
        }
        authenticate(parts, state).await.map(|s| Some(AuthUser(s)))
    }
}

/// Signed-in user whose role is coach
#[derive(Debug)]
pub struct CoachUser(pub Session);

impl<S> FromRequestParts<S> for CoachUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        guarded(parts, state, &[Role::Coach]).await.map(CoachUser)
    }
}

/// Signed-in user whose role is player
#[derive(Debug)]
pub struct PlayerUser(pub Session);

impl<S> FromRequestParts<S> for PlayerUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        guarded(parts, state, &[Role::Player]).await.map(PlayerUser)
    }
}
