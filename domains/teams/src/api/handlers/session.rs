//! Session and role selection handlers
//!
//! - GET /v1/session - Current profile and where the client should go
//! - POST /v1/session/role - Choose coach or player
//! - GET /v1/session/access - Evaluate the route guard for a role set

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use huddleup_auth::{guard, GuardOutcome, Role};
use huddleup_common::{Error, Result, ValidatedJson};

use crate::api::handlers::teams::TeamResponse;
use crate::api::handlers::users::UserResponse;
use crate::api::middleware::{AuthUser, TeamsState};
use crate::domain::routing::{self, Destination};
use crate::User;

/// Profile plus resolved destination
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserResponse,
    pub team: Option<TeamResponse>,
    pub destination: Destination,
    pub redirect: &'static str,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SelectRoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct AccessQuery {
    /// Comma-separated roles; absent or empty means any signed-in user
    #[serde(default)]
    pub roles: Option<String>,
}

impl AccessQuery {
    fn allowed_roles(&self) -> Result<Option<Vec<Role>>> {
        let Some(raw) = self.roles.as_deref().filter(|r| !r.trim().is_empty()) else {
            return Ok(None);
        };

        raw.split(',')
            .map(|part| part.parse::<Role>().map_err(Error::Validation))
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }
}

#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub allowed: bool,
    pub redirect: Option<&'static str>,
}

impl From<GuardOutcome> for AccessResponse {
    fn from(outcome: GuardOutcome) -> Self {
        Self {
            allowed: outcome.is_allowed(),
            redirect: outcome.redirect_path(),
        }
    }
}

/// Build the session view for a loaded user
async fn session_view(state: &TeamsState, user: User) -> Result<SessionResponse> {
    let team = if user.role.is_some() {
        state.repos.teams.find_for_member(user.id).await.map_err(|e| {
            tracing::error!(error = %e, user_id = %user.id, "Team lookup failed");
            e
        })?
    } else {
        None
    };

    let destination = routing::resolve(user.role, team.is_some());

    Ok(SessionResponse {
        user: user.into(),
        team: team.map(TeamResponse::from),
        destination,
        redirect: destination.path(),
    })
}

/// Current session
///
/// **GET /v1/session**
pub async fn get_session(
    AuthUser(session): AuthUser,
    State(state): State<TeamsState>,
) -> Result<Json<SessionResponse>> {
    let user = state
        .repos
        .users
        .get_by_id(session.user_id())
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    Ok(Json(session_view(&state, user).await?))
}

/// Choose a role
///
/// **POST /v1/session/role**
///
/// Writes the role when unset. Choosing the role already held is a no-op;
/// choosing a different one is a conflict.
pub async fn select_role(
    AuthUser(session): AuthUser,
    State(state): State<TeamsState>,
    ValidatedJson(request): ValidatedJson<SelectRoleRequest>,
) -> Result<Json<SessionResponse>> {
    let current = state
        .repos
        .users
        .get_by_id(session.user_id())
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    let user = if current.can_take_role(request.role)? {
        let updated = state
            .repos
            .users
            .set_role(current.id, request.role)
            .await?
            .ok_or_else(|| Error::Conflict("Role is already set".to_string()))?;

        tracing::info!(user_id = %updated.id, role = %request.role, "Role selected");
        updated
    } else {
        current
    };

    Ok(Json(session_view(&state, user).await?))
}

/// Evaluate the route guard
///
/// **GET /v1/session/access?roles=coach,player**
///
/// Works without a session so clients can learn where to send signed-out
/// users.
pub async fn check_access(
    auth: Option<AuthUser>,
    Query(query): Query<AccessQuery>,
) -> Result<Json<AccessResponse>> {
    let allowed = query.allowed_roles()?;
    let session = auth.map(|AuthUser(session)| session);

    let outcome = guard::check(session.as_ref(), allowed.as_deref());
    Ok(Json(outcome.into()))
}
