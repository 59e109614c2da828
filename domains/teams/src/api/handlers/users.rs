//! Profile API handlers
//!
//! - PATCH /v1/account - Edit name, phone, playing position
//! - PUT /v1/account/status - Set a player's availability

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use huddleup_auth::Role;
use huddleup_common::{Collection, Error, NotificationAction, Result, ValidatedJson};

use crate::api::middleware::{AuthUser, PlayerUser, TeamsState};
use crate::domain::validation::{validate_not_blank, validate_phone};
use crate::{PlayerStatus, User};

/// Response for user profile operations
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: Option<Role>,
    pub team_id: Option<Uuid>,
    pub phone: Option<String>,
    pub playing_position: Option<String>,
    pub status: PlayerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            team_id: user.team_id,
            phone: user.phone,
            playing_position: user.playing_position,
            status: user.status,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Request for updating the caller's profile
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_phone", message = "Invalid phone number"))]
    pub phone: Option<String>,

    #[validate(
        length(min = 1, max = 50),
        custom(function = "validate_not_blank", message = "Playing position cannot be blank")
    )]
    pub playing_position: Option<String>,
}

impl UpdateProfileRequest {
    fn trimmed(value: Option<String>) -> Option<String> {
        value.map(|v| v.trim().to_string())
    }
}

/// Request for setting availability
#[derive(Debug, Deserialize, Validate)]
pub struct SetStatusRequest {
    pub status: PlayerStatus,
}

/// Tell roster subscribers a player's row changed
fn notify_roster(state: &TeamsState, user: &User) {
    if let (Some(Role::Player), Some(team_id)) = (user.role, user.team_id) {
        state.realtime.publish(
            Collection::Roster,
            team_id,
            user.id,
            NotificationAction::Update,
        );
    }
}

/// Update profile
///
/// **PATCH /v1/account**
pub async fn update_profile(
    AuthUser(session): AuthUser,
    State(state): State<TeamsState>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>> {
    let name = UpdateProfileRequest::trimmed(request.name);
    if name.as_deref() == Some("") {
        return Err(Error::Validation("Name cannot be blank".to_string()));
    }

    let user = state
        .repos
        .users
        .update_profile(
            session.user_id(),
            name,
            UpdateProfileRequest::trimmed(request.phone),
            UpdateProfileRequest::trimmed(request.playing_position),
        )
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %user.id, "Profile updated");
    notify_roster(&state, &user);

    Ok(Json(user.into()))
}

/// Set availability
///
/// **PUT /v1/account/status**
pub async fn set_status(
    PlayerUser(session): PlayerUser,
    State(state): State<TeamsState>,
    ValidatedJson(request): ValidatedJson<SetStatusRequest>,
) -> Result<Json<UserResponse>> {
    let user = state
        .repos
        .users
        .set_status(session.user_id(), request.status)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %user.id, status = %user.status, "Player status updated");
    notify_roster(&state, &user);

    Ok(Json(user.into()))
}
