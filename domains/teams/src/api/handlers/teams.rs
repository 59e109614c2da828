//! Team setup, join and invite handlers
//!
//! - POST /v1/teams - Coach creates their team
//! - POST /v1/teams/join - Player joins a team by code
//! - POST /v1/team/invites - Coach emails a player the team code

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use huddleup_auth::Role;
use huddleup_common::{
    db::is_unique_violation, Collection, Error, NotificationAction, Result, ValidatedJson,
};
use huddleup_email::{EmailError, TeamInvite};

use crate::api::handlers::users::UserResponse;
use crate::api::middleware::{AuthUser, CoachUser, TeamsState};
use crate::domain::routing::{self, Destination};
use crate::domain::validation::{
    validate_age_group, validate_not_blank, validate_phone, validate_sport,
};
use crate::{Team, TeamCode};

/// Attempts at finding an unused team code before giving up
const MAX_CODE_ATTEMPTS: usize = 5;

const TEAM_CODE_CONSTRAINT: &str = "teams_team_code_key";

/// Team response for API operations
#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub id: Uuid,
    pub team_name: String,
    pub team_code: String,
    pub coach_id: Uuid,
    pub sport: String,
    pub age_group: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Team> for TeamResponse {
    fn from(team: Team) -> Self {
        Self {
            id: team.id,
            team_name: team.team_name,
            team_code: team.team_code,
            coach_id: team.coach_id,
            sport: team.sport,
            age_group: team.age_group,
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

/// Request for creating the caller's team
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 100))]
    pub team_name: String,

    #[validate(custom(function = "validate_sport", message = "Unknown sport"))]
    pub sport: String,

    #[validate(custom(function = "validate_age_group", message = "Unknown age group"))]
    pub age_group: String,
}

/// Request for joining a team
#[derive(Debug, Deserialize, Validate)]
pub struct JoinTeamRequest {
    #[validate(length(min = 1, max = 20))]
    pub team_code: String,

    #[validate(custom(function = "validate_phone", message = "Invalid phone number"))]
    pub phone: String,

    #[validate(
        length(min = 1, max = 50),
        custom(function = "validate_not_blank", message = "Playing position cannot be blank")
    )]
    pub playing_position: String,
}

#[derive(Debug, Serialize)]
pub struct JoinTeamResponse {
    pub team: TeamResponse,
    pub user: UserResponse,
    pub destination: Destination,
}

/// Request for emailing an invite
#[derive(Debug, Deserialize, Validate)]
pub struct InvitePlayerRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct InviteResponse {
    pub email: String,
    pub message_id: String,
}

fn is_team_code_collision(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            is_unique_violation(err) && db_err.constraint() == Some(TEAM_CODE_CONSTRAINT)
        }
        _ => false,
    }
}

/// Create a team
///
/// **POST /v1/teams**
///
/// **Business Rules:**
/// - Caller's role is unset or coach
/// - A coach owns at most one team
/// - The team insert and the role write commit together
/// - A colliding team code is regenerated, up to 5 attempts
pub async fn create_team(
    AuthUser(session): AuthUser,
    State(state): State<TeamsState>,
    ValidatedJson(request): ValidatedJson<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamResponse>)> {
    if session.is_player() {
        return Err(Error::Conflict("Players cannot create a team".to_string()));
    }

    let mut team = Team::new(
        session.user_id(),
        &request.team_name,
        &request.sport,
        &request.age_group,
    )?;

    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let mut tx = state
            .repos
            .begin()
            .await
            .map_err(|e| Error::Internal(format!("Failed to begin transaction: {}", e)))?;

        let user = crate::lock_user_tx(&mut tx, session.user_id())
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        if user.role == Some(Role::Player) {
            return Err(Error::Conflict("Players cannot create a team".to_string()));
        }

        let created = match crate::create_team_tx(&mut tx, &team).await {
            Ok(created) => created,
            Err(e) if is_team_code_collision(&e) => {
                tracing::warn!(attempt, team_code = %team.team_code, "Team code collision, regenerating");
                team.regenerate_code();
                continue;
            }
            Err(e) if is_unique_violation(&e) => {
                return Err(Error::Conflict("You already coach a team".to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        crate::set_role_tx(&mut tx, session.user_id(), Role::Coach).await?;

        tx.commit()
            .await
            .map_err(|e| Error::Internal(format!("Failed to commit transaction: {}", e)))?;

        tracing::info!(
            team_id = %created.id,
            coach_id = %created.coach_id,
            "Team created"
        );

        return Ok((StatusCode::CREATED, Json(created.into())));
    }

    Err(Error::Internal(
        "Could not allocate a unique team code".to_string(),
    ))
}

/// Join a team by code
///
/// **POST /v1/teams/join**
///
/// **Business Rules:**
/// - Code is trimmed and uppercased before lookup
/// - Coaches cannot join a team
/// - Joining the team already joined succeeds without adding a second membership
/// - Joining a different team while on one is a conflict
pub async fn join_team(
    AuthUser(session): AuthUser,
    State(state): State<TeamsState>,
    ValidatedJson(request): ValidatedJson<JoinTeamRequest>,
) -> Result<Json<JoinTeamResponse>> {
    if session.is_coach() {
        return Err(Error::Conflict("Coaches cannot join a team".to_string()));
    }

    let code = TeamCode::parse(&request.team_code)?;
    let team = state
        .repos
        .teams
        .find_by_code(&code)
        .await?
        .ok_or_else(|| Error::NotFound("Invalid team code".to_string()))?;

    let mut tx = state
        .repos
        .begin()
        .await
        .map_err(|e| Error::Internal(format!("Failed to begin transaction: {}", e)))?;

    let current = crate::lock_user_tx(&mut tx, session.user_id())
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    if current.role == Some(Role::Coach) {
        return Err(Error::Conflict("Coaches cannot join a team".to_string()));
    }
    let already_member = match current.team_id {
        Some(team_id) if team_id == team.id => true,
        Some(_) => {
            return Err(Error::Conflict(
                "You are already on another team".to_string(),
            ))
        }
        None => false,
    };

    let user = crate::join_team_tx(
        &mut tx,
        session.user_id(),
        team.id,
        request.phone.trim(),
        request.playing_position.trim(),
    )
    .await?;

    tx.commit()
        .await
        .map_err(|e| Error::Internal(format!("Failed to commit transaction: {}", e)))?;

    let action = if already_member {
        NotificationAction::Update
    } else {
        NotificationAction::Create
    };
    state
        .realtime
        .publish(Collection::Roster, team.id, user.id, action);

    tracing::info!(
        user_id = %user.id,
        team_id = %team.id,
        already_member,
        "Player joined team"
    );

    Ok(Json(JoinTeamResponse {
        destination: routing::resolve(user.role, true),
        team: team.into(),
        user: user.into(),
    }))
}

/// Email an invite carrying the team code
///
/// **POST /v1/team/invites**
pub async fn invite_player(
    CoachUser(session): CoachUser,
    State(state): State<TeamsState>,
    ValidatedJson(request): ValidatedJson<InvitePlayerRequest>,
) -> Result<(StatusCode, Json<InviteResponse>)> {
    let team = state
        .repos
        .teams
        .find_by_coach(session.user_id())
        .await?
        .ok_or_else(|| Error::NotFound("No team found".to_string()))?;

    let invite = TeamInvite {
        player_name: request.name.trim().to_string(),
        player_email: request.email.trim().to_string(),
        coach_name: session.display_name(),
        team_name: team.team_name.clone(),
        team_code: team.team_code.clone(),
    };

    let receipt = state
        .email
        .send_team_invite(&invite)
        .await
        .map_err(|e| match e {
            EmailError::Validation(message) => Error::Validation(message),
            other => {
                tracing::error!(error = %other, team_id = %team.id, "Invite email failed");
                Error::BadGateway(other.to_string())
            }
        })?;

    tracing::info!(
        team_id = %team.id,
        message_id = %receipt.message_id,
        "Invite sent"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(InviteResponse {
            email: invite.player_email,
            message_id: receipt.message_id,
        }),
    ))
}
