//! Match scheduling handlers (coach only)
//!
//! - GET /v1/matches - Upcoming matches of the coach's team
//! - POST /v1/matches - Schedule a match
//! - PATCH /v1/matches/{id} - Edit a match
//! - DELETE /v1/matches/{id} - Cancel a match

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use huddleup_common::{Error, Result, ValidatedJson};

use crate::api::middleware::{CoachUser, MatchesState};
use crate::domain::entities::{local_to_utc, utc_to_local, Match, MatchChanges};

/// Match as returned by the API
#[derive(Debug, Serialize)]
pub struct MatchView {
    pub id: Uuid,
    pub team_id: Uuid,
    pub opponent: String,
    pub date_time: DateTime<Utc>,
    /// Wall-clock rendering when the caller supplied an offset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_date_time: Option<String>,
    pub location: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MatchView {
    pub fn new(m: Match, utc_offset_minutes: Option<i32>) -> Result<Self> {
        let local_date_time = utc_offset_minutes
            .map(|offset| utc_to_local(m.date_time, offset))
            .transpose()?;

        Ok(Self {
            id: m.id,
            team_id: m.team_id,
            opponent: m.opponent,
            date_time: m.date_time,
            local_date_time,
            location: m.location,
            notes: m.notes,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

/// `?utc_offset_minutes=` for rendering local times
#[derive(Debug, Default, Deserialize)]
pub struct OffsetQuery {
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

/// Request for scheduling a match
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMatchRequest {
    #[validate(length(min = 1, max = 100))]
    pub opponent: String,

    /// Local wall clock, `YYYY-MM-DDTHH:MM[:SS]`
    pub date_time: String,

    /// Minutes east of UTC of the wall clock above
    #[serde(default)]
    #[validate(range(min = -840, max = 840))]
    pub utc_offset_minutes: i32,

    #[validate(length(min = 1, max = 200))]
    pub location: String,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// Request for editing a match; absent fields are left as they are
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMatchRequest {
    #[validate(length(min = 1, max = 100))]
    pub opponent: Option<String>,

    pub date_time: Option<String>,

    /// Required whenever `date_time` is sent
    #[validate(range(min = -840, max = 840))]
    pub utc_offset_minutes: Option<i32>,

    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,

    /// An empty string clears the notes
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl UpdateMatchRequest {
    fn into_changes(self) -> Result<MatchChanges> {
        let date_time = match (self.date_time.as_deref(), self.utc_offset_minutes) {
            (Some(local), Some(offset)) => Some(local_to_utc(local, offset)?),
            (Some(_), None) => {
                return Err(Error::Validation(
                    "utc_offset_minutes is required with date_time".to_string(),
                ))
            }
            (None, _) => None,
        };

        Ok(MatchChanges {
            opponent: self.opponent,
            date_time,
            location: self.location,
            notes: self.notes.map(Some),
        })
    }
}

/// List upcoming matches
///
/// **GET /v1/matches**
pub async fn list_matches(
    CoachUser(session): CoachUser,
    State(state): State<MatchesState>,
    Query(query): Query<OffsetQuery>,
) -> Result<Json<Vec<MatchView>>> {
    let team = state.coach_team(session.user_id()).await?;

    let matches = state
        .repos
        .matches
        .list_upcoming(team.id, Utc::now(), None)
        .await?;

    let views = matches
        .into_iter()
        .map(|m| MatchView::new(m, query.utc_offset_minutes))
        .collect::<Result<Vec<_>>>()?;

    Ok(Json(views))
}

/// Schedule a match
///
/// **POST /v1/matches**
///
/// `date_time` is converted to UTC with `utc_offset_minutes` before it is
/// stored. The response renders it back at the same offset.
pub async fn create_match(
    CoachUser(session): CoachUser,
    State(state): State<MatchesState>,
    ValidatedJson(request): ValidatedJson<CreateMatchRequest>,
) -> Result<(StatusCode, Json<MatchView>)> {
    let team = state.coach_team(session.user_id()).await?;

    let date_time = local_to_utc(&request.date_time, request.utc_offset_minutes)?;
    let m = Match::new(
        team.id,
        &request.opponent,
        date_time,
        &request.location,
        request.notes,
    )?;

    let created = state.repos.matches.create(&m).await?;

    tracing::info!(
        match_id = %created.id,
        team_id = %team.id,
        date_time = %created.date_time,
        "Match scheduled"
    );

    Ok((
        StatusCode::CREATED,
        Json(MatchView::new(created, Some(request.utc_offset_minutes))?),
    ))
}

/// Edit a match
///
/// **PATCH /v1/matches/{id}**
pub async fn update_match(
    CoachUser(session): CoachUser,
    State(state): State<MatchesState>,
    Path(match_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateMatchRequest>,
) -> Result<Json<MatchView>> {
    let team = state.coach_team(session.user_id()).await?;

    let mut m = state
        .repos
        .matches
        .get_for_team(match_id, team.id)
        .await?
        .ok_or_else(|| Error::NotFound("Match not found".to_string()))?;

    let offset = request.utc_offset_minutes;
    m.apply(request.into_changes()?)?;

    let updated = state
        .repos
        .matches
        .update(&m)
        .await?
        .ok_or_else(|| Error::NotFound("Match not found".to_string()))?;

    tracing::info!(match_id = %updated.id, team_id = %team.id, "Match updated");

    Ok(Json(MatchView::new(updated, offset)?))
}

/// Cancel a match
///
/// **DELETE /v1/matches/{id}**
pub async fn delete_match(
    CoachUser(session): CoachUser,
    State(state): State<MatchesState>,
    Path(match_id): Path<Uuid>,
) -> Result<StatusCode> {
    let team = state.coach_team(session.user_id()).await?;

    if !state.repos.matches.delete(match_id, team.id).await? {
        return Err(Error::NotFound("Match not found".to_string()));
    }

    tracing::info!(match_id = %match_id, team_id = %team.id, "Match cancelled");

    Ok(StatusCode::NO_CONTENT)
}
