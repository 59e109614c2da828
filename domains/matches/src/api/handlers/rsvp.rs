//! RSVP handlers (player only)
//!
//! - GET /v1/player/matches - The player's next matches with their answer
//! - PUT /v1/matches/{id}/rsvp - Confirm or decline a match

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use huddleup_common::{Error, LimitQuery, Result, ValidatedJson};

use crate::api::handlers::matches::MatchView;
use crate::api::middleware::{MatchesState, PlayerUser};
use crate::domain::entities::{MatchResponse, PlayerMatch, RsvpStatus};

#[derive(Debug, Serialize)]
pub struct PlayerMatchView {
    #[serde(flatten)]
    pub details: MatchView,
    pub rsvp: Option<RsvpStatus>,
}

impl PlayerMatchView {
    pub fn new(m: PlayerMatch, utc_offset_minutes: Option<i32>) -> Result<Self> {
        Ok(Self {
            details: MatchView::new(m.details, utc_offset_minutes)?,
            rsvp: m.rsvp,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct PlayerMatchesQuery {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

impl PlayerMatchesQuery {
    pub fn limit(&self) -> i64 {
        LimitQuery { limit: self.limit }.limit()
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RsvpRequest {
    pub status: RsvpStatus,
}

/// The player's upcoming matches
///
/// **GET /v1/player/matches?limit=n**
pub async fn list_player_matches(
    PlayerUser(session): PlayerUser,
    State(state): State<MatchesState>,
    Query(query): Query<PlayerMatchesQuery>,
) -> Result<Json<Vec<PlayerMatchView>>> {
    let (user, team) = state.player_team(session.user_id()).await?;

    let matches = state
        .repos
        .matches
        .list_upcoming_for_player(team.id, user.id, Utc::now(), query.limit())
        .await?;

    let views = matches
        .into_iter()
        .map(|m| PlayerMatchView::new(m, query.utc_offset_minutes))
        .collect::<Result<Vec<_>>>()?;

    Ok(Json(views))
}

/// Answer a match
///
/// **PUT /v1/matches/{id}/rsvp**
///
/// Creates the player's response or replaces its status. There is only
/// ever one response per player and match. Matches that have already
/// started are closed to answers.
pub async fn respond(
    PlayerUser(session): PlayerUser,
    State(state): State<MatchesState>,
    Path(match_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<RsvpRequest>,
) -> Result<Json<MatchResponse>> {
    let (user, team) = state.player_team(session.user_id()).await?;

    let m = state
        .repos
        .matches
        .get_for_team(match_id, team.id)
        .await?
        .ok_or_else(|| Error::NotFound("Match not found".to_string()))?;

    if !m.is_upcoming(Utc::now()) {
        return Err(Error::Conflict("Match has already been played".to_string()));
    }

    let response = state
        .repos
        .responses
        .upsert(match_id, user.id, request.status)
        .await?;

    tracing::info!(
        match_id = %match_id,
        player_id = %user.id,
        status = %request.status,
        "RSVP recorded"
    );

    Ok(Json(response))
}
