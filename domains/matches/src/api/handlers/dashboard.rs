//! Dashboard aggregation handlers
//!
//! - GET /v1/dashboard/coach - Team, roster counts, upcoming matches with tallies
//! - GET /v1/dashboard/player - Team, coach, own status, next matches with own RSVP

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use huddleup_common::{LimitQuery, Result};
use huddleup_teams::api::handlers::roster::StatusCount;
use huddleup_teams::{PlayerStatus, TeamResponse, UserResponse};

use crate::api::handlers::matches::MatchView;
use crate::api::handlers::rsvp::PlayerMatchView;
use crate::api::middleware::{CoachUser, MatchesState, PlayerUser};
use crate::domain::tally::RsvpTally;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

impl DashboardQuery {
    fn limit(&self) -> i64 {
        LimitQuery { limit: self.limit }.limit()
    }
}

#[derive(Debug, Serialize)]
pub struct MatchWithTally {
    #[serde(flatten)]
    pub details: MatchView,
    pub tally: RsvpTally,
}

#[derive(Debug, Serialize)]
pub struct CoachDashboard {
    pub team: TeamResponse,
    pub player_count: usize,
    pub status_breakdown: Vec<StatusCount>,
    pub upcoming_matches: Vec<MatchWithTally>,
}

#[derive(Debug, Serialize)]
pub struct PlayerDashboard {
    pub team: TeamResponse,
    pub coach: Option<UserResponse>,
    pub status: PlayerStatus,
    pub upcoming_matches: Vec<PlayerMatchView>,
}

/// Coach dashboard
///
/// **GET /v1/dashboard/coach**
///
/// Tallies come from one grouped query over the upcoming matches and only
/// count players currently on the team.
pub async fn coach_dashboard(
    CoachUser(session): CoachUser,
    State(state): State<MatchesState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<CoachDashboard>> {
    let team = state.coach_team(session.user_id()).await?;
    let roster = state.teams.roster(team).await?;

    let matches = state
        .repos
        .matches
        .list_upcoming(roster.team.id, Utc::now(), Some(query.limit()))
        .await?;

    let match_ids: Vec<Uuid> = matches.iter().map(|m| m.id).collect();
    let rows = state
        .repos
        .responses
        .count_by_status(roster.team.id, &match_ids)
        .await?;
    let roster_size = u32::try_from(roster.player_count()).unwrap_or(u32::MAX);
    let tallies = RsvpTally::per_match(&match_ids, &rows, roster_size);

    let upcoming_matches = matches
        .into_iter()
        .map(|m| -> Result<MatchWithTally> {
            let tally = tallies.get(&m.id).copied().unwrap_or_default();
            Ok(MatchWithTally {
                details: MatchView::new(m, query.utc_offset_minutes)?,
                tally,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let player_count = roster.player_count();
    let status_breakdown = roster
        .status_breakdown()
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect();

    Ok(Json(CoachDashboard {
        team: roster.team.into(),
        player_count,
        status_breakdown,
        upcoming_matches,
    }))
}

/// Player dashboard
///
/// **GET /v1/dashboard/player**
pub async fn player_dashboard(
    PlayerUser(session): PlayerUser,
    State(state): State<MatchesState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<PlayerDashboard>> {
    let (user, team) = state.player_team(session.user_id()).await?;
    let coach = state.teams.users.get_by_id(team.coach_id).await?;

    let upcoming_matches = state
        .repos
        .matches
        .list_upcoming_for_player(team.id, user.id, Utc::now(), query.limit())
        .await?
        .into_iter()
        .map(|m| PlayerMatchView::new(m, query.utc_offset_minutes))
        .collect::<Result<Vec<_>>>()?;

    Ok(Json(PlayerDashboard {
        team: team.into(),
        coach: coach.map(UserResponse::from),
        status: user.status,
        upcoming_matches,
    }))
}
