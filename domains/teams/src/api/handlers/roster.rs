//! Roster handlers
//!
//! - GET /v1/team - The caller's team with coach and players
//! - GET /v1/team/stream - Roster snapshots pushed on change (SSE)
//! - DELETE /v1/team/players/{user_id} - Coach removes a player

use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use huddleup_common::{Collection, Error, NotificationAction, Result, SubscriptionEvent};

use crate::api::handlers::teams::TeamResponse;
use crate::api::handlers::users::UserResponse;
use crate::api::middleware::{AuthUser, CoachUser, TeamsState};
use crate::{PlayerStatus, Roster};

#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: PlayerStatus,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct RosterResponse {
    pub team: TeamResponse,
    pub coach: Option<UserResponse>,
    pub players: Vec<UserResponse>,
    pub player_count: usize,
    pub status_breakdown: Vec<StatusCount>,
}

impl From<Roster> for RosterResponse {
    fn from(roster: Roster) -> Self {
        let player_count = roster.player_count();
        let status_breakdown = roster
            .status_breakdown()
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect();

        Self {
            team: roster.team.into(),
            coach: roster.coach.map(UserResponse::from),
            players: roster.players.into_iter().map(UserResponse::from).collect(),
            player_count,
            status_breakdown,
        }
    }
}

/// Get the caller's team
///
/// **GET /v1/team**
pub async fn get_team(
    AuthUser(session): AuthUser,
    State(state): State<TeamsState>,
) -> Result<Json<RosterResponse>> {
    let team = state
        .repos
        .teams
        .find_for_member(session.user_id())
        .await?
        .ok_or_else(|| Error::NotFound("No team found".to_string()))?;

    let roster = state.repos.roster(team).await?;
    Ok(Json(roster.into()))
}

fn roster_event(seq: u64, roster: Roster) -> Event {
    let data = serde_json::to_string(&RosterResponse::from(roster))
        .unwrap_or_else(|_| "{}".to_string());
    Event::default()
        .id(seq.to_string())
        .event("roster")
        .data(data)
}

/// Roster stream
///
/// **GET /v1/team/stream**
///
/// Sends the current roster, then a fresh roster after every change.
/// Notifications that arrive while a refetch is pending are folded into a
/// single refetch.
pub async fn team_stream(
    AuthUser(session): AuthUser,
    State(state): State<TeamsState>,
) -> Result<Sse<impl futures_core::Stream<Item = std::result::Result<Event, Infallible>>>> {
    let team = state
        .repos
        .teams
        .find_for_member(session.user_id())
        .await?
        .ok_or_else(|| Error::NotFound("No team found".to_string()))?;

    let team_id = team.id;
    let mut subscription = state.realtime.subscribe(Collection::Roster, team_id);
    let initial_seq = state.realtime.current_seq();
    let repos = state.repos.clone();
    let hub = state.realtime.clone();

    tracing::debug!(team_id = %team_id, user_id = %session.user_id(), "Roster stream opened");

    let stream = async_stream::stream! {
        match repos.roster(team).await {
            Ok(roster) => yield Ok(roster_event(initial_seq, roster)),
            Err(e) => {
                tracing::error!(error = %e, team_id = %team_id, "Initial roster fetch failed");
                return;
            }
        }

        while let Some(event) = subscription.next_coalesced().await {
            let seq = match event {
                SubscriptionEvent::Notification(n) => n.seq,
                SubscriptionEvent::Lagged(missed) => {
                    tracing::debug!(team_id = %team_id, missed, "Roster stream lagged, refetching");
                    hub.current_seq()
                }
            };

            let team = match repos.teams.get_by_id(team_id).await {
                Ok(Some(team)) => team,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(error = %e, team_id = %team_id, "Roster refetch failed");
                    break;
                }
            };

            match repos.roster(team).await {
                Ok(roster) => yield Ok(roster_event(seq, roster)),
                Err(e) => {
                    tracing::error!(error = %e, team_id = %team_id, "Roster refetch failed");
                    break;
                }
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Remove a player from the coach's team
///
/// **DELETE /v1/team/players/{user_id}**
///
/// Clears the player's team link; their past RSVPs stay.
pub async fn remove_player(
    CoachUser(session): CoachUser,
    State(state): State<TeamsState>,
    Path(player_id): Path<Uuid>,
) -> Result<StatusCode> {
    let team = state
        .repos
        .teams
        .find_by_coach(session.user_id())
        .await?
        .ok_or_else(|| Error::NotFound("No team found".to_string()))?;

    let removed = state
        .repos
        .users
        .remove_from_team(player_id, team.id)
        .await?;
    if !removed {
        return Err(Error::NotFound("Player not found on this team".to_string()));
    }

    state.realtime.publish(
        Collection::Roster,
        team.id,
        player_id,
        NotificationAction::Delete,
    );

    tracing::info!(team_id = %team.id, player_id = %player_id, "Player removed from team");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::tests::user;
    use crate::Team;
    use huddleup_auth::Role;

    #[test]
    fn test_roster_response_counts() {
        let team = Team::new(Uuid::new_v4(), "Lightning", "Football", "Open").unwrap();
        let mut unavailable = user(Some(Role::Player), Some(team.id));
        unavailable.status = PlayerStatus::Unavailable;

        let roster = Roster {
            coach: Some(user(Some(Role::Coach), None)),
            players: vec![user(Some(Role::Player), Some(team.id)), unavailable],
            team,
        };

        let json = serde_json::to_value(RosterResponse::from(roster)).unwrap();
        assert_eq!(json["player_count"], 2);
        assert_eq!(json["status_breakdown"][0]["status"], "available");
        assert_eq!(json["status_breakdown"][0]["count"], 1);
        assert_eq!(json["status_breakdown"][1]["status"], "unavailable");
        assert_eq!(json["status_breakdown"][1]["count"], 1);
        assert_eq!(json["status_breakdown"][2]["count"], 0);
        assert_eq!(json["coach"]["role"], "coach");
    }
}
