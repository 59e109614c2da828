//! Matches domain state and auth backend integration

use axum::extract::FromRef;
use huddleup_auth::AuthBackend;
use huddleup_common::{Error, Result};
use huddleup_teams::{Team, TeamsRepositories, User};
use uuid::Uuid;

use crate::MatchesRepositories;

pub use huddleup_auth::{AuthUser, CoachUser, PlayerUser};

/// Application state for the Matches domain
#[derive(Clone)]
pub struct MatchesState {
    pub repos: MatchesRepositories,
    pub teams: TeamsRepositories,
    pub auth: AuthBackend,
}

impl FromRef<MatchesState> for AuthBackend {
    fn from_ref(state: &MatchesState) -> Self {
        state.auth.clone()
    }
}

impl MatchesState {
    /// Team owned by a coach
    pub(crate) async fn coach_team(&self, coach_id: Uuid) -> Result<Team> {
        self.teams
            .teams
            .find_by_coach(coach_id)
            .await?
            .ok_or_else(|| Error::NotFound("No team found".to_string()))
    }

    /// A player's profile and the team they are on
    pub(crate) async fn player_team(&self, player_id: Uuid) -> Result<(User, Team)> {
        let user = self
            .teams
            .users
            .get_by_id(player_id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

        let team_id = user
            .team_id
            .ok_or_else(|| Error::NotFound("No team found".to_string()))?;
        let team = self
            .teams
            .teams
            .get_by_id(team_id)
            .await?
            .ok_or_else(|| Error::NotFound("No team found".to_string()))?;

        Ok((user, team))
    }
}
