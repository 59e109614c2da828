//! Chat domain state and auth backend integration

use axum::extract::FromRef;
use huddleup_auth::AuthBackend;
use huddleup_common::{Error, RealtimeHub, Result};
use huddleup_teams::{Team, TeamsRepositories};
use uuid::Uuid;

use crate::MessageRepository;

pub use huddleup_auth::AuthUser;

/// Application state for the Chat domain
#[derive(Clone)]
pub struct ChatState {
    pub messages: MessageRepository,
    pub teams: TeamsRepositories,
    pub auth: AuthBackend,
    pub realtime: RealtimeHub,
}

impl FromRef<ChatState> for AuthBackend {
    fn from_ref(state: &ChatState) -> Self {
        state.auth.clone()
    }
}

impl ChatState {
    /// Team the caller coaches or plays for
    pub(crate) async fn member_team(&self, user_id: Uuid) -> Result<Team> {
        self.teams
            .teams
            .find_for_member(user_id)
            .await?
            .ok_or_else(|| Error::NotFound("No team found".to_string()))
    }
}
