//! Teams domain state and auth backend integration

use crate::TeamsRepositories;
use axum::extract::FromRef;
use huddleup_auth::AuthBackend;
use huddleup_common::RealtimeHub;
use huddleup_email::EmailService;
use std::sync::Arc;

pub use huddleup_auth::{AuthUser, CoachUser, PlayerUser};

/// Application state for the Teams domain
#[derive(Clone)]
pub struct TeamsState {
    pub repos: TeamsRepositories,
    pub auth: AuthBackend,
    pub email: Arc<dyn EmailService>,
    pub realtime: RealtimeHub,
}

impl FromRef<TeamsState> for AuthBackend {
    fn from_ref(state: &TeamsState) -> Self {
        state.auth.clone()
    }
}
