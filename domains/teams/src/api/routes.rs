//! Route definitions for Teams domain API

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use super::handlers::{roster, session, teams, users};
use super::middleware::TeamsState;

/// Session, role selection and guard routes
fn session_routes() -> Router<TeamsState> {
    Router::new()
        .route("/v1/session", get(session::get_session))
        .route("/v1/session/role", post(session::select_role))
        .route("/v1/session/access", get(session::check_access))
}

/// Profile routes
fn user_routes() -> Router<TeamsState> {
    Router::new()
        .route("/v1/account", patch(users::update_profile))
        .route("/v1/account/status", put(users::set_status))
}

/// Team setup and join routes
fn team_routes() -> Router<TeamsState> {
    Router::new()
        .route("/v1/teams", post(teams::create_team))
        .route("/v1/teams/join", post(teams::join_team))
        .route("/v1/team/invites", post(teams::invite_player))
}

/// Roster routes
fn roster_routes() -> Router<TeamsState> {
    Router::new()
        .route("/v1/team", get(roster::get_team))
        .route("/v1/team/stream", get(roster::team_stream))
        .route(
            "/v1/team/players/{user_id}",
            delete(roster::remove_player),
        )
}

/// Create all Teams domain API routes
pub fn routes() -> Router<TeamsState> {
    Router::new()
        .merge(session_routes())
        .merge(user_routes())
        .merge(team_routes())
        .merge(roster_routes())
}
