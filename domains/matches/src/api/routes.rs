//! Route definitions for Matches domain API

use axum::{
    routing::{get, patch, put},
    Router,
};

use super::handlers::{dashboard, matches, rsvp};
use super::middleware::MatchesState;

/// Coach scheduling routes
fn match_routes() -> Router<MatchesState> {
    Router::new()
        .route(
            "/v1/matches",
            get(matches::list_matches).post(matches::create_match),
        )
        .route(
            "/v1/matches/{id}",
            patch(matches::update_match).delete(matches::delete_match),
        )
}

/// Player RSVP routes
fn rsvp_routes() -> Router<MatchesState> {
    Router::new()
        .route("/v1/player/matches", get(rsvp::list_player_matches))
        .route("/v1/matches/{id}/rsvp", put(rsvp::respond))
}

fn dashboard_routes() -> Router<MatchesState> {
    Router::new()
        .route("/v1/dashboard/coach", get(dashboard::coach_dashboard))
        .route("/v1/dashboard/player", get(dashboard::player_dashboard))
}

/// Create all Matches domain API routes
pub fn routes() -> Router<MatchesState> {
    Router::new()
        .merge(match_routes())
        .merge(rsvp_routes())
        .merge(dashboard_routes())
}
