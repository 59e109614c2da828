//! API layer for the Matches domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::MatchesState;
pub use routes::routes;
