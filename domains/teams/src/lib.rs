//! Teams domain: profiles, roles, team setup and join, roster, invites

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use domain::routing::{resolve as resolve_destination, Destination};
// Re-export repository types
pub use repository::{
    create_team_tx, join_team_tx, lock_user_tx, set_role_tx, TeamRepository, TeamsRepositories,
    UserRepository,
};

// Re-export API types
pub use api::handlers::teams::TeamResponse;
pub use api::handlers::users::UserResponse;
pub use api::routes;
pub use api::TeamsState;
