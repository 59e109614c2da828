//! Matches domain: scheduling, RSVPs and dashboards

pub mod api;
pub mod domain;
pub mod repository;

pub use domain::entities::*;
pub use domain::tally::{RsvpTally, StatusCountRow};
pub use repository::{MatchRepository, MatchesRepositories, ResponseRepository};

pub use api::routes;
pub use api::MatchesState;
