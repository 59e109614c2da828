//! Repository implementations for Matches domain

pub mod matches;
pub mod responses;

use sqlx::PgPool;

pub use matches::MatchRepository;
pub use responses::ResponseRepository;

/// Combined repository access for the Matches domain
#[derive(Clone)]
pub struct MatchesRepositories {
    pub matches: MatchRepository,
    pub responses: ResponseRepository,
}

impl MatchesRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            matches: MatchRepository::new(pool.clone()),
            responses: ResponseRepository::new(pool),
        }
    }
}
