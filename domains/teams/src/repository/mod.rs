//! Repository implementations for Teams domain

pub mod teams;
pub mod transactions;
pub mod users;

use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::entities::{Roster, Team};
use huddleup_common::Result;

pub use teams::TeamRepository;
pub use transactions::{create_team_tx, join_team_tx, lock_user_tx, set_role_tx};
pub use users::UserRepository;

/// Combined repository access for the Teams domain
#[derive(Clone)]
pub struct TeamsRepositories {
    pool: PgPool,
    pub users: UserRepository,
    pub teams: TeamRepository,
}

impl TeamsRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            teams: TeamRepository::new(pool.clone()),
            pool,
        }
    }

    /// Begin a new database transaction.
    pub async fn begin(&self) -> std::result::Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Team plus its coach and derived players
    pub async fn roster(&self, team: Team) -> Result<Roster> {
        let coach = self.users.get_by_id(team.coach_id).await?;
        let players = self.users.list_players(team.id).await?;
        Ok(Roster {
            team,
            coach,
            players,
        })
    }
}
