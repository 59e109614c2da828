//! Team repository

use crate::domain::entities::{Team, TeamCode};
use huddleup_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct TeamRepository {
    pool: PgPool,
}

impl TeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find team by ID
    pub async fn get_by_id(&self, team_id: Uuid) -> Result<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, team_name, team_code, coach_id, sport, age_group,
                   created_at, updated_at
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(team)
    }

    /// Find team by its (already normalized) code
    pub async fn find_by_code(&self, code: &TeamCode) -> Result<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, team_name, team_code, coach_id, sport, age_group,
                   created_at, updated_at
            FROM teams
            WHERE team_code = $1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(team)
    }

    /// Team owned by a coach
    pub async fn find_by_coach(&self, coach_id: Uuid) -> Result<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, team_name, team_code, coach_id, sport, age_group,
                   created_at, updated_at
            FROM teams
            WHERE coach_id = $1
            "#,
        )
        .bind(coach_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(team)
    }

    /// Team of any member: the team a coach owns or the team a player joined.
    ///
    /// `None` means the user has no team yet, which is a normal state.
    pub async fn find_for_member(&self, user_id: Uuid) -> Result<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT t.id, t.team_name, t.team_code, t.coach_id, t.sport, t.age_group,
                   t.created_at, t.updated_at
            FROM users u
            INNER JOIN teams t
                ON (u.role = 'coach' AND t.coach_id = u.id)
                OR (u.role = 'player' AND t.id = u.team_id)
            WHERE u.id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(team)
    }
}
