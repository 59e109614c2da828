//! Match repository

use chrono::{DateTime, Utc};
use huddleup_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{Match, PlayerMatch};

#[derive(Clone)]
pub struct MatchRepository {
    pool: PgPool,
}

impl MatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new match
    pub async fn create(&self, m: &Match) -> Result<Match> {
        let created = sqlx::query_as::<_, Match>(
            r#"
            INSERT INTO matches (id, team_id, opponent, date_time, location, notes,
                                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, team_id, opponent, date_time, location, notes,
                      created_at, updated_at
            "#,
        )
        .bind(m.id)
        .bind(m.team_id)
        .bind(&m.opponent)
        .bind(m.date_time)
        .bind(&m.location)
        .bind(&m.notes)
        .bind(m.created_at)
        .bind(m.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Find a match, scoped to a team
    pub async fn get_for_team(&self, id: Uuid, team_id: Uuid) -> Result<Option<Match>> {
        let m = sqlx::query_as::<_, Match>(
            r#"
            SELECT id, team_id, opponent, date_time, location, notes,
                   created_at, updated_at
            FROM matches
            WHERE id = $1 AND team_id = $2
            "#,
        )
        .bind(id)
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(m)
    }

    /// Matches at or after `from`, soonest first. `limit = None` returns all.
    pub async fn list_upcoming(
        &self,
        team_id: Uuid,
        from: DateTime<Utc>,
        limit: Option<i64>,
    ) -> Result<Vec<Match>> {
        let matches = sqlx::query_as::<_, Match>(
            r#"
            SELECT id, team_id, opponent, date_time, location, notes,
                   created_at, updated_at
            FROM matches
            WHERE team_id = $1 AND date_time >= $2
            ORDER BY date_time ASC, id ASC
            LIMIT $3
            "#,
        )
        .bind(team_id)
        .bind(from)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(matches)
    }

    /// Upcoming matches of a team with one player's answer attached
    pub async fn list_upcoming_for_player(
        &self,
        team_id: Uuid,
        player_id: Uuid,
        from: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<PlayerMatch>> {
        let matches = sqlx::query_as::<_, PlayerMatch>(
            r#"
            SELECT m.id, m.team_id, m.opponent, m.date_time, m.location, m.notes,
                   m.created_at, m.updated_at,
                   r.status AS rsvp
            FROM matches m
            LEFT JOIN match_responses r
                ON r.match_id = m.id AND r.player_id = $2
            WHERE m.team_id = $1 AND m.date_time >= $3
            ORDER BY m.date_time ASC, m.id ASC
            LIMIT $4
            "#,
        )
        .bind(team_id)
        .bind(player_id)
        .bind(from)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(matches)
    }

    /// Persist edited fields
    pub async fn update(&self, m: &Match) -> Result<Option<Match>> {
        let updated = sqlx::query_as::<_, Match>(
            r#"
            UPDATE matches SET
                opponent = $3,
                date_time = $4,
                location = $5,
                notes = $6,
                updated_at = NOW()
            WHERE id = $1 AND team_id = $2
            RETURNING id, team_id, opponent, date_time, location, notes,
                      created_at, updated_at
            "#,
        )
        .bind(m.id)
        .bind(m.team_id)
        .bind(&m.opponent)
        .bind(m.date_time)
        .bind(&m.location)
        .bind(&m.notes)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Cancel a match. Responses go with it.
    pub async fn delete(&self, id: Uuid, team_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM matches WHERE id = $1 AND team_id = $2")
            .bind(id)
            .bind(team_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
