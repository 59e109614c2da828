//! Match response (RSVP) repository

use huddleup_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{MatchResponse, RsvpStatus};
use crate::domain::tally::StatusCountRow;

#[derive(Clone)]
pub struct ResponseRepository {
    pool: PgPool,
}

impl ResponseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create or replace a player's answer for a match.
    ///
    /// Single statement against the (match_id, player_id) unique index, so
    /// concurrent answers can never leave two rows.
    pub async fn upsert(
        &self,
        match_id: Uuid,
        player_id: Uuid,
        status: RsvpStatus,
    ) -> Result<MatchResponse> {
        let response = sqlx::query_as::<_, MatchResponse>(
            r#"
            INSERT INTO match_responses (id, match_id, player_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            ON CONFLICT (match_id, player_id)
            DO UPDATE SET status = EXCLUDED.status, updated_at = NOW()
            RETURNING id, match_id, player_id, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(match_id)
        .bind(player_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(response)
    }

    /// Grouped counts per (match, status), current players only
    pub async fn count_by_status(
        &self,
        team_id: Uuid,
        match_ids: &[Uuid],
    ) -> Result<Vec<StatusCountRow>> {
        if match_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, StatusCountRow>(
            r#"
            SELECT r.match_id, r.status, COUNT(*) AS count
            FROM match_responses r
            INNER JOIN users u ON u.id = r.player_id
            WHERE r.match_id = ANY($2) AND u.team_id = $1 AND u.role = 'player'
            GROUP BY r.match_id, r.status
            "#,
        )
        .bind(team_id)
        .bind(match_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
