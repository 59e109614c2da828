//! User repository

use crate::domain::entities::{PlayerStatus, User};
use huddleup_auth::Role;
use huddleup_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, role, team_id, phone, playing_position,
                   status, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Set the role if it is unset (or already equal).
    ///
    /// Returns `None` when the user holds a different role; the caller
    /// reports that as a conflict.
    pub async fn set_role(&self, id: Uuid, role: Role) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                role = $2,
                updated_at = NOW()
            WHERE id = $1 AND (role IS NULL OR role = $2)
            RETURNING id, email, name, role, team_id, phone, playing_position,
                      status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update profile fields; `None` leaves a field unchanged
    pub async fn update_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        phone: Option<String>,
        playing_position: Option<String>,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                playing_position = COALESCE($4, playing_position),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, name, role, team_id, phone, playing_position,
                      status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(phone)
        .bind(playing_position)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Set a player's availability
    pub async fn set_status(&self, id: Uuid, status: PlayerStatus) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                status = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, name, role, team_id, phone, playing_position,
                      status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Players of a team, by name
    pub async fn list_players(&self, team_id: Uuid) -> Result<Vec<User>> {
        let players = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, role, team_id, phone, playing_position,
                   status, created_at, updated_at
            FROM users
            WHERE team_id = $1 AND role = 'player'
            ORDER BY COALESCE(name, email) ASC, id ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(players)
    }

    /// Detach a player from a team. Returns false if they were not on it.
    pub async fn remove_from_team(&self, player_id: Uuid, team_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                team_id = NULL,
                updated_at = NOW()
            WHERE id = $1 AND team_id = $2 AND role = 'player'
            "#,
        )
        .bind(player_id)
        .bind(team_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
