//! Transactional free functions for the teams domain
//!
//! Team setup and team join touch several rows and run inside one
//! transaction each; these helpers take the open transaction.

use crate::domain::entities::{Team, User};
use huddleup_auth::Role;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

/// Load a user and lock the row until the transaction ends.
pub async fn lock_user_tx(
    transaction: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> std::result::Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, name, role, team_id, phone, playing_position,
               status, created_at, updated_at
        FROM users
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(user_id)
    .fetch_optional(&mut **transaction)
    .await
}

/// Insert a team within an existing transaction.
///
/// A duplicate `team_code` surfaces as a unique violation; the caller
/// regenerates the code and retries.
pub async fn create_team_tx(
    transaction: &mut Transaction<'_, Postgres>,
    team: &Team,
) -> std::result::Result<Team, sqlx::Error> {
    sqlx::query_as::<_, Team>(
        r#"
        INSERT INTO teams (id, team_name, team_code, coach_id, sport, age_group,
                           created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, team_name, team_code, coach_id, sport, age_group,
                  created_at, updated_at
        "#,
    )
    .bind(team.id)
    .bind(&team.team_name)
    .bind(&team.team_code)
    .bind(team.coach_id)
    .bind(&team.sport)
    .bind(&team.age_group)
    .bind(team.created_at)
    .bind(team.updated_at)
    .fetch_one(&mut **transaction)
    .await
}

/// Set a user's role within an existing transaction.
pub async fn set_role_tx(
    transaction: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    role: Role,
) -> std::result::Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE users SET
            role = $2,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(role)
    .execute(&mut **transaction)
    .await?;
    Ok(())
}

/// Attach a player to a team and record their contact details.
pub async fn join_team_tx(
    transaction: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    team_id: Uuid,
    phone: &str,
    playing_position: &str,
) -> std::result::Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET
            role = 'player',
            team_id = $2,
            phone = $3,
            playing_position = $4,
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, email, name, role, team_id, phone, playing_position,
                  status, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(team_id)
    .bind(phone)
    .bind(playing_position)
    .fetch_one(&mut **transaction)
    .await
}
