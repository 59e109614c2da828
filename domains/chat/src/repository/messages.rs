//! Message repository

use huddleup_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{Message, NewMessage};

/// Sender name falls back to the email local part
const SELECT_MESSAGE: &str = r#"
    SELECT m.id, m.team_id, m.sender_id,
           COALESCE(NULLIF(btrim(u.name), ''), split_part(u.email, '@', 1)) AS sender_name,
           m.text, m.created
    FROM messages m
    INNER JOIN users u ON u.id = m.sender_id
"#;

#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Latest `limit` messages of a team, oldest first
    pub async fn list_recent(&self, team_id: Uuid, limit: i64) -> Result<Vec<Message>> {
        let query = format!(
            "SELECT * FROM ({} WHERE m.team_id = $1 ORDER BY m.created DESC, m.id DESC LIMIT $2) recent
             ORDER BY created ASC, id ASC",
            SELECT_MESSAGE
        );
        let messages = sqlx::query_as::<_, Message>(&query)
            .bind(team_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(messages)
    }

    /// Find a message, scoped to a team
    pub async fn get_for_team(&self, id: Uuid, team_id: Uuid) -> Result<Option<Message>> {
        let query = format!("{} WHERE m.id = $1 AND m.team_id = $2", SELECT_MESSAGE);
        let message = sqlx::query_as::<_, Message>(&query)
            .bind(id)
            .bind(team_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(message)
    }

    /// Insert a message and return it with the sender's name
    pub async fn create(&self, msg: &NewMessage) -> Result<Message> {
        let created = sqlx::query_as::<_, Message>(
            r#"
            WITH inserted AS (
                INSERT INTO messages (id, team_id, sender_id, text, created)
                VALUES ($1, $2, $3, $4, NOW())
                RETURNING id, team_id, sender_id, text, created
            )
            SELECT i.id, i.team_id, i.sender_id,
                   COALESCE(NULLIF(btrim(u.name), ''), split_part(u.email, '@', 1)) AS sender_name,
                   i.text, i.created
            FROM inserted i
            INNER JOIN users u ON u.id = i.sender_id
            "#,
        )
        .bind(msg.id)
        .bind(msg.team_id)
        .bind(msg.sender_id)
        .bind(&msg.text)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}
