//! Session read-model types
//!
//! Lightweight views of the rows owned by the teams domain, carrying only
//! what authentication and routing decisions need.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role chosen by a user after sign-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Coach,
    Player,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Coach => "coach",
            Role::Player => "player",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coach" => Ok(Role::Coach),
            "player" => Ok(Role::Player),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Identity of the signed-in user.
///
/// `team_id` is derived: the team a coach owns, or the team a player joined.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: Option<Role>,
    pub team_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
