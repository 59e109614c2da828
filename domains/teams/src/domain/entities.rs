//! Domain entities for the HuddleUp teams domain
//!
//! Users (profiles), teams, and the team code that links them. A team's
//! player list is never stored: it is every user whose `team_id` points at
//! the team and whose role is player.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use huddleup_auth::Role;
use huddleup_common::{Error, Result};

use crate::domain::validation::{validate_age_group, validate_sport, TEAM_CODE_REGEX};

/// Length of a team code
pub const TEAM_CODE_LEN: usize = 6;

/// Alphabet team codes are drawn from
const TEAM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Sports a team can be set up for
pub const SPORTS: &[&str] = &[
    "Football",
    "Basketball",
    "Cricket",
    "Volleyball",
    "Tennis",
    "Baseball",
    "Hockey",
];

/// Age groups a team can be set up for
pub const AGE_GROUPS: &[&str] = &[
    "Under-9", "Under-11", "Under-13", "Under-15", "Under-17", "Under-19", "Open",
];

/// Player availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "player_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    #[default]
    Available,
    Unavailable,
    Injured,
}

impl PlayerStatus {
    pub const ALL: [PlayerStatus; 3] = [
        PlayerStatus::Available,
        PlayerStatus::Unavailable,
        PlayerStatus::Injured,
    ];
}

impl std::fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerStatus::Available => write!(f, "available"),
            PlayerStatus::Unavailable => write!(f, "unavailable"),
            PlayerStatus::Injured => write!(f, "injured"),
        }
    }
}

/// User profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: Option<Role>,
    /// Team a player belongs to. Coaches reach their team via `Team::coach_id`.
    pub team_id: Option<Uuid>,
    pub phone: Option<String>,
    pub playing_position: Option<String>,
    pub status: PlayerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Name to show to other users, falling back to the email local part
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.email.split('@').next().unwrap_or_default().to_string(),
        }
    }

    /// Decide whether this user may take `requested` as their role.
    ///
    /// Returns `Ok(true)` when the role must be written, `Ok(false)` when it
    /// is already set to the same value. A role is immutable once chosen.
    pub fn can_take_role(&self, requested: Role) -> Result<bool> {
        match self.role {
            None => Ok(true),
            Some(current) if current == requested => Ok(false),
            Some(current) => Err(Error::Conflict(format!(
                "Role is already set to {}",
                current
            ))),
        }
    }
}

/// Team entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    pub id: Uuid,
    pub team_name: String,
    pub team_code: String,
    pub coach_id: Uuid,
    pub sport: String,
    pub age_group: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Create a new team owned by `coach_id`, with a fresh team code
    pub fn new(coach_id: Uuid, team_name: &str, sport: &str, age_group: &str) -> Result<Self> {
        let team_name = team_name.trim();
        if team_name.is_empty() || team_name.chars().count() > 100 {
            return Err(Error::Validation(
                "Team name must be 1-100 characters".to_string(),
            ));
        }
        validate_sport(sport).map_err(|_| Error::Validation(format!("Unknown sport: {}", sport)))?;
        validate_age_group(age_group)
            .map_err(|_| Error::Validation(format!("Unknown age group: {}", age_group)))?;

        let now = Utc::now();
        Ok(Team {
            id: Uuid::new_v4(),
            team_name: team_name.to_string(),
            team_code: TeamCode::generate().into_inner(),
            coach_id,
            sport: sport.to_string(),
            age_group: age_group.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the team code (used when a generated code collides)
    pub fn regenerate_code(&mut self) {
        self.team_code = TeamCode::generate().into_inner();
    }
}

/// Six uppercase alphanumeric characters shared by a coach with players
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TeamCode(String);

impl TeamCode {
    /// Generate a random code
    #[mutants::skip] // Random output; shape is asserted in tests
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let code: String = (0..TEAM_CODE_LEN)
            .map(|_| TEAM_CODE_ALPHABET[rng.gen_range(0..TEAM_CODE_ALPHABET.len())] as char)
            .collect();
        TeamCode(code)
    }

    /// Normalize user input (trim, uppercase) and check its shape
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().to_ascii_uppercase();
        if !TEAM_CODE_REGEX.is_match(&normalized) {
            return Err(Error::NotFound("Invalid team code".to_string()));
        }
        Ok(TeamCode(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for TeamCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A team together with its coach and derived player list
#[derive(Debug, Clone, Serialize)]
pub struct Roster {
    pub team: Team,
    pub coach: Option<User>,
    pub players: Vec<User>,
}

impl Roster {
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Number of players per availability status, every status present
    pub fn status_breakdown(&self) -> Vec<(PlayerStatus, usize)> {
        PlayerStatus::ALL
            .iter()
            .map(|status| {
                let count = self.players.iter().filter(|p| p.status == *status).count();
                (*status, count)
            })
            .collect()
    }
}
