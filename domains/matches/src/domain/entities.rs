//! Domain entities for the matches domain
//!
//! Matches are stored in UTC. Clients send the local wall-clock time a coach
//! typed plus the offset of that wall clock; conversion happens here so the
//! same offset always renders the original input back.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use huddleup_common::{Error, Result};

/// Accepted local date-time shapes (`datetime-local` input, with or without seconds)
const LOCAL_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Largest real-world UTC offset, in minutes
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// A player's answer for a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "rsvp_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    Confirmed,
    Declined,
}

impl std::fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RsvpStatus::Confirmed => write!(f, "confirmed"),
            RsvpStatus::Declined => write!(f, "declined"),
        }
    }
}

/// Scheduled match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Match {
    pub id: Uuid,
    pub team_id: Uuid,
    pub opponent: String,
    pub date_time: DateTime<Utc>,
    pub location: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field changes for a match; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct MatchChanges {
    pub opponent: Option<String>,
    pub date_time: Option<DateTime<Utc>>,
    pub location: Option<String>,
    /// `Some(None)` clears the notes
    pub notes: Option<Option<String>>,
}

fn required_text(field: &str, value: &str, max: usize) -> Result<String> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > max {
        return Err(Error::Validation(format!(
            "{} must be 1-{} characters",
            field, max
        )));
    }
    Ok(value.to_string())
}

fn optional_notes(notes: Option<String>) -> Result<Option<String>> {
    match notes.map(|n| n.trim().to_string()) {
        Some(n) if n.is_empty() => Ok(None),
        Some(n) if n.chars().count() > 1000 => Err(Error::Validation(
            "Notes must be at most 1000 characters".to_string(),
        )),
        other => Ok(other),
    }
}

impl Match {
    /// Create a new match with validation
    pub fn new(
        team_id: Uuid,
        opponent: &str,
        date_time: DateTime<Utc>,
        location: &str,
        notes: Option<String>,
    ) -> Result<Self> {
        let now = Utc::now();
        Ok(Match {
            id: Uuid::new_v4(),
            team_id,
            opponent: required_text("Opponent", opponent, 100)?,
            date_time,
            location: required_text("Location", location, 200)?,
            notes: optional_notes(notes)?,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial edit. Last write wins; there is no version check.
    pub fn apply(&mut self, changes: MatchChanges) -> Result<()> {
        if let Some(opponent) = changes.opponent {
            self.opponent = required_text("Opponent", &opponent, 100)?;
        }
        if let Some(date_time) = changes.date_time {
            self.date_time = date_time;
        }
        if let Some(location) = changes.location {
            self.location = required_text("Location", &location, 200)?;
        }
        if let Some(notes) = changes.notes {
            self.notes = optional_notes(notes)?;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Players may only answer for matches that have not started
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.date_time >= now
    }
}

/// One stored answer per (match, player)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MatchResponse {
    pub id: Uuid,
    pub match_id: Uuid,
    pub player_id: Uuid,
    pub status: RsvpStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A match seen by one player, with that player's answer if any
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlayerMatch {
    #[sqlx(flatten)]
    pub details: Match,
    pub rsvp: Option<RsvpStatus>,
}

fn offset(utc_offset_minutes: i32) -> Result<FixedOffset> {
    if !(-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&utc_offset_minutes) {
        return Err(Error::Validation(format!(
            "utc_offset_minutes must be within ±{}",
            MAX_OFFSET_MINUTES
        )));
    }
    FixedOffset::east_opt(utc_offset_minutes * 60)
        .ok_or_else(|| Error::Validation("Invalid UTC offset".to_string()))
}

/// Convert a local wall-clock value to UTC.
///
/// `utc_offset_minutes` is minutes east of UTC (`+60` for UTC+01:00).
pub fn local_to_utc(local: &str, utc_offset_minutes: i32) -> Result<DateTime<Utc>> {
    let local = local.trim();
    let naive = LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(local, format).ok())
        .ok_or_else(|| {
            Error::Validation(format!(
                "date_time must look like YYYY-MM-DDTHH:MM, got '{}'",
                local
            ))
        })?;

    offset(utc_offset_minutes)?
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| Error::Validation("Ambiguous local date_time".to_string()))
}

/// Render a UTC instant as a `YYYY-MM-DDTHH:MM` wall clock at the given offset
pub fn utc_to_local(date_time: DateTime<Utc>, utc_offset_minutes: i32) -> Result<String> {
    Ok(date_time
        .with_timezone(&offset(utc_offset_minutes)?)
        .format("%Y-%m-%dT%H:%M")
        .to_string())
}
