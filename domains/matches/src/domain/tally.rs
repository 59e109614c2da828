//! RSVP tallies for the coach dashboard
//!
//! The database groups responses per (match, status); folding those rows
//! into per-match tallies against the current roster size is pure.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::RsvpStatus;

/// Count of responses with one status for one match
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StatusCountRow {
    pub match_id: Uuid,
    pub status: RsvpStatus,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RsvpTally {
    pub confirmed: u32,
    pub declined: u32,
    /// Current players who have not answered
    pub pending: u32,
}

impl RsvpTally {
    /// Tally from response counts and the number of players on the team
    pub fn from_counts(confirmed: u32, declined: u32, roster_size: u32) -> Self {
        Self {
            confirmed,
            declined,
            pending: roster_size.saturating_sub(confirmed + declined),
        }
    }

    /// One tally per requested match; matches with no rows are all pending
    pub fn per_match(
        match_ids: &[Uuid],
        rows: &[StatusCountRow],
        roster_size: u32,
    ) -> HashMap<Uuid, RsvpTally> {
        let mut counts: HashMap<Uuid, (u32, u32)> = HashMap::new();
        for row in rows {
            let entry = counts.entry(row.match_id).or_default();
            let n = u32::try_from(row.count).unwrap_or(0);
            match row.status {
                RsvpStatus::Confirmed => entry.0 += n,
                RsvpStatus::Declined => entry.1 += n,
            }
        }

        match_ids
            .iter()
            .map(|id| {
                let (confirmed, declined) = counts.get(id).copied().unwrap_or_default();
                (*id, RsvpTally::from_counts(confirmed, declined, roster_size))
            })
            .collect()
    }
}
