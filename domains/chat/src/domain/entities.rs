//! Domain entities for the chat domain

use std::collections::{HashSet, VecDeque};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use huddleup_common::{Error, Result};

/// Longest message text, in characters
pub const MAX_TEXT_LEN: usize = 2000;

/// Most messages returned by a history fetch
pub const HISTORY_LIMIT: i64 = 500;

/// A chat message with its sender's display name
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Message {
    pub id: Uuid,
    pub team_id: Uuid,
    pub sender_id: Uuid,
    pub sender_name: String,
    pub text: String,
    pub created: DateTime<Utc>,
}

/// A message about to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub id: Uuid,
    pub team_id: Uuid,
    pub sender_id: Uuid,
    pub text: String,
}

impl NewMessage {
    /// Trim and check the text
    pub fn new(team_id: Uuid, sender_id: Uuid, text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::Validation("Message cannot be empty".to_string()));
        }
        if text.chars().count() > MAX_TEXT_LEN {
            return Err(Error::Validation(format!(
                "Message must be at most {} characters",
                MAX_TEXT_LEN
            )));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            team_id,
            sender_id,
            text: text.to_string(),
        })
    }
}

/// Ids a live stream has already delivered.
///
/// Notifications are published after commit, so their order need not match
/// `created`. Membership is by id; once `capacity` ids are held the oldest
/// one is forgotten.
#[derive(Debug, Clone)]
pub struct SentMessages {
    capacity: usize,
    order: VecDeque<Uuid>,
    ids: HashSet<Uuid>,
}

impl SentMessages {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            order: VecDeque::with_capacity(capacity),
            ids: HashSet::with_capacity(capacity),
        }
    }

    /// Record `id`; false when it was already sent
    pub fn insert(&mut self, id: Uuid) -> bool {
        if !self.ids.insert(id) {
            return false;
        }
        self.order.push_back(id);
        if self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.ids.remove(&oldest);
            }
        }
        true
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
