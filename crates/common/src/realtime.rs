//! In-process realtime notification hub
//!
//! Writers publish a small notification (collection, team, record id, action)
//! after a successful commit. Subscribers never receive record payloads; they
//! refetch what they need. Every notification carries a hub-wide monotonic
//! sequence number so clients can discard anything older than what they have.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use uuid::Uuid;

/// Default channel capacity per hub
pub const DEFAULT_CAPACITY: usize = 256;

/// Data collection a notification refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Messages,
    Roster,
}

/// What happened to the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationAction {
    Create,
    Update,
    Delete,
}

/// A change notification, scoped to one team
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub seq: u64,
    pub collection: Collection,
    pub team_id: Uuid,
    pub record_id: Uuid,
    pub action: NotificationAction,
}

/// What a subscriber observes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionEvent {
    Notification(Notification),
    /// The subscriber fell behind and missed this many notifications
    Lagged(u64),
}

/// Broadcast hub shared by every domain state
#[derive(Clone)]
pub struct RealtimeHub {
    sender: broadcast::Sender<Notification>,
    seq: Arc<AtomicU64>,
}

impl RealtimeHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Publish a notification and return its sequence number.
    ///
    /// Publishing with no live subscribers is not an error.
    pub fn publish(
        &self,
        collection: Collection,
        team_id: Uuid,
        record_id: Uuid,
        action: NotificationAction,
    ) -> u64 {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let notification = Notification {
            seq,
            collection,
            team_id,
            record_id,
            action,
        };

        match self.sender.send(notification) {
            Ok(receivers) => {
                tracing::debug!(seq, ?collection, team_id = %team_id, receivers, "Published notification");
            }
            Err(_) => {
                tracing::trace!(seq, ?collection, team_id = %team_id, "No subscribers for notification");
            }
        }

        seq
    }

    /// Subscribe to one collection of one team
    pub fn subscribe(&self, collection: Collection, team_id: Uuid) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
            collection,
            team_id,
        }
    }

    /// Sequence number of the most recent notification
    pub fn current_seq(&self) -> u64 {
        self.seq.load(Ordering::SeqCst)
    }
}

impl Default for RealtimeHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Filtered view over the hub for a single (collection, team)
pub struct Subscription {
    receiver: broadcast::Receiver<Notification>,
    collection: Collection,
    team_id: Uuid,
}

impl Subscription {
    fn matches(&self, notification: &Notification) -> bool {
        notification.collection == self.collection && notification.team_id == self.team_id
    }

    /// Wait for the next matching event. `None` once the hub is gone.
    pub async fn next(&mut self) -> Option<SubscriptionEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(n) if self.matches(&n) => return Some(SubscriptionEvent::Notification(n)),
                Ok(_) => continue,
                Err(RecvError::Lagged(missed)) => return Some(SubscriptionEvent::Lagged(missed)),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Wait for the next matching event, then drain everything already queued
    /// and return only the newest one.
    ///
    /// Used by "refetch everything" streams: one refetch covers every queued
    /// notification, so a slower older refetch can never be emitted after a
    /// newer one.
    pub async fn next_coalesced(&mut self) -> Option<SubscriptionEvent> {
        let mut latest = self.next().await?;

        loop {
            match self.receiver.try_recv() {
                Ok(n) if self.matches(&n) => latest = SubscriptionEvent::Notification(n),
                Ok(_) => continue,
                Err(TryRecvError::Lagged(missed)) => latest = SubscriptionEvent::Lagged(missed),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }

        Some(latest)
    }
}
