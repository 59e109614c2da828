//! Shared utilities, configuration, and error handling for HuddleUp
//!
//! This crate provides common functionality used across the HuddleUp service:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Request extractors
//! - The in-process realtime notification hub

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod realtime;

pub use error::{Error, Result};
pub use extractors::{LimitQuery, ValidatedJson};
pub use realtime::{
    Collection, Notification, NotificationAction, RealtimeHub, Subscription, SubscriptionEvent,
};
