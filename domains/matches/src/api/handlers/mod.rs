//! HTTP handlers for the Matches domain

pub mod dashboard;
pub mod matches;
pub mod rsvp;
