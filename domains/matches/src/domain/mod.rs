//! Matches domain layer: entities, local time conversion, RSVP tallies

pub mod entities;
pub mod tally;
