//! HTTP handlers for the Teams domain

pub mod roster;
pub mod session;
pub mod teams;
pub mod users;
