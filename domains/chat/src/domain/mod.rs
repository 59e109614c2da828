//! Domain layer for the Chat domain

pub mod entities;
