//! Repository implementations for Chat domain

pub mod messages;

pub use messages::MessageRepository;
