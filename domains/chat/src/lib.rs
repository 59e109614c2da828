//! Chat domain: team messages with realtime delivery

pub mod api;
pub mod domain;
pub mod repository;

pub use domain::entities::*;
pub use repository::MessageRepository;

pub use api::routes;
pub use api::ChatState;
