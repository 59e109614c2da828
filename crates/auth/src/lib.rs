//! Session authentication for the HuddleUp API
//!
//! Provides JWT validation, just-in-time profile provisioning, the role
//! guard, and axum extractors that work with any domain state implementing
//! `FromRef<S>` for `AuthBackend`.

mod backend;
mod claims;
mod config;
mod context;
mod error;
mod extractors;
pub mod guard;
mod jwt;
mod types;

pub use backend::AuthBackend;
pub use claims::SessionClaims;
pub use config::AuthConfig;
pub use context::Session;
pub use error::AuthError;
pub use extractors::{AuthUser, CoachUser, PlayerUser};
pub use guard::GuardOutcome;
pub use types::{Role, SessionUser};
