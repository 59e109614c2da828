//! The authenticated session handed to handlers

use uuid::Uuid;

use crate::types::{Role, SessionUser};

/// Represents an authenticated session
#[derive(Debug, Clone)]
pub struct Session {
    pub user: SessionUser,
}

impl Session {
    pub fn new(user: SessionUser) -> Self {
        Self { user }
    }

    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    /// Role, `None` until the user picks one
    pub fn role(&self) -> Option<Role> {
        self.user.role
    }

    pub fn is_coach(&self) -> bool {
        self.user.role == Some(Role::Coach)
    }

    pub fn is_player(&self) -> bool {
        self.user.role == Some(Role::Player)
    }

    /// Team the user coaches or plays for
    pub fn team_id(&self) -> Option<Uuid> {
        self.user.team_id
    }

    /// Name to show to other users, falling back to the email local part
    pub fn display_name(&self) -> String {
        match self.user.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self
                .user
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string(),
        }
    }
}
