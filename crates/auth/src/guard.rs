//! Route guard
//!
//! A pure decision over (session present, role, allowed role set). The
//! extractors in this crate apply it to every protected route, and the
//! `/v1/session/access` endpoint exposes it to clients.

use serde::Serialize;

use crate::context::Session;
use crate::types::Role;

pub const LOGIN_PATH: &str = "/login";
pub const SELECT_ROLE_PATH: &str = "/select-role";

/// Result of checking a session against a route's allowed roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardOutcome {
    Allow,
    RedirectToLogin,
    RedirectToSelectRole,
}

impl GuardOutcome {
    /// Where the client should go instead, if anywhere
    pub fn redirect_path(&self) -> Option<&'static str> {
        match self {
            GuardOutcome::Allow => None,
            GuardOutcome::RedirectToLogin => Some(LOGIN_PATH),
            GuardOutcome::RedirectToSelectRole => Some(SELECT_ROLE_PATH),
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardOutcome::Allow)
    }
}

/// Decide whether a session may enter a route.
///
/// - no session: login
/// - `allowed` given and the role is unset or not in it: select-role
/// - otherwise: allow
pub fn check(session: Option<&Session>, allowed: Option<&[Role]>) -> GuardOutcome {
    let Some(session) = session else {
        return GuardOutcome::RedirectToLogin;
    };

    match allowed {
        None => GuardOutcome::Allow,
        Some(roles) => match session.role() {
            Some(role) if roles.contains(&role) => GuardOutcome::Allow,
            _ => GuardOutcome::RedirectToSelectRole,
        },
    }
}
