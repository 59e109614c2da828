//! JWT claims types

use serde::{Deserialize, Serialize};

/// Session token claims issued by the identity provider
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Email
    pub email: Option<String>,
    /// Display name captured at sign-up
    #[serde(default)]
    pub name: Option<String>,
    /// Issued at
    pub iat: u64,
    /// Expires at
    pub exp: u64,
    /// Audience
    #[serde(default)]
    pub aud: Option<String>,
}
