//! Where a signed-in user belongs
//!
//! Pure resolution over the user's role and whether a team was found for
//! them. The lookup itself lives in the repository; "no team" arrives here
//! as `false`, never as an error.

use serde::Serialize;

use huddleup_auth::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    SelectRole,
    SetupTeam,
    CoachDashboard,
    SetupPlayer,
    PlayerDashboard,
}

impl Destination {
    /// Client route for this destination
    pub fn path(&self) -> &'static str {
        match self {
            Destination::SelectRole => "/select-role",
            Destination::SetupTeam => "/setup-team",
            Destination::CoachDashboard => "/dashboard/coach",
            Destination::SetupPlayer => "/setup-player",
            Destination::PlayerDashboard => "/dashboard/player",
        }
    }
}

pub fn resolve(role: Option<Role>, has_team: bool) -> Destination {
    match (role, has_team) {
        (None, _) => Destination::SelectRole,
        (Some(Role::Coach), false) => Destination::SetupTeam,
        (Some(Role::Coach), true) => Destination::CoachDashboard,
        (Some(Role::Player), false) => Destination::SetupPlayer,
        (Some(Role::Player), true) => Destination::PlayerDashboard,
    }
}
