//! Team invite email content
//!
//! Shared by the Mailjet and mock services so captured test mail matches
//! what players actually receive.

use crate::TeamInvite;

pub fn team_invite_subject(team_name: &str) -> String {
    format!("Invite to join {} on HuddleUp", team_name)
}

/// Plain-text body for a team invite.
pub fn team_invite_text(invite: &TeamInvite) -> String {
    format!(
        "Hello {},\n\n\
        Coach {} has invited you to join \"{}\". Use code \"{}\" to sign up.\n",
        invite.player_name, invite.coach_name, invite.team_name, invite.team_code
    )
}

/// HTML body for a team invite. User-supplied names are escaped.
pub fn team_invite_html(invite: &TeamInvite) -> String {
    format!(
        "<p>Hello {player},</p>\n\
        <p>Coach <strong>{coach}</strong> has invited you to join \"<strong>{team}</strong>\".</p>\n\
        <p>Your team code is: <code>{code}</code></p>",
        player = escape_html(&invite.player_name),
        coach = escape_html(&invite.coach_name),
        team = escape_html(&invite.team_name),
        code = escape_html(&invite.team_code),
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
