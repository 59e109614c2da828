//! Role selection, team setup, join and roster flows

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

mod common;
use common::{join_body, EventStream, TestApp};

/// Read roster events until one satisfies `done`
async fn roster_until(stream: &mut EventStream, done: impl Fn(&Value) -> bool) -> Value {
    loop {
        let event = stream.next_event().await.unwrap();
        assert_eq!(event.event, "roster");
        if done(&event.data) {
            return event.data;
        }
    }
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_destination_follows_role_and_team() {
    let app = TestApp::new().await.unwrap();
    let coach = app.new_user("Riley").unwrap();

    let (status, session) = app.get("/v1/session", &coach).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["destination"], "select_role");
    assert_eq!(session["redirect"], "/select-role");
    assert_eq!(session["user"]["name"], "Riley");

    let (status, session) = app
        .send(Method::POST, "/v1/session/role", &coach, json!({ "role": "coach" }))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["destination"], "setup_team");

    // Same role again is a no-op, a different one is refused
    let (status, _) = app
        .send(Method::POST, "/v1/session/role", &coach, json!({ "role": "coach" }))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .send(Method::POST, "/v1/session/role", &coach, json!({ "role": "player" }))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, team) = app
        .send(
            Method::POST,
            "/v1/teams",
            &coach,
            json!({ "team_name": "Lightning", "sport": "Hockey", "age_group": "Open" }),
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    let code = team["team_code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));

    let (_, session) = app.get("/v1/session", &coach).await.unwrap();
    assert_eq!(session["destination"], "coach_dashboard");
    assert_eq!(session["team"]["team_code"], code);

    // One team per coach
    let (status, _) = app
        .send(
            Method::POST,
            "/v1/teams",
            &coach,
            json!({ "team_name": "Thunder", "sport": "Hockey", "age_group": "Open" }),
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_joining_twice_counts_once() {
    let app = TestApp::new().await.unwrap();
    let (coach, team) = app.coach_with_team("Lightning").await.unwrap();
    let code = team["team_code"].as_str().unwrap().to_string();

    let player = app.player_on_team("Sam", &code).await.unwrap();

    let (_, session) = app.get("/v1/session", &player).await.unwrap();
    assert_eq!(session["destination"], "player_dashboard");

    // Lowercase, padded code joins the same team again without duplicating
    let padded = format!("  {} ", code.to_lowercase());
    let (status, joined) = app
        .send(Method::POST, "/v1/teams/join", &player, join_body(&padded))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(joined["team"]["id"], team["id"]);

    let (status, roster) = app.get("/v1/team", &coach).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(roster["player_count"], 1);
    assert_eq!(roster["players"][0]["playing_position"], "Midfield");
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_join_rules() {
    let app = TestApp::new().await.unwrap();
    let (coach, team) = app.coach_with_team("Lightning").await.unwrap();
    let code = team["team_code"].as_str().unwrap().to_string();
    let (_, other_team) = app.coach_with_team("Thunder").await.unwrap();
    let other_code = other_team["team_code"].as_str().unwrap().to_string();

    let player = app.player_on_team("Sam", &code).await.unwrap();

    let (status, _) = app
        .send(Method::POST, "/v1/teams/join", &player, join_body(&other_code))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CONFLICT);

    let newcomer = app.new_user("Alex").unwrap();
    let (status, body) = app
        .send(Method::POST, "/v1/teams/join", &newcomer, join_body("AB-12"))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Not found: Invalid team code");

    let (status, _) = app
        .send(Method::POST, "/v1/teams/join", &coach, join_body(&code))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_guard_outcomes() {
    let app = TestApp::new().await.unwrap();
    let user = app.new_user("Jo").unwrap();

    let (_, access) = app
        .get("/v1/session/access?roles=coach", &user)
        .await
        .unwrap();
    assert_eq!(access["allowed"], false);
    assert_eq!(access["redirect"], "/select-role");

    let (_, access) = app.get("/v1/session/access", &user).await.unwrap();
    assert_eq!(access["allowed"], true);

    app.send(Method::POST, "/v1/session/role", &user, json!({ "role": "player" }))
        .await
        .unwrap();

    let (_, access) = app
        .get("/v1/session/access?roles=player", &user)
        .await
        .unwrap();
    assert_eq!(access["allowed"], true);

    let (status, _) = app.get("/v1/dashboard/coach", &user).await.unwrap();
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_invite_carries_team_code() {
    let app = TestApp::new().await.unwrap();
    let (coach, team) = app.coach_with_team("Lightning").await.unwrap();

    let (status, body) = app
        .send(
            Method::POST,
            "/v1/team/invites",
            &coach,
            json!({ "name": "Sam", "email": "sam@example.com" }),
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["email"], "sam@example.com");

    let invite = app.email.get_latest_invite("sam@example.com").unwrap();
    assert_eq!(
        invite.extract_team_code().as_deref(),
        team["team_code"].as_str()
    );
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_remove_player_and_status() {
    let app = TestApp::new().await.unwrap();
    let (coach, team) = app.coach_with_team("Lightning").await.unwrap();
    let player = app
        .player_on_team("Sam", team["team_code"].as_str().unwrap())
        .await
        .unwrap();

    let (status, _) = app
        .send(
            Method::PUT,
            "/v1/account/status",
            &player,
            json!({ "status": "injured" }),
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);

    let (_, roster) = app.get("/v1/team", &coach).await.unwrap();
    assert_eq!(roster["status_breakdown"][2]["status"], "injured");
    assert_eq!(roster["status_breakdown"][2]["count"], 1);

    let (status, _) = app
        .request::<serde_json::Value>(
            Method::DELETE,
            &format!("/v1/team/players/{}", player.id),
            Some(&coach),
            None,
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, roster) = app.get("/v1/team", &coach).await.unwrap();
    assert_eq!(roster["player_count"], 0);

    let (_, session) = app.get("/v1/session", &player).await.unwrap();
    assert_eq!(session["destination"], "setup_player");
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_join_rejects_blank_fields() {
    let app = TestApp::new().await.unwrap();
    let (_, team) = app.coach_with_team("Lightning").await.unwrap();
    let code = team["team_code"].as_str().unwrap();

    let player = app.new_user("Sam").unwrap();
    app.send(Method::POST, "/v1/session/role", &player, json!({ "role": "player" }))
        .await
        .unwrap();

    let mut body = join_body(code);
    body["playing_position"] = json!("   ");
    let (status, _) = app
        .send(Method::POST, "/v1/teams/join", &player, body)
        .await
        .unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.send(Method::POST, "/v1/teams/join", &player, join_body(code))
        .await
        .unwrap();
    let (status, _) = app
        .send(
            Method::PATCH,
            "/v1/account",
            &player,
            json!({ "playing_position": "  ", "phone": "   " }),
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, roster) = app.get("/v1/team", &player).await.unwrap();
    assert_eq!(roster["players"][0]["playing_position"], "Midfield");
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_roster_stream_follows_changes() {
    let app = TestApp::new().await.unwrap();
    let (coach, team) = app.coach_with_team("Lightning").await.unwrap();

    let mut stream = app.open_stream("/v1/team/stream", &coach).await.unwrap();

    let initial = stream.next_event().await.unwrap();
    assert_eq!(initial.event, "roster");
    assert_eq!(initial.data["team"]["team_name"], "Lightning");
    assert_eq!(initial.data["player_count"], 0);

    let player = app
        .player_on_team("Sam", team["team_code"].as_str().unwrap())
        .await
        .unwrap();
    let joined = roster_until(&mut stream, |r| r["player_count"] == 1).await;
    assert_eq!(joined["players"][0]["name"], "Sam");

    let (status, _) = app
        .send(
            Method::PUT,
            "/v1/account/status",
            &player,
            json!({ "status": "injured" }),
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    let updated = roster_until(&mut stream, |r| r["players"][0]["status"] == "injured").await;
    assert_eq!(updated["player_count"], 1);

    let player_id = player.id.to_string();
    app.request::<Value>(
        Method::DELETE,
        &format!("/v1/team/players/{}", player_id),
        Some(&coach),
        None,
    )
    .await
    .unwrap();
    let removed = roster_until(&mut stream, |r| r["player_count"] == 0).await;
    assert!(removed["players"].as_array().unwrap().is_empty());
}
