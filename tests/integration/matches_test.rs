//! Match scheduling, RSVP and dashboard flows

use axum::http::{Method, StatusCode};
use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde_json::{json, Value};

mod common;
use common::{TestApp, TestUser};

/// Wall-clock rendering of `instant` at the given offset, minute precision
fn local_at(instant: DateTime<Utc>, offset_minutes: i32) -> String {
    let offset = FixedOffset::east_opt(offset_minutes * 60).unwrap();
    instant
        .with_timezone(&offset)
        .format("%Y-%m-%dT%H:%M")
        .to_string()
}

fn local_in(days: i64, offset_minutes: i32) -> String {
    local_at(Utc::now() + Duration::days(days), offset_minutes)
}

async fn schedule(app: &TestApp, coach: &TestUser, opponent: &str, days: i64) -> Value {
    let (status, body) = app
        .send(
            Method::POST,
            "/v1/matches",
            coach,
            json!({
                "opponent": opponent,
                "date_time": local_in(days, 0),
                "location": "Field 3"
            }),
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_local_time_round_trip() {
    let app = TestApp::new().await.unwrap();
    let (coach, _) = app.coach_with_team("Lightning").await.unwrap();
    let instant = Utc::now() + Duration::days(10);
    let local = local_at(instant, 120);

    let (status, created) = app
        .send(
            Method::POST,
            "/v1/matches",
            &coach,
            json!({
                "opponent": "Rovers",
                "date_time": local,
                "utc_offset_minutes": 120,
                "location": "Riverside Park",
                "notes": "Arrive 30 minutes early"
            }),
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["local_date_time"], local);

    let (_, listed) = app
        .get("/v1/matches?utc_offset_minutes=120", &coach)
        .await
        .unwrap();
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["local_date_time"], local);

    // Same instant, read at a different offset
    let (_, listed) = app
        .get("/v1/matches?utc_offset_minutes=0", &coach)
        .await
        .unwrap();
    assert_eq!(listed[0]["local_date_time"], local_at(instant, 0));

    let (status, _) = app
        .get("/v1/matches?utc_offset_minutes=-2147483648", &coach)
        .await
        .unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_rsvp_upsert_keeps_one_response() {
    let app = TestApp::new().await.unwrap();
    let (coach, team) = app.coach_with_team("Lightning").await.unwrap();
    let code = team["team_code"].as_str().unwrap();
    let sam = app.player_on_team("Sam", code).await.unwrap();
    let _alex = app.player_on_team("Alex", code).await.unwrap();

    let m = schedule(&app, &coach, "Rovers", 7).await;
    let rsvp_uri = format!("/v1/matches/{}/rsvp", m["id"].as_str().unwrap());

    let (status, first) = app
        .send(Method::PUT, &rsvp_uri, &sam, json!({ "status": "confirmed" }))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);

    let (status, second) = app
        .send(Method::PUT, &rsvp_uri, &sam, json!({ "status": "declined" }))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["id"], second["id"]);
    assert_eq!(second["status"], "declined");

    let rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM match_responses WHERE match_id = $1 AND player_id = $2",
    )
    .bind(uuid::Uuid::parse_str(m["id"].as_str().unwrap()).unwrap())
    .bind(sam.id)
    .fetch_one(&app.pool)
    .await
    .unwrap();
    assert_eq!(rows, 1);

    let (_, dashboard) = app.get("/v1/dashboard/coach", &coach).await.unwrap();
    assert_eq!(dashboard["player_count"], 2);
    let tally = &dashboard["upcoming_matches"][0]["tally"];
    assert_eq!(tally["confirmed"], 0);
    assert_eq!(tally["declined"], 1);
    assert_eq!(tally["pending"], 1);

    let (_, mine) = app.get("/v1/player/matches", &sam).await.unwrap();
    assert_eq!(mine[0]["rsvp"], "declined");
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_matches_are_scoped_to_team() {
    let app = TestApp::new().await.unwrap();
    let (coach, _) = app.coach_with_team("Lightning").await.unwrap();
    let (rival, rival_team) = app.coach_with_team("Thunder").await.unwrap();
    let outsider = app
        .player_on_team("Kim", rival_team["team_code"].as_str().unwrap())
        .await
        .unwrap();

    let m = schedule(&app, &coach, "Rovers", 3).await;
    let uri = format!("/v1/matches/{}", m["id"].as_str().unwrap());

    let (status, _) = app
        .send(Method::PATCH, &uri, &rival, json!({ "location": "Elsewhere" }))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("{}/rsvp", uri),
            &outsider,
            json!({ "status": "confirmed" }),
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request::<Value>(Method::DELETE, &uri, Some(&rival), None)
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_edit_and_cancel_match() {
    let app = TestApp::new().await.unwrap();
    let (coach, _) = app.coach_with_team("Lightning").await.unwrap();
    let m = schedule(&app, &coach, "Rovers", 5).await;
    let uri = format!("/v1/matches/{}", m["id"].as_str().unwrap());

    let (status, edited) = app
        .send(Method::PATCH, &uri, &coach, json!({ "location": "Field 5", "notes": "" }))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["location"], "Field 5");
    assert_eq!(edited["opponent"], "Rovers");
    assert!(edited["notes"].is_null());

    let (status, _) = app
        .request::<Value>(Method::DELETE, &uri, Some(&coach), None)
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listed) = app.get("/v1/matches", &coach).await.unwrap();
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_player_dashboard() {
    let app = TestApp::new().await.unwrap();
    let (coach, team) = app.coach_with_team("Lightning").await.unwrap();
    let player = app
        .player_on_team("Sam", team["team_code"].as_str().unwrap())
        .await
        .unwrap();

    for (i, opponent) in ["Rovers", "United", "Athletic", "City"].iter().enumerate() {
        schedule(&app, &coach, opponent, i as i64 + 1).await;
    }

    let (status, dashboard) = app.get("/v1/dashboard/player", &player).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["team"]["team_name"], "Lightning");
    assert_eq!(dashboard["coach"]["name"], "Coach");
    assert_eq!(dashboard["status"], "available");

    let upcoming = dashboard["upcoming_matches"].as_array().unwrap();
    assert_eq!(upcoming.len(), 3);
    assert_eq!(upcoming[0]["opponent"], "Rovers");
    assert!(upcoming[0]["rsvp"].is_null());
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_edit_date_time_needs_offset() {
    let app = TestApp::new().await.unwrap();
    let (coach, _) = app.coach_with_team("Lightning").await.unwrap();
    let m = schedule(&app, &coach, "Rovers", 5).await;
    let uri = format!("/v1/matches/{}", m["id"].as_str().unwrap());
    let instant = Utc::now() + Duration::days(6);

    let (status, _) = app
        .send(
            Method::PATCH,
            &uri,
            &coach,
            json!({ "date_time": local_at(instant, -300) }),
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, edited) = app
        .send(
            Method::PATCH,
            &uri,
            &coach,
            json!({ "date_time": local_at(instant, -300), "utc_offset_minutes": -300 }),
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["local_date_time"], local_at(instant, -300));
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_rsvp_closed_for_past_match() {
    let app = TestApp::new().await.unwrap();
    let (_, team) = app.coach_with_team("Lightning").await.unwrap();
    let player = app
        .player_on_team("Sam", team["team_code"].as_str().unwrap())
        .await
        .unwrap();
    let team_id = uuid::Uuid::parse_str(team["id"].as_str().unwrap()).unwrap();

    let past_id: uuid::Uuid = sqlx::query_scalar(
        "INSERT INTO matches (team_id, opponent, date_time, location)
         VALUES ($1, 'Rovers', NOW() - INTERVAL '1 day', 'Field 3')
         RETURNING id",
    )
    .bind(team_id)
    .fetch_one(&app.pool)
    .await
    .unwrap();

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/v1/matches/{}/rsvp", past_id),
            &player,
            json!({ "status": "confirmed" }),
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "Conflict: Match has already been played");

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM match_responses WHERE match_id = $1")
        .bind(past_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(rows, 0);
}
