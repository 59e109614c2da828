//! Team chat flows

use std::time::Duration;

use axum::http::{Method, StatusCode};
use huddleup_common::{Collection, NotificationAction};
use serde_json::{json, Value};
use uuid::Uuid;

mod common;
use common::{TestApp, TestUser};

fn team_id(team: &Value) -> Uuid {
    Uuid::parse_str(team["id"].as_str().unwrap()).unwrap()
}

/// Write a message without going through the API, so nothing is published
async fn insert_message(
    app: &TestApp,
    team_id: Uuid,
    sender: &TestUser,
    text: &str,
    age_ms: i64,
) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO messages (id, team_id, sender_id, text, created)
         VALUES ($1, $2, $3, $4, NOW() - make_interval(secs => $5::double precision / 1000))",
    )
    .bind(id)
    .bind(team_id)
    .bind(sender.id)
    .bind(text)
    .bind(age_ms as f64)
    .execute(&app.pool)
    .await
    .unwrap();
    id
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_post_and_read_messages() {
    let app = TestApp::new().await.unwrap();
    let (coach, team) = app.coach_with_team("Lightning").await.unwrap();
    let player = app
        .player_on_team("Sam", team["team_code"].as_str().unwrap())
        .await
        .unwrap();

    let (status, posted) = app
        .send(
            Method::POST,
            "/v1/chat/messages",
            &coach,
            json!({ "text": "  Training moved to 6pm  " }),
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(posted["text"], "Training moved to 6pm");
    assert_eq!(posted["sender_name"], "Coach");

    app.send(
        Method::POST,
        "/v1/chat/messages",
        &player,
        json!({ "text": "See you there" }),
    )
    .await
    .unwrap();

    let (status, history) = app.get("/v1/chat/messages", &player).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["text"], "Training moved to 6pm");
    assert_eq!(history[1]["sender_name"], "Sam");

    let (status, single) = app
        .get(
            &format!("/v1/chat/messages/{}", posted["id"].as_str().unwrap()),
            &player,
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(single["id"], posted["id"]);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_message_rules() {
    let app = TestApp::new().await.unwrap();
    let (coach, _) = app.coach_with_team("Lightning").await.unwrap();

    let (status, _) = app
        .send(Method::POST, "/v1/chat/messages", &coach, json!({ "text": "   " }))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Method::POST,
            "/v1/chat/messages",
            &coach,
            json!({ "text": "x".repeat(2001) }),
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let loner = app.new_user("Jo").unwrap();
    let (status, _) = app.get("/v1/chat/messages", &loner).await.unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_stream_delivers_posted_messages() {
    let app = TestApp::new().await.unwrap();
    let (coach, team) = app.coach_with_team("Lightning").await.unwrap();
    let player = app
        .player_on_team("Sam", team["team_code"].as_str().unwrap())
        .await
        .unwrap();

    let mut stream = app.open_stream("/v1/chat/stream", &player).await.unwrap();

    let (status, posted) = app
        .send(
            Method::POST,
            "/v1/chat/messages",
            &coach,
            json!({ "text": "Bring shin pads" }),
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);

    let event = stream.next_event().await.unwrap();
    assert_eq!(event.event, "message");
    assert!(event.id.is_some());
    assert_eq!(event.data["id"], posted["id"]);
    assert_eq!(event.data["text"], "Bring shin pads");
    assert_eq!(event.data["sender_name"], "Coach");
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_stream_delivers_messages_notified_out_of_order() {
    let app = TestApp::new().await.unwrap();
    let (coach, team) = app.coach_with_team("Lightning").await.unwrap();
    let team_id = team_id(&team);

    let mut stream = app.open_stream("/v1/chat/stream", &coach).await.unwrap();

    // A is created first but its notification goes out after B's
    let earlier = insert_message(&app, team_id, &coach, "message A", 50).await;
    let (status, later) = app
        .send(
            Method::POST,
            "/v1/chat/messages",
            &coach,
            json!({ "text": "message B" }),
        )
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    app.realtime.publish(
        Collection::Messages,
        team_id,
        earlier,
        NotificationAction::Create,
    );

    let first = stream.next_event().await.unwrap();
    assert_eq!(first.data["id"], later["id"]);

    let second = stream.next_event().await.unwrap();
    assert_eq!(second.data["id"], earlier.to_string());
    assert_eq!(second.data["text"], "message A");

    // A repeated notification is not sent twice
    app.realtime.publish(
        Collection::Messages,
        team_id,
        earlier,
        NotificationAction::Create,
    );
    let repeat = stream
        .next_event_within(Duration::from_millis(300))
        .await
        .unwrap();
    assert!(repeat.is_none(), "duplicate delivery: {:?}", repeat);
}

#[tokio::test]
#[ignore] // Requires database setup
async fn test_stream_catches_up_after_lag() {
    let app = TestApp::new().await.unwrap();
    let (coach, team) = app.coach_with_team("Lightning").await.unwrap();
    let team_id = team_id(&team);

    app.send(
        Method::POST,
        "/v1/chat/messages",
        &coach,
        json!({ "text": "already in history" }),
    )
    .await
    .unwrap();

    let mut stream = app.open_stream("/v1/chat/stream", &coach).await.unwrap();

    let missed = insert_message(&app, team_id, &coach, "missed while lagging", 0).await;
    // Overflow the channel before the stream reads anything
    for _ in 0..300 {
        app.realtime.publish(
            Collection::Messages,
            team_id,
            Uuid::new_v4(),
            NotificationAction::Create,
        );
    }

    let event = stream.next_event().await.unwrap();
    assert_eq!(event.data["id"], missed.to_string());

    let more = stream
        .next_event_within(Duration::from_millis(300))
        .await
        .unwrap();
    assert!(more.is_none(), "unexpected event: {:?}", more);
}
