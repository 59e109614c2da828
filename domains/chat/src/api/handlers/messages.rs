//! Team chat handlers
//!
//! - GET /v1/chat/messages - Recent history of the caller's team
//! - POST /v1/chat/messages - Post a message
//! - GET /v1/chat/messages/{id} - A single message
//! - GET /v1/chat/stream - New messages pushed as they are posted (SSE)

use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use huddleup_common::{
    Collection, Error, NotificationAction, Result, SubscriptionEvent, ValidatedJson,
};

use crate::api::middleware::{AuthUser, ChatState};
use crate::domain::entities::{Message, NewMessage, SentMessages, HISTORY_LIMIT};

/// Ids remembered per stream; comfortably more than one history page
const SENT_CAPACITY: usize = 2 * HISTORY_LIMIT as usize;

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    /// Checked again after trimming
    #[validate(length(min = 1))]
    pub text: String,
}

/// Message history
///
/// **GET /v1/chat/messages**
pub async fn list_messages(
    AuthUser(session): AuthUser,
    State(state): State<ChatState>,
) -> Result<Json<Vec<Message>>> {
    let team = state.member_team(session.user_id()).await?;
    let messages = state.messages.list_recent(team.id, HISTORY_LIMIT).await?;
    Ok(Json(messages))
}

/// Post a message
///
/// **POST /v1/chat/messages**
pub async fn send_message(
    AuthUser(session): AuthUser,
    State(state): State<ChatState>,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>)> {
    let team = state.member_team(session.user_id()).await?;
    let new_message = NewMessage::new(team.id, session.user_id(), &request.text)?;

    let message = state.messages.create(&new_message).await?;

    let seq = state.realtime.publish(
        Collection::Messages,
        team.id,
        message.id,
        NotificationAction::Create,
    );

    tracing::debug!(
        message_id = %message.id,
        team_id = %team.id,
        seq,
        "Message posted"
    );

    Ok((StatusCode::CREATED, Json(message)))
}

/// A single message
///
/// **GET /v1/chat/messages/{id}**
pub async fn get_message(
    AuthUser(session): AuthUser,
    State(state): State<ChatState>,
    Path(message_id): Path<Uuid>,
) -> Result<Json<Message>> {
    let team = state.member_team(session.user_id()).await?;
    let message = state
        .messages
        .get_for_team(message_id, team.id)
        .await?
        .ok_or_else(|| Error::NotFound("Message not found".to_string()))?;
    Ok(Json(message))
}

fn message_event(seq: u64, message: &Message) -> Event {
    let data = serde_json::to_string(message).unwrap_or_else(|_| "{}".to_string());
    Event::default()
        .id(seq.to_string())
        .event("message")
        .data(data)
}

/// Message stream
///
/// **GET /v1/chat/stream**
///
/// Every create notification for the caller's team is refetched by id and
/// sent once. Publish order can differ from insert order, so delivery is
/// deduplicated by message id. After a lag the recent history is refetched
/// and whatever this stream has not sent yet goes out oldest first.
pub async fn chat_stream(
    AuthUser(session): AuthUser,
    State(state): State<ChatState>,
) -> Result<Sse<impl futures_core::Stream<Item = std::result::Result<Event, Infallible>>>> {
    let team = state.member_team(session.user_id()).await?;
    let team_id = team.id;

    let mut subscription = state.realtime.subscribe(Collection::Messages, team_id);

    // History the client can already load is not replayed after a lag
    let mut sent = SentMessages::with_capacity(SENT_CAPACITY);
    for message in state.messages.list_recent(team_id, HISTORY_LIMIT).await? {
        sent.insert(message.id);
    }

    let messages = state.messages.clone();
    let hub = state.realtime.clone();

    tracing::debug!(team_id = %team_id, user_id = %session.user_id(), "Chat stream opened");

    let stream = async_stream::stream! {
        while let Some(event) = subscription.next().await {
            match event {
                SubscriptionEvent::Notification(n) => {
                    if n.action != NotificationAction::Create || sent.contains(&n.record_id) {
                        continue;
                    }
                    match messages.get_for_team(n.record_id, team_id).await {
                        Ok(Some(message)) => {
                            if sent.insert(message.id) {
                                yield Ok(message_event(n.seq, &message));
                            }
                        }
                        Ok(None) => continue,
                        Err(e) => {
                            tracing::error!(error = %e, team_id = %team_id, "Message refetch failed");
                            break;
                        }
                    }
                }
                SubscriptionEvent::Lagged(missed) => {
                    tracing::debug!(team_id = %team_id, missed, "Chat stream lagged, catching up");
                    let recent = match messages.list_recent(team_id, HISTORY_LIMIT).await {
                        Ok(list) => list,
                        Err(e) => {
                            tracing::error!(error = %e, team_id = %team_id, "Message catch-up failed");
                            break;
                        }
                    };
                    let seq = hub.current_seq();
                    for message in recent {
                        if sent.insert(message.id) {
                            yield Ok(message_event(seq, &message));
                        }
                    }
                }
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
