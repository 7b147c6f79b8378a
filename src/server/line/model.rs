//! LINE webhook payloads and Messaging API bodies.

use serde::{Deserialize, Serialize};

/// Body of a webhook request sent by the LINE platform.
#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    /// Bot user ID the events were sent to
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// A single webhook event, tagged by its `type` field.
///
/// Event types the bot does not handle deserialize as [`WebhookEvent::Other`].
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum WebhookEvent {
    Follow {
        reply_token: Option<String>,
        source: EventSource,
    },
    Unfollow {
        source: EventSource,
    },
    Message {
        reply_token: Option<String>,
        source: EventSource,
        message: EventMessage,
    },
    Postback {
        reply_token: Option<String>,
        source: EventSource,
        postback: Postback,
    },
    #[serde(other)]
    Other,
}

impl WebhookEvent {
    /// Event type as sent by LINE
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Follow { .. } => "follow",
            Self::Unfollow { .. } => "unfollow",
            Self::Message { .. } => "message",
            Self::Postback { .. } => "postback",
            Self::Other => "other",
        }
    }

    /// LINE user ID of the sender, absent for group events without a user
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::Follow { source, .. }
            | Self::Unfollow { source }
            | Self::Message { source, .. }
            | Self::Postback { source, .. } => source.user_id.as_deref(),
            Self::Other => None,
        }
    }

    pub fn reply_token(&self) -> Option<&str> {
        match self {
            Self::Follow { reply_token, .. }
            | Self::Message { reply_token, .. }
            | Self::Postback { reply_token, .. } => reply_token.as_deref(),
            Self::Unfollow { .. } | Self::Other => None,
        }
    }

    /// Text stored in the inbound message log for this event
    pub fn log_content(&self) -> String {
        match self {
            Self::Message {
                message: EventMessage::Text { text, .. },
                ..
            } => text.clone(),
            Self::Message { .. } => "[non-text message]".to_string(),
            Self::Postback { postback, .. } => postback.data.clone(),
            Self::Follow { .. } => "[follow]".to_string(),
            Self::Unfollow { .. } => "[unfollow]".to_string(),
            Self::Other => "[unsupported event]".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(rename = "type")]
    pub source_type: String,
    pub user_id: Option<String>,
    pub group_id: Option<String>,
    pub room_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventMessage {
    Text { id: String, text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct Postback {
    /// Form-urlencoded payload such as `action=checkin&event_id=3`
    pub data: String,
}

/// Outbound message object.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    Text { text: String },
}

impl Message {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReplyRequest<'a> {
    pub reply_token: &'a str,
    pub messages: &'a [Message],
}

#[derive(Serialize)]
pub(crate) struct MulticastRequest<'a> {
    pub to: &'a [String],
    pub messages: &'a [Message],
}

/// User profile returned by `GET /v2/bot/profile/{userId}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    pub display_name: String,
    pub picture_url: Option<String>,
    pub status_message: Option<String>,
}

/// Bot information returned by `GET /v2/bot/info`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotInfo {
    pub user_id: String,
    pub basic_id: String,
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Expect every handled event type to deserialize with its fields
    #[test]
    fn parses_webhook_events() {
        let body = r#"{
            "destination": "Ubot",
            "events": [
                {"type": "follow", "replyToken": "r1", "timestamp": 1,
                 "source": {"type": "user", "userId": "U1"}, "mode": "active"},
                {"type": "message", "replyToken": "r2",
                 "source": {"type": "user", "userId": "U1"},
                 "message": {"type": "text", "id": "100", "text": "checkin 3", "quoteToken": "q"}},
                {"type": "postback", "replyToken": "r3",
                 "source": {"type": "user", "userId": "U2"},
                 "postback": {"data": "action=checkin&event_id=3"}},
                {"type": "unfollow", "source": {"type": "user", "userId": "U3"}},
                {"type": "beacon", "replyToken": "r4",
                 "source": {"type": "user", "userId": "U4"}, "beacon": {"hwid": "d41d8cd98f"}}
            ]
        }"#;

        let request: WebhookRequest = serde_json::from_str(body).unwrap();

        assert_eq!(request.destination.as_deref(), Some("Ubot"));
        assert_eq!(request.events.len(), 5);

        let kinds: Vec<&str> = request.events.iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec!["follow", "message", "postback", "unfollow", "other"]
        );

        assert_eq!(request.events[1].log_content(), "checkin 3");
        assert_eq!(request.events[2].user_id(), Some("U2"));
        assert_eq!(request.events[3].reply_token(), None);
    }

    /// Expect non-text messages to be accepted rather than failing the whole request
    #[test]
    fn parses_sticker_message_as_other() {
        let body = r#"{"type": "message", "replyToken": "r",
            "source": {"type": "user", "userId": "U1"},
            "message": {"type": "sticker", "id": "1", "packageId": "1", "stickerId": "1"}}"#;

        let event: WebhookEvent = serde_json::from_str(body).unwrap();

        assert!(matches!(
            event,
            WebhookEvent::Message {
                message: EventMessage::Other,
                ..
            }
        ));
    }

    /// Expect outbound text messages to serialize in Messaging API shape
    #[test]
    fn serializes_text_message() {
        let json = serde_json::to_value(Message::text("hello")).unwrap();

        assert_eq!(json, serde_json::json!({"type": "text", "text": "hello"}));
    }
}
