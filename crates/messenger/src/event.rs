//! Messenger webhook event model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A conversation participant (sender or recipient).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
}

/// A tapped quick reply attached to a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickReply {
    pub payload: String,
}

/// A media or template attachment on an inbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

/// The `message` half of a messaging entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    #[serde(default)]
    pub mid: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub quick_reply: Option<QuickReply>,
}

/// The `postback` half of a messaging entry (button taps).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Postback {
    pub payload: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// One raw messaging entry from the Messenger webhook payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMessengerEvent {
    pub sender: Participant,
    pub recipient: Participant,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub message: Option<InboundMessage>,
    #[serde(default)]
    pub postback: Option<Postback>,
}

/// Read-only view over a raw webhook event.
#[derive(Debug, Clone)]
pub struct MessengerEvent {
    raw: RawMessengerEvent,
}

impl MessengerEvent {
    pub fn new(raw: RawMessengerEvent) -> Self {
        Self { raw }
    }

    /// The underlying webhook entry.
    pub fn raw(&self) -> &RawMessengerEvent {
        &self.raw
    }

    /// Identifier of the user the event came from.
    pub fn sender_id(&self) -> &str {
        &self.raw.sender.id
    }

    pub fn is_message(&self) -> bool {
        self.raw.message.is_some()
    }

    pub fn is_text_message(&self) -> bool {
        self.raw
            .message
            .as_ref()
            .is_some_and(|message| message.text.is_some())
    }

    /// The message text, for text messages.
    pub fn text(&self) -> Option<&str> {
        self.raw.message.as_ref()?.text.as_deref()
    }

    pub fn is_postback(&self) -> bool {
        self.raw.postback.is_some()
    }

    /// The payload of a tapped postback button.
    pub fn postback_payload(&self) -> Option<&str> {
        self.raw
            .postback
            .as_ref()
            .map(|postback| postback.payload.as_str())
    }

    /// The payload of a tapped quick reply.
    pub fn quick_reply_payload(&self) -> Option<&str> {
        self.raw
            .message
            .as_ref()?
            .quick_reply
            .as_ref()
            .map(|quick_reply| quick_reply.payload.as_str())
    }

    /// Attachments on the inbound message, empty for non-messages.
    pub fn attachments(&self) -> &[Attachment] {
        self.raw
            .message
            .as_ref()
            .map(|message| message.attachments.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> MessengerEvent {
        MessengerEvent::new(serde_json::from_value(value).expect("valid event"))
    }

    #[test]
    fn parses_text_message() {
        let event = parse(json!({
            "sender": { "id": "1234" },
            "recipient": { "id": "page-1" },
            "timestamp": 1458692752478u64,
            "message": { "mid": "mid.1457764197618", "text": "hello" }
        }));

        assert_eq!(event.sender_id(), "1234");
        assert!(event.is_message());
        assert!(event.is_text_message());
        assert_eq!(event.text(), Some("hello"));
        assert!(!event.is_postback());
        assert!(event.attachments().is_empty());
    }

    #[test]
    fn parses_postback() {
        let event = parse(json!({
            "sender": { "id": "1234" },
            "recipient": { "id": "page-1" },
            "postback": { "payload": "USER_DEFINED_PAYLOAD", "title": "Get Started" }
        }));

        assert!(!event.is_message());
        assert!(event.is_postback());
        assert_eq!(event.postback_payload(), Some("USER_DEFINED_PAYLOAD"));
        assert_eq!(event.text(), None);
    }

    #[test]
    fn parses_attachments_and_quick_reply() {
        let event = parse(json!({
            "sender": { "id": "1234" },
            "recipient": { "id": "page-1" },
            "message": {
                "attachments": [
                    { "type": "image", "payload": { "url": "https://example.com/a.png" } }
                ],
                "quick_reply": { "payload": "PICKED_RED" }
            }
        }));

        assert!(event.is_message());
        assert!(!event.is_text_message());
        assert_eq!(event.attachments().len(), 1);
        assert_eq!(event.attachments()[0].kind, "image");
        assert_eq!(event.quick_reply_payload(), Some("PICKED_RED"));
    }
}
