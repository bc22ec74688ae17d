//! Facebook Graph API send client.

use async_trait::async_trait;
use serde_json::{Value, json};

use courier_bot_core::{OutboundClient, SendError};

use crate::actions::Action;
use crate::config::GraphConfig;

const GRAPH_BASE: &str = "https://graph.facebook.com";

/// Send-API client for the Messenger platform.
///
/// Implements [`OutboundClient`] over `POST /{version}/me/messages`;
/// presence indicators go out as `sender_action` calls on the same
/// endpoint.
#[derive(Clone)]
pub struct GraphApiClient {
    http_client: reqwest::Client,
    access_token: String,
    api_version: String,
}

impl GraphApiClient {
    pub fn new(config: &GraphConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http_client,
            access_token: config.access_token.clone(),
            api_version: config.api_version.clone(),
        })
    }

    fn send_url(&self) -> String {
        format!("{}/{}/me/messages", GRAPH_BASE, self.api_version)
    }

    async fn post(&self, body: Value) -> Result<(), SendError> {
        let response = self
            .http_client
            .post(self.send_url())
            .query(&[("access_token", self.access_token.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|err| SendError::Http(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SendError::Api(format!("{status} - {error_text}")));
        }

        Ok(())
    }

    async fn sender_action(&self, target: &str, sender_action: &str) -> Result<(), SendError> {
        self.post(json!({
            "recipient": { "id": target },
            "sender_action": sender_action,
        }))
        .await
    }
}

#[async_trait]
impl OutboundClient<Action> for GraphApiClient {
    async fn invoke(&self, action: Action, target: &str, args: &[Value]) -> Result<(), SendError> {
        let message = message_payload(action, args)?;
        self.post(json!({
            "recipient": { "id": target },
            "messaging_type": "RESPONSE",
            "message": message,
        }))
        .await
    }

    async fn indicator_on(&self, target: &str) -> Result<(), SendError> {
        self.sender_action(target, "typing_on").await
    }

    async fn indicator_off(&self, target: &str) -> Result<(), SendError> {
        self.sender_action(target, "typing_off").await
    }
}

/// Builds the `message` object for an action. Pure, no network.
pub(crate) fn message_payload(action: Action, args: &[Value]) -> Result<Value, SendError> {
    let arg = |index: usize| args.get(index).cloned().unwrap_or(Value::Null);

    let message = match action {
        Action::SendText => json!({ "text": arg(0) }),
        Action::SendImage => media_attachment("image", arg(0)),
        Action::SendAudio => media_attachment("audio", arg(0)),
        Action::SendVideo => media_attachment("video", arg(0)),
        Action::SendFile => media_attachment("file", arg(0)),
        Action::SendQuickReplies => json!({ "text": arg(0), "quick_replies": arg(1) }),
        Action::SendGenericTemplate => template_attachment(json!({
            "template_type": "generic",
            "elements": arg(0),
        })),
        Action::SendButtonTemplate => template_attachment(json!({
            "template_type": "button",
            "text": arg(0),
            "buttons": arg(1),
        })),
        Action::SendListTemplate => template_attachment(json!({
            "template_type": "list",
            "elements": arg(0),
            "buttons": arg(1),
        })),
        Action::SendReceiptTemplate => tagged_template("receipt", arg(0))?,
        Action::SendAirlineBoardingPassTemplate => tagged_template("airline_boardingpass", arg(0))?,
        Action::SendAirlineCheckinTemplate => tagged_template("airline_checkin", arg(0))?,
        Action::SendAirlineItineraryTemplate => tagged_template("airline_itinerary", arg(0))?,
        Action::SendAirlineFlightUpdateTemplate => tagged_template("airline_update", arg(0))?,
    };

    Ok(message)
}

fn media_attachment(kind: &str, url: Value) -> Value {
    json!({
        "attachment": {
            "type": kind,
            "payload": { "url": url },
        }
    })
}

fn template_attachment(payload: Value) -> Value {
    json!({
        "attachment": {
            "type": "template",
            "payload": payload,
        }
    })
}

/// Stamps `template_type` into a caller-supplied template payload.
fn tagged_template(template_type: &str, base: Value) -> Result<Value, SendError> {
    let Value::Object(mut payload) = base else {
        return Err(SendError::Payload(format!(
            "{template_type} template payload must be an object"
        )));
    };
    payload.insert("template_type".to_string(), json!(template_type));
    Ok(template_attachment(Value::Object(payload)))
}
