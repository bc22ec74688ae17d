use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::time::Instant;

use courier_bot_core::{OutboundClient, SendError, SessionData, SessionStore, StoreError};
use courier_messenger::{Action, MessengerContext, RawMessengerEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
enum TraceEvent {
    IndicatorOn(String),
    Call(&'static str, String, Vec<Value>),
    IndicatorOff(String),
}

/// Records every outbound call with the (virtual) instant it happened.
struct RecordingClient {
    trace: Mutex<Vec<(Instant, TraceEvent)>>,
    fail_calls: bool,
}

impl RecordingClient {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            trace: Mutex::new(Vec::new()),
            fail_calls: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            trace: Mutex::new(Vec::new()),
            fail_calls: true,
        })
    }

    fn record(&self, event: TraceEvent) {
        self.trace.lock().unwrap().push((Instant::now(), event));
    }

    fn events(&self) -> Vec<TraceEvent> {
        self.trace
            .lock()
            .unwrap()
            .iter()
            .map(|(_, event)| event.clone())
            .collect()
    }

    fn len(&self) -> usize {
        self.trace.lock().unwrap().len()
    }
}

#[async_trait]
impl OutboundClient<Action> for RecordingClient {
    async fn invoke(&self, action: Action, target: &str, args: &[Value]) -> Result<(), SendError> {
        self.record(TraceEvent::Call(
            action.name(),
            target.to_string(),
            args.to_vec(),
        ));
        if self.fail_calls {
            Err(SendError::Api("400 - invalid recipient".to_string()))
        } else {
            Ok(())
        }
    }

    async fn indicator_on(&self, target: &str) -> Result<(), SendError> {
        self.record(TraceEvent::IndicatorOn(target.to_string()));
        Ok(())
    }

    async fn indicator_off(&self, target: &str) -> Result<(), SendError> {
        self.record(TraceEvent::IndicatorOff(target.to_string()));
        Ok(())
    }
}

/// In-memory session store for tests.
#[derive(Default)]
struct MemoryStore {
    sessions: Mutex<HashMap<String, SessionData>>,
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<SessionData>, StoreError> {
        Ok(self.sessions.lock().unwrap().get(key).cloned())
    }

    async fn save(&self, key: &str, data: &SessionData) -> Result<(), StoreError> {
        self.sessions
            .lock()
            .unwrap()
            .insert(key.to_string(), data.clone());
        Ok(())
    }
}

fn text_event(sender_id: &str) -> RawMessengerEvent {
    serde_json::from_value(json!({
        "sender": { "id": sender_id },
        "recipient": { "id": "page-1" },
        "message": { "mid": "mid.1", "text": "hi bot" }
    }))
    .expect("valid event")
}

fn context_for(
    client: &Arc<RecordingClient>,
    user_id: &str,
) -> (
    MessengerContext,
    tokio::sync::mpsc::UnboundedReceiver<courier_bot_core::JobFailure<Action>>,
) {
    let outbound: Arc<dyn OutboundClient<Action>> = client.clone();
    MessengerContext::new(
        outbound,
        text_event(user_id),
        SessionData::new(user_id),
        Arc::new(MemoryStore::default()),
    )
}

async fn wait_for_trace(client: &Arc<RecordingClient>, len: usize) {
    tokio::time::timeout(Duration::from_secs(60), async {
        while client.len() < len {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("trace never reached expected length");
}

#[tokio::test(start_paused = true)]
async fn to_variant_sends_unpaced_without_indicators() {
    let client = RecordingClient::new();
    let (context, _failures) = context_for(&client, "user-1");
    let start = Instant::now();

    context.send_text_to("userId42", "hi").unwrap();
    // Enqueue returns before anything executes.
    assert_eq!(client.len(), 0);

    wait_for_trace(&client, 1).await;
    let trace = client.trace.lock().unwrap();
    let (at, event) = &trace[0];
    assert_eq!(
        event,
        &TraceEvent::Call("sendText", "userId42".to_string(), vec![json!("hi")])
    );
    // Zero delay: still yielded, but no time passed.
    assert_eq!(at.duration_since(start), Duration::ZERO);
    assert_eq!(trace.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn default_convention_paces_the_session_recipient() {
    let client = RecordingClient::new();
    let (context, _failures) = context_for(&client, "user-1");
    let start = Instant::now();

    context.send_text("hello").unwrap();
    wait_for_trace(&client, 3).await;

    let trace = client.trace.lock().unwrap();
    assert_eq!(trace[0].1, TraceEvent::IndicatorOn("user-1".to_string()));
    assert_eq!(trace[0].0.duration_since(start), Duration::ZERO);
    assert_eq!(
        trace[1].1,
        TraceEvent::Call("sendText", "user-1".to_string(), vec![json!("hello")])
    );
    assert_eq!(trace[1].0.duration_since(start), Duration::from_millis(1000));
    assert_eq!(trace[2].1, TraceEvent::IndicatorOff("user-1".to_string()));
}

#[tokio::test(start_paused = true)]
async fn with_delay_convention_uses_the_explicit_delay() {
    let client = RecordingClient::new();
    let (context, _failures) = context_for(&client, "user-1");
    let start = Instant::now();

    context
        .send_image_with_delay(Duration::from_millis(250), "https://example.com/a.png")
        .unwrap();
    wait_for_trace(&client, 3).await;

    let trace = client.trace.lock().unwrap();
    assert_eq!(trace[0].1, TraceEvent::IndicatorOn("user-1".to_string()));
    assert_eq!(
        trace[1].1,
        TraceEvent::Call(
            "sendImage",
            "user-1".to_string(),
            vec![json!("https://example.com/a.png")]
        )
    );
    assert_eq!(trace[1].0.duration_since(start), Duration::from_millis(250));
    assert_eq!(trace[2].1, TraceEvent::IndicatorOff("user-1".to_string()));
}

#[tokio::test(start_paused = true)]
async fn mixed_conventions_stay_in_submission_order() {
    let client = RecordingClient::new();
    let (context, _failures) = context_for(&client, "user-1");

    context.send_text("one").unwrap();
    context.send_text_to("other-user", "two").unwrap();
    context
        .send_text_with_delay(Duration::from_millis(10), "three")
        .unwrap();
    wait_for_trace(&client, 7).await;

    let calls: Vec<Vec<Value>> = client
        .events()
        .into_iter()
        .filter_map(|event| match event {
            TraceEvent::Call(_, _, args) => Some(args),
            _ => None,
        })
        .collect();
    assert_eq!(
        calls,
        vec![vec![json!("one")], vec![json!("two")], vec![json!("three")]]
    );
}

#[tokio::test(start_paused = true)]
async fn rejected_jobs_surface_on_the_failure_channel() {
    let client = RecordingClient::failing();
    let (context, mut failures) = context_for(&client, "user-1");

    context.send_text("first").unwrap();
    context.send_text("second").unwrap();
    wait_for_trace(&client, 6).await;

    let first = failures.recv().await.expect("first failure");
    assert_eq!(first.job.target, "user-1");
    assert_eq!(first.job.args, vec![json!("first")]);
    assert!(matches!(first.error, SendError::Api(_)));

    // The rejection did not stop the queue.
    let second = failures.recv().await.expect("second failure");
    assert_eq!(second.job.args, vec![json!("second")]);
}

#[tokio::test(start_paused = true)]
async fn typing_passthroughs_hit_the_client_directly() {
    let client = RecordingClient::new();
    let (context, _failures) = context_for(&client, "user-1");

    context.turn_typing_indicators_on().await.unwrap();
    context.turn_typing_indicators_off().await.unwrap();

    assert_eq!(
        client.events(),
        vec![
            TraceEvent::IndicatorOn("user-1".to_string()),
            TraceEvent::IndicatorOff("user-1".to_string()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn template_args_pass_through_opaquely() {
    let client = RecordingClient::new();
    let (context, _failures) = context_for(&client, "user-1");
    let buttons = json!([{ "type": "postback", "title": "Yes", "payload": "YES" }]);

    context
        .send_button_template_to("userId42", "Sure?", buttons.clone())
        .unwrap();
    wait_for_trace(&client, 1).await;

    assert_eq!(
        client.events(),
        vec![TraceEvent::Call(
            "sendButtonTemplate",
            "userId42".to_string(),
            vec![json!("Sure?"), buttons],
        )]
    );
}

#[tokio::test]
async fn context_exposes_event_session_and_store() {
    let client = RecordingClient::new();
    let (mut context, _failures) = context_for(&client, "user-7");

    assert_eq!(context.event().sender_id(), "user-7");
    assert_eq!(context.event().text(), Some("hi bot"));
    assert_eq!(context.session_key(), "messenger:dm:user-7");

    context.data_mut().set("step", json!("checkout"));
    let key = context.session_key();
    context.store().save(&key, context.data()).await.unwrap();

    let loaded = context.store().load(&key).await.unwrap().expect("saved");
    assert_eq!(loaded.get("step"), Some(&json!("checkout")));
    assert_eq!(loaded.user_id(), "user-7");
}
