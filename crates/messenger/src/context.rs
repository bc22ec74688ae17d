//! The Messenger session context: one inbound event, one session, one
//! paced outbound queue.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

use courier_bot_core::{
    DEFAULT_MESSAGE_DELAY, EnqueueError, Job, JobFailure, OutboundClient, PacedJobQueue,
    PacingHooks, SendError, SessionData, SessionKeyBuilder, SessionStore,
};

use crate::actions::Action;
use crate::event::{MessengerEvent, RawMessengerEvent};

/// How a generated entry point resolves its job parameters.
#[derive(Debug)]
pub(crate) enum CallKind {
    /// Session recipient, default pacing delay, indicator shown.
    Paced,
    /// Explicit recipient, no delay, no indicator.
    Background(String),
    /// Session recipient, explicit delay, indicator shown.
    Delayed(Duration),
}

/// Session-scoped façade binding the inbound event, the session data
/// and the paced outbound queue.
///
/// Built once per inbound event; its queue may keep draining in the
/// background after the handling turn ends. The generated send methods
/// (see [`crate::actions`]) enqueue and return immediately, they never
/// await delivery.
pub struct MessengerContext {
    client: Arc<dyn OutboundClient<Action>>,
    event: MessengerEvent,
    data: SessionData,
    store: Arc<dyn SessionStore>,
    queue: PacedJobQueue<Action>,
}

impl MessengerContext {
    /// Build a context for one inbound event, spawning its paced queue.
    ///
    /// Returns the context together with the channel on which jobs the
    /// platform rejected are surfaced.
    pub fn new(
        client: Arc<dyn OutboundClient<Action>>,
        raw_event: RawMessengerEvent,
        data: SessionData,
        store: Arc<dyn SessionStore>,
    ) -> (Self, mpsc::UnboundedReceiver<JobFailure<Action>>) {
        let (failures_tx, failures_rx) = mpsc::unbounded_channel();
        let hooks = Arc::new(PacingHooks::new(client.clone()));
        let queue = PacedJobQueue::spawn(client.clone(), hooks, Some(failures_tx));
        let context = Self {
            client,
            event: MessengerEvent::new(raw_event),
            data,
            store,
            queue,
        };
        (context, failures_rx)
    }

    /// The parsed inbound event.
    pub fn event(&self) -> &MessengerEvent {
        &self.event
    }

    /// The session's data bag.
    pub fn data(&self) -> &SessionData {
        &self.data
    }

    /// Mutable access to the session's data bag.
    pub fn data_mut(&mut self) -> &mut SessionData {
        &mut self.data
    }

    /// The session store handle this context was created with.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Session key for this conversation: `messenger:dm:{user_id}`.
    pub fn session_key(&self) -> String {
        SessionKeyBuilder::new("messenger")
            .dm(self.data.user_id())
            .build()
    }

    /// Turns the typing indicator on for the session recipient, outside
    /// the paced queue.
    pub async fn turn_typing_indicators_on(&self) -> Result<(), SendError> {
        self.client.indicator_on(self.data.user_id()).await
    }

    /// Turns the typing indicator off for the session recipient, outside
    /// the paced queue.
    pub async fn turn_typing_indicators_off(&self) -> Result<(), SendError> {
        self.client.indicator_off(self.data.user_id()).await
    }

    /// Common tail of every generated entry point: resolve the job
    /// parameters from the call kind and enqueue.
    pub(crate) fn schedule(
        &self,
        action: Action,
        kind: CallKind,
        args: Vec<Value>,
    ) -> Result<(), EnqueueError> {
        let (target, delay, show_indicator) = match kind {
            CallKind::Paced => (
                self.data.user_id().to_owned(),
                DEFAULT_MESSAGE_DELAY,
                true,
            ),
            CallKind::Background(target) => (target, Duration::ZERO, false),
            CallKind::Delayed(delay) => (self.data.user_id().to_owned(), delay, true),
        };
        debug!("Scheduling {} for {}", action.name(), target);
        self.queue.enqueue(Job {
            action,
            target,
            args,
            delay,
            show_indicator,
        })
    }
}
