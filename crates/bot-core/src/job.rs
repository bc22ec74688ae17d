//! The unit of scheduled outbound work.

use std::time::Duration;

use serde_json::Value;

/// One scheduled outbound action with its pacing parameters.
///
/// Jobs are immutable once enqueued (they are moved into the queue) and
/// carry no references back to the caller.
#[derive(Debug, Clone)]
pub struct Job<A> {
    /// Registry identifier of the remote-client method to invoke.
    pub action: A,
    /// Recipient identifier, opaque to the queue.
    pub target: String,
    /// Action-specific arguments, opaque to the queue.
    pub args: Vec<Value>,
    /// How long to wait once the job reaches the head of the queue.
    pub delay: Duration,
    /// Whether to toggle the presence indicator around execution.
    pub show_indicator: bool,
}
