//! The capability set the queue needs from a remote messaging platform.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SendError;

/// Remote messaging client driven by the paced queue.
///
/// `A` is the platform's action registry (an enum). The queue interprets
/// call results as success or failure only; it never inspects response
/// bodies.
#[async_trait]
pub trait OutboundClient<A>: Send + Sync {
    /// Invoke the platform method named by `action` for a recipient.
    async fn invoke(&self, action: A, target: &str, args: &[Value]) -> Result<(), SendError>;

    /// Turn the "is typing" presence signal on for a recipient.
    async fn indicator_on(&self, target: &str) -> Result<(), SendError>;

    /// Turn the "is typing" presence signal off for a recipient.
    async fn indicator_off(&self, target: &str) -> Result<(), SendError>;
}
