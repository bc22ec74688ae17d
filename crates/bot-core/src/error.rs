//! Error types for outbound dispatch.

use thiserror::Error;

/// Errors raised synchronously when scheduling a job.
///
/// Malformed jobs in the original sense (unknown action name, negative
/// delay) are unrepresentable here: actions are enum values and delays
/// are [`std::time::Duration`]s. The one remaining failure is a queue
/// whose drain task is gone.
#[derive(Debug, Error)]
pub enum EnqueueError {
    /// The queue is no longer draining; the owning context was torn down.
    #[error("Job queue is closed")]
    Closed,
}

/// Errors from the remote messaging platform.
///
/// These are per-job failures: the queue reports them and moves on to
/// the next job, it never aborts on one.
#[derive(Debug, Error)]
pub enum SendError {
    /// The platform rejected the call.
    #[error("Platform error: {0}")]
    Api(String),

    /// Transport-level failure reaching the platform.
    #[error("Transport error: {0}")]
    Http(String),

    /// The action's arguments could not be shaped into a valid payload.
    #[error("Malformed payload: {0}")]
    Payload(String),
}

/// Errors from the session store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store failed to load or save session data.
    #[error("Session store error: {0}")]
    Backend(String),
}
