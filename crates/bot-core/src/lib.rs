//! Shared infrastructure for Courier chat bots (Messenger, and whatever
//! comes next).
//!
//! This crate provides platform-agnostic abstractions for:
//! - The paced outbound job queue (serial, delayed, indicator-wrapped sends)
//! - The remote-client capability trait the queue drives
//! - Session data and session key management
//! - Common error types
//!
//! Platform-specific crates (messenger) build on these primitives.

pub mod client;
pub mod error;
pub mod job;
pub mod queue;
pub mod session;

pub use client::OutboundClient;
pub use error::{EnqueueError, SendError, StoreError};
pub use job::Job;
pub use queue::{DEFAULT_MESSAGE_DELAY, JobFailure, JobHooks, PacedJobQueue, PacingHooks};
pub use session::{ChatType, SessionData, SessionKeyBuilder, SessionStore};
