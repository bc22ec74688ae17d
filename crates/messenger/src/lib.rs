//! Messenger flavor of the Courier outbound dispatcher.
//!
//! One [`MessengerContext`] is built per inbound webhook event. It binds
//! the parsed event, the session data and a paced outbound queue, and
//! exposes three generated entry points per registered action:
//! `send_x` (session recipient, default pacing), `send_x_to` (explicit
//! recipient, unpaced, no indicator) and `send_x_with_delay` (session
//! recipient, explicit pacing).

pub mod actions;
pub mod config;
pub mod context;
pub mod event;
pub mod graph;

pub use actions::Action;
pub use config::GraphConfig;
pub use context::MessengerContext;
pub use event::{MessengerEvent, RawMessengerEvent};
pub use graph::GraphApiClient;
