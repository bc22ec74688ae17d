//! Session data and session key management for chat bots.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;

/// Type of chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatType {
    /// Direct message (1:1 conversation)
    Dm,
    /// Group chat
    Group,
    /// Thread within a group
    Thread,
}

impl ChatType {
    /// Returns the chat type identifier used in session keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatType::Dm => "dm",
            ChatType::Group => "group",
            ChatType::Thread => "thread",
        }
    }
}

/// Builder for constructing session keys.
///
/// Session keys follow the format: `{platform}:{chat_type}:{id}`
#[derive(Debug, Clone)]
pub struct SessionKeyBuilder {
    platform: &'static str,
    chat_type: Option<ChatType>,
    id: Option<String>,
}

impl SessionKeyBuilder {
    /// Create a new session key builder for a platform.
    pub fn new(platform: &'static str) -> Self {
        Self {
            platform,
            chat_type: None,
            id: None,
        }
    }

    /// Set as a DM session with the given user ID.
    pub fn dm(mut self, user_id: impl Into<String>) -> Self {
        self.chat_type = Some(ChatType::Dm);
        self.id = Some(user_id.into());
        self
    }

    /// Set as a group session with the given chat ID.
    pub fn group(mut self, chat_id: impl Into<String>) -> Self {
        self.chat_type = Some(ChatType::Group);
        self.id = Some(chat_id.into());
        self
    }

    /// Build the session key string.
    ///
    /// # Panics
    /// Panics if chat type or ID has not been set.
    pub fn build(self) -> String {
        let chat_type = self.chat_type.expect("chat_type must be set");
        let id = self.id.expect("id must be set");
        format!("{}:{}:{}", self.platform, chat_type.as_str(), id)
    }
}

/// Per-session state: the recipient identity plus an arbitrary bag of
/// values application code reads and writes between turns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionData {
    user_id: String,
    #[serde(default)]
    values: serde_json::Map<String, Value>,
}

impl SessionData {
    /// Create session data for a recipient with an empty bag.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            values: serde_json::Map::new(),
        }
    }

    /// The recipient identifier this session belongs to.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Read a value from the session bag.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Write a value into the session bag.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Remove a value from the session bag.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }
}

/// Persistence seam for session data. Load/save scheduling is the
/// application's concern; contexts only hold a handle.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the session data stored under a key, if any.
    async fn load(&self, key: &str) -> Result<Option<SessionData>, StoreError>;

    /// Save session data under a key.
    async fn save(&self, key: &str, data: &SessionData) -> Result<(), StoreError>;
}
