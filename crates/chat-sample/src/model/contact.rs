//! # Contact Entry
//!
//! The record the contacts directory serves. Plain data; the session decides
//! how entries are stored and cached.

use chat_model::Status;
use serde::{Deserialize, Serialize};

/// A user known to the session: identifier, display name, presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub status: Status,
    /// Free-form mood line, when the user set one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
}

impl Contact {
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: Status) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            mood: None,
        }
    }

    pub fn with_mood(mut self, mood: impl Into<String>) -> Self {
        self.mood = Some(mood.into());
        self
    }
}
