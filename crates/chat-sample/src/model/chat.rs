//! # Chat Entry
//!
//! The record the chats directory serves.

use serde::{Deserialize, Serialize};

/// A conversation known to the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    pub topic: String,
}

impl Chat {
    pub fn new(id: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            topic: topic.into(),
        }
    }
}
