//! # Message History
//!
//! A paged history endpoint in miniature: [`HistoryFeed`] hands out one
//! scripted page of payloads per fetch, then empty pages forever, matching
//! the shape of a real listing API. Draining goes through
//! [`chat_model::Exhaust`], so fetches happen on demand and stop at the first
//! empty page.

use chat_model::Exhaust;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::error::MessengerError;
use crate::model::Message;
use crate::session::Messenger;

/// A canned paged source of message payloads.
#[derive(Clone)]
pub struct HistoryFeed {
    pages: Arc<Mutex<VecDeque<Vec<Value>>>>,
}

impl HistoryFeed {
    pub fn new(pages: Vec<Vec<Value>>) -> Self {
        Self {
            pages: Arc::new(Mutex::new(VecDeque::from(pages))),
        }
    }

    /// The next page, oldest first; an empty page once the history is spent.
    pub async fn fetch(&self) -> Result<Vec<Value>, MessengerError> {
        let page = self.pages.lock().unwrap().pop_front().unwrap_or_default();
        debug!(items = page.len(), "History page fetched");
        Ok(page)
    }

    /// Drains every remaining page and builds a message per payload.
    pub async fn drain_into(&self, session: &Messenger) -> Result<Vec<Message>, MessengerError> {
        let feed = self.clone();
        let mut payloads = Exhaust::new(move || {
            let feed = feed.clone();
            async move { feed.fetch().await }
        });

        let mut messages = Vec::new();
        while let Some(payload) = payloads.next().await? {
            messages.push(Message::from_payload(session.clone(), payload)?);
        }
        debug!(
            messages = messages.len(),
            pages = payloads.pages_fetched(),
            "History drained"
        );
        Ok(messages)
    }
}
