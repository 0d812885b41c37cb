//! # Messages
//!
//! The base [`Message`] entity and the [`FileMessage`] specialization that
//! layers file attributes over the same schema.

use chat_model::{EntityType, Instance, ModelError, RefKind, RefSet, Schema};
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::MessengerError;
use crate::model::{from_object, Chat, Contact};
use crate::session::Messenger;

static MESSAGE_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::builder("Message")
        .attr("id")
        .attr("time")
        .attr("userId")
        .attr("chatId")
        .attr("content")
        .build()
        .expect("Message schema is valid")
});

static MESSAGE_REFS: Lazy<RefSet> = Lazy::new(|| {
    RefSet::builder()
        .shorthand(RefKind::User)
        .shorthand(RefKind::Chat)
        .build()
        .expect("Message refs are valid")
});

/// A text message in a conversation.
///
/// Stores the sender and conversation as identifiers, the way the wire
/// payload does; [`Message::sender`] and [`Message::chat`] resolve them
/// through the session on each call.
#[derive(Debug, Clone)]
pub struct Message {
    instance: Instance<Messenger>,
}

impl Message {
    /// Builds a message from an API payload object.
    pub fn from_payload(session: Messenger, payload: Value) -> Result<Self, MessengerError> {
        from_object(session, payload)
    }

    pub fn message_id(&self) -> Option<&str> {
        self.instance.value_of("id").and_then(Value::as_str)
    }

    /// Epoch milliseconds the message was sent at.
    pub fn sent_at(&self) -> Option<i64> {
        self.instance.value_of("time").and_then(Value::as_i64)
    }

    pub fn content(&self) -> Option<&str> {
        self.instance.value_of("content").and_then(Value::as_str)
    }

    /// The sending user, resolved through the session's contacts.
    pub async fn sender(&self) -> Result<Contact, ModelError> {
        self.instance.resolve_user("user").await
    }

    /// The conversation the message belongs to.
    pub async fn chat(&self) -> Result<Chat, ModelError> {
        self.instance.resolve_chat("chat").await
    }

    pub fn instance(&self) -> &Instance<Messenger> {
        &self.instance
    }
}

impl EntityType for Message {
    type Session = Messenger;

    fn schema() -> &'static Schema {
        &MESSAGE_SCHEMA
    }

    fn refs() -> &'static RefSet {
        &MESSAGE_REFS
    }

    fn from_instance(instance: Instance<Messenger>) -> Self {
        Self { instance }
    }
}

static FILE_MESSAGE_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::builder("FileMessage")
        .extend(Message::schema())
        .attr("fileName")
        .attr("fileSize")
        .build()
        .expect("FileMessage schema is valid")
});

/// A message carrying a file attachment.
///
/// Extends the base message schema with the file attributes and shares its
/// reference declaration.
#[derive(Debug, Clone)]
pub struct FileMessage {
    instance: Instance<Messenger>,
}

impl FileMessage {
    pub fn from_payload(session: Messenger, payload: Value) -> Result<Self, MessengerError> {
        from_object(session, payload)
    }

    pub fn file_name(&self) -> Option<&str> {
        self.instance.value_of("fileName").and_then(Value::as_str)
    }

    /// File size in bytes.
    pub fn file_size(&self) -> Option<u64> {
        self.instance.value_of("fileSize").and_then(Value::as_u64)
    }

    pub async fn sender(&self) -> Result<Contact, ModelError> {
        self.instance.resolve_user("user").await
    }

    pub fn instance(&self) -> &Instance<Messenger> {
        &self.instance
    }
}

impl EntityType for FileMessage {
    type Session = Messenger;

    fn schema() -> &'static Schema {
        &FILE_MESSAGE_SCHEMA
    }

    fn refs() -> &'static RefSet {
        Message::refs()
    }

    fn from_instance(instance: Instance<Messenger>) -> Self {
        Self { instance }
    }
}
