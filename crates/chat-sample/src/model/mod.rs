//! # Entity Types
//!
//! The sample client's data model. [`Contact`] and [`Chat`] are the plain
//! directory entries; [`Message`], [`FileMessage`], and [`GroupChat`] are
//! schema-backed entities built from API payloads.

use chat_model::EntityType;
use serde_json::Value;

use crate::error::MessengerError;
use crate::session::Messenger;

pub mod chat;
pub mod contact;
pub mod group;
pub mod message;

pub use chat::Chat;
pub use contact::Contact;
pub use group::GroupChat;
pub use message::{FileMessage, Message};

/// Builds any session-backed entity from a payload object, binding the fields
/// its schema declares and keeping the raw payload on the instance.
pub(crate) fn from_object<K>(session: Messenger, payload: Value) -> Result<K, MessengerError>
where
    K: EntityType<Session = Messenger>,
{
    if !payload.is_object() {
        return Err(MessengerError::MalformedPayload(payload.to_string()));
    }
    let entity = K::init(session, Some(payload.clone()))
        .fields_from(&payload)
        .build()?;
    Ok(entity)
}
