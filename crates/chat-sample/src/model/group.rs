//! # Group Chats
//!
//! A multi-user conversation with a creator, a member list, and an admin
//! list, demonstrating named reference bindings next to the shorthand one.

use chat_model::{EntityType, Instance, MemberWalk, ModelError, RefKind, RefSet, Schema};
use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::error::MessengerError;
use crate::model::{from_object, Contact};
use crate::session::Messenger;

static GROUP_CHAT_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::builder("GroupChat")
        .attr("id")
        .attr("topic")
        .attr("creatorId")
        .attr("userIds")
        .attr("adminIds")
        .attr_with("open", json!(false))
        .build()
        .expect("GroupChat schema is valid")
});

static GROUP_CHAT_REFS: Lazy<RefSet> = Lazy::new(|| {
    RefSet::builder()
        .named(RefKind::User, "creator")
        .shorthand(RefKind::Users)
        .named(RefKind::Users, "admin")
        .build()
        .expect("GroupChat refs are valid")
});

/// A group conversation.
///
/// Members and admins are stored as identifier lists; the walks returned by
/// [`GroupChat::members`] and [`GroupChat::admins`] look each one up lazily,
/// in stored order.
#[derive(Debug, Clone)]
pub struct GroupChat {
    instance: Instance<Messenger>,
}

impl GroupChat {
    /// Builds a group chat from an API payload object.
    pub fn from_payload(session: Messenger, payload: Value) -> Result<Self, MessengerError> {
        from_object(session, payload)
    }

    pub fn group_id(&self) -> Option<&str> {
        self.instance.value_of("id").and_then(Value::as_str)
    }

    pub fn topic(&self) -> Option<&str> {
        self.instance.value_of("topic").and_then(Value::as_str)
    }

    /// Whether the chat can be joined by link. Defaults to closed.
    pub fn is_open(&self) -> bool {
        self.instance
            .value_of("open")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub async fn creator(&self) -> Result<Contact, ModelError> {
        self.instance.resolve_user("creator").await
    }

    /// Starts a fresh walk over the member list.
    pub fn members(&self) -> Result<MemberWalk<Messenger>, ModelError> {
        self.instance.resolve_users("users")
    }

    /// Starts a fresh walk over the admin list.
    pub fn admins(&self) -> Result<MemberWalk<Messenger>, ModelError> {
        self.instance.resolve_users("admins")
    }

    pub fn instance(&self) -> &Instance<Messenger> {
        &self.instance
    }
}

impl EntityType for GroupChat {
    type Session = Messenger;

    fn schema() -> &'static Schema {
        &GROUP_CHAT_SCHEMA
    }

    fn refs() -> &'static RefSet {
        &GROUP_CHAT_REFS
    }

    fn from_instance(instance: Instance<Messenger>) -> Self {
        Self { instance }
    }
}
