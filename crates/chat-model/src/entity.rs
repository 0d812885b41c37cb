//! # Entity Construction
//!
//! The contract that every schema-backed entity type implements, and the
//! machinery that turns raw payload values into structured instances.
//!
//! # Architecture Note
//! Why a trait with a schema behind it?
//! Wire payloads arrive as loose JSON. By declaring each type's attributes
//! once in a [`Schema`] and its references once in a [`RefSet`], the generic
//! [`Init`] binder can validate and construct *any* entity type with the same
//! code path. Adding an entity type means writing two statics and a
//! `from_instance` wrapper, not another hand-rolled constructor.
//!
//! Binding is all or nothing: every argument is checked against the schema
//! before any attribute is bound, so a failed construction has no partial
//! effects. Unknown names are collected in full and reported sorted, which
//! keeps the error stable regardless of argument order.

use crate::error::ModelError;
use crate::refs::{MemberWalk, RefSet, Resolved};
use crate::schema::Schema;
use crate::session::{ChatOf, ContactOf, Session};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Fixed-shape attribute storage, one value per schema attribute in binding
/// order.
///
/// The shape never changes after construction; values may be reassigned
/// through [`Record::set`]. Reference accessors are not attributes, so writing
/// through an accessor name fails as unknown.
#[derive(Debug, Clone)]
pub struct Record {
    schema: &'static Schema,
    values: Vec<Value>,
}

impl Record {
    fn new(schema: &'static Schema, values: Vec<Value>) -> Self {
        Self { schema, values }
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// The value of a declared attribute; unknown names are an error.
    pub fn get(&self, name: &str) -> Result<&Value, ModelError> {
        match self.schema.position(name) {
            Some(index) => Ok(&self.values[index]),
            None => Err(ModelError::UnknownAttribute {
                entity: self.schema.entity(),
                name: name.to_string(),
            }),
        }
    }

    /// The value of a declared attribute, or `None` for unknown names.
    pub fn value_of(&self, name: &str) -> Option<&Value> {
        self.schema.position(name).map(|index| &self.values[index])
    }

    /// Reassigns a declared attribute; unknown names are an error.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ModelError> {
        match self.schema.position(name) {
            Some(index) => {
                self.values[index] = value.into();
                Ok(())
            }
            None => Err(ModelError::UnknownAttribute {
                entity: self.schema.entity(),
                name: name.to_string(),
            }),
        }
    }

    /// Attribute names and values in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        self.schema.names().zip(self.values.iter())
    }

    /// The record as a JSON object, for logging and serialization.
    pub fn to_value(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (name, value) in self.iter() {
            map.insert(name.to_string(), value.clone());
        }
        Value::Object(map)
    }
}

/// A constructed entity instance: the base context pair (session handle and
/// raw payload) plus the bound attribute record and the type's reference
/// declaration.
#[derive(Clone)]
pub struct Instance<S: Session> {
    session: S,
    raw: Option<Value>,
    record: Record,
    refs: &'static RefSet,
}

impl<S: Session> Instance<S> {
    pub fn session(&self) -> &S {
        &self.session
    }

    /// The raw payload this instance was built from, when one was kept.
    pub fn raw(&self) -> Option<&Value> {
        self.raw.as_ref()
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    /// The entity type name.
    pub fn entity(&self) -> &'static str {
        self.record.schema().entity()
    }

    /// Shortcut for [`Record::get`].
    pub fn get(&self, name: &str) -> Result<&Value, ModelError> {
        self.record.get(name)
    }

    /// Shortcut for [`Record::value_of`].
    pub fn value_of(&self, name: &str) -> Option<&Value> {
        self.record.value_of(name)
    }

    /// Resolves a reference accessor of any declared kind.
    pub async fn resolve(&self, accessor: &str) -> Result<Resolved<S>, ModelError> {
        self.refs.resolve(accessor, &self.record, &self.session).await
    }

    /// Resolves a single user reference through the contacts directory.
    pub async fn resolve_user(&self, accessor: &str) -> Result<ContactOf<S>, ModelError> {
        self.refs
            .resolve_user(accessor, &self.record, &self.session)
            .await
    }

    /// Starts a lazy walk over a user list reference.
    pub fn resolve_users(&self, accessor: &str) -> Result<MemberWalk<S>, ModelError> {
        self.refs
            .resolve_users(accessor, &self.record, &self.session)
    }

    /// Resolves a single chat reference through the chats directory.
    pub async fn resolve_chat(&self, accessor: &str) -> Result<ChatOf<S>, ModelError> {
        self.refs
            .resolve_chat(accessor, &self.record, &self.session)
            .await
    }
}

impl<S: Session> fmt::Debug for Instance<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("entity", &self.entity())
            .field("record", &self.record)
            .field("raw", &self.raw.is_some())
            .finish_non_exhaustive()
    }
}

/// Contract implemented by every schema-backed entity type.
///
/// The two statics, [`EntityType::schema`] and [`EntityType::refs`], are the
/// whole per-type declaration; [`EntityType::init`] hands back the shared
/// argument binder. Types without references skip `refs`, the default is the
/// empty set.
pub trait EntityType: Sized {
    /// The session type instances of this entity carry.
    type Session: Session;

    /// The type's attribute declaration.
    fn schema() -> &'static Schema;

    /// The type's reference declaration.
    fn refs() -> &'static RefSet {
        RefSet::none()
    }

    /// Wraps a validated instance in the concrete type.
    fn from_instance(instance: Instance<Self::Session>) -> Self;

    /// Starts binding arguments for a new instance.
    ///
    /// `raw` is the original payload, kept on the instance for debugging and
    /// re-parsing; pass `None` when constructing locally.
    fn init(session: Self::Session, raw: Option<Value>) -> Init<Self> {
        Init::new(session, raw)
    }
}

/// Argument binder for one construction.
///
/// Positional arguments match schema attributes left to right; named
/// arguments match by attribute name. [`Init::build`] validates everything
/// before binding:
///
/// 1. at most as many positional arguments as attributes,
/// 2. no named argument outside the schema (all offenders reported, sorted),
/// 3. no attribute bound twice, positionally or by name,
/// 4. unbound attributes take their declared default, else null.
pub struct Init<K: EntityType> {
    session: K::Session,
    raw: Option<Value>,
    positional: Vec<Value>,
    named: Vec<(String, Value)>,
}

impl<K: EntityType> Init<K> {
    fn new(session: K::Session, raw: Option<Value>) -> Self {
        Self {
            session,
            raw,
            positional: Vec::new(),
            named: Vec::new(),
        }
    }

    /// Appends a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Adds a named argument.
    pub fn named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.push((name.into(), value.into()));
        self
    }

    /// Adds a named argument for every payload field the schema declares,
    /// ignoring fields it does not. Non-object payloads bind nothing.
    pub fn fields_from(mut self, payload: &Value) -> Self {
        if let Value::Object(fields) = payload {
            for (name, value) in fields {
                if K::schema().contains(name) {
                    self = self.named(name.clone(), value.clone());
                }
            }
        }
        self
    }

    /// Validates the collected arguments and constructs the entity.
    pub fn build(self) -> Result<K, ModelError> {
        let schema = K::schema();

        if self.positional.len() > schema.len() {
            return Err(ModelError::TooManyPositional {
                entity: schema.entity(),
                max: schema.len(),
                given: self.positional.len(),
            });
        }

        let mut unknown = Vec::new();
        let mut by_position = Vec::with_capacity(self.named.len());
        for (name, value) in self.named {
            match schema.position(&name) {
                Some(index) => by_position.push((index, name, value)),
                None => unknown.push(name),
            }
        }
        if !unknown.is_empty() {
            unknown.sort();
            unknown.dedup();
            return Err(ModelError::UnexpectedArguments {
                entity: schema.entity(),
                names: unknown,
            });
        }

        let mut bound: Vec<Option<Value>> = vec![None; schema.len()];
        for (index, value) in self.positional.into_iter().enumerate() {
            bound[index] = Some(value);
        }
        for (index, name, value) in by_position {
            if bound[index].is_some() {
                return Err(ModelError::DuplicateArgument {
                    entity: schema.entity(),
                    name,
                });
            }
            bound[index] = Some(value);
        }

        let values = bound
            .into_iter()
            .zip(schema.attrs())
            .map(|(value, attr)| {
                value.unwrap_or_else(|| attr.default().cloned().unwrap_or(Value::Null))
            })
            .collect();

        debug!(entity = schema.entity(), attrs = schema.len(), "Constructed");
        let instance = Instance {
            session: self.session,
            raw: self.raw,
            record: Record::new(schema, values),
            refs: K::refs(),
        };
        Ok(K::from_instance(instance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refs::RefKind;
    use crate::session::MemoryDirectory;
    use once_cell::sync::Lazy;
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    struct Profile {
        id: String,
        name: String,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Room {
        id: String,
        topic: String,
    }

    #[derive(Clone)]
    struct TestSession {
        contacts: Arc<MemoryDirectory<Profile>>,
        chats: Arc<MemoryDirectory<Room>>,
    }

    impl TestSession {
        fn new() -> Self {
            Self {
                contacts: Arc::new(MemoryDirectory::new("contacts")),
                chats: Arc::new(MemoryDirectory::new("chats")),
            }
        }
    }

    impl Session for TestSession {
        type Contacts = MemoryDirectory<Profile>;
        type Chats = MemoryDirectory<Room>;

        fn contacts(&self) -> &Self::Contacts {
            &self.contacts
        }

        fn chats(&self) -> &Self::Chats {
            &self.chats
        }
    }

    static MESSAGE_SCHEMA: Lazy<Schema> = Lazy::new(|| {
        Schema::builder("Message")
            .attr("id")
            .attr("time")
            .attr("userId")
            .attr("chatId")
            .attr_with("content", json!(""))
            .build()
            .expect("Failed to build schema")
    });

    static MESSAGE_REFS: Lazy<RefSet> = Lazy::new(|| {
        RefSet::builder()
            .shorthand(RefKind::User)
            .shorthand(RefKind::Chat)
            .build()
            .expect("Failed to build refs")
    });

    #[derive(Debug, Clone)]
    struct Message(Instance<TestSession>);

    impl EntityType for Message {
        type Session = TestSession;

        fn schema() -> &'static Schema {
            &MESSAGE_SCHEMA
        }

        fn refs() -> &'static RefSet {
            &MESSAGE_REFS
        }

        fn from_instance(instance: Instance<TestSession>) -> Self {
            Self(instance)
        }
    }

    #[test]
    fn binds_positional_then_named_with_defaults() {
        let message = Message::init(TestSession::new(), None)
            .arg("m1")
            .arg(1_724_580_000_000_i64)
            .named("chatId", "19:round@thread.skype")
            .build()
            .expect("Failed to build message");

        assert_eq!(message.0.get("id").expect("id is declared"), &json!("m1"));
        assert_eq!(
            message.0.get("time").expect("time is declared"),
            &json!(1_724_580_000_000_i64)
        );
        assert_eq!(
            message.0.get("chatId").expect("chatId is declared"),
            &json!("19:round@thread.skype")
        );
        // Unbound without a default: null
        assert_eq!(message.0.get("userId").expect("userId is declared"), &Value::Null);
        // Unbound with a default: the default
        assert_eq!(message.0.get("content").expect("content is declared"), &json!(""));
    }

    #[test]
    fn unexpected_arguments_are_collected_and_sorted() {
        let result = Message::init(TestSession::new(), None)
            .named("zebra", 1)
            .named("alpha", 2)
            .build();

        match result {
            Err(ModelError::UnexpectedArguments { names, .. }) => {
                assert_eq!(names, ["alpha", "zebra"]);
            }
            other => panic!("Expected UnexpectedArguments, got {other:?}"),
        }
    }

    #[test]
    fn unexpected_argument_message_quotes_names() {
        let err = Message::init(TestSession::new(), None)
            .named("alpha", 1)
            .named("zebra", 2)
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "Message: unexpected arguments 'alpha', 'zebra'");
    }

    #[test]
    fn double_binding_is_rejected() {
        let result = Message::init(TestSession::new(), None)
            .arg("m1")
            .named("id", "m2")
            .build();
        assert!(matches!(
            result,
            Err(ModelError::DuplicateArgument { name, .. }) if name == "id"
        ));
    }

    #[test]
    fn excess_positional_arguments_are_rejected() {
        let result = Message::init(TestSession::new(), None)
            .arg(1)
            .arg(2)
            .arg(3)
            .arg(4)
            .arg(5)
            .arg(6)
            .build();
        assert!(matches!(
            result,
            Err(ModelError::TooManyPositional { max: 5, given: 6, .. })
        ));
    }

    #[test]
    fn fields_from_binds_known_payload_fields_only() {
        let payload = json!({
            "id": "m1",
            "content": "hello",
            "serverInternal": true,
        });
        let message = Message::init(TestSession::new(), Some(payload.clone()))
            .fields_from(&payload)
            .build()
            .expect("Failed to build message");

        assert_eq!(message.0.get("id").expect("id is declared"), &json!("m1"));
        assert_eq!(message.0.get("content").expect("content is declared"), &json!("hello"));
        assert_eq!(message.0.raw(), Some(&payload));
    }

    #[test]
    fn record_set_reassigns_declared_attributes_only() {
        let mut message = Message::init(TestSession::new(), None)
            .arg("m1")
            .build()
            .expect("Failed to build message");

        message
            .0
            .record_mut()
            .set("content", "edited")
            .expect("Failed to set content");
        assert_eq!(message.0.get("content").expect("content is declared"), &json!("edited"));

        let err = message.0.record_mut().set("sender", "x").unwrap_err();
        assert!(matches!(err, ModelError::UnknownAttribute { .. }));
    }

    #[tokio::test]
    async fn resolves_user_reference_through_contacts() {
        let session = TestSession::new();
        session.contacts.insert(
            "8:alice",
            Profile {
                id: "8:alice".to_string(),
                name: "Alice".to_string(),
            },
        );

        let message = Message::init(session, None)
            .arg("m1")
            .named("userId", "8:alice")
            .build()
            .expect("Failed to build message");

        let sender = message
            .0
            .resolve_user("user")
            .await
            .expect("Failed to resolve sender");
        assert_eq!(sender.name, "Alice");
    }

    #[tokio::test]
    async fn missing_directory_entry_surfaces_as_error() {
        let message = Message::init(TestSession::new(), None)
            .arg("m1")
            .named("userId", "8:ghost")
            .build()
            .expect("Failed to build message");

        let result = message.0.resolve_user("user").await;
        assert!(matches!(result, Err(ModelError::LookupMiss { .. })));
    }

    #[tokio::test]
    async fn typed_accessor_rejects_other_kinds() {
        let message = Message::init(TestSession::new(), None)
            .arg("m1")
            .named("userId", "8:alice")
            .build()
            .expect("Failed to build message");

        let err = message.0.resolve_chat("user").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Accessor 'user' is a user reference, not a chat reference"
        );
    }

    #[tokio::test]
    async fn generic_resolve_dispatches_on_declared_kind() {
        let session = TestSession::new();
        session.chats.insert(
            "19:team@thread.skype",
            Room {
                id: "19:team@thread.skype".to_string(),
                topic: "standup".to_string(),
            },
        );

        let message = Message::init(session, None)
            .arg("m1")
            .named("chatId", "19:team@thread.skype")
            .build()
            .expect("Failed to build message");

        match message.0.resolve("chat").await.expect("Failed to resolve chat") {
            Resolved::Chat(room) => assert_eq!(room.topic, "standup"),
            other => panic!("Expected a chat, got {:?} kind", other.kind()),
        }
    }

    #[tokio::test]
    async fn non_string_identifier_field_is_rejected() {
        let message = Message::init(TestSession::new(), None)
            .arg("m1")
            .named("userId", 42)
            .build()
            .expect("Failed to build message");

        let err = message.0.resolve_user("user").await.unwrap_err();
        assert_eq!(err.to_string(), "Field 'userId' does not hold a string identifier");
    }

    #[tokio::test]
    async fn unknown_accessor_is_an_error() {
        let message = Message::init(TestSession::new(), None)
            .arg("m1")
            .build()
            .expect("Failed to build message");

        let result = message.0.resolve("owner").await;
        assert!(matches!(result, Err(ModelError::UnknownAccessor(name)) if name == "owner"));
    }
}
