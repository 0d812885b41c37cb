//! # Chat Object Model
//!
//! This crate provides the object-model machinery underlying a
//! messaging-platform API client: the generic pieces that turn raw API
//! payloads into structured, navigable entities without hand-written
//! per-type boilerplate.
//!
//! ## The Problem
//!
//! A messaging API serves loose JSON: a message payload carries a `userId`
//! string, not a user; a member list is an array of identifier strings; a
//! listing endpoint hands back one page per request. Client code wants the
//! opposite shape: typed entities, navigable references, plain item streams,
//! and no repeated fetches for data it has already seen.
//!
//! ## The Mechanisms
//!
//! Each concern gets one generic mechanism, declared per entity type and
//! shared by every instance:
//!
//! 1. **Schemas** ([`schema`], [`entity`]) - an entity type declares its
//!    attributes once; the shared [`Init`] binder validates positional and
//!    named arguments against the declaration, fills defaults, and rejects
//!    anything unknown with the full sorted offender list.
//! 2. **References** ([`refs`]) - stored identifier fields are declared as
//!    user, user list, or chat references; resolution consults the session's
//!    directories on every access, and list references resolve to a lazy,
//!    sequential [`MemberWalk`].
//! 3. **Memoized lookups** ([`cache`]) - [`Memo`] remembers computed values
//!    under explicit typed keys, with an opt-out key for unkeyable calls.
//! 4. **Paged exhaustion** ([`page`]) - [`Exhaust`] drains a page-at-a-time
//!    source until its first empty page, fetching only on demand.
//! 5. **Identifier extraction** ([`ids`]) - regex helpers for pulling user
//!    and conversation identifiers out of API URLs.
//!
//! The host client appears only through the [`Session`] and [`Directory`]
//! traits; the toolkit performs no I/O of its own and spawns no tasks.
//! Directory lookups are awaited strictly one at a time.
//!
//! ## Example
//!
//! ```
//! use chat_model::{EntityType, Instance, MemoryDirectory, RefKind, RefSet, Schema, Session};
//! use once_cell::sync::Lazy;
//! use std::sync::Arc;
//!
//! #[derive(Debug, Clone)]
//! struct Contact {
//!     id: String,
//!     name: String,
//! }
//!
//! #[derive(Debug, Clone)]
//! struct Room;
//!
//! // The session: cheap to clone, hands out the two directories.
//! #[derive(Clone)]
//! struct Client {
//!     contacts: Arc<MemoryDirectory<Contact>>,
//!     chats: Arc<MemoryDirectory<Room>>,
//! }
//!
//! impl Session for Client {
//!     type Contacts = MemoryDirectory<Contact>;
//!     type Chats = MemoryDirectory<Room>;
//!
//!     fn contacts(&self) -> &Self::Contacts {
//!         &self.contacts
//!     }
//!
//!     fn chats(&self) -> &Self::Chats {
//!         &self.chats
//!     }
//! }
//!
//! // The per-type declaration: one schema, one ref set, one wrapper.
//! static MESSAGE_SCHEMA: Lazy<Schema> = Lazy::new(|| {
//!     Schema::builder("Message")
//!         .attr("id")
//!         .attr("userId")
//!         .attr("content")
//!         .build()
//!         .expect("Message schema is valid")
//! });
//!
//! static MESSAGE_REFS: Lazy<RefSet> = Lazy::new(|| {
//!     RefSet::builder()
//!         .shorthand(RefKind::User)
//!         .build()
//!         .expect("Message refs are valid")
//! });
//!
//! #[derive(Debug, Clone)]
//! struct Message(Instance<Client>);
//!
//! impl EntityType for Message {
//!     type Session = Client;
//!
//!     fn schema() -> &'static Schema {
//!         &MESSAGE_SCHEMA
//!     }
//!
//!     fn refs() -> &'static RefSet {
//!         &MESSAGE_REFS
//!     }
//!
//!     fn from_instance(instance: Instance<Client>) -> Self {
//!         Self(instance)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), chat_model::ModelError> {
//!     let contacts = Arc::new(MemoryDirectory::new("contacts"));
//!     contacts.insert(
//!         "8:alice",
//!         Contact {
//!             id: "8:alice".to_string(),
//!             name: "Alice".to_string(),
//!         },
//!     );
//!     let client = Client {
//!         contacts,
//!         chats: Arc::new(MemoryDirectory::new("chats")),
//!     };
//!
//!     let message = Message::init(client, None)
//!         .arg("m1")
//!         .named("userId", "8:alice")
//!         .named("content", "hi there")
//!         .build()?;
//!
//!     let sender = message.0.resolve_user("user").await?;
//!     assert_eq!(sender.id, "8:alice");
//!     assert_eq!(sender.name, "Alice");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every failure surfaces as a [`ModelError`] to the immediate caller, with
//! no retries and no side effects on unrelated state. A directory miss is an
//! error, not a `None`; malformed arguments are rejected before anything is
//! bound.
//!
//! ## Testing
//!
//! The [`mock`] module ships a scripted [`Directory`] with an
//! expectation-queue API and a fixed-page fetch script for paging tests. See
//! the module documentation for patterns.

pub mod cache;
pub mod entity;
pub mod error;
pub mod ids;
pub mod mock;
pub mod page;
pub mod refs;
pub mod schema;
pub mod session;
pub mod status;
pub mod tracing;

// Re-export core types for convenience
pub use cache::Memo;
pub use entity::{EntityType, Init, Instance, Record};
pub use error::ModelError;
pub use page::{Exhaust, Page};
pub use refs::{MemberWalk, RefBinding, RefKind, RefSet, RefSetBuilder, Resolved};
pub use schema::{Attr, Schema, SchemaBuilder};
pub use session::{ChatOf, ContactOf, Directory, MemoryDirectory, Session};
pub use status::Status;
