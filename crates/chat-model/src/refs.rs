//! # Identifier References
//!
//! Entities store other entities by identifier, the way wire payloads do: a
//! message carries a `userId` field, not a user object. A [`RefSet`] declares,
//! once per entity type, which stored fields are references and what kind of
//! entry they point at. Resolution reads the stored identifier and consults
//! the matching session directory on every access, so the caller always sees
//! the directory's current entry. Nothing is cached here; combine with
//! [`crate::cache::Memo`] where repeated lookups matter.
//!
//! ## Naming rules
//!
//! A binding derives its stored field and accessor names from its kind:
//!
//! * shorthand user: stored `userId`, accessor `user`
//! * shorthand user list: stored `userIds`, accessor `users`
//! * shorthand chat: stored `chatId`, accessor `chat`
//! * named user or chat with base `creator`: stored `creatorId`, accessor `creator`
//! * named user list with base `admin`: stored `adminIds`, accessor `admins`
//!
//! List references resolve to a [`MemberWalk`], which looks members up one at
//! a time as it is advanced. A fresh walk is produced on every access.

use crate::entity::Record;
use crate::error::ModelError;
use crate::session::{ChatOf, ContactOf, Directory, Session};
use serde_json::Value;
use std::collections::VecDeque;
use tracing::debug;

/// What a reference points at, and through which session directory it
/// resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    /// A single user, resolved through the contacts directory.
    User,
    /// An ordered list of users, resolved lazily through the contacts
    /// directory.
    Users,
    /// A single conversation, resolved through the chats directory.
    Chat,
}

impl RefKind {
    /// Human name used in mismatch errors.
    pub fn describe(self) -> &'static str {
        match self {
            RefKind::User => "a user reference",
            RefKind::Users => "a user list reference",
            RefKind::Chat => "a chat reference",
        }
    }
}

/// One declared reference: the stored identifier field and the accessor it is
/// reachable under.
#[derive(Debug, Clone)]
pub struct RefBinding {
    kind: RefKind,
    stored: String,
    accessor: String,
}

impl RefBinding {
    /// The conventional binding for a kind: `user`/`userId`, `users`/`userIds`
    /// or `chat`/`chatId`.
    pub fn shorthand(kind: RefKind) -> Self {
        let (stored, accessor) = match kind {
            RefKind::User => ("userId", "user"),
            RefKind::Users => ("userIds", "users"),
            RefKind::Chat => ("chatId", "chat"),
        };
        Self {
            kind,
            stored: stored.to_string(),
            accessor: accessor.to_string(),
        }
    }

    /// A binding derived from a base name. Single kinds append `Id` to the
    /// stored field; list kinds append `Ids` and pluralize the accessor.
    pub fn named(kind: RefKind, base: &str) -> Self {
        let (stored, accessor) = match kind {
            RefKind::User | RefKind::Chat => (format!("{base}Id"), base.to_string()),
            RefKind::Users => (format!("{base}Ids"), format!("{base}s")),
        };
        Self {
            kind,
            stored,
            accessor,
        }
    }

    pub fn kind(&self) -> RefKind {
        self.kind
    }

    /// The record field holding the raw identifier(s).
    pub fn stored(&self) -> &str {
        &self.stored
    }

    /// The name the reference is resolved under.
    pub fn accessor(&self) -> &str {
        &self.accessor
    }
}

/// The immutable reference declaration of an entity type, registered once and
/// shared by every instance.
#[derive(Debug)]
pub struct RefSet {
    bindings: Vec<RefBinding>,
}

static EMPTY: RefSet = RefSet::empty();

impl RefSet {
    /// A set with no bindings.
    pub const fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// The shared empty set, for entity types that declare no references.
    pub fn none() -> &'static RefSet {
        &EMPTY
    }

    pub fn builder() -> RefSetBuilder {
        RefSetBuilder {
            bindings: Vec::new(),
        }
    }

    pub fn bindings(&self) -> &[RefBinding] {
        &self.bindings
    }

    pub fn get(&self, accessor: &str) -> Option<&RefBinding> {
        self.bindings.iter().find(|b| b.accessor == accessor)
    }

    fn require(&self, accessor: &str) -> Result<&RefBinding, ModelError> {
        self.get(accessor)
            .ok_or_else(|| ModelError::UnknownAccessor(accessor.to_string()))
    }

    /// Resolves an accessor of any kind against the record and session.
    pub async fn resolve<S: Session>(
        &self,
        accessor: &str,
        record: &Record,
        session: &S,
    ) -> Result<Resolved<S>, ModelError> {
        let binding = self.require(accessor)?;
        debug!(accessor, field = %binding.stored, kind = binding.kind.describe(), "Resolve");
        match binding.kind {
            RefKind::User => Ok(Resolved::User(
                lookup_single(binding, record, session.contacts()).await?,
            )),
            RefKind::Chat => Ok(Resolved::Chat(
                lookup_single(binding, record, session.chats()).await?,
            )),
            RefKind::Users => Ok(Resolved::Users(member_walk(binding, record, session)?)),
        }
    }

    /// Resolves an accessor declared as a single user reference.
    pub async fn resolve_user<S: Session>(
        &self,
        accessor: &str,
        record: &Record,
        session: &S,
    ) -> Result<ContactOf<S>, ModelError> {
        let binding = self.require(accessor)?;
        match binding.kind {
            RefKind::User => lookup_single(binding, record, session.contacts()).await,
            other => Err(kind_mismatch(accessor, RefKind::User, other)),
        }
    }

    /// Starts a walk over an accessor declared as a user list reference.
    ///
    /// Reading the stored identifiers happens here; the directory lookups
    /// happen as the walk is advanced.
    pub fn resolve_users<S: Session>(
        &self,
        accessor: &str,
        record: &Record,
        session: &S,
    ) -> Result<MemberWalk<S>, ModelError> {
        let binding = self.require(accessor)?;
        match binding.kind {
            RefKind::Users => member_walk(binding, record, session),
            other => Err(kind_mismatch(accessor, RefKind::Users, other)),
        }
    }

    /// Resolves an accessor declared as a single chat reference.
    pub async fn resolve_chat<S: Session>(
        &self,
        accessor: &str,
        record: &Record,
        session: &S,
    ) -> Result<ChatOf<S>, ModelError> {
        let binding = self.require(accessor)?;
        match binding.kind {
            RefKind::Chat => lookup_single(binding, record, session.chats()).await,
            other => Err(kind_mismatch(accessor, RefKind::Chat, other)),
        }
    }
}

/// Builder for [`RefSet`]. Accessor names must be unique across the set.
pub struct RefSetBuilder {
    bindings: Vec<RefBinding>,
}

impl RefSetBuilder {
    /// Adds the conventional binding for a kind.
    pub fn shorthand(mut self, kind: RefKind) -> Self {
        self.bindings.push(RefBinding::shorthand(kind));
        self
    }

    /// Adds a binding derived from a base name.
    pub fn named(mut self, kind: RefKind, base: &str) -> Self {
        self.bindings.push(RefBinding::named(kind, base));
        self
    }

    /// Validates accessor uniqueness and freezes the set.
    pub fn build(self) -> Result<RefSet, ModelError> {
        let mut seen = std::collections::HashSet::new();
        for binding in &self.bindings {
            if !seen.insert(binding.accessor.as_str()) {
                return Err(ModelError::DuplicateAccessor(binding.accessor.clone()));
            }
        }
        Ok(RefSet {
            bindings: self.bindings,
        })
    }
}

/// The outcome of a kind-agnostic [`RefSet::resolve`] call.
pub enum Resolved<S: Session> {
    User(ContactOf<S>),
    Users(MemberWalk<S>),
    Chat(ChatOf<S>),
}

impl<S: Session> Resolved<S> {
    pub fn kind(&self) -> RefKind {
        match self {
            Resolved::User(_) => RefKind::User,
            Resolved::Users(_) => RefKind::Users,
            Resolved::Chat(_) => RefKind::Chat,
        }
    }
}

/// A lazy, single-pass walk over a user list reference.
///
/// Each [`MemberWalk::next`] call performs exactly one directory lookup, in
/// stored order. A failed lookup ends the walk and surfaces the error; ids
/// after the failure are not fetched. The walk cannot be restarted, resolve
/// the accessor again for a fresh one.
pub struct MemberWalk<S: Session> {
    ids: VecDeque<String>,
    session: S,
}

impl<S: Session> MemberWalk<S> {
    pub(crate) fn new(ids: Vec<String>, session: S) -> Self {
        Self {
            ids: VecDeque::from(ids),
            session,
        }
    }

    /// Identifiers not yet fetched.
    pub fn remaining(&self) -> usize {
        self.ids.len()
    }

    /// Fetches the next member, or `None` once the list is exhausted.
    pub async fn next(&mut self) -> Result<Option<ContactOf<S>>, ModelError> {
        let Some(id) = self.ids.pop_front() else {
            return Ok(None);
        };
        match self.session.contacts().lookup(&id).await {
            Ok(entry) => Ok(Some(entry)),
            Err(err) => {
                self.ids.clear();
                Err(err)
            }
        }
    }

    /// Drains the rest of the walk into a vector.
    pub async fn collect(mut self) -> Result<Vec<ContactOf<S>>, ModelError> {
        let mut members = Vec::with_capacity(self.remaining());
        while let Some(member) = self.next().await? {
            members.push(member);
        }
        Ok(members)
    }
}

fn kind_mismatch(accessor: &str, requested: RefKind, actual: RefKind) -> ModelError {
    ModelError::KindMismatch {
        accessor: accessor.to_string(),
        requested: requested.describe(),
        actual: actual.describe(),
    }
}

async fn lookup_single<D: Directory>(
    binding: &RefBinding,
    record: &Record,
    directory: &D,
) -> Result<D::Entry, ModelError> {
    let id = string_field(record, &binding.stored)?;
    directory.lookup(&id).await
}

fn member_walk<S: Session>(
    binding: &RefBinding,
    record: &Record,
    session: &S,
) -> Result<MemberWalk<S>, ModelError> {
    let ids = string_list_field(record, &binding.stored)?;
    Ok(MemberWalk::new(ids, session.clone()))
}

fn string_field(record: &Record, field: &str) -> Result<String, ModelError> {
    match record.get(field)? {
        Value::String(id) => Ok(id.clone()),
        _ => Err(ModelError::FieldShape {
            field: field.to_string(),
            expected: "a string identifier",
        }),
    }
}

fn string_list_field(record: &Record, field: &str) -> Result<Vec<String>, ModelError> {
    let Value::Array(items) = record.get(field)? else {
        return Err(ModelError::FieldShape {
            field: field.to_string(),
            expected: "a list of string identifiers",
        });
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(id) => Ok(id.clone()),
            _ => Err(ModelError::FieldShape {
                field: field.to_string(),
                expected: "a list of string identifiers",
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthand_bindings_follow_convention() {
        let user = RefBinding::shorthand(RefKind::User);
        assert_eq!((user.stored(), user.accessor()), ("userId", "user"));

        let users = RefBinding::shorthand(RefKind::Users);
        assert_eq!((users.stored(), users.accessor()), ("userIds", "users"));

        let chat = RefBinding::shorthand(RefKind::Chat);
        assert_eq!((chat.stored(), chat.accessor()), ("chatId", "chat"));
    }

    #[test]
    fn named_bindings_derive_field_and_accessor() {
        let creator = RefBinding::named(RefKind::User, "creator");
        assert_eq!((creator.stored(), creator.accessor()), ("creatorId", "creator"));

        let admins = RefBinding::named(RefKind::Users, "admin");
        assert_eq!((admins.stored(), admins.accessor()), ("adminIds", "admins"));

        let parent = RefBinding::named(RefKind::Chat, "parent");
        assert_eq!((parent.stored(), parent.accessor()), ("parentId", "parent"));
    }

    #[test]
    fn duplicate_accessor_is_rejected() {
        let result = RefSet::builder()
            .shorthand(RefKind::User)
            .named(RefKind::User, "user")
            .build();
        assert!(matches!(result, Err(ModelError::DuplicateAccessor(name)) if name == "user"));
    }

    #[test]
    fn empty_set_knows_no_accessor() {
        assert!(RefSet::none().get("user").is_none());
        assert!(RefSet::none().bindings().is_empty());
    }
}
