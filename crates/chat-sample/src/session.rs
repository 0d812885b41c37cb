//! # Messenger Session
//!
//! [`Messenger`] is the sample client's session: a cheaply clonable handle
//! over a contacts directory and a chats directory, both held behind one
//! `Arc`. Every entity instance carries a clone and resolves its references
//! through it.
//!
//! The contacts side is wrapped in [`CachedContacts`], which memoizes
//! successful lookups, so resolving the same sender across a hundred messages
//! costs one backing fetch.

use async_trait::async_trait;
use chat_model::{Directory, Memo, MemoryDirectory, ModelError, Session};
use std::sync::Arc;
use tracing::instrument;

use crate::model::{Chat, Contact};

/// A contacts directory that memoizes successful lookups over a backing
/// store.
///
/// Misses are not stored, so an id that later appears is found on the next
/// lookup. Entries already served stay pinned until [`CachedContacts::invalidate`].
pub struct CachedContacts {
    backing: MemoryDirectory<Contact>,
    memo: Memo<String, Contact>,
}

impl CachedContacts {
    fn new() -> Self {
        Self {
            backing: MemoryDirectory::new("contacts"),
            memo: Memo::new(),
        }
    }

    fn insert(&self, contact: Contact) {
        self.backing.insert(contact.id.clone(), contact);
    }

    /// Entries pinned in the memo so far.
    pub fn cached(&self) -> usize {
        self.memo.len()
    }

    /// Drops the memoized entries; the next lookups hit the backing store.
    pub fn invalidate(&self) {
        self.memo.clear();
    }
}

#[async_trait]
impl Directory for CachedContacts {
    type Entry = Contact;

    fn name(&self) -> &str {
        self.backing.name()
    }

    async fn lookup(&self, id: &str) -> Result<Contact, ModelError> {
        self.memo
            .try_get_or_compute(Some(id.to_string()), || self.backing.lookup(id))
            .await
    }
}

struct Inner {
    contacts: CachedContacts,
    chats: MemoryDirectory<Chat>,
}

/// The sample client session.
#[derive(Clone)]
pub struct Messenger {
    inner: Arc<Inner>,
}

impl Messenger {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                contacts: CachedContacts::new(),
                chats: MemoryDirectory::new("chats"),
            }),
        }
    }

    /// Registers a contact under its identifier, replacing any previous
    /// entry in the backing store.
    pub fn add_contact(&self, contact: Contact) {
        self.inner.contacts.insert(contact);
    }

    /// Registers a conversation under its identifier.
    pub fn add_chat(&self, chat: Chat) {
        self.inner.chats.insert(chat.id.clone(), chat);
    }

    /// Fetches a profile; repeat fetches of the same id are served from the
    /// contact memo.
    #[instrument(skip(self))]
    pub async fn profile(&self, id: &str) -> Result<Contact, ModelError> {
        self.inner.contacts.lookup(id).await
    }
}

impl Default for Messenger {
    fn default() -> Self {
        Self::new()
    }
}

impl Session for Messenger {
    type Contacts = CachedContacts;
    type Chats = MemoryDirectory<Chat>;

    fn contacts(&self) -> &CachedContacts {
        &self.inner.contacts
    }

    fn chats(&self) -> &MemoryDirectory<Chat> {
        &self.inner.chats
    }
}
