//! # Session and Directory Seam
//!
//! The toolkit never performs network I/O. Everything it needs from the host
//! client is expressed by two traits: [`Directory`], an async identifier
//! lookup, and [`Session`], the pair of directories (contacts and chats) an
//! entity carries for reference resolution.
//!
//! # Architecture Note
//! Directory lookups are the toolkit's only suspension points. They are
//! awaited one at a time, in order, and never issued concurrently, so a
//! directory implementation backed by a rate-limited API stays well behaved
//! without extra coordination.
//!
//! [`MemoryDirectory`] is the bundled implementation for tests, demos, and
//! locally populated caches of remote data.

use crate::error::ModelError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, warn};

/// An identifier-keyed lookup for one class of entries.
///
/// A miss is an error ([`ModelError::LookupMiss`]), never a silent `None`.
/// Implementations translate their own failures into
/// [`ModelError::Upstream`].
#[async_trait]
pub trait Directory: Send + Sync {
    /// The entry type served by this directory.
    type Entry: Clone + Send + Sync + 'static;

    /// Directory name, used in error messages and logs.
    fn name(&self) -> &str;

    async fn lookup(&self, id: &str) -> Result<Self::Entry, ModelError>;
}

/// The base context every entity instance carries.
///
/// Cloning must be cheap (share state behind an `Arc`); every instance holds
/// its own handle.
pub trait Session: Clone + Send + Sync + 'static {
    type Contacts: Directory;
    type Chats: Directory;

    /// The user directory, consulted by user references.
    fn contacts(&self) -> &Self::Contacts;

    /// The conversation directory, consulted by chat references.
    fn chats(&self) -> &Self::Chats;
}

/// The contact entry type of a session.
pub type ContactOf<S> = <<S as Session>::Contacts as Directory>::Entry;

/// The chat entry type of a session.
pub type ChatOf<S> = <<S as Session>::Chats as Directory>::Entry;

/// An in-memory [`Directory`] over an identifier-keyed map.
///
/// Reads are concurrent; writes go through the host populating the map.
pub struct MemoryDirectory<T> {
    name: String,
    entries: RwLock<HashMap<String, T>>,
}

impl<T: Clone + Send + Sync + 'static> MemoryDirectory<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts or replaces an entry.
    pub fn insert(&self, id: impl Into<String>, entry: T) {
        let id = id.into();
        debug!(directory = %self.name, %id, "Inserted");
        self.entries.write().unwrap().insert(id, entry);
    }

    pub fn remove(&self, id: &str) -> Option<T> {
        self.entries.write().unwrap().remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().unwrap().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> Directory for MemoryDirectory<T> {
    type Entry = T;

    fn name(&self) -> &str {
        &self.name
    }

    async fn lookup(&self, id: &str) -> Result<T, ModelError> {
        let entries = self.entries.read().unwrap();
        match entries.get(id) {
            Some(entry) => {
                debug!(directory = %self.name, id, "Lookup");
                Ok(entry.clone())
            }
            None => {
                warn!(directory = %self.name, id, "Not found");
                Err(ModelError::LookupMiss {
                    directory: self.name.clone(),
                    id: id.to_string(),
                })
            }
        }
    }
}
