//! # Mock Directories & Testing Guide
//!
//! [`ScriptedDirectory`] implements the same [`Directory`] API as a
//! production directory but serves a fixed script of expectations, enabling
//! fast, deterministic tests of resolution logic without any backing store.
//!
//! ## When to use Scripts vs [`MemoryDirectory`](crate::session::MemoryDirectory)
//!
//! | Feature | ScriptedDirectory | MemoryDirectory |
//! |---------|-------------------|-----------------|
//! | **State** | None (expectations) | Real entries |
//! | **Order checking** | Strict, panics on deviation | None |
//! | **Error injection** | Easy (`return_err`) | Only misses |
//! | **Use case** | Asserting *what* gets looked up | Populated fixtures |
//!
//! A script is consumed front to back; a lookup that deviates from it panics
//! with the mismatch, and [`ScriptedDirectory::verify`] panics if
//! expectations are left over at the end of the test.
//!
//! ```
//! use chat_model::mock::ScriptedDirectory;
//! use chat_model::Directory;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut contacts = ScriptedDirectory::new("contacts");
//!     contacts.expect_lookup("8:alice").return_entry("Alice".to_string());
//!
//!     let entry = contacts.lookup("8:alice").await.unwrap();
//!     assert_eq!(entry, "Alice");
//!     contacts.verify();
//! }
//! ```
//!
//! [`scripted_pages`] is the paging counterpart: a fetch closure serving a
//! fixed page sequence for [`Exhaust`](crate::page::Exhaust) tests. End the
//! script with an empty page unless the test stops early on purpose.

use crate::error::ModelError;
use crate::session::Directory;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::future::Ready;
use std::sync::{Arc, Mutex};

enum Outcome<T> {
    Entry(T),
    Miss,
    Fail(ModelError),
}

struct Expectation<T> {
    id: String,
    outcome: Outcome<T>,
}

/// A directory that serves a scripted expectation queue.
///
/// Clones share the script, so a test can hand one clone to the session under
/// test and keep another for `verify()`.
pub struct ScriptedDirectory<T> {
    name: String,
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
}

impl<T> Clone for ScriptedDirectory<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            expectations: self.expectations.clone(),
        }
    }
}

impl<T> ScriptedDirectory<T> {
    /// Creates a directory with an empty script.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expectations: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Expects a `lookup` for the given id, next in the script.
    pub fn expect_lookup(&mut self, id: impl Into<String>) -> LookupExpectationBuilder<T> {
        LookupExpectationBuilder {
            id: id.into(),
            expectations: self.expectations.clone(),
        }
    }

    /// Verifies that the whole script was consumed.
    pub fn verify(&self) {
        let expectations = self.expectations.lock().unwrap();
        if !expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                expectations.len()
            );
        }
    }
}

/// Builder for `lookup` expectations.
pub struct LookupExpectationBuilder<T> {
    id: String,
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
}

impl<T> LookupExpectationBuilder<T> {
    /// The lookup succeeds with this entry.
    pub fn return_entry(self, entry: T) {
        self.push(Outcome::Entry(entry));
    }

    /// The lookup misses, producing [`ModelError::LookupMiss`].
    pub fn return_miss(self) {
        self.push(Outcome::Miss);
    }

    /// The lookup fails with the given error.
    pub fn return_err(self, error: ModelError) {
        self.push(Outcome::Fail(error));
    }

    fn push(self, outcome: Outcome<T>) {
        let mut expectations = self.expectations.lock().unwrap();
        expectations.push_back(Expectation {
            id: self.id,
            outcome,
        });
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> Directory for ScriptedDirectory<T> {
    type Entry = T;

    fn name(&self) -> &str {
        &self.name
    }

    async fn lookup(&self, id: &str) -> Result<T, ModelError> {
        let expectation = self.expectations.lock().unwrap().pop_front();
        match expectation {
            Some(expectation) if expectation.id == id => match expectation.outcome {
                Outcome::Entry(entry) => Ok(entry),
                Outcome::Miss => Err(ModelError::LookupMiss {
                    directory: self.name.clone(),
                    id: id.to_string(),
                }),
                Outcome::Fail(error) => Err(error),
            },
            Some(expectation) => panic!(
                "Unexpected lookup on '{}': expected id '{}', got '{}'",
                self.name, expectation.id, id
            ),
            None => panic!(
                "Unexpected lookup on '{}' for '{}': no expectations remaining",
                self.name, id
            ),
        }
    }
}

/// A fetch closure serving a fixed sequence of pages.
///
/// Panics if called after the script ran out, which is exactly the signal a
/// paging test wants: a call past the scripted end is a fetch the code under
/// test should not have made.
pub fn scripted_pages<P>(pages: Vec<P>) -> impl FnMut() -> Ready<Result<P, Infallible>> {
    let mut queue = VecDeque::from(pages);
    move || match queue.pop_front() {
        Some(page) => std::future::ready(Ok(page)),
        None => panic!("Fetch called after the script ran out of pages"),
    }
}
