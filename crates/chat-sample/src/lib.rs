//! # Messenger Sample Library
//!
//! A miniature messaging client assembled from the `chat-model` toolkit,
//! exposed as a library for integration testing.

pub mod error;
pub mod history;
pub mod model;
pub mod session;

pub use error::MessengerError;
pub use history::HistoryFeed;
pub use model::{Chat, Contact, FileMessage, GroupChat, Message};
pub use session::{CachedContacts, Messenger};
