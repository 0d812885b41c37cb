//! # Identifier Extraction
//!
//! Pure helpers for pulling entity identifiers out of API URLs and for
//! stripping the numeric type prefix (`8:`, `19:`, ...) identifiers carry on
//! the wire. No match is `None`, never an error; these run in hot parsing
//! paths where a miss just means "not that kind of URL".

use once_cell::sync::Lazy;
use regex::Regex;

static USER_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"users(/ME/contacts)?/[0-9]+:([A-Za-z0-9\.,:_\-]+)").unwrap());

static CHAT_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"conversations/([0-9]+:[A-Za-z0-9\.,:_\-]+(@thread\.skype)?)").unwrap());

/// Strips the type prefix from an identifier, passing `None` through.
///
/// Everything after the first colon is kept; an identifier with no colon is
/// returned unchanged.
pub fn strip_type_prefix(id: Option<&str>) -> Option<&str> {
    id.map(|id| id.split_once(':').map_or(id, |(_, rest)| rest))
}

/// The user identifier embedded in a profile or contacts URL, without its
/// type prefix.
pub fn user_id(url: &str) -> Option<&str> {
    USER_URL
        .captures(url)
        .and_then(|captures| captures.get(2))
        .map(|m| m.as_str())
}

/// The conversation identifier embedded in a conversations URL, type prefix
/// and thread suffix included.
pub fn chat_id(url: &str) -> Option<&str> {
    CHAT_URL
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}
