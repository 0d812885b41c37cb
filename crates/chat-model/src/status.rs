//! # Availability States
//!
//! The closed set of user availability states the platform reports. The
//! toolkit attaches no behavior to them; they ride along on contact records
//! and presence payloads.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A user's availability, as reported by presence payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Not connected.
    Offline,
    /// Connected, shown to others as offline.
    Hidden,
    /// Connected, wishes not to be disturbed.
    Busy,
    /// Connected but idle.
    Idle,
    /// Connected and active.
    Online,
}

impl Status {
    /// Every state, least to most available.
    pub const ALL: [Status; 5] = [
        Status::Offline,
        Status::Hidden,
        Status::Busy,
        Status::Idle,
        Status::Online,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Offline => "Offline",
            Status::Hidden => "Hidden",
            Status::Busy => "Busy",
            Status::Idle => "Idle",
            Status::Online => "Online",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Offline" => Ok(Status::Offline),
            "Hidden" => Ok(Status::Hidden),
            "Busy" => Ok(Status::Busy),
            "Idle" => Ok(Status::Idle),
            "Online" => Ok(Status::Online),
            other => Err(ModelError::UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_known_states() {
        assert_eq!("Online".parse::<Status>().expect("Failed to parse"), Status::Online);
        assert_eq!("Hidden".parse::<Status>().expect("Failed to parse"), Status::Hidden);
    }

    #[test]
    fn rejects_unknown_states() {
        let err = "Away".parse::<Status>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown status 'Away'");
    }

    #[test]
    fn serializes_as_the_bare_name() {
        assert_eq!(
            serde_json::to_value(Status::Busy).expect("Failed to serialize"),
            json!("Busy")
        );
        assert_eq!(Status::ALL.len(), 5);
    }
}
