//! Strongly-typed wrappers for game concepts
//!
//! Card definitions, players and display names are all string-keyed in the
//! event log. Wrapping them in distinct types keeps them from being mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Registry key of a card definition (e.g. "blob_fighter")
///
/// Every copy of a card shares the same id; zones hold ids, not instances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(s: impl Into<String>) -> Self {
        CardId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CardId {
    fn from(s: String) -> Self {
        CardId(s)
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        CardId(s.to_string())
    }
}

/// Player identity as assigned by the lobby
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(s: impl Into<String>) -> Self {
        PlayerId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        PlayerId(s)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        PlayerId(s.to_string())
    }
}

/// Card display name (distinct from the registry key)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardName(String);

impl CardName {
    pub fn new(s: impl Into<String>) -> Self {
        CardName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CardName {
    fn from(s: &str) -> Self {
        CardName(s.to_string())
    }
}
