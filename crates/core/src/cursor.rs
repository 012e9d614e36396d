//! Opaque query cursor
//!
//! A cursor marks a resumable position in a lazily produced, ordered
//! sequence. Its contents belong to the datastore that minted it; callers
//! only store it, ship it to clients, and hand it back to open a query.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, serializable resume token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a token string
    pub fn new(token: impl Into<String>) -> Self {
        Cursor(token.into())
    }

    /// Token as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the cursor, returning the token
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Cursor {
    fn from(token: String) -> Self {
        Cursor(token)
    }
}

impl From<&str> for Cursor {
    fn from(token: &str) -> Self {
        Cursor(token.to_string())
    }
}
