//! Cursor codec for the memory datastore
//!
//! A cursor names the kind it was minted for and the id of the next record
//! to read (`None` once the query is exhausted). The payload is JSON,
//! base64url-encoded without padding so the token survives URLs and form
//! fields unchanged.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use cairn_core::{Cursor, Error, Result};
use serde::{Deserialize, Serialize};

/// Decoded cursor payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPosition {
    /// Kind the cursor belongs to
    #[serde(rename = "k")]
    pub kind: String,
    /// Id of the next record to read; `None` past the last record
    #[serde(default)]
    pub at: Option<String>,
}

impl CursorPosition {
    /// Position at record `id` of `kind`
    pub fn at(kind: &str, id: &str) -> Self {
        CursorPosition {
            kind: kind.to_string(),
            at: Some(id.to_string()),
        }
    }

    /// Position past the last record of `kind`
    pub fn end(kind: &str) -> Self {
        CursorPosition {
            kind: kind.to_string(),
            at: None,
        }
    }

    /// Encode to an opaque token
    pub fn encode(&self) -> Cursor {
        let payload = serde_json::json!({ "k": self.kind, "at": self.at });
        Cursor::new(URL_SAFE_NO_PAD.encode(payload.to_string()))
    }

    /// Decode a token minted by [`CursorPosition::encode`]
    ///
    /// # Errors
    /// Returns `InvalidCursor` for tokens that are not valid base64url or do
    /// not carry a position payload.
    pub fn decode(cursor: &Cursor) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(cursor.as_str())
            .map_err(|e| Error::invalid_cursor(format!("not base64url: {}", e)))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::invalid_cursor(format!("malformed payload: {}", e)))
    }

    /// Decode and check that the cursor belongs to `kind`
    pub fn decode_for(cursor: &Cursor, kind: &str) -> Result<Self> {
        let position = Self::decode(cursor)?;
        if position.kind != kind {
            return Err(Error::invalid_cursor(format!(
                "cursor belongs to kind '{}', not '{}'",
                position.kind, kind
            )));
        }
        Ok(position)
    }
}
