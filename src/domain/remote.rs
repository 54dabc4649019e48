//! Remote entity model
//!
//! What the platform holds ([`RemoteEntity`]) and what shelfsync sends to it
//! ([`RemoteEntityPayload`]).

use super::ids::RemoteId;
use serde::{Deserialize, Serialize};

/// Tag that claims a remote product as managed by shelfsync
///
/// A managed product carries it exactly once. It is the only signal used to
/// recognise "our" products across runs; remote ids are never stored.
pub const OWNERSHIP_MARKER: &str = "shelfsync:managed";

/// A product as it exists on the remote platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteEntity {
    pub remote_id: RemoteId,
    pub sku: Option<String>,
    pub status: String,
    pub tags: Vec<String>,
    pub title: String,
    pub handle: String,
}

impl RemoteEntity {
    pub fn is_active(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("active")
    }

    /// Whether the tag set contains the ownership marker
    pub fn is_owned(&self) -> bool {
        self.tags.iter().any(|tag| tag.trim() == OWNERSHIP_MARKER)
    }
}

/// Outbound product representation for create and update calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteEntityPayload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Price with two decimals, e.g. `"19.90"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    pub sku: String,
    pub tags: Vec<String>,
    /// Lower-cased status, `"active"` unless the row says otherwise
    pub status: String,
}

impl RemoteEntityPayload {
    /// Number of ownership markers in the tag list
    pub fn marker_count(&self) -> usize {
        self.tags
            .iter()
            .filter(|tag| tag.as_str() == OWNERSHIP_MARKER)
            .count()
    }
}
