//! Declared and planned sync actions
//!
//! The sheet declares intent as free text. [`SyncAction`] is the closed set
//! the engine understands; [`PlannedAction`] is what the classifier decides
//! after looking at remote state. Both are matched exhaustively so a new kind
//! of action is a compile-time change everywhere it matters.

use super::ids::RemoteId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Action declared on a store row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    Create,
    Update,
    Delete,
}

impl SyncAction {
    /// Normalizes a sheet cell into an action
    ///
    /// Case and surrounding whitespace are ignored. Anything else, including
    /// blank, is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "create" => Some(SyncAction::Create),
            "update" => Some(SyncAction::Update),
            "delete" => Some(SyncAction::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncAction::Create => "create",
            SyncAction::Update => "update",
            SyncAction::Delete => "delete",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!("Invalid sync action '{s}'. Must be one of: create, update, delete")
        })
    }
}

/// Action the engine will carry out for a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlannedAction {
    Create,
    Update,
    Delete,
    Skip,
}

impl PlannedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlannedAction::Create => "create",
            PlannedAction::Update => "update",
            PlannedAction::Delete => "delete",
            PlannedAction::Skip => "skip",
        }
    }
}

impl From<SyncAction> for PlannedAction {
    fn from(action: SyncAction) -> Self {
        match action {
            SyncAction::Create => PlannedAction::Create,
            SyncAction::Update => PlannedAction::Update,
            SyncAction::Delete => PlannedAction::Delete,
        }
    }
}

impl fmt::Display for PlannedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier decision for one row
///
/// Derived fresh on every request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub planned_action: PlannedAction,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_remote_id: Option<RemoteId>,
}

impl Classification {
    /// A classification without a matched remote id
    pub fn new(planned_action: PlannedAction, reason: impl Into<String>) -> Self {
        Self {
            planned_action,
            reason: reason.into(),
            matched_remote_id: None,
        }
    }

    /// An update of a known remote product
    pub fn matched(remote_id: RemoteId, reason: impl Into<String>) -> Self {
        Self {
            planned_action: PlannedAction::Update,
            reason: reason.into(),
            matched_remote_id: Some(remote_id),
        }
    }
}
