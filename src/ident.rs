//! Identifier generation for nodes, wrappers, edges and anchors.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The fixed id of every flow's entry node. Downstream consumers address the
/// conversation start by this literal value, so it is identical across graphs.
pub const ENTRY_NODE_ID: &str = "start00000000000000000000";

/// Returns a fresh random identifier as a canonical dashed hex string.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Opaque token naming an outgoing-edge anchor on a node.
///
/// Handles are never interpreted, only matched, so they are wrapped instead of
/// passed around as raw strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandleId(String);

impl HandleId {
    pub fn generate() -> Self {
        Self(generate_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque id of one condition branch. Doubles as the source handle of edges
/// leaving that branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchId(String);

impl BranchId {
    pub fn generate() -> Self {
        Self(generate_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for BranchId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<BranchId> for HandleId {
    fn from(branch: BranchId) -> Self {
        HandleId(branch.0)
    }
}
