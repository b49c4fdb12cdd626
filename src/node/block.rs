//! Wrapper ("block") nodes: the visual envelope around one functional node.

use crate::ident;
use crate::layout::Position;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Data payload of a wrapper node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockData {
    pub label: String,
    pub include_node_ids: Vec<String>,
    #[serde(rename = "showToolBar")]
    pub show_tool_bar: bool,
    #[serde(rename = "targetPosition")]
    pub target_position: String,
    #[serde(rename = "sourcePosition")]
    pub source_position: String,
}

/// A wrapper node grouping exactly one functional node for canvas rendering.
///
/// The data model allows grouping several nodes, but the builder always
/// produces 1:1 envelopes.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockNode {
    pub id: String,
    pub position: Position,
    pub data: BlockData,
}

impl BlockNode {
    /// Wraps a single functional node. A fresh id is generated when none is
    /// supplied.
    pub fn for_node(
        functional_node_id: &str,
        label: impl Into<String>,
        position: Position,
        block_id: Option<String>,
    ) -> Self {
        Self {
            id: block_id.unwrap_or_else(ident::generate_id),
            position,
            data: BlockData {
                label: label.into(),
                include_node_ids: vec![functional_node_id.to_string()],
                show_tool_bar: false,
                target_position: "left".to_string(),
                source_position: "right".to_string(),
            },
        }
    }
}

impl Serialize for BlockNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BlockNode", 5)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", "block")?;
        state.serialize_field("initialized", &false)?;
        state.serialize_field("position", &self.position)?;
        state.serialize_field("data", &self.data)?;
        state.end()
    }
}
