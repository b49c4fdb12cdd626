//! Node factory: construction and wire serialization of every node variant.

pub mod block;
pub mod config;

pub use block::{BlockData, BlockNode};
pub use config::*;

use crate::ident::{self, HandleId, ENTRY_NODE_ID};
use crate::layout::Position;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Data payload shared by all functional nodes: the generated default exit
/// anchor plus fixed layout hints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeData {
    #[serde(rename = "sourceHandle")]
    pub source_handle: HandleId,
    #[serde(rename = "showToolBar")]
    pub show_tool_bar: bool,
    #[serde(rename = "targetPosition")]
    pub target_position: String,
    #[serde(rename = "sourcePosition")]
    pub source_position: String,
}

impl NodeData {
    fn generated() -> Self {
        Self {
            source_handle: HandleId::generate(),
            show_tool_bar: false,
            target_position: "left".to_string(),
            source_position: "right".to_string(),
        }
    }
}

/// Data payload of the entry node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryData {
    pub label: String,
    #[serde(rename = "showToolBar")]
    pub show_tool_bar: bool,
    #[serde(rename = "targetPosition")]
    pub target_position: String,
    #[serde(rename = "sourcePosition")]
    pub source_position: String,
    #[serde(rename = "sourceHandle")]
    pub source_handle: HandleId,
}

/// The unique fixed-id node marking conversation start. Carries no wrapper
/// and no config.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryNode {
    pub id: String,
    pub position: Position,
    pub data: EntryData,
}

impl EntryNode {
    pub fn new(position: Position, source_handle: Option<HandleId>) -> Self {
        Self {
            id: ENTRY_NODE_ID.to_string(),
            position,
            data: EntryData {
                label: "Start".to_string(),
                show_tool_bar: false,
                target_position: "left".to_string(),
                source_position: "right".to_string(),
                source_handle: source_handle.unwrap_or_else(HandleId::generate),
            },
        }
    }
}

impl Serialize for EntryNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("EntryNode", 5)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", "start")?;
        state.serialize_field("initialized", &false)?;
        state.serialize_field("position", &self.position)?;
        state.serialize_field("data", &self.data)?;
        state.end()
    }
}

/// A functional unit of behavior, always paired with a wrapper. The wire
/// shape hides functional nodes (`hidden: true`) and ties them to their
/// wrapper via `blockId`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionalNode {
    pub id: String,
    pub position: Position,
    pub data: NodeData,
    pub block_id: String,
    pub config: NodeConfig,
}

impl FunctionalNode {
    /// Builds a node for the given config, generating its id and default exit
    /// anchor.
    pub fn new(config: NodeConfig, block_id: String, position: Position) -> Self {
        Self {
            id: ident::generate_id(),
            position,
            data: NodeData::generated(),
            block_id,
            config,
        }
    }

    /// Replaces the generated node id. Used when reconstructing nodes whose
    /// ids are already referenced elsewhere.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

impl Serialize for FunctionalNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FunctionalNode", 8)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", self.config.type_tag())?;
        state.serialize_field("initialized", &false)?;
        state.serialize_field("position", &self.position)?;
        state.serialize_field("data", &self.data)?;
        state.serialize_field("blockId", &self.block_id)?;
        state.serialize_field("hidden", &true)?;
        state.serialize_field("config", &self.config)?;
        state.end()
    }
}

/// Any node appearing in a flow document's node list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Entry(EntryNode),
    Functional(FunctionalNode),
    Block(BlockNode),
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::Entry(node) => &node.id,
            Node::Functional(node) => &node.id,
            Node::Block(node) => &node.id,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Node::Entry(node) => node.position,
            Node::Functional(node) => node.position,
            Node::Block(node) => node.position,
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, Node::Entry(_))
    }

    pub fn is_functional(&self) -> bool {
        matches!(self, Node::Functional(_))
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Node::Block(_))
    }
}
