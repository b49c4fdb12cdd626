//! Directed edges between wrappers (or the entry node) and their table.

use crate::ident::HandleId;
use serde::Serialize;

/// Render-state payload carried by every edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeData {
    pub hovering: bool,
}

/// A directed connection in the flow canvas.
///
/// `source`/`target` are wrapper ids (or the entry node id); `source_handle`
/// is the source node's exit anchor or a branch id; `target_handle` is the
/// functional node inside the target wrapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub id: String,
    #[serde(rename = "type")]
    pub edge_type: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "sourceHandle")]
    pub source_handle: String,
    #[serde(rename = "targetHandle")]
    pub target_handle: String,
    pub data: EdgeData,
    pub label: String,
    #[serde(rename = "sourceX")]
    pub source_x: i64,
    #[serde(rename = "sourceY")]
    pub source_y: i64,
    #[serde(rename = "targetX")]
    pub target_x: i64,
    #[serde(rename = "targetY")]
    pub target_y: i64,
    #[serde(rename = "zIndex")]
    pub z_index: i64,
    pub animated: bool,
}

impl Edge {
    /// Builds an edge with a deterministic id derived from its endpoints and
    /// handles. Omitted handles fall back to the endpoint ids themselves.
    pub fn new(
        source: &str,
        target: &str,
        source_handle: Option<&str>,
        target_handle: Option<&str>,
    ) -> Self {
        let source_handle = source_handle.unwrap_or(source).to_string();
        let target_handle = target_handle.unwrap_or(target).to_string();
        let id = format!("vueflow__edge-{source}{source_handle}-{target}{target_handle}");
        Self {
            id,
            edge_type: "custom".to_string(),
            source: source.to_string(),
            target: target.to_string(),
            source_handle,
            target_handle,
            data: EdgeData { hovering: false },
            label: String::new(),
            source_x: 0,
            source_y: 0,
            target_x: 0,
            target_y: 0,
            z_index: 0,
            animated: false,
        }
    }
}

/// Ordered store of every edge in one flow.
///
/// Identical logical edges produce identical ids, but re-adding them is not
/// suppressed: duplicates are retained so that complex branch wiring can call
/// connect repeatedly.
#[derive(Debug, Default, Clone)]
pub struct EdgeTable {
    edges: Vec<Edge>,
}

impl EdgeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        source: &str,
        target: &str,
        source_handle: Option<&HandleId>,
        target_handle: Option<&str>,
    ) -> Edge {
        let edge = Edge::new(
            source,
            target,
            source_handle.map(HandleId::as_str),
            target_handle,
        );
        self.edges.push(edge.clone());
        edge
    }

    pub fn all(&self) -> &[Edge] {
        &self.edges
    }

    pub fn from_node<'a>(&'a self, id: &str) -> Vec<&'a Edge> {
        self.edges.iter().filter(|edge| edge.source == id).collect()
    }

    pub fn to_node<'a>(&'a self, id: &str) -> Vec<&'a Edge> {
        self.edges.iter().filter(|edge| edge.target == id).collect()
    }

    pub fn count(&self) -> usize {
        self.edges.len()
    }

    pub fn clear(&mut self) {
        self.edges.clear();
    }
}
