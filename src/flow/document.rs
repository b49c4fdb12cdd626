//! The exported wire document and its helpers.

use crate::error::ExportError;
use crate::flow::edges::Edge;
use crate::flow::variables::Variable;
use crate::node::Node;
use serde::Serialize;
use std::path::Path;

/// Canvas viewport defaults carried by every document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub x: i64,
    pub y: i64,
    pub zoom: i64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { x: 0, y: 0, zoom: 1 }
    }
}

/// A complete chatflow document in its stable wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowDocument {
    pub created_by: String,
    pub modified_by: String,
    pub flow_uuid: String,
    pub start_node_uuid: String,
    pub intention_uuid: String,
    pub flow_name: String,
    pub description: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub buttons: Vec<serde_json::Value>,
    pub config: serde_json::Map<String, serde_json::Value>,
    pub intention_info: serde_json::Map<String, serde_json::Value>,
    pub entities: Vec<serde_json::Value>,
    pub lang: String,
    pub variables: Vec<Variable>,
    pub categories: Vec<serde_json::Value>,
    pub position: (i64, i64),
    pub zoom: i64,
    pub viewport: Viewport,
}

impl FlowDocument {
    /// Renders the document as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the pretty-printed document to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    /// Checks structural invariants, reporting hard errors and soft warnings.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        let entry_count = self.nodes.iter().filter(|node| node.is_entry()).count();
        match entry_count {
            0 => report.errors.push("missing entry node".to_string()),
            1 => {}
            n => report.errors.push(format!("{n} entry nodes; expected exactly one")),
        }

        let functional = self.nodes.iter().filter(|node| node.is_functional()).count();
        let blocks = self.nodes.iter().filter(|node| node.is_block()).count();
        if functional != blocks {
            report.warnings.push(format!(
                "functional node count ({functional}) does not match wrapper count ({blocks})"
            ));
        }

        report
    }
}

/// Outcome of [`FlowDocument::validate`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Summary counters for one builder session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowStats {
    pub flow_name: String,
    pub node_count: usize,
    pub edge_count: usize,
    pub variable_count: usize,
    pub has_entry: bool,
}
