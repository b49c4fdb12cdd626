//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types so that typical flow construction
//! needs a single `use chatloom::prelude::*;`.

// Core builder and document types
pub use crate::flow::{
    Edge, EdgeTable, FlowBuilder, FlowDocument, FlowStats, ValidationReport, Variable,
    VariableRegistry, Viewport,
};

// Node construction
pub use crate::node::{
    BlockNode, BranchSpec, CodeArg, CodeOutput, ComparisonClause, ConditionBranch, EntryNode,
    FunctionalNode, LogicalOperator, ModelConfig, Node, NodeConfig, TextFragment,
};

// Identifiers and layout
pub use crate::ident::{BranchId, HandleId, ENTRY_NODE_ID};
pub use crate::layout::{Position, PositionCalculator};

// Step interpretation and parsing
pub use crate::parse::{Lang, ParsedFlow, Parser};
pub use crate::step::{apply_steps, build_flow, Step};

// Storage
pub use crate::storage::{StorageClient, StorageConfig, StoredFlow};

// Error types
pub use crate::error::{BuildError, ExportError, StepError, StorageError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
