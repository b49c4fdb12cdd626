//! The flow builder: orchestrates node, wrapper, edge and variable assembly
//! for one chatflow document.

use crate::error::BuildError;
use crate::flow::document::{FlowDocument, FlowStats, Viewport};
use crate::flow::edges::{Edge, EdgeTable};
use crate::flow::variables::VariableRegistry;
use crate::ident::{self, BranchId, HandleId};
use crate::layout::PositionCalculator;
use crate::node::{
    BlockNode, BranchSpec, CodeArg, CodeOutput, EntryNode, FunctionalNode, ModelConfig, Node,
    NodeConfig,
};
use ahash::AHashMap;

/// Assembles one chatflow document: owns the node list, edge table, variable
/// registry and position calculator for the lifetime of a construction
/// session.
///
/// Every add-operation appends a functional node plus its wrapper, keeps the
/// wrapper↔functional maps consistent, and (with `auto_connect`) chains the
/// new wrapper to whatever was added last. A builder is single-threaded and
/// performs no I/O; build one instance per in-flight document.
///
/// # Example
///
/// ```
/// use chatloom::prelude::*;
///
/// let mut builder = FlowBuilder::new("greeting");
/// builder.add_entry().unwrap();
/// builder.add_text_reply("Hi! What's your name?", "Response", true);
/// builder.add_capture_reply("name", None, "Capture", true);
/// builder.add_text_reply("Thanks, {{name}}!", "Response", true);
///
/// let document = builder.export();
/// assert_eq!(document.nodes.len(), 7);
/// assert_eq!(document.edges.len(), 3);
/// assert_eq!(document.variables.len(), 1);
/// ```
#[derive(Debug)]
pub struct FlowBuilder {
    flow_name: String,
    description: String,
    lang: String,
    created_by: String,
    modified_by: String,

    layout: PositionCalculator,
    variables: VariableRegistry,
    edges: EdgeTable,
    nodes: Vec<Node>,
    has_entry: bool,

    flow_uuid: String,
    intention_uuid: String,

    /// Id of the most recently added wrapper (or the entry node), used for
    /// auto-chaining.
    cursor: Option<String>,
    /// Default exit anchor per source id.
    node_handles: AHashMap<String, HandleId>,
    block_to_func: AHashMap<String, String>,
    func_to_block: AHashMap<String, String>,
}

impl FlowBuilder {
    pub fn new(flow_name: impl Into<String>) -> Self {
        let lang = "en".to_string();
        Self {
            flow_name: flow_name.into(),
            description: String::new(),
            lang: lang.clone(),
            created_by: "chatloom".to_string(),
            modified_by: "chatloom".to_string(),
            layout: PositionCalculator::new(),
            variables: VariableRegistry::new(lang),
            edges: EdgeTable::new(),
            nodes: Vec::new(),
            has_entry: false,
            flow_uuid: ident::generate_id(),
            intention_uuid: ident::generate_id(),
            cursor: None,
            node_handles: AHashMap::new(),
            block_to_func: AHashMap::new(),
            func_to_block: AHashMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the document language. Also applies to subsequently registered
    /// variables, so call this before adding nodes.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self.variables = VariableRegistry::new(self.lang.clone());
        self
    }

    pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = created_by.into();
        self
    }

    pub fn with_modified_by(mut self, modified_by: impl Into<String>) -> Self {
        self.modified_by = modified_by.into();
        self
    }

    // ---- node addition ----

    /// Adds the entry node and points the chaining cursor at it.
    ///
    /// Fails with [`BuildError::DuplicateEntry`] if called twice; the check
    /// happens at call time and leaves state untouched on failure.
    pub fn add_entry(&mut self) -> Result<String, BuildError> {
        if self.has_entry {
            return Err(BuildError::DuplicateEntry);
        }
        let node = EntryNode::new(self.layout.entry_position(), None);
        let id = node.id.clone();
        self.node_handles
            .insert(id.clone(), node.data.source_handle.clone());
        self.nodes.push(Node::Entry(node));
        self.has_entry = true;
        self.cursor = Some(id.clone());
        Ok(id)
    }

    /// Adds a text-reply node + wrapper; returns the wrapper id.
    pub fn add_text_reply(&mut self, text: &str, title: &str, auto_connect: bool) -> String {
        self.push_pair(NodeConfig::text_reply(text, title), title, auto_connect)
    }

    /// Adds an input-capture node + wrapper, registering its target variable;
    /// returns the wrapper id.
    pub fn add_capture_reply(
        &mut self,
        variable: &str,
        description: Option<&str>,
        title: &str,
        auto_connect: bool,
    ) -> String {
        self.variables.register(variable, description);
        self.push_pair(NodeConfig::capture_reply(variable, title), title, auto_connect)
    }

    /// Adds a condition node + wrapper; returns the wrapper id and the branch
    /// ids in declaration order. Branch specs are not modified; generated ids
    /// appear only in the returned list and the stored node.
    pub fn add_condition(
        &mut self,
        branches: &[BranchSpec],
        title: &str,
        auto_connect: bool,
    ) -> (String, Vec<BranchId>) {
        let config = NodeConfig::condition(branches, title);
        let branch_ids = match &config {
            NodeConfig::Condition(condition) => condition
                .if_else_conditions
                .iter()
                .map(|branch| branch.condition_id.clone())
                .collect(),
            _ => Vec::new(),
        };
        let block_id = self.push_pair(config, title, auto_connect);
        (block_id, branch_ids)
    }

    /// Adds a scripted-code node + wrapper, registering each non-empty output
    /// binding; returns the wrapper id.
    pub fn add_code(
        &mut self,
        code: &str,
        outputs: Vec<CodeOutput>,
        args: Vec<CodeArg>,
        title: &str,
        description: &str,
        auto_connect: bool,
    ) -> String {
        for output in &outputs {
            if !output.variable_assign.is_empty() {
                self.variables.register(&output.variable_assign, None);
            }
        }
        self.push_pair(
            NodeConfig::code(code, outputs, args, title, description),
            title,
            auto_connect,
        )
    }

    /// Adds an LLM variable-extraction node + wrapper, registering the target
    /// variable; returns the wrapper id.
    pub fn add_llm_assignment(
        &mut self,
        prompt_template: &str,
        variable: &str,
        model: Option<ModelConfig>,
        title: &str,
        description: &str,
        auto_connect: bool,
    ) -> String {
        self.variables.register(variable, None);
        self.push_pair(
            NodeConfig::llm_assignment(prompt_template, variable, model, title, description),
            title,
            auto_connect,
        )
    }

    /// Adds an LLM direct-reply node + wrapper; returns the wrapper id.
    pub fn add_llm_reply(
        &mut self,
        prompt_template: &str,
        model: Option<ModelConfig>,
        title: &str,
        description: &str,
        auto_connect: bool,
    ) -> String {
        self.push_pair(
            NodeConfig::llm_reply(prompt_template, model, title, description),
            title,
            auto_connect,
        )
    }

    /// Shared shape of every functional add-operation.
    fn push_pair(&mut self, config: NodeConfig, label: &str, auto_connect: bool) -> String {
        let (functional_pos, wrapper_pos) = self.layout.next_pair();
        let block_id = ident::generate_id();

        let node = FunctionalNode::new(config, block_id.clone(), functional_pos);
        let block = BlockNode::for_node(&node.id, label, wrapper_pos, Some(block_id.clone()));

        // Condition nodes have one exit anchor per branch and no default one;
        // everything else exposes its generated source handle for chaining.
        match &node.config {
            NodeConfig::Condition(_) => {}
            NodeConfig::TextReply(_)
            | NodeConfig::CaptureReply(_)
            | NodeConfig::Code(_)
            | NodeConfig::LlmAssignment(_)
            | NodeConfig::LlmReply(_) => {
                self.node_handles
                    .insert(block_id.clone(), node.data.source_handle.clone());
            }
        }

        self.block_to_func.insert(block_id.clone(), node.id.clone());
        self.func_to_block.insert(node.id.clone(), block_id.clone());

        self.nodes.push(Node::Functional(node));
        self.nodes.push(Node::Block(block));

        if auto_connect {
            if let Some(previous) = self.cursor.clone() {
                self.connect(&previous, &block_id, None, None);
            }
        }
        self.cursor = Some(block_id.clone());
        block_id
    }

    // ---- wiring ----

    /// Connects two nodes by wrapper (or entry) id.
    ///
    /// An omitted source handle resolves to the source's stored default exit
    /// anchor; an omitted target handle resolves to the functional node inside
    /// the target wrapper (falling back to the raw target id when no mapping
    /// exists). Edges are drawn wrapper-to-wrapper but land on the inner
    /// functional node's addressable handle.
    pub fn connect(
        &mut self,
        source_id: &str,
        target_id: &str,
        source_handle: Option<HandleId>,
        target_handle: Option<String>,
    ) -> Edge {
        let source_handle = source_handle.or_else(|| self.node_handles.get(source_id).cloned());
        let target_handle = target_handle.unwrap_or_else(|| {
            self.block_to_func
                .get(target_id)
                .cloned()
                .unwrap_or_else(|| target_id.to_string())
        });
        self.edges.add(
            source_id,
            target_id,
            source_handle.as_ref(),
            Some(&target_handle),
        )
    }

    /// Wires one condition branch to its consequence. Connecting a later node
    /// back to an earlier wrapper is allowed; cycles (retry loops) are
    /// ordinary edges here.
    pub fn connect_branch(
        &mut self,
        condition_block_id: &str,
        branch: &BranchId,
        target_block_id: &str,
    ) -> Edge {
        self.connect(
            condition_block_id,
            target_block_id,
            Some(branch.clone().into()),
            None,
        )
    }

    // ---- export and inspection ----

    /// Serializes the current state into the wire document. Pure: calling it
    /// repeatedly without intervening mutation yields identical documents.
    pub fn export(&self) -> FlowDocument {
        FlowDocument {
            created_by: self.created_by.clone(),
            modified_by: self.modified_by.clone(),
            flow_uuid: self.flow_uuid.clone(),
            start_node_uuid: ident::ENTRY_NODE_ID.to_string(),
            intention_uuid: self.intention_uuid.clone(),
            flow_name: self.flow_name.clone(),
            description: self.description.clone(),
            nodes: self.nodes.clone(),
            edges: self.edges.all().to_vec(),
            buttons: Vec::new(),
            config: serde_json::Map::new(),
            intention_info: serde_json::Map::new(),
            entities: Vec::new(),
            lang: self.lang.clone(),
            variables: self.variables.all().to_vec(),
            categories: Vec::new(),
            position: (0, 0),
            zoom: 1,
            viewport: Viewport::default(),
        }
    }

    pub fn stats(&self) -> FlowStats {
        FlowStats {
            flow_name: self.flow_name.clone(),
            node_count: self.nodes.len(),
            edge_count: self.edges.count(),
            variable_count: self.variables.count(),
            has_entry: self.has_entry,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &EdgeTable {
        &self.edges
    }

    pub fn variables(&self) -> &VariableRegistry {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut VariableRegistry {
        &mut self.variables
    }

    /// Functional node id wrapped by the given wrapper, if any.
    pub fn functional_for(&self, block_id: &str) -> Option<&str> {
        self.block_to_func.get(block_id).map(String::as_str)
    }

    /// Wrapper id around the given functional node, if any.
    pub fn block_for(&self, functional_id: &str) -> Option<&str> {
        self.func_to_block.get(functional_id).map(String::as_str)
    }
}
