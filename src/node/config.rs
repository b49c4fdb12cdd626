//! Per-type node configuration payloads.
//!
//! Every functional node type carries its own strongly-typed config struct,
//! collected in the [`NodeConfig`] sum type. The serialized shape of each
//! variant is fixed by the wire format and must not drift.

use crate::ident::{self, BranchId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One fragment of plain reply text. Each fragment gets its own generated id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub id: String,
}

impl TextFragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            id: ident::generate_id(),
        }
    }
}

/// Config of a text-reply node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextReplyConfig {
    pub async_run: bool,
    pub plain_text: Vec<TextFragment>,
    pub rich_text: Vec<serde_json::Value>,
    pub title: String,
}

/// Config of an input-capture node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptureReplyConfig {
    pub variable_assign: String,
    pub title: String,
}

/// How a branch combines its comparison clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    And,
    Or,
    /// Catch-all branch taken when no other branch matches.
    Other,
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperator::And => f.write_str("and"),
            LogicalOperator::Or => f.write_str("or"),
            LogicalOperator::Other => f.write_str("other"),
        }
    }
}

/// One `variable <op> value` comparison inside a condition branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonClause {
    pub condition_type: String,
    pub comparison_operator: String,
    pub condition_value: String,
    pub condition_variable: String,
}

impl ComparisonClause {
    pub fn variable(
        variable: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            condition_type: "variable".to_string(),
            comparison_operator: operator.into(),
            condition_value: value.into(),
            condition_variable: variable.into(),
        }
    }
}

/// Caller-supplied description of a condition branch, before an id is
/// assigned. Immutable input: the factory returns new [`ConditionBranch`]
/// records instead of mutating these in place.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchSpec {
    pub name: String,
    pub logical_operator: LogicalOperator,
    pub clauses: Vec<ComparisonClause>,
    /// Preserved when supplied, generated otherwise.
    pub id: Option<BranchId>,
}

impl BranchSpec {
    pub fn new(
        name: impl Into<String>,
        logical_operator: LogicalOperator,
        clauses: Vec<ComparisonClause>,
    ) -> Self {
        Self {
            name: name.into(),
            logical_operator,
            clauses,
            id: None,
        }
    }

    /// The "Other" branch taken when nothing else matches.
    pub fn catch_all() -> Self {
        Self::new("Other", LogicalOperator::Other, Vec::new())
    }
}

/// A named predicate-plus-action clause owned by a condition node. The branch
/// id is used as the source handle of edges leaving this branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionBranch {
    pub condition_id: BranchId,
    pub condition_name: String,
    pub logical_operator: LogicalOperator,
    pub conditions: Vec<ComparisonClause>,
    pub condition_action: Vec<serde_json::Value>,
}

impl ConditionBranch {
    /// Builds a branch from its spec, assigning a fresh id when absent.
    pub fn from_spec(spec: &BranchSpec) -> Self {
        Self {
            condition_id: spec.id.clone().unwrap_or_else(BranchId::generate),
            condition_name: spec.name.clone(),
            logical_operator: spec.logical_operator,
            conditions: spec.clauses.clone(),
            condition_action: Vec::new(),
        }
    }
}

/// Config of a condition node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionConfig {
    pub if_else_conditions: Vec<ConditionBranch>,
    pub title: String,
}

/// One output binding of a scripted-code node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeOutput {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub value_type: String,
    #[serde(default)]
    pub variable_assign: String,
}

/// One input argument binding of a scripted-code node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeArg {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub default_value: String,
    #[serde(rename = "type", default)]
    pub value_type: String,
}

/// Config of a scripted-code node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeConfig {
    pub title: String,
    pub desc: String,
    pub code: String,
    pub code_language: String,
    pub outputs: Vec<CodeOutput>,
    pub args: Vec<CodeArg>,
}

/// Model invocation settings shared by the LLM-assisted node types.
///
/// The reply flavor carries a handful of extra fields (`slang_enable`, the
/// `verify_*` group, the two condition ids); those stay `None` for the
/// extraction flavor and are omitted from its wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelConfig {
    pub rag_correlation_threshold: u32,
    pub rag_max_reference_knowledge_num: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slang_enable: Option<bool>,
    pub divergence: u32,
    pub prompt: String,
    pub llm_name: String,
    pub rag_question: String,
    pub rag_range: String,
    pub rag_enabled: String,
    pub knowledge_base_ids: Vec<serde_json::Value>,
    pub knowledge_search_flag: bool,
    pub chat_history_flag: bool,
    pub chat_history_count: u32,
    pub ltm_enabled: bool,
    pub ltm_search_range: String,
    pub ltm_robot_ids: Vec<serde_json::Value>,
    pub ltm_question: String,
    pub ltm_recall_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_enable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_constraints: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_condition_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_condition_id: Option<String>,
}

impl ModelConfig {
    /// Defaults for variable-extraction nodes.
    pub fn assignment_defaults() -> Self {
        Self {
            rag_correlation_threshold: 65,
            rag_max_reference_knowledge_num: 3,
            slang_enable: None,
            divergence: 2,
            prompt: String::new(),
            llm_name: "azure-gpt-4o".to_string(),
            rag_question: String::new(),
            rag_range: String::new(),
            rag_enabled: String::new(),
            knowledge_base_ids: Vec::new(),
            knowledge_search_flag: false,
            chat_history_flag: false,
            chat_history_count: 5,
            ltm_enabled: false,
            ltm_search_range: "0".to_string(),
            ltm_robot_ids: Vec::new(),
            ltm_question: String::new(),
            ltm_recall_count: 5,
            verify_enable: None,
            verify_count: None,
            verify_constraints: None,
            main_condition_id: None,
            other_condition_id: None,
        }
    }

    /// Defaults for direct-reply nodes. Conversation history is on by default
    /// and the two outcome condition ids are freshly generated per node.
    pub fn reply_defaults() -> Self {
        Self {
            slang_enable: Some(false),
            chat_history_flag: true,
            verify_enable: Some(false),
            verify_count: Some(5),
            verify_constraints: Some(String::new()),
            main_condition_id: Some(ident::generate_id()),
            other_condition_id: Some(ident::generate_id()),
            ..Self::assignment_defaults()
        }
    }
}

/// Config of an LLM variable-extraction node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LlmAssignmentConfig {
    pub title: String,
    pub desc: String,
    pub prompt_template: String,
    pub variable_assign: String,
    pub llm_config: ModelConfig,
}

/// Config of an LLM direct-reply node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LlmReplyConfig {
    pub desc: String,
    pub prompt_template: String,
    pub async_run: bool,
    pub llm_config: ModelConfig,
    pub title: String,
}

/// The per-type configuration of a functional node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NodeConfig {
    TextReply(TextReplyConfig),
    CaptureReply(CaptureReplyConfig),
    Condition(ConditionConfig),
    Code(CodeConfig),
    LlmAssignment(LlmAssignmentConfig),
    LlmReply(LlmReplyConfig),
}

impl NodeConfig {
    /// The wire type tag of the node carrying this config.
    pub fn type_tag(&self) -> &'static str {
        match self {
            NodeConfig::TextReply(_) => "textReply",
            NodeConfig::CaptureReply(_) => "captureUserReply",
            NodeConfig::Condition(_) => "condition",
            NodeConfig::Code(_) => "code",
            NodeConfig::LlmAssignment(_) => "llmVariableAssignment",
            NodeConfig::LlmReply(_) => "llMReply",
        }
    }

    pub fn text_reply(text: impl Into<String>, title: impl Into<String>) -> Self {
        NodeConfig::TextReply(TextReplyConfig {
            async_run: false,
            plain_text: vec![TextFragment::new(text)],
            rich_text: Vec::new(),
            title: title.into(),
        })
    }

    pub fn capture_reply(variable: impl Into<String>, title: impl Into<String>) -> Self {
        NodeConfig::CaptureReply(CaptureReplyConfig {
            variable_assign: variable.into(),
            title: title.into(),
        })
    }

    /// Builds a condition config from branch specs, leaving the caller's
    /// specs untouched and assigning fresh ids where absent.
    pub fn condition(branches: &[BranchSpec], title: impl Into<String>) -> Self {
        NodeConfig::Condition(ConditionConfig {
            if_else_conditions: branches.iter().map(ConditionBranch::from_spec).collect(),
            title: title.into(),
        })
    }

    pub fn code(
        code: impl Into<String>,
        outputs: Vec<CodeOutput>,
        args: Vec<CodeArg>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        NodeConfig::Code(CodeConfig {
            title: title.into(),
            desc: description.into(),
            code: code.into(),
            code_language: "python3".to_string(),
            outputs,
            args,
        })
    }

    pub fn llm_assignment(
        prompt_template: impl Into<String>,
        variable: impl Into<String>,
        model: Option<ModelConfig>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        NodeConfig::LlmAssignment(LlmAssignmentConfig {
            title: title.into(),
            desc: description.into(),
            prompt_template: prompt_template.into(),
            variable_assign: variable.into(),
            llm_config: model.unwrap_or_else(ModelConfig::assignment_defaults),
        })
    }

    pub fn llm_reply(
        prompt_template: impl Into<String>,
        model: Option<ModelConfig>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        NodeConfig::LlmReply(LlmReplyConfig {
            desc: description.into(),
            prompt_template: prompt_template.into(),
            async_run: false,
            llm_config: model.unwrap_or_else(ModelConfig::reply_defaults),
            title: title.into(),
        })
    }
}
