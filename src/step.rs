//! Step interpretation: turns heterogeneous step descriptions into builder
//! calls.
//!
//! Steps arrive as `{type, config}` objects, but callers are not uniform:
//! some nest the config, some inline its fields next to `type`, and several
//! field names have drifted across producers. The interpreter accepts all of
//! those shapes, substitutes type-specific defaults for anything missing,
//! and never aborts a sequence: unknown types are skipped with a warning and
//! malformed condition steps degrade to a catch-all branch.

use crate::error::{BuildError, StepError};
use crate::flow::FlowBuilder;
use crate::node::{BranchSpec, CodeArg, CodeOutput, ComparisonClause, LogicalOperator};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// One step description. `config` may be nested or its fields may sit
/// directly next to `type`; [`Step::config_map`] resolves either shape.
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    #[serde(rename = "type")]
    pub step_type: String,
    #[serde(default)]
    pub config: Option<Value>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Step {
    pub fn new(step_type: impl Into<String>, config: Value) -> Self {
        Self {
            step_type: step_type.into(),
            config: Some(config),
            rest: Map::new(),
        }
    }

    /// Attaches a free-text description to the step.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.rest
            .insert("description".to_string(), Value::String(description.into()));
        self
    }

    /// The effective config object: the nested `config` when present,
    /// otherwise the step's inline fields.
    pub fn config_map(&self) -> Map<String, Value> {
        match &self.config {
            Some(Value::Object(map)) => map.clone(),
            _ => self.rest.clone(),
        }
    }

    /// The free-text description attached to the step, if any.
    pub fn description(&self) -> Option<&str> {
        self.rest.get("description").and_then(Value::as_str)
    }
}

/// Applies a step sequence to the builder, returning one warning per skipped
/// step. The sequence is never aborted: a partially-invalid input still
/// yields an exportable document.
pub fn apply_steps(builder: &mut FlowBuilder, steps: &[Step]) -> Vec<StepError> {
    let mut warnings = Vec::new();

    for (index, step) in steps.iter().enumerate() {
        let cfg = step.config_map();
        debug!(index, step_type = %step.step_type, "applying step");

        match step.step_type.as_str() {
            "textReply" => {
                builder.add_text_reply(
                    str_or(&cfg, &["text"], ""),
                    str_or(&cfg, &["title"], "Response"),
                    true,
                );
            }
            "captureUserReply" => {
                let variable = str_or(
                    &cfg,
                    &["variable", "variableName", "variable_name"],
                    "user_input",
                );
                let description =
                    str_of(&cfg, &["description"]).or_else(|| step.description());
                builder.add_capture_reply(
                    variable,
                    description,
                    str_or(&cfg, &["title"], "Capture"),
                    true,
                );
            }
            "condition" => {
                let branches = branch_specs(&cfg);
                builder.add_condition(&branches, str_or(&cfg, &["title"], "Condition"), true);
            }
            "code" => {
                builder.add_code(
                    str_or(&cfg, &["code"], ""),
                    list_of::<CodeOutput>(cfg.get("outputs")),
                    list_of::<CodeArg>(cfg.get("args")),
                    str_or(&cfg, &["title"], "Code"),
                    str_or(&cfg, &["desc", "description"], ""),
                    true,
                );
            }
            "llmVariableAssignment" => {
                builder.add_llm_assignment(
                    str_or(&cfg, &["prompt_template", "prompt"], ""),
                    str_or(
                        &cfg,
                        &["variable", "variableName", "variable_assign"],
                        "result",
                    ),
                    None,
                    str_or(&cfg, &["title"], "LLM Assignment"),
                    str_or(&cfg, &["desc", "description"], ""),
                    true,
                );
            }
            "llMReply" | "llmReply" => {
                builder.add_llm_reply(
                    str_or(&cfg, &["prompt_template", "prompt", "message"], ""),
                    None,
                    str_or(&cfg, &["title"], "LLM Reply"),
                    str_or(&cfg, &["desc", "description"], ""),
                    true,
                );
            }
            other => {
                warn!(index, type_name = other, "unknown step type; skipping");
                warnings.push(StepError::UnknownNodeType {
                    index,
                    type_name: other.to_string(),
                });
            }
        }
    }

    warnings
}

/// Builds a complete flow from a step sequence: fresh builder, entry node,
/// all steps applied in order. Returns the builder plus per-step warnings.
pub fn build_flow(
    flow_name: &str,
    description: &str,
    lang: &str,
    steps: &[Step],
) -> Result<(FlowBuilder, Vec<StepError>), BuildError> {
    let mut builder = FlowBuilder::new(flow_name)
        .with_description(description)
        .with_lang(lang);
    builder.add_entry()?;
    let warnings = apply_steps(&mut builder, steps);
    Ok((builder, warnings))
}

/// Resolves a condition step's branch specs.
///
/// Explicit `if_else_conditions` win; a simple `{variable, operator, value}`
/// or `condition`/`expression` string is assembled into a single named
/// branch; anything else degrades to one empty catch-all branch.
fn branch_specs(cfg: &Map<String, Value>) -> Vec<BranchSpec> {
    if let Some(Value::Array(entries)) = cfg.get("if_else_conditions") {
        if !entries.is_empty() {
            return entries.iter().map(branch_from_value).collect();
        }
    }

    let name = str_or(cfg, &["condition_name", "name"], "Condition").to_string();
    let expression = str_or(cfg, &["condition", "expression"], "");
    let variable = str_or(cfg, &["variable", "condition_variable"], "");
    let value = str_or(cfg, &["value", "condition_value"], "");

    if !expression.is_empty() || (!variable.is_empty() && !value.is_empty()) {
        let clause_variable = if variable.is_empty() {
            expression.split_whitespace().next().unwrap_or("")
        } else {
            variable
        };
        let clause_value = if value.is_empty() { expression } else { value };
        let clause = ComparisonClause::variable(
            clause_variable,
            str_or(cfg, &["operator"], "="),
            clause_value,
        );
        return vec![BranchSpec::new(name, LogicalOperator::And, vec![clause])];
    }

    // Nothing parsable: degrade to a single catch-all branch.
    vec![BranchSpec::new(name, LogicalOperator::Other, Vec::new())]
}

fn branch_from_value(entry: &Value) -> BranchSpec {
    let map = match entry.as_object() {
        Some(map) => map,
        None => return BranchSpec::catch_all(),
    };

    let operator = match str_or(map, &["logical_operator"], "and") {
        "or" => LogicalOperator::Or,
        "other" => LogicalOperator::Other,
        _ => LogicalOperator::And,
    };

    let clauses = match map.get("conditions") {
        Some(Value::Array(raw)) => raw
            .iter()
            .filter_map(Value::as_object)
            .map(|clause| ComparisonClause {
                condition_type: str_or(clause, &["condition_type"], "variable").to_string(),
                comparison_operator: str_or(clause, &["comparison_operator", "operator"], "=")
                    .to_string(),
                condition_value: str_or(clause, &["condition_value", "value"], "").to_string(),
                condition_variable: str_or(clause, &["condition_variable", "variable"], "")
                    .to_string(),
            })
            .collect(),
        _ => Vec::new(),
    };

    let mut spec = BranchSpec::new(
        str_or(map, &["condition_name", "name"], "Branch"),
        operator,
        clauses,
    );
    spec.id = str_of(map, &["condition_id"]).map(|id| id.to_string().into());
    spec
}

fn str_of<'a>(cfg: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| cfg.get(*key).and_then(Value::as_str))
        .filter(|text| !text.is_empty())
}

fn str_or<'a>(cfg: &'a Map<String, Value>, keys: &[&str], default: &'a str) -> &'a str {
    str_of(cfg, keys).unwrap_or(default)
}

fn list_of<T: for<'de> Deserialize<'de>>(value: Option<&Value>) -> Vec<T> {
    match value {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
            .collect(),
        _ => Vec::new(),
    }
}
