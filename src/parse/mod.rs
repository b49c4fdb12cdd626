//! Natural-language front end: turns a free-text flow description into an
//! ordered step sequence the interpreter can apply.
//!
//! The heuristics here are intentionally shallow keyword matching — good
//! enough to scaffold a flow from a one-line description, not an attempt at
//! language understanding.

pub mod intent;
pub mod variable;

pub use intent::{ConditionPattern, DetectedNode};
pub use variable::ExtractedVariable;

use crate::step::Step;
use ahash::AHashSet;
use itertools::Itertools;
use serde_json::json;
use tracing::debug;

/// Description language. `Auto` detects Chinese vs English per text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    Auto,
    En,
    Zh,
}

impl Lang {
    /// Two-letter code for document metadata, resolving `Auto` against the
    /// given text.
    pub fn code_for(self, text: &str) -> &'static str {
        match intent::resolve_lang(self, text) {
            Lang::Zh => "zh",
            _ => "en",
        }
    }
}

/// A variable surfaced while parsing, with its inferred description.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableHint {
    pub name: String,
    pub description: String,
}

/// Summary counters of one parse run.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseSummary {
    pub total_steps: usize,
    pub node_types: Vec<String>,
    pub variable_count: usize,
}

/// Result of parsing a description: steps ready for the interpreter plus
/// collected variable metadata.
#[derive(Debug, Clone)]
pub struct ParsedFlow {
    pub steps: Vec<Step>,
    pub variables: Vec<VariableHint>,
    pub summary: ParseSummary,
}

/// The natural-language parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct Parser {
    lang: Lang,
}

impl Parser {
    pub fn new(lang: Lang) -> Self {
        Self { lang }
    }

    /// Parses a description into structured steps. Sentences without a
    /// recognizable intent are dropped; nothing here fails.
    pub fn parse(&self, description: &str) -> ParsedFlow {
        let detected = intent::detect_sequence(description, self.lang);
        debug!(sentences = detected.len(), "detected node sequence");

        let mut steps = Vec::with_capacity(detected.len());
        let mut variables = Vec::new();
        let mut seen: AHashSet<String> = AHashSet::new();

        for (index, node) in detected.iter().enumerate() {
            let step = self.step_for(node, index, &seen);
            if let Some(name) = step
                .config
                .as_ref()
                .and_then(|config| config.get("variable"))
                .and_then(|value| value.as_str())
            {
                if !seen.contains(name) {
                    variables.push(VariableHint {
                        name: name.to_string(),
                        description: step.description().unwrap_or(name).to_string(),
                    });
                    seen.insert(name.to_string());
                }
            }
            steps.push(step);
        }

        let node_types = steps
            .iter()
            .map(|step| step.step_type.clone())
            .unique()
            .collect();

        ParsedFlow {
            summary: ParseSummary {
                total_steps: steps.len(),
                node_types,
                variable_count: variables.len(),
            },
            steps,
            variables,
        }
    }

    fn step_for(&self, node: &DetectedNode, index: usize, seen: &AHashSet<String>) -> Step {
        let n = index + 1;
        let text = node.text.as_str();

        match node.node_type {
            "captureUserReply" => {
                let extracted = variable::extract_variable(text);
                let name = dedup_name(&extracted.name, seen);
                Step::new(
                    "captureUserReply",
                    json!({ "variable": name, "title": format!("Capture_{n}") }),
                )
                .with_description(extracted.description)
            }
            "condition" => Step::new(
                "condition",
                json!({
                    "if_else_conditions": condition_branches(text),
                    "title": format!("Condition_{n}"),
                }),
            )
            .with_description(text),
            "code" => Step::new(
                "code",
                json!({
                    "code": "def main() -> dict:\n    return {\"result\": \"success\"}",
                    "outputs": [
                        { "name": "result", "type": "string", "variable_assign": "result" }
                    ],
                    "args": [],
                    "title": format!("Code_{n}"),
                }),
            )
            .with_description(text),
            "llmVariableAssignment" => {
                let extracted = variable::extract_variable(text);
                let name = dedup_name(&extracted.name, seen);
                let clean = clean_action_words(
                    text,
                    &["LLM提取", "LLM处理", "AI提取", "AI处理", "提取", "处理",
                      "LLM extract", "AI extract", "extract", "analyze"],
                );
                Step::new(
                    "llmVariableAssignment",
                    json!({
                        "prompt_template": format!("User input: {{{{user_input}}}}\n\n{clean}"),
                        "variable": name,
                        "title": format!("LLM_Assignment_{n}"),
                    }),
                )
                .with_description(text)
            }
            "llMReply" => {
                let clean = clean_action_words(
                    text,
                    &["LLM回复", "AI回复", "智能回复", "回复", "生成",
                      "LLM reply", "AI reply", "reply", "generate"],
                );
                Step::new(
                    "llMReply",
                    json!({
                        "prompt_template": format!("Based on the conversation context, {clean}"),
                        "title": format!("LLM_Reply_{n}"),
                    }),
                )
                .with_description(text)
            }
            // Everything else detected is a plain text reply.
            _ => {
                let clean = clean_action_words(
                    text,
                    &["发送", "回复", "说", "告诉", "send", "reply", "say"],
                );
                let reply = if clean.is_empty() { text } else { clean.as_str() };
                Step::new(
                    "textReply",
                    json!({ "text": reply, "title": format!("Response_{n}") }),
                )
                .with_description(text)
            }
        }
    }
}

/// Two-branch config for condition text: a matched branch when the text
/// parses, a placeholder branch otherwise, each paired with an "Other"
/// catch-all.
fn condition_branches(text: &str) -> serde_json::Value {
    let matched = match intent::detect_condition(text) {
        Some(pattern) => json!({
            "condition_name": "Condition met",
            "logical_operator": "and",
            "conditions": [{
                "condition_type": "variable",
                "comparison_operator": pattern.operator,
                "condition_value": pattern.value,
                "condition_variable": pattern.variable,
            }],
            "condition_action": [],
        }),
        None => json!({
            "condition_name": "Branch 1",
            "logical_operator": "and",
            "conditions": [{
                "condition_type": "variable",
                "comparison_operator": "=",
                "condition_value": "value",
                "condition_variable": "variable",
            }],
            "condition_action": [],
        }),
    };
    json!([
        matched,
        {
            "condition_name": "Other",
            "logical_operator": "other",
            "conditions": [],
            "condition_action": [],
        }
    ])
}

/// Appends `_1`, `_2`, … until the name is unused.
fn dedup_name(base: &str, seen: &AHashSet<String>) -> String {
    if !seen.contains(base) {
        return base.to_string();
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{base}_{counter}");
        if !seen.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Strips leading verbs and action phrases from a sentence.
fn clean_action_words(text: &str, words: &[&str]) -> String {
    let mut cleaned = text.to_string();
    for word in words {
        cleaned = cleaned.replace(word, "");
    }
    cleaned.trim().to_string()
}
