//! Common test utilities for building flows and step sequences.
use chatloom::prelude::*;
use serde_json::json;

/// Builds the canonical linear flow:
/// entry -> text-reply -> capture("name") -> text-reply.
#[allow(dead_code)]
pub fn linear_builder() -> FlowBuilder {
    let mut builder = FlowBuilder::new("greeting");
    builder.add_entry().unwrap();
    builder.add_text_reply("Hi! What's your name?", "Response", true);
    builder.add_capture_reply("name", Some("user name"), "Capture", true);
    builder.add_text_reply("Thanks, {{name}}!", "Response", true);
    builder
}

/// A matched branch (`age >= 18`) plus the catch-all.
#[allow(dead_code)]
pub fn two_branches() -> Vec<BranchSpec> {
    vec![
        BranchSpec::new(
            "adult",
            LogicalOperator::And,
            vec![ComparisonClause::variable("age", ">=", "18")],
        ),
        BranchSpec::catch_all(),
    ]
}

/// Step sequence matching `linear_builder`, with nested configs.
#[allow(dead_code)]
pub fn linear_steps() -> Vec<Step> {
    serde_json::from_value(json!([
        {
            "type": "textReply",
            "config": { "text": "Hi! What's your name?", "title": "Response" }
        },
        {
            "type": "captureUserReply",
            "config": { "variable": "name", "title": "Capture" }
        },
        {
            "type": "textReply",
            "config": { "text": "Thanks, {{name}}!", "title": "Response" }
        }
    ]))
    .unwrap()
}

/// Wrapper ids of every block node, in insertion order.
#[allow(dead_code)]
pub fn block_ids(builder: &FlowBuilder) -> Vec<String> {
    builder
        .nodes()
        .iter()
        .filter(|node| node.is_block())
        .map(|node| node.id().to_string())
        .collect()
}
