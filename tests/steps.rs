//! Tests for the step interpreter: tolerant configs, defaults, degradation.
mod common;
use chatloom::prelude::*;
use common::linear_steps;
use serde_json::{json, Value};

fn steps_from(value: Value) -> Vec<Step> {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_build_flow_from_nested_configs() {
    let (builder, warnings) = build_flow("greeting", "", "en", &linear_steps()).unwrap();
    assert!(warnings.is_empty());

    let stats = builder.stats();
    assert_eq!(stats.node_count, 7);
    assert_eq!(stats.edge_count, 3);
    assert_eq!(stats.variable_count, 1);
    assert!(builder.variables().is_registered("name"));
}

#[test]
fn test_flat_configs_and_alias_keys() {
    let steps = steps_from(json!([
        { "type": "textReply", "text": "hello", "title": "Greet" },
        { "type": "captureUserReply", "variableName": "email" },
        { "type": "llmVariableAssignment", "prompt": "find the city", "variable_assign": "city" },
        { "type": "llMReply", "message": "wrap up" }
    ]));
    let (builder, warnings) = build_flow("flow", "", "en", &steps).unwrap();
    assert!(warnings.is_empty());

    assert!(builder.variables().is_registered("email"));
    assert!(builder.variables().is_registered("city"));

    let document = serde_json::to_value(builder.export()).unwrap();
    assert_eq!(document["nodes"][1]["config"]["title"], "Greet");
    assert_eq!(document["nodes"][3]["config"]["variable_assign"], "email");
    // Missing title falls back to the type default.
    assert_eq!(document["nodes"][3]["config"]["title"], "Capture");
    assert_eq!(
        document["nodes"][5]["config"]["prompt_template"],
        "find the city"
    );
    assert_eq!(document["nodes"][7]["config"]["prompt_template"], "wrap up");
}

#[test]
fn test_unknown_type_is_skipped_without_aborting() {
    let steps = steps_from(json!([
        { "type": "textReply", "config": { "text": "first" } },
        { "type": "teleport", "config": {} },
        { "type": "textReply", "config": { "text": "second" } }
    ]));
    let (builder, warnings) = build_flow("flow", "", "en", &steps).unwrap();

    assert_eq!(warnings.len(), 1);
    assert!(
        matches!(&warnings[0], StepError::UnknownNodeType { index: 1, type_name } if type_name == "teleport")
    );
    // Both valid steps still landed.
    assert_eq!(builder.stats().node_count, 5);
    assert_eq!(builder.stats().edge_count, 2);
}

#[test]
fn test_condition_with_explicit_branches() {
    let steps = steps_from(json!([
        {
            "type": "condition",
            "config": {
                "if_else_conditions": [
                    {
                        "condition_id": "branch-0001",
                        "condition_name": "vip",
                        "logical_operator": "or",
                        "conditions": [
                            {
                                "condition_type": "variable",
                                "comparison_operator": "=",
                                "condition_value": "gold",
                                "condition_variable": "tier"
                            }
                        ],
                        "condition_action": []
                    },
                    {
                        "condition_name": "Other",
                        "logical_operator": "other",
                        "conditions": [],
                        "condition_action": []
                    }
                ]
            }
        }
    ]));
    let (builder, _) = build_flow("flow", "", "en", &steps).unwrap();
    let document = serde_json::to_value(builder.export()).unwrap();
    let branches = document["nodes"][1]["config"]["if_else_conditions"]
        .as_array()
        .unwrap();

    assert_eq!(branches.len(), 2);
    assert_eq!(branches[0]["condition_id"], "branch-0001");
    assert_eq!(branches[0]["logical_operator"], "or");
    assert_eq!(branches[0]["conditions"][0]["condition_variable"], "tier");
    // The second branch had no id; one was generated.
    assert!(branches[1]["condition_id"].is_string());
}

#[test]
fn test_condition_from_simple_fields() {
    let steps = steps_from(json!([
        {
            "type": "condition",
            "config": { "variable": "age", "operator": ">=", "value": "18", "name": "adult" }
        }
    ]));
    let (builder, _) = build_flow("flow", "", "en", &steps).unwrap();
    let document = serde_json::to_value(builder.export()).unwrap();
    let branches = document["nodes"][1]["config"]["if_else_conditions"]
        .as_array()
        .unwrap();

    assert_eq!(branches.len(), 1);
    assert_eq!(branches[0]["condition_name"], "adult");
    assert_eq!(branches[0]["logical_operator"], "and");
    let clause = &branches[0]["conditions"][0];
    assert_eq!(clause["condition_variable"], "age");
    assert_eq!(clause["comparison_operator"], ">=");
    assert_eq!(clause["condition_value"], "18");
}

#[test]
fn test_condition_from_expression_string() {
    let steps = steps_from(json!([
        { "type": "condition", "config": { "condition": "age >= 18" } }
    ]));
    let (builder, _) = build_flow("flow", "", "en", &steps).unwrap();
    let document = serde_json::to_value(builder.export()).unwrap();
    let clause = &document["nodes"][1]["config"]["if_else_conditions"][0]["conditions"][0];

    // The expression's first token names the variable; the raw expression
    // stands in for the value.
    assert_eq!(clause["condition_variable"], "age");
    assert_eq!(clause["condition_value"], "age >= 18");
}

#[test]
fn test_malformed_condition_degrades_to_catch_all() {
    let steps = steps_from(json!([
        { "type": "condition", "config": {} }
    ]));
    let (builder, warnings) = build_flow("flow", "", "en", &steps).unwrap();
    assert!(warnings.is_empty());

    let document = serde_json::to_value(builder.export()).unwrap();
    let branches = document["nodes"][1]["config"]["if_else_conditions"]
        .as_array()
        .unwrap();
    assert_eq!(branches.len(), 1);
    assert_eq!(branches[0]["logical_operator"], "other");
    assert_eq!(branches[0]["conditions"], json!([]));
    assert!(branches[0]["condition_id"].is_string());
}

#[test]
fn test_code_step_registers_outputs() {
    let steps = steps_from(json!([
        {
            "type": "code",
            "config": {
                "code": "def main() -> dict:\n    return {\"total\": 3}",
                "outputs": [
                    { "name": "total", "type": "number", "variable_assign": "total" }
                ],
                "args": []
            }
        }
    ]));
    let (builder, _) = build_flow("flow", "", "en", &steps).unwrap();
    assert!(builder.variables().is_registered("total"));

    let document = serde_json::to_value(builder.export()).unwrap();
    assert_eq!(document["nodes"][1]["config"]["title"], "Code");
    assert_eq!(document["nodes"][1]["config"]["outputs"][0]["type"], "number");
}

#[test]
fn test_capture_description_from_step_level() {
    let steps = steps_from(json!([
        {
            "type": "captureUserReply",
            "config": { "variable": "name" },
            "description": "the customer's name"
        }
    ]));
    let (builder, _) = build_flow("flow", "", "en", &steps).unwrap();
    assert_eq!(
        builder.variables().all()[0].description,
        "the customer's name"
    );
}

#[test]
fn test_document_lang_flows_through() {
    let (builder, _) = build_flow("flow", "desc", "zh", &linear_steps()).unwrap();
    let document = builder.export();
    assert_eq!(document.lang, "zh");
    assert_eq!(document.description, "desc");
    assert_eq!(document.variables[0].lang, "zh");
}
