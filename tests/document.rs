//! Tests pinning the exported wire format.
mod common;
use chatloom::prelude::*;
use common::{linear_builder, two_branches};
use serde_json::Value;

fn export_json(builder: &FlowBuilder) -> Value {
    serde_json::to_value(builder.export()).unwrap()
}

#[test]
fn test_top_level_field_set() {
    let document = export_json(&linear_builder());
    let object = document.as_object().unwrap();

    let expected = [
        "created_by",
        "modified_by",
        "flow_uuid",
        "start_node_uuid",
        "intention_uuid",
        "flow_name",
        "description",
        "nodes",
        "edges",
        "buttons",
        "config",
        "intention_info",
        "entities",
        "lang",
        "variables",
        "categories",
        "position",
        "zoom",
        "viewport",
    ];
    assert_eq!(object.len(), expected.len());
    for key in expected {
        assert!(object.contains_key(key), "missing key '{key}'");
    }

    assert_eq!(document["start_node_uuid"], ENTRY_NODE_ID);
    assert_eq!(document["flow_name"], "greeting");
    assert_eq!(document["lang"], "en");
    assert_eq!(document["position"], serde_json::json!([0, 0]));
    assert_eq!(document["zoom"], 1);
    assert_eq!(
        document["viewport"],
        serde_json::json!({ "x": 0, "y": 0, "zoom": 1 })
    );
    assert_eq!(document["buttons"], serde_json::json!([]));
    assert_eq!(document["config"], serde_json::json!({}));
}

#[test]
fn test_entry_node_wire_shape() {
    let document = export_json(&linear_builder());
    let entry = &document["nodes"][0];

    assert_eq!(entry["id"], ENTRY_NODE_ID);
    assert_eq!(entry["type"], "start");
    assert_eq!(entry["initialized"], false);
    assert_eq!(entry["data"]["label"], "Start");
    assert_eq!(entry["data"]["targetPosition"], "left");
    assert_eq!(entry["data"]["sourcePosition"], "right");
    assert!(entry["data"]["sourceHandle"].is_string());
    assert!(entry.get("blockId").is_none());
    assert!(entry.get("hidden").is_none());
    assert!(entry.get("config").is_none());
}

#[test]
fn test_functional_and_wrapper_wire_shape() {
    let document = export_json(&linear_builder());
    let functional = &document["nodes"][1];
    let wrapper = &document["nodes"][2];

    assert_eq!(functional["type"], "textReply");
    assert_eq!(functional["hidden"], true);
    assert_eq!(functional["initialized"], false);
    assert_eq!(functional["blockId"], wrapper["id"]);
    assert!(functional["data"]["sourceHandle"].is_string());
    assert_eq!(
        functional["config"]["plain_text"][0]["text"],
        "Hi! What's your name?"
    );
    assert!(functional["config"]["plain_text"][0]["id"].is_string());
    assert_eq!(functional["config"]["rich_text"], serde_json::json!([]));
    assert_eq!(functional["config"]["async_run"], false);
    assert_eq!(functional["config"]["title"], "Response");

    assert_eq!(wrapper["type"], "block");
    assert_eq!(wrapper["data"]["label"], "Response");
    assert_eq!(
        wrapper["data"]["include_node_ids"],
        serde_json::json!([functional["id"]])
    );
    assert!(wrapper.get("hidden").is_none());
    assert!(wrapper.get("blockId").is_none());
}

#[test]
fn test_capture_node_config() {
    let document = export_json(&linear_builder());
    let capture = &document["nodes"][3];
    assert_eq!(capture["type"], "captureUserReply");
    assert_eq!(capture["config"]["variable_assign"], "name");
    assert_eq!(capture["config"]["title"], "Capture");
}

#[test]
fn test_edge_wire_shape() {
    let document = export_json(&linear_builder());
    let edge = &document["edges"][0];

    assert_eq!(edge["type"], "custom");
    assert!(edge["id"].as_str().unwrap().starts_with("vueflow__edge-"));
    assert_eq!(edge["data"], serde_json::json!({ "hovering": false }));
    assert_eq!(edge["label"], "");
    assert_eq!(edge["sourceX"], 0);
    assert_eq!(edge["sourceY"], 0);
    assert_eq!(edge["targetX"], 0);
    assert_eq!(edge["targetY"], 0);
    assert_eq!(edge["zIndex"], 0);
    assert_eq!(edge["animated"], false);
}

#[test]
fn test_condition_node_config() {
    let mut builder = FlowBuilder::new("flow");
    builder.add_entry().unwrap();
    let (_, ids) = builder.add_condition(&two_branches(), "Condition", true);

    let document = export_json(&builder);
    let condition = &document["nodes"][1];
    assert_eq!(condition["type"], "condition");

    let branches = condition["config"]["if_else_conditions"].as_array().unwrap();
    assert_eq!(branches.len(), 2);
    assert_eq!(branches[0]["condition_id"], ids[0].as_str());
    assert_eq!(branches[0]["condition_name"], "adult");
    assert_eq!(branches[0]["logical_operator"], "and");
    assert_eq!(branches[0]["condition_action"], serde_json::json!([]));
    let clause = &branches[0]["conditions"][0];
    assert_eq!(clause["condition_type"], "variable");
    assert_eq!(clause["comparison_operator"], ">=");
    assert_eq!(clause["condition_value"], "18");
    assert_eq!(clause["condition_variable"], "age");

    assert_eq!(branches[1]["condition_name"], "Other");
    assert_eq!(branches[1]["logical_operator"], "other");
    assert_eq!(branches[1]["conditions"], serde_json::json!([]));
}

#[test]
fn test_llm_model_config_defaults() {
    let mut builder = FlowBuilder::new("flow");
    builder.add_entry().unwrap();
    builder.add_llm_assignment("extract the city", "city", None, "LLM Assignment", "", true);
    builder.add_llm_reply("answer politely", None, "LLM Reply", "", true);

    let document = export_json(&builder);
    let assignment = &document["nodes"][1]["config"];
    let reply = &document["nodes"][3]["config"];

    assert_eq!(document["nodes"][1]["type"], "llmVariableAssignment");
    assert_eq!(assignment["variable_assign"], "city");
    assert_eq!(assignment["llm_config"]["llm_name"], "azure-gpt-4o");
    assert_eq!(assignment["llm_config"]["chat_history_flag"], false);
    assert_eq!(assignment["llm_config"]["divergence"], 2);
    // Reply-only fields are absent from the extraction flavor.
    assert!(assignment["llm_config"].get("slang_enable").is_none());
    assert!(assignment["llm_config"].get("main_condition_id").is_none());

    assert_eq!(document["nodes"][3]["type"], "llMReply");
    assert_eq!(reply["prompt_template"], "answer politely");
    assert_eq!(reply["async_run"], false);
    assert_eq!(reply["llm_config"]["chat_history_flag"], true);
    assert_eq!(reply["llm_config"]["slang_enable"], false);
    assert_eq!(reply["llm_config"]["verify_enable"], false);
    assert_eq!(reply["llm_config"]["verify_count"], 5);
    assert!(reply["llm_config"]["main_condition_id"].is_string());
    assert!(reply["llm_config"]["other_condition_id"].is_string());
    assert_ne!(
        reply["llm_config"]["main_condition_id"],
        reply["llm_config"]["other_condition_id"]
    );
}

#[test]
fn test_code_node_config() {
    let mut builder = FlowBuilder::new("flow");
    builder.add_entry().unwrap();
    builder.add_code(
        "def main() -> dict:\n    return {\"result\": \"ok\"}",
        vec![CodeOutput {
            name: "result".to_string(),
            value_type: "string".to_string(),
            variable_assign: "result".to_string(),
        }],
        vec![CodeArg {
            name: "city".to_string(),
            default_value: "{{city}}".to_string(),
            value_type: "string".to_string(),
        }],
        "Code",
        "compute something",
        true,
    );

    let document = export_json(&builder);
    let config = &document["nodes"][1]["config"];
    assert_eq!(document["nodes"][1]["type"], "code");
    assert_eq!(config["code_language"], "python3");
    assert_eq!(config["desc"], "compute something");
    assert_eq!(config["outputs"][0]["variable_assign"], "result");
    assert_eq!(config["outputs"][0]["type"], "string");
    assert_eq!(config["args"][0]["default_value"], "{{city}}");
}

#[test]
fn test_variables_wire_shape() {
    let document = export_json(&linear_builder());
    assert_eq!(
        document["variables"],
        serde_json::json!([
            { "variable_name": "name", "description": "user name", "lang": "en" }
        ])
    );
}

#[test]
fn test_authorship_metadata() {
    let builder = FlowBuilder::new("flow")
        .with_created_by("intake-service")
        .with_modified_by("intake-service");
    let document = builder.export();
    assert_eq!(document.created_by, "intake-service");
    assert_eq!(document.modified_by, "intake-service");

    // Defaults identify the library itself.
    let document = FlowBuilder::new("flow").export();
    assert_eq!(document.created_by, "chatloom");
}

#[test]
fn test_validate_reports_missing_entry() {
    let builder = FlowBuilder::new("flow");
    let report = builder.export().validate();
    assert!(!report.is_valid());
    assert!(report.errors[0].contains("entry"));

    let report = linear_builder().export().validate();
    assert!(report.is_valid());
    assert!(report.warnings.is_empty());
}

#[test]
fn test_save_round_trip() {
    let document = linear_builder().export();
    let path = std::env::temp_dir().join(format!("chatloom_test_{}.json", std::process::id()));

    document.save(&path).unwrap();
    let raw = std::fs::read_to_string(&path).unwrap();
    let parsed: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, serde_json::to_value(&document).unwrap());

    std::fs::remove_file(&path).unwrap();
}
