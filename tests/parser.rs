//! Tests for the natural-language front end.
use chatloom::parse::{intent, variable, Lang, Parser};

#[test]
fn test_english_sequence_detection() {
    let parsed = Parser::new(Lang::Auto)
        .parse("Get user name, capture email address, send a welcome message");

    assert_eq!(parsed.summary.total_steps, 3);
    assert_eq!(parsed.steps[0].step_type, "captureUserReply");
    assert_eq!(parsed.steps[1].step_type, "captureUserReply");
    assert_eq!(parsed.steps[2].step_type, "textReply");
    assert_eq!(
        parsed.summary.node_types,
        vec!["captureUserReply".to_string(), "textReply".to_string()]
    );

    let names: Vec<&str> = parsed
        .variables
        .iter()
        .map(|hint| hint.name.as_str())
        .collect();
    assert_eq!(names, vec!["user_name", "email_address"]);

    let config = parsed.steps[0].config.as_ref().unwrap();
    assert_eq!(config["variable"], "user_name");
    assert_eq!(config["title"], "Capture_1");

    let reply = parsed.steps[2].config.as_ref().unwrap();
    assert_eq!(reply["text"], "a welcome message");
    assert_eq!(reply["title"], "Response_3");
}

#[test]
fn test_condition_sentence_parses_into_branch_pair() {
    let parsed = Parser::new(Lang::En).parse("check if age >= 18, say welcome");

    assert_eq!(parsed.steps[0].step_type, "condition");
    let config = parsed.steps[0].config.as_ref().unwrap();
    let branches = config["if_else_conditions"].as_array().unwrap();
    assert_eq!(branches.len(), 2);
    assert_eq!(branches[0]["condition_name"], "Condition met");
    let clause = &branches[0]["conditions"][0];
    assert_eq!(clause["condition_variable"], "age");
    assert_eq!(clause["comparison_operator"], ">=");
    assert_eq!(clause["condition_value"], "18");
    assert_eq!(branches[1]["logical_operator"], "other");
}

#[test]
fn test_unparsable_condition_gets_placeholder_branches() {
    let parsed = Parser::new(Lang::En).parse("check whether the customer is happy");

    assert_eq!(parsed.steps[0].step_type, "condition");
    let config = parsed.steps[0].config.as_ref().unwrap();
    let branches = config["if_else_conditions"].as_array().unwrap();
    assert_eq!(branches.len(), 2);
    assert_eq!(branches[0]["condition_name"], "Branch 1");
    assert_eq!(branches[1]["condition_name"], "Other");
}

#[test]
fn test_duplicate_variable_names_get_suffixed() {
    let parsed = Parser::new(Lang::En).parse("capture name, capture name");

    let first = parsed.steps[0].config.as_ref().unwrap();
    let second = parsed.steps[1].config.as_ref().unwrap();
    assert_eq!(first["variable"], "name");
    assert_eq!(second["variable"], "name_1");
    assert_eq!(parsed.variables.len(), 2);
}

#[test]
fn test_chinese_description() {
    let description = "询问用户姓名, 发送欢迎消息";
    let parsed = Parser::new(Lang::Auto).parse(description);

    assert_eq!(parsed.steps[0].step_type, "captureUserReply");
    assert_eq!(
        parsed.steps[0].config.as_ref().unwrap()["variable"],
        "name"
    );
    assert_eq!(parsed.steps[1].step_type, "textReply");
    assert_eq!(
        parsed.steps[1].config.as_ref().unwrap()["text"],
        "欢迎消息"
    );
    assert_eq!(Lang::Auto.code_for(description), "zh");
}

#[test]
fn test_sentences_without_intent_are_dropped() {
    let parsed = Parser::new(Lang::En).parse("lorem ipsum dolor, banana");
    assert!(parsed.steps.is_empty());
    assert_eq!(parsed.summary.total_steps, 0);
}

#[test]
fn test_detect_node_type() {
    assert_eq!(
        intent::detect_node_type("send a message", Lang::En),
        Some("textReply")
    );
    assert_eq!(
        intent::detect_node_type("llm extract the order number", Lang::En),
        Some("llmVariableAssignment")
    );
    assert_eq!(intent::detect_node_type("xyzzy", Lang::En), None);
}

#[test]
fn test_detect_condition_spellings() {
    let ascii = intent::detect_condition("age >= 18").unwrap();
    assert_eq!(ascii.variable, "age");
    assert_eq!(ascii.operator, ">=");
    assert_eq!(ascii.value, "18");

    let chinese = intent::detect_condition("温度大于30").unwrap();
    assert_eq!(chinese.variable, "温度");
    assert_eq!(chinese.operator, ">");
    assert_eq!(chinese.value, "30");

    let equality = intent::detect_condition("status = 'done'").unwrap();
    assert_eq!(equality.operator, "=");
    assert_eq!(equality.value, "done");

    assert!(intent::detect_condition("no comparison here").is_none());
}

#[test]
fn test_variable_extraction_paths() {
    // Explicit naming wins.
    let explicit = variable::extract_variable("ask for the user's age and save as age");
    assert_eq!(explicit.name, "age");

    // Chinese field names map to English variables.
    let mapped = variable::extract_variable("获取用户邮箱");
    assert_eq!(mapped.name, "email");
    assert_eq!(mapped.description, "邮箱");

    // English verb prefixes are stripped and snake-cased.
    let english = variable::extract_variable("get user name");
    assert_eq!(english.name, "user_name");

    // Nothing recognizable falls back to user_input.
    let fallback = variable::extract_variable("hello world");
    assert_eq!(fallback.name, "user_input");
}
