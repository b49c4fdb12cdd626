//! Keyword-based intent detection over free-text flow descriptions.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Lang;

/// Keyword tables per node type: (wire tag, Chinese keywords, English keywords).
/// Order matters: ties in keyword score resolve to the earlier entry.
const NODE_KEYWORDS: &[(&str, &[&str], &[&str])] = &[
    (
        "textReply",
        &["发送", "回复", "说", "告诉", "提示", "显示", "输出", "返回文本"],
        &["send", "reply", "say", "tell", "show", "display", "output", "return text"],
    ),
    (
        "captureUserReply",
        &["获取", "捕获", "询问", "问", "输入", "接收", "收集"],
        &["get", "capture", "ask", "input", "receive", "collect", "prompt for"],
    ),
    (
        "condition",
        &["如果", "判断", "检查", "条件", "分支", "是否", "当", "根据"],
        &["if", "check", "condition", "branch", "when", "based on", "depending on"],
    ),
    (
        "code",
        &["执行代码", "运行代码", "计算", "处理数据", "代码块"],
        &["execute code", "run code", "calculate", "process", "code block"],
    ),
    (
        "llmVariableAssignment",
        &["LLM提取", "LLM处理", "AI提取", "AI处理", "智能提取", "分析提取"],
        &["llm extract", "ai extract", "llm process", "ai process", "smart extract", "analyze"],
    ),
    (
        "llMReply",
        &["LLM回复", "AI回复", "智能回复", "AI生成", "LLM生成"],
        &["llm reply", "ai reply", "smart reply", "ai generate", "llm generate"],
    ),
];

static CHINESE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\u{4e00}-\u{9fff}]").expect("valid regex"));

static SENTENCE_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,，;。.、]|then|然后|接着|之后").expect("valid regex"));

/// `variable <op> value` spellings, tried in order. Symbolic multi-character
/// operators come before their single-character prefixes.
static CONDITION_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    let raw: &[(&str, &str)] = &[
        (r"(\w+)\s*>=\s*(\d+)", ">="),
        (r"(\w+)\s*≥\s*(\d+)", ">="),
        (r"(\w+)\s*大于等于\s*(\d+)", ">="),
        (r"(\w+)\s*不小于\s*(\d+)", ">="),
        (r"(\w+)\s*<=\s*(\d+)", "<="),
        (r"(\w+)\s*≤\s*(\d+)", "<="),
        (r"(\w+)\s*小于等于\s*(\d+)", "<="),
        (r"(\w+)\s*不大于\s*(\d+)", "<="),
        (r"(\w+)\s*>\s*(\d+)", ">"),
        (r"(\w+)\s*大于\s*(\d+)", ">"),
        (r"(\w+)\s*<\s*(\d+)", "<"),
        (r"(\w+)\s*小于\s*(\d+)", "<"),
        (r#"(\w+)\s*==\s*["']?(\w+)["']?"#, "="),
        (r#"(\w+)\s*=\s*["']?(\w+)["']?"#, "="),
        (r#"(\w+)\s*等于\s*["']?(\w+)["']?"#, "="),
        (r#"(\w+)\s*是\s*["']?(\w+)["']?"#, "="),
    ];
    raw.iter()
        .map(|(pattern, op)| (Regex::new(pattern).expect("valid regex"), *op))
        .collect()
});

/// One sentence of the description with its detected node type.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedNode {
    pub node_type: &'static str,
    pub text: String,
}

/// A parsed `variable op value` comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionPattern {
    pub variable: String,
    pub operator: &'static str,
    pub value: String,
}

pub fn contains_chinese(text: &str) -> bool {
    CHINESE.is_match(text)
}

/// Resolves `Auto` against the text; `En`/`Zh` pass through.
pub fn resolve_lang(lang: Lang, text: &str) -> Lang {
    match lang {
        Lang::Auto => {
            if contains_chinese(text) {
                Lang::Zh
            } else {
                Lang::En
            }
        }
        other => other,
    }
}

/// Detects the node type of one sentence by keyword score; `None` when no
/// keyword matches and no fallback applies.
pub fn detect_node_type(text: &str, lang: Lang) -> Option<&'static str> {
    let text_lower = text.to_lowercase();
    let lang = resolve_lang(lang, text);

    let mut best: Option<(&'static str, usize)> = None;
    for &(node_type, zh, en) in NODE_KEYWORDS {
        let keywords: &[&str] = if lang == Lang::Zh { zh } else { en };
        let score = keywords
            .iter()
            .filter(|keyword| text_lower.contains(&keyword.to_lowercase()))
            .count();
        if score > 0 && best.map_or(true, |(_, top)| score > top) {
            best = Some((node_type, score));
        }
    }
    if let Some((node_type, _)) = best {
        return Some(node_type);
    }

    // An "ask" verb combined with a capture verb usually means capture.
    if ["询问", "ask", "问"].iter().any(|k| text_lower.contains(k))
        && ["获取", "捕获", "输入", "get", "capture", "input"]
            .iter()
            .any(|k| text_lower.contains(k))
    {
        return Some("captureUserReply");
    }

    None
}

/// Splits a description into sentences and detects a node type for each;
/// sentences without a recognizable intent are dropped.
pub fn detect_sequence(description: &str, lang: Lang) -> Vec<DetectedNode> {
    let lang = resolve_lang(lang, description);
    SENTENCE_SPLIT
        .split(description)
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .filter_map(|sentence| {
            detect_node_type(sentence, lang).map(|node_type| DetectedNode {
                node_type,
                text: sentence.to_string(),
            })
        })
        .collect()
}

/// Parses a `variable op value` comparison out of condition text, if any.
pub fn detect_condition(text: &str) -> Option<ConditionPattern> {
    CONDITION_PATTERNS.iter().find_map(|&(ref pattern, operator)| {
        pattern.captures(text).map(|captures| ConditionPattern {
            variable: captures[1].to_string(),
            operator,
            value: captures[2].to_string(),
        })
    })
}
