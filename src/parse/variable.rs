//! Variable-name extraction from capture/extraction sentences.

use once_cell::sync::Lazy;
use regex::Regex;

/// Common Chinese field names mapped to English variable names. Order
/// matters: the first contained field wins.
const FIELD_MAPPINGS: &[(&str, &str)] = &[
    // personal information
    ("姓名", "name"),
    ("名字", "name"),
    ("用户名", "username"),
    ("年龄", "age"),
    ("性别", "gender"),
    ("电子邮箱", "email"),
    ("邮箱", "email"),
    ("邮件", "email"),
    ("手机号", "phone"),
    ("手机", "phone"),
    ("电话号码", "phone"),
    ("电话", "phone"),
    ("地址", "address"),
    ("城市", "city"),
    ("国家", "country"),
    // business fields
    ("订单号", "order_id"),
    ("订单", "order"),
    ("产品", "product"),
    ("商品", "product"),
    ("数量", "quantity"),
    ("价格", "price"),
    ("金额", "amount"),
    ("日期", "date"),
    ("时间", "time"),
    // generic
    ("输入", "user_input"),
    ("回复", "user_reply"),
    ("响应", "response"),
    ("结果", "result"),
    ("状态", "status"),
    ("信息", "info"),
    ("数据", "data"),
];

/// Phrasings that name the variable explicitly ("save as age", "保存为 age").
static EXPLICIT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"保存[为到]\s*(\w+)",
        r"存入\s*(\w+)",
        r"赋值给\s*(\w+)",
        r"变量\s*(\w+)",
        r"(?i)save\s+(?:as|to)\s+(\w+)",
        r"(?i)store\s+(?:in|as)\s+(\w+)",
        r"(?i)assign\s+to\s+(\w+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
    .collect()
});

static VALID_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("valid regex"));

const CAPTURE_VERBS: &[&str] = &["get", "capture", "ask", "input", "receive", "collect", "fetch"];

/// A variable name derived from a sentence, with the description to register
/// alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedVariable {
    pub name: String,
    pub description: String,
}

/// Derives a variable name from a sentence. Never fails: falls back to
/// `user_input` when nothing better can be inferred.
pub fn extract_variable(text: &str) -> ExtractedVariable {
    if let Some(name) = explicit_name(text) {
        return ExtractedVariable {
            name,
            description: text.to_string(),
        };
    }

    for (field, name) in FIELD_MAPPINGS {
        if text.contains(field) {
            return ExtractedVariable {
                name: (*name).to_string(),
                description: (*field).to_string(),
            };
        }
    }

    if let Some(name) = english_name(text) {
        return ExtractedVariable {
            name,
            description: text.to_string(),
        };
    }

    ExtractedVariable {
        name: "user_input".to_string(),
        description: "user input".to_string(),
    }
}

fn explicit_name(text: &str) -> Option<String> {
    EXPLICIT_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .map(|captures| captures[1].to_string())
            .filter(|name| VALID_NAME.is_match(name))
    })
}

/// "get user name" → "user_name": strip a leading capture verb and
/// snake-case the remainder.
fn english_name(text: &str) -> Option<String> {
    let text_lower = text.to_lowercase();
    for verb in CAPTURE_VERBS {
        if let Some(rest) = text_lower.strip_prefix(verb) {
            let name: String = rest
                .trim()
                .replace([' ', '-'], "_")
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .collect();
            if !name.is_empty() && VALID_NAME.is_match(&name) {
                return Some(name);
            }
        }
    }
    None
}
