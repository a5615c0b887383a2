//! HTML helpers: markup stripping and schema.org JSON-LD extraction

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::OnceLock;

struct StripPatterns {
    block: Regex,
    tag: Regex,
    /// Tags that surfaced from escaped markup; `<` must be followed by a name
    escaped_tag: Regex,
    numeric_entity: Regex,
    whitespace: Regex,
}

fn strip_patterns() -> Option<&'static StripPatterns> {
    static PATTERNS: OnceLock<Option<StripPatterns>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            Some(StripPatterns {
                block: Regex::new(r"(?i)<\s*/?\s*(?:p|br|div|li|tr|h[1-6])\b[^>]*>").ok()?,
                tag: Regex::new(r"<[^<]+?>").ok()?,
                escaped_tag: Regex::new(r"</?[A-Za-z][^<>]*>").ok()?,
                numeric_entity: Regex::new(r"&#(x[0-9a-fA-F]+|\d+);").ok()?,
                whitespace: Regex::new(r"\s+").ok()?,
            })
        })
        .as_ref()
}

/// Remove markup from descriptive text
///
/// Block-level tags become spaces and other tags are dropped. Entities are
/// then decoded, and markup that was only escaped (`&lt;b&gt;`) is stripped
/// in a second pass. Whitespace runs collapse to a single space.
pub fn strip_html(input: &str) -> String {
    let Some(patterns) = strip_patterns() else {
        return input.trim().to_string();
    };

    let text = patterns.block.replace_all(input, " ");
    let text = patterns.tag.replace_all(&text, "");
    let text = patterns.numeric_entity.replace_all(&text, |caps: &regex::Captures| {
        let code = &caps[1];
        let parsed = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        parsed
            .and_then(char::from_u32)
            .map(|c| c.to_string())
            .unwrap_or_default()
    });

    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");

    let text = patterns.block.replace_all(&decoded, " ");
    let text = patterns.escaped_tag.replace_all(&text, "");

    patterns
        .whitespace
        .replace_all(&text, " ")
        .trim()
        .to_string()
}

/// Collect every JSON-LD object embedded in a page
///
/// Top-level arrays and `@graph` containers are flattened. Script blocks that
/// fail to parse are skipped.
pub fn extract_json_ld(html: &str) -> Result<Vec<Value>, String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#)
        .map_err(|e| format!("invalid JSON-LD selector: {e}"))?;

    let mut objects = Vec::new();
    for script in document.select(&selector) {
        let body = script.text().collect::<String>();
        match serde_json::from_str::<Value>(body.trim()) {
            Ok(value) => flatten_json_ld(value, &mut objects),
            Err(e) => tracing::debug!("Skipping malformed JSON-LD block: {}", e),
        }
    }

    Ok(objects)
}

fn flatten_json_ld(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten_json_ld(item, out);
            }
        }
        Value::Object(mut map) => {
            if let Some(graph) = map.remove("@graph") {
                flatten_json_ld(graph, out);
            }
            if map.contains_key("@type") {
                out.push(Value::Object(map));
            }
        }
        _ => {}
    }
}

/// Whether a JSON-LD object declares one of `types`
///
/// `@type` may be a string or an array of strings.
pub fn json_ld_type_is(value: &Value, types: &[&str]) -> bool {
    match value.get("@type") {
        Some(Value::String(kind)) => types.contains(&kind.as_str()),
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .any(|kind| types.contains(&kind)),
        _ => false,
    }
}

/// Read a text property that may be a plain string or a `{ "name": ... }` node
pub fn json_ld_text(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Object(node) => node.get("name").and_then(Value::as_str).map(str::to_string),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
