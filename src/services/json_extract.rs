//! 模型回复清洗
//!
//! 模型不保证只返回 JSON：可能带 markdown 代码块、前后说明文字。
//! 这里负责去掉代码块标记，并找出第一个括号平衡的 JSON 对象。

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)```(?:json)?\n?").expect("code fence pattern is valid")
});

/// 去掉所有 ```、```json 标记（大小写不敏感，连同紧随的一个换行）
pub fn strip_code_fences(raw: &str) -> Cow<'_, str> {
    CODE_FENCE.replace_all(raw, "")
}

/// 提取第一个括号平衡的 JSON 对象
///
/// 从第一个 `{` 开始逐字符扫描，只统计字符串字面量之外的花括号深度；
/// 深度回到 0 时返回从起点到该 `}`（含）的子串。
/// 没有 `{`，或对象直到文本结束都没有闭合，返回 `None`。
pub fn extract_balanced_json(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let candidate = &raw[start..];

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;

    for (offset, ch) in candidate.char_indices() {
        if ch == '"' && !escape {
            in_string = !in_string;
        }
        escape = ch == '\\' && !escape;

        if in_string {
            continue;
        }

        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&candidate[..=offset]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_with_surrounding_prose() {
        let raw = "Sure! Here you go:\n{\"2_marks\": [\"A?\"],\n  \"4_marks\": []}\nHope this helps {not json";
        assert_eq!(
            extract_balanced_json(raw),
            Some("{\"2_marks\": [\"A?\"],\n  \"4_marks\": []}")
        );
    }

    #[test]
    fn test_extract_nested_objects() {
        let raw = r#"x {"a": {"b": {"c": [1, {"d": 2}]}}, "e": 3} {"second": true}"#;
        assert_eq!(
            extract_balanced_json(raw),
            Some(r#"{"a": {"b": {"c": [1, {"d": 2}]}}, "e": 3}"#)
        );
    }

    #[test]
    fn test_braces_inside_escaped_string_are_ignored() {
        let raw = r#"{"q": "what is \"a\" vs { b }?"} trailing }"#;
        assert_eq!(
            extract_balanced_json(raw),
            Some(r#"{"q": "what is \"a\" vs { b }?"}"#)
        );
    }

    #[test]
    fn test_escaped_backslash_before_quote_closes_string() {
        let raw = r#"{"path": "C:\\", "n": "}"}"#;
        assert_eq!(extract_balanced_json(raw), Some(raw));
    }

    #[test]
    fn test_no_brace_yields_none() {
        assert_eq!(extract_balanced_json("no json here"), None);
        assert_eq!(extract_balanced_json(""), None);
    }

    #[test]
    fn test_unbalanced_object_yields_none() {
        assert_eq!(extract_balanced_json(r#"{"2_marks": ["A?"]"#), None);
        assert_eq!(extract_balanced_json(r#"{"a": {"b": 1}"#), None);
    }

    #[test]
    fn test_multibyte_text_keeps_char_boundaries() {
        let raw = "前言 {\"2_marks\": [\"什么是 Rust？\"]} 结束";
        assert_eq!(
            extract_balanced_json(raw),
            Some("{\"2_marks\": [\"什么是 Rust？\"]}")
        );
    }

    #[test]
    fn test_strip_code_fences() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(raw), "{\"a\": 1}\n");

        let upper = "```JSON\n{}```";
        assert_eq!(strip_code_fences(upper), "{}");

        let plain = "```\n{}\n```\n";
        assert_eq!(strip_code_fences(plain), "{}\n");
    }

    #[test]
    fn test_strip_code_fences_leaves_plain_text_borrowed() {
        assert!(matches!(strip_code_fences("{\"a\": 1}"), Cow::Borrowed(_)));
    }
}
