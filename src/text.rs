//! Canonical handling of text fields that arrive either as a bare string or
//! wrapped in an object exposing `.text`.
//!
//! Payloads are inconsistent about this: the same logical field can be
//! `"Engineer"`, `{"text": "Engineer"}` or `{"text": {"text": "Engineer"}}`
//! depending on the view that produced it. [`TextNode`] names those shapes
//! and [`normalize`] is the single place that flattens them.

use serde_json::Value;

/// The text shapes a payload field may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextNode {
    /// A bare string.
    Plain(String),
    /// An object whose `.text` holds another text node.
    Wrapped(Box<TextNode>),
}

impl TextNode {
    /// Classifies `value`, following `.text` through at most two wrappers.
    ///
    /// Returns `None` for anything that does not bottom out in a string
    /// within that depth.
    pub fn from_value(value: &Value) -> Option<Self> {
        Self::classify(value, 2)
    }

    fn classify(value: &Value, wrappers_left: usize) -> Option<Self> {
        match value {
            Value::String(s) => Some(TextNode::Plain(s.clone())),
            Value::Object(map) if wrappers_left > 0 => {
                let inner = map.get("text")?;
                Self::classify(inner, wrappers_left - 1).map(|n| TextNode::Wrapped(Box::new(n)))
            }
            _ => None,
        }
    }

    /// The innermost string.
    pub fn as_str(&self) -> &str {
        match self {
            TextNode::Plain(s) => s,
            TextNode::Wrapped(inner) => inner.as_str(),
        }
    }

    pub fn into_string(self) -> String {
        match self {
            TextNode::Plain(s) => s,
            TextNode::Wrapped(inner) => inner.into_string(),
        }
    }
}

/// Flattens a text-like value to its string, or `""` for any other shape.
pub fn normalize(value: &Value) -> String {
    TextNode::from_value(value)
        .map(TextNode::into_string)
        .unwrap_or_default()
}

/// [`normalize`] over an optional value; `None` yields `""`.
pub fn normalize_opt(value: Option<&Value>) -> String {
    value.map(normalize).unwrap_or_default()
}

/// Normalized text of `parent[key]`, or `None` when it is missing or empty.
pub fn text_field(parent: &Value, key: &str) -> Option<String> {
    let text = normalize_opt(parent.get(key));
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_string() {
        assert_eq!(normalize(&json!("Engineer")), "Engineer");
    }

    #[test]
    fn test_single_wrapper() {
        assert_eq!(normalize(&json!({"text": "Engineer"})), "Engineer");
    }

    #[test]
    fn test_double_wrapper() {
        let value = json!({"text": {"text": "Engineer", "attributesV2": []}});
        assert_eq!(normalize(&value), "Engineer");
        assert_eq!(
            TextNode::from_value(&value),
            Some(TextNode::Wrapped(Box::new(TextNode::Wrapped(Box::new(
                TextNode::Plain("Engineer".to_string())
            )))))
        );
    }

    #[test]
    fn test_too_deep_is_empty() {
        let value = json!({"text": {"text": {"text": "Engineer"}}});
        assert_eq!(normalize(&value), "");
    }

    #[test]
    fn test_other_shapes_are_empty() {
        assert_eq!(normalize(&json!({})), "");
        assert_eq!(normalize(&Value::Null), "");
        assert_eq!(normalize(&json!(42)), "");
        assert_eq!(normalize(&json!(["Engineer"])), "");
        assert_eq!(normalize(&json!({"text": null})), "");
        assert_eq!(normalize_opt(None), "");
    }

    #[test]
    fn test_text_field() {
        let entity = json!({"caption": {"text": "2020 - Present"}, "metadata": {"text": ""}});
        assert_eq!(text_field(&entity, "caption"), Some("2020 - Present".to_string()));
        assert_eq!(text_field(&entity, "metadata"), None);
        assert_eq!(text_field(&entity, "subtitle"), None);
    }
}
