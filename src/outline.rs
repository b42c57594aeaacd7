//! Indented structural dump of a JSON value, for inspecting payload shapes.
//!
//! ```text
//! object (2 keys)
//!   data: object (1 keys)
//!     *elements: array[2]
//!       [0]: string "urn:li:fsd_position:1"
//!   included: array[40]
//!     [0]: object (3 keys)
//!       ...
//! ```

use serde_json::Value;
use std::fmt::Write;

const MAX_KEYS: usize = 10;
const PREVIEW_CHARS: usize = 50;
const INDENT: &str = "  ";

/// Outline of `value` down to `max_depth` levels of nesting.
///
/// Arrays show their length and first element, objects at most ten keys,
/// scalars their type and a short preview.
pub fn outline(value: &Value, max_depth: usize) -> String {
    let mut out = String::new();
    write_node(&mut out, value, 0, max_depth);
    out
}

fn write_node(out: &mut String, value: &Value, depth: usize, max_depth: usize) {
    let pad = INDENT.repeat(depth + 1);

    match value {
        Value::Object(map) => {
            let _ = writeln!(out, "object ({} keys)", map.len());
            if depth >= max_depth {
                if !map.is_empty() {
                    let _ = writeln!(out, "{pad}...");
                }
                return;
            }
            for (key, child) in map.iter().take(MAX_KEYS) {
                let _ = write!(out, "{pad}{key}: ");
                write_node(out, child, depth + 1, max_depth);
            }
            if map.len() > MAX_KEYS {
                let _ = writeln!(out, "{pad}... {} more keys", map.len() - MAX_KEYS);
            }
        }
        Value::Array(items) => {
            let _ = writeln!(out, "array[{}]", items.len());
            match items.first() {
                Some(_) if depth >= max_depth => {
                    let _ = writeln!(out, "{pad}...");
                }
                Some(first) => {
                    let _ = write!(out, "{pad}[0]: ");
                    write_node(out, first, depth + 1, max_depth);
                }
                None => {}
            }
        }
        Value::String(s) => {
            let _ = writeln!(out, "string {:?}", preview(s));
        }
        Value::Number(n) => {
            let _ = writeln!(out, "number {n}");
        }
        Value::Bool(b) => {
            let _ = writeln!(out, "bool {b}");
        }
        Value::Null => {
            let _ = writeln!(out, "null");
        }
    }
}

fn preview(s: &str) -> String {
    match s.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}
