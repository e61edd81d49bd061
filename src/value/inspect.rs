//! Console-style rendering of [`Value`]s.
//!
//! Used by the default facility sinks and by `Debug`. Rendering is bounded:
//! containers nested deeper than [`INSPECT_DEPTH`] print as `[Array]` /
//! `[Object]`, and a container that is already being rendered prints as
//! `[Circular]`.

use super::value::Value;

/// Nesting level below which containers are summarized.
const INSPECT_DEPTH: usize = 2;

/// Renders one argument the way a console prints it (top-level strings raw).
pub fn inspect(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => inspect_nested(other),
    }
}

/// Renders one argument with nested-style strings (quoted).
pub fn inspect_nested(value: &Value) -> String {
    let mut out = String::new();
    let mut path = Vec::new();
    write_value(&mut out, value, 0, &mut path);
    out
}

/// Renders a full argument list separated by single spaces.
pub fn format_args(args: &[Value]) -> String {
    args.iter().map(inspect).collect::<Vec<_>>().join(" ")
}

/// Formats a number the way a dynamic host prints it.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else {
        format!("{n}")
    }
}

fn write_value(out: &mut String, value: &Value, depth: usize, path: &mut Vec<usize>) {
    match value {
        Value::Undefined => out.push_str("undefined"),
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_number(*n)),
        Value::String(s) => {
            out.push('\'');
            out.push_str(s);
            out.push('\'');
        }
        Value::Host(h) => out.push_str(&h.describe()),
        Value::Array(arr) => {
            let id = arr.identity();
            if path.contains(&id) {
                out.push_str("[Circular]");
                return;
            }
            if depth > INSPECT_DEPTH {
                out.push_str("[Array]");
                return;
            }
            let items = arr.snapshot(usize::MAX);
            if items.is_empty() {
                out.push_str("[]");
                return;
            }
            path.push(id);
            out.push_str("[ ");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item, depth + 1, path);
            }
            out.push_str(" ]");
            path.pop();
        }
        Value::Object(obj) => {
            let id = obj.identity();
            if path.contains(&id) {
                out.push_str("[Circular]");
                return;
            }
            if depth > INSPECT_DEPTH {
                out.push_str("[Object]");
                return;
            }
            let (entries, _) = obj.snapshot(usize::MAX);
            if entries.is_empty() {
                out.push_str("{}");
                return;
            }
            path.push(id);
            out.push_str("{ ");
            for (i, (key, item)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(key);
                out.push_str(": ");
                write_value(out, item, depth + 1, path);
            }
            out.push_str(" }");
            path.pop();
        }
    }
}
