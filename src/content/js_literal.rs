//! JavaScript object-literal rendering of a JSON value: keys unquoted where
//! they are valid identifiers, strings double-quoted, two-space indent.

use serde_json::Value;

pub fn to_js_literal(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Object(map) => {
            out.push_str("{\n");
            let len = map.len();
            for (idx, (key, item)) in map.iter().enumerate() {
                indent(out, depth + 1);
                write_key(out, key);
                out.push_str(": ");
                write_value(out, item, depth + 1);
                if idx + 1 < len {
                    out.push(',');
                }
                out.push('\n');
            }
            indent(out, depth);
            out.push('}');
        }
        Value::Array(items) => {
            out.push_str("[\n");
            let len = items.len();
            for (idx, item) in items.iter().enumerate() {
                indent(out, depth + 1);
                write_value(out, item, depth + 1);
                if idx + 1 < len {
                    out.push(',');
                }
                out.push('\n');
            }
            indent(out, depth);
            out.push(']');
        }
        // Scalars print the same as JSON.
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_key(out: &mut String, key: &str) {
    if is_identifier(key) {
        out.push_str(key);
    } else {
        out.push_str(&Value::String(key.to_string()).to_string());
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use serde_json::json;

    #[test]
    fn keys_unquoted_strings_double_quoted() {
        let value = json!({
            "title": "Generic Window",
            "grid": [10, 10],
            "empty": {},
            "border-color": "red"
        });
        let expected = indoc! {r#"
            {
              "border-color": "red",
              empty: {},
              grid: [
                10,
                10
              ],
              title: "Generic Window"
            }"#};
        assert_eq!(to_js_literal(&value), expected);
    }

    #[test]
    fn scalars_match_json() {
        assert_eq!(to_js_literal(&json!(1.5)), "1.5");
        assert_eq!(to_js_literal(&json!(null)), "null");
        assert_eq!(to_js_literal(&json!("a\"b")), r#""a\"b""#);
    }
}
