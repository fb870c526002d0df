//! Lossy, never-failing text dumps of values.

use std::fmt::{self, Write};

use crate::value::{ObjectRef, Value};

impl Value {
    /// Render the value for humans.
    ///
    /// Unlike [`Value::to_json_string`] this never fails: functions print as
    /// `[Function: name]`, `undefined` prints as-is and a back-reference to
    /// an enclosing object prints as `[Circular]`.
    pub fn inspect(&self) -> String {
        let mut out = String::new();
        let mut ancestors = Vec::new();
        write_value(self, &mut out, &mut ancestors);
        out
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 && n.is_sign_negative() {
        "-0".to_string()
    } else {
        n.to_string()
    }
}

fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn write_value(value: &Value, out: &mut String, ancestors: &mut Vec<usize>) {
    match value {
        Value::Undefined => out.push_str("undefined"),
        Value::Null => out.push_str("null"),
        Value::Bool(b) => {
            let _ = write!(out, "{b}");
        }
        Value::Number(n) => out.push_str(&format_number(*n)),
        Value::String(s) => out.push_str(&quote(s)),
        Value::Function(func) => out.push_str(&func.tag()),
        Value::Object(obj) => write_object(obj, out, ancestors),
    }
}

fn write_object(obj: &ObjectRef, out: &mut String, ancestors: &mut Vec<usize>) {
    if ancestors.contains(&obj.addr()) {
        out.push_str("[Circular]");
        return;
    }

    let entries = obj.snapshot();
    let (open, close) = if obj.is_array() { ("[", "]") } else { ("{", "}") };
    if entries.is_empty() {
        out.push_str(open);
        out.push_str(close);
        return;
    }

    ancestors.push(obj.addr());
    out.push_str(open);
    out.push(' ');
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        if !obj.is_array() {
            if is_identifier(key) {
                out.push_str(key);
            } else {
                out.push_str(&quote(key));
            }
            out.push_str(": ");
        }
        write_value(value, out, ancestors);
    }
    out.push(' ');
    out.push_str(close);
    ancestors.pop();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives() {
        assert_eq!(Value::Undefined.inspect(), "undefined");
        assert_eq!(Value::from(3).inspect(), "3");
        assert_eq!(Value::from(0.5).inspect(), "0.5");
        assert_eq!(Value::Number(f64::NAN).inspect(), "NaN");
        assert_eq!(Value::Number(-0.0).inspect(), "-0");
        assert_eq!(Value::from("hi").inspect(), "\"hi\"");
    }

    #[test]
    fn nested_object() {
        let v = Value::object([
            ("a", Value::from(1)),
            ("b", Value::array([Value::from(true), Value::Null])),
            ("data-id", Value::from("x")),
        ]);
        assert_eq!(v.inspect(), "{ a: 1, b: [ true, null ], \"data-id\": \"x\" }");
    }

    #[test]
    fn empty_containers() {
        assert_eq!(Value::array([]).inspect(), "[]");
        assert_eq!(Value::object::<&str, _>([]).inspect(), "{}");
    }

    #[test]
    fn function_tag() {
        let v = Value::object([("onClick", Value::function("handleClick", "() => {}"))]);
        assert_eq!(v.inspect(), "{ onClick: [Function: handleClick] }");
    }

    #[test]
    fn circular_reference_marked() {
        let obj = ObjectRef::from_entries([("name", Value::from("root"))]);
        obj.insert("me", Value::Object(obj.clone()));
        assert_eq!(
            Value::Object(obj).inspect(),
            "{ name: \"root\", me: [Circular] }"
        );
    }

    #[test]
    fn shared_sibling_is_not_circular() {
        let shared = Value::object([("k", Value::from(1))]);
        let v = Value::array([shared.clone(), shared]);
        assert_eq!(v.inspect(), "[ { k: 1 }, { k: 1 } ]");
    }
}
