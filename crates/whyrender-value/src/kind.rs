use std::fmt;

use serde::Serialize;

use crate::value::Value;

/// The kind of a primitive value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Bool,
    Number,
    String,
}

/// Coarse classification of a value, decided before any comparison work.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// `undefined` or `null`.
    Absent,
    Primitive(PrimitiveKind),
    Callable,
    /// Objects and arrays.
    Composite,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Undefined | Value::Null => ValueKind::Absent,
            Value::Bool(_) => ValueKind::Primitive(PrimitiveKind::Bool),
            Value::Number(_) => ValueKind::Primitive(PrimitiveKind::Number),
            Value::String(_) => ValueKind::Primitive(PrimitiveKind::String),
            Value::Function(_) => ValueKind::Callable,
            Value::Object(_) => ValueKind::Composite,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Absent => write!(f, "absent"),
            ValueKind::Primitive(PrimitiveKind::Bool) => write!(f, "boolean"),
            ValueKind::Primitive(PrimitiveKind::Number) => write!(f, "number"),
            ValueKind::Primitive(PrimitiveKind::String) => write!(f, "string"),
            ValueKind::Callable => write!(f, "function"),
            ValueKind::Composite => write!(f, "object"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_each_variant() {
        assert_eq!(Value::Undefined.kind(), ValueKind::Absent);
        assert_eq!(Value::Null.kind(), ValueKind::Absent);
        assert_eq!(
            Value::from(true).kind(),
            ValueKind::Primitive(PrimitiveKind::Bool)
        );
        assert_eq!(
            Value::from(1.5).kind(),
            ValueKind::Primitive(PrimitiveKind::Number)
        );
        assert_eq!(
            Value::from("s").kind(),
            ValueKind::Primitive(PrimitiveKind::String)
        );
        assert_eq!(Value::function("f", "").kind(), ValueKind::Callable);
        assert_eq!(Value::array([]).kind(), ValueKind::Composite);
    }

    #[test]
    fn display_names() {
        assert_eq!(ValueKind::Composite.to_string(), "object");
        assert_eq!(
            ValueKind::Primitive(PrimitiveKind::Number).to_string(),
            "number"
        );
    }
}
