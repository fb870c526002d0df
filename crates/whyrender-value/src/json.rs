//! Conversions between [`Value`] and JSON.
//!
//! Strict conversion follows `JSON.stringify` rules and fails on values JSON
//! cannot carry. Lossy conversion always succeeds and backs the
//! [`serde::Serialize`] impl, so anything holding values stays serializable.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value as Json};

use crate::error::{LoadError, SerializationError};
use crate::inspect::format_number;
use crate::value::{FunctionRef, ObjectRef, Value};

/// Object shape `{"$function": "<source>", "name": "<name>"}` loads as a function.
pub const FUNCTION_MARKER: &str = "$function";
/// Object shape `{"$shared": "<name>"}` loads as a registered shared value.
pub const SHARED_MARKER: &str = "$shared";

/// Largest integer an f64 holds exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

impl Value {
    /// Strict JSON conversion.
    ///
    /// `undefined` members are dropped from objects and become `null` in
    /// arrays; non-finite numbers become `null`. Functions, cycles and a
    /// top-level `undefined` are errors.
    pub fn to_json(&self) -> Result<Json, SerializationError> {
        let mut ancestors = Vec::new();
        strict(self, &mut ancestors)?.ok_or(SerializationError::Undefined)
    }

    /// Strict conversion to compact JSON text.
    pub fn to_json_string(&self) -> Result<String, SerializationError> {
        let json = self.to_json()?;
        serde_json::to_string(&json).map_err(|e| SerializationError::Json(e.to_string()))
    }

    /// Lossy conversion that never fails.
    ///
    /// `undefined` becomes `null`; functions, non-finite numbers and
    /// back-references become descriptive strings.
    pub fn to_json_lossy(&self) -> Json {
        let mut ancestors = Vec::new();
        lossy(self, &mut ancestors)
    }

    /// Build a value from JSON, honouring the `$function` marker.
    pub fn from_json(json: &Json) -> Result<Value, LoadError> {
        JsonLoader::new().load(json)
    }
}

impl TryFrom<&Json> for Value {
    type Error = LoadError;

    fn try_from(json: &Json) -> Result<Self, Self::Error> {
        Value::from_json(json)
    }
}

impl TryFrom<Json> for Value {
    type Error = LoadError;

    fn try_from(json: Json) -> Result<Self, Self::Error> {
        Value::from_json(&json)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_lossy().serialize(serializer)
    }
}

fn number_to_json(n: f64) -> Json {
    if !n.is_finite() {
        return Json::Null;
    }
    if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER {
        return Json::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map(Json::Number).unwrap_or(Json::Null)
}

fn strict(value: &Value, ancestors: &mut Vec<usize>) -> Result<Option<Json>, SerializationError> {
    let json = match value {
        Value::Undefined => return Ok(None),
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Number(n) => number_to_json(*n),
        Value::String(s) => Json::String(s.clone()),
        Value::Function(func) => return Err(SerializationError::Function(func.tag())),
        Value::Object(obj) => {
            if ancestors.contains(&obj.addr()) {
                return Err(SerializationError::Circular);
            }
            ancestors.push(obj.addr());
            let converted = strict_object(obj, ancestors);
            ancestors.pop();
            converted?
        }
    };
    Ok(Some(json))
}

fn strict_object(obj: &ObjectRef, ancestors: &mut Vec<usize>) -> Result<Json, SerializationError> {
    let entries = obj.snapshot();
    if obj.is_array() {
        let mut items = Vec::with_capacity(entries.len());
        for value in entries.values() {
            items.push(strict(value, ancestors)?.unwrap_or(Json::Null));
        }
        Ok(Json::Array(items))
    } else {
        let mut map = Map::new();
        for (key, value) in &entries {
            if let Some(json) = strict(value, ancestors)? {
                map.insert(key.clone(), json);
            }
        }
        Ok(Json::Object(map))
    }
}

fn lossy(value: &Value, ancestors: &mut Vec<usize>) -> Json {
    match value {
        Value::Undefined | Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Number(n) if n.is_finite() => number_to_json(*n),
        Value::Number(n) => Json::String(format_number(*n)),
        Value::String(s) => Json::String(s.clone()),
        Value::Function(func) => Json::String(func.tag()),
        Value::Object(obj) => {
            if ancestors.contains(&obj.addr()) {
                return Json::String("[Circular]".to_string());
            }
            ancestors.push(obj.addr());
            let entries = obj.snapshot();
            let json = if obj.is_array() {
                Json::Array(entries.values().map(|v| lossy(v, ancestors)).collect())
            } else {
                Json::Object(
                    entries
                        .iter()
                        .map(|(k, v)| (k.clone(), lossy(v, ancestors)))
                        .collect(),
                )
            };
            ancestors.pop();
            json
        }
    }
}

/// Builds [`Value`]s from JSON documents.
///
/// Every JSON object or array becomes a fresh [`ObjectRef`], so two loads of
/// the same document are structurally equal but never reference-equal.
/// Values registered as shared are handed out by identity wherever a
/// `{"$shared": "<name>"}` marker appears.
#[derive(Clone, Debug, Default)]
pub struct JsonLoader {
    shared: IndexMap<String, Value>,
}

impl JsonLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing value under `name`.
    pub fn with_shared(mut self, name: impl Into<String>, value: Value) -> Self {
        self.shared.insert(name.into(), value);
        self
    }

    /// Load `json` and register the result under `name`.
    ///
    /// Later definitions may refer to earlier ones.
    pub fn define(&mut self, name: impl Into<String>, json: &Json) -> Result<Value, LoadError> {
        let value = self.load(json)?;
        self.shared.insert(name.into(), value.clone());
        Ok(value)
    }

    pub fn shared(&self, name: &str) -> Option<&Value> {
        self.shared.get(name)
    }

    pub fn load(&self, json: &Json) -> Result<Value, LoadError> {
        Ok(match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::String(s.clone()),
            Json::Array(items) => {
                let arr = ObjectRef::array();
                for item in items {
                    arr.push(self.load(item)?);
                }
                Value::Object(arr)
            }
            Json::Object(map) => {
                if let Some(value) = self.load_marker(map)? {
                    return Ok(value);
                }
                let obj = ObjectRef::plain();
                for (key, item) in map {
                    obj.insert(key.clone(), self.load(item)?);
                }
                Value::Object(obj)
            }
        })
    }

    fn load_marker(&self, map: &Map<String, Json>) -> Result<Option<Value>, LoadError> {
        if let Some(source) = map.get(FUNCTION_MARKER) {
            let source = source.as_str().ok_or_else(|| LoadError::InvalidMarker {
                marker: FUNCTION_MARKER,
                reason: "source must be a string".to_string(),
            })?;
            let name = match map.get("name") {
                Some(Json::String(name)) => name.as_str(),
                Some(_) => {
                    return Err(LoadError::InvalidMarker {
                        marker: FUNCTION_MARKER,
                        reason: "name must be a string".to_string(),
                    })
                }
                None => "",
            };
            if let Some(extra) = map.keys().find(|k| *k != FUNCTION_MARKER && *k != "name") {
                return Err(LoadError::InvalidMarker {
                    marker: FUNCTION_MARKER,
                    reason: format!("unexpected key {extra:?}"),
                });
            }
            return Ok(Some(Value::Function(FunctionRef::new(name, source))));
        }

        if let Some(name) = map.get(SHARED_MARKER) {
            if map.len() != 1 {
                return Err(LoadError::InvalidMarker {
                    marker: SHARED_MARKER,
                    reason: "marker must be the only key".to_string(),
                });
            }
            let name = name.as_str().ok_or_else(|| LoadError::InvalidMarker {
                marker: SHARED_MARKER,
                reason: "name must be a string".to_string(),
            })?;
            return self
                .shared
                .get(name)
                .cloned()
                .map(Some)
                .ok_or_else(|| LoadError::UnknownShared(name.to_string()));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strict_follows_stringify_rules() {
        let v = Value::object([
            ("a", Value::from(1)),
            ("gone", Value::Undefined),
            ("list", Value::array([Value::Undefined, Value::Number(f64::NAN)])),
        ]);
        assert_eq!(v.to_json_string().unwrap(), r#"{"a":1,"list":[null,null]}"#);
    }

    #[test]
    fn integers_render_without_fraction() {
        assert_eq!(Value::from(2).to_json_string().unwrap(), "2");
        assert_eq!(Value::Number(-0.0).to_json_string().unwrap(), "0");
        assert_eq!(Value::from(1.25).to_json_string().unwrap(), "1.25");
    }

    #[test]
    fn top_level_undefined_fails() {
        assert_eq!(Value::Undefined.to_json(), Err(SerializationError::Undefined));
    }

    #[test]
    fn functions_fail_strict() {
        let v = Value::object([("cb", Value::function("cb", "() => {}"))]);
        assert!(matches!(v.to_json(), Err(SerializationError::Function(_))));
    }

    #[test]
    fn cycles_fail_strict_but_not_lossy() {
        let obj = ObjectRef::plain();
        obj.insert("me", Value::Object(obj.clone()));
        let v = Value::Object(obj);
        assert_eq!(v.to_json(), Err(SerializationError::Circular));
        assert_eq!(v.to_json_lossy(), json!({"me": "[Circular]"}));
    }

    #[test]
    fn lossy_describes_unrepresentable_values() {
        let v = Value::array([
            Value::Undefined,
            Value::Number(f64::INFINITY),
            Value::function("go", ""),
        ]);
        assert_eq!(v.to_json_lossy(), json!([null, "Infinity", "[Function: go]"]));
        assert_eq!(serde_json::to_value(&v).unwrap(), v.to_json_lossy());
    }

    #[test]
    fn load_builds_fresh_objects() {
        let doc = json!({"style": {"color": "red"}});
        let a = Value::from_json(&doc).unwrap();
        let b = Value::from_json(&doc).unwrap();
        assert!(!a.ref_eq(&b));
        assert!(a.deep_eq(&b));
        assert_eq!(a.to_json().unwrap(), doc);
    }

    #[test]
    fn load_function_marker() {
        let v = Value::from_json(&json!({"$function": "() => 1", "name": "one"})).unwrap();
        let func = v.as_function().unwrap();
        assert_eq!(func.name(), "one");
        assert_eq!(func.source(), "() => 1");
    }

    #[test]
    fn function_marker_rejects_extra_keys() {
        let err = Value::from_json(&json!({"$function": "x", "other": 1})).unwrap_err();
        assert!(matches!(err, LoadError::InvalidMarker { marker: FUNCTION_MARKER, .. }));
    }

    #[test]
    fn shared_marker_preserves_identity() {
        let mut loader = JsonLoader::new();
        loader.define("theme", &json!({"dark": true})).unwrap();

        let a = loader.load(&json!({"$shared": "theme"})).unwrap();
        let b = loader.load(&json!({"$shared": "theme"})).unwrap();
        assert!(a.ref_eq(&b));
    }

    #[test]
    fn unknown_shared_name() {
        let err = JsonLoader::new().load(&json!({"$shared": "nope"})).unwrap_err();
        assert_eq!(err, LoadError::UnknownShared("nope".into()));
    }

    #[test]
    fn try_from_json() {
        let v = Value::try_from(json!({"a": [1, null]})).unwrap();
        assert_eq!(v.to_json_string().unwrap(), r#"{"a":[1,null]}"#);

        let err = Value::try_from(&json!({"$shared": "missing"})).unwrap_err();
        assert_eq!(err, LoadError::UnknownShared("missing".into()));
    }
}
