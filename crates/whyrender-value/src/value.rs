use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use indexmap::IndexMap;

/// A dynamically typed attribute value.
///
/// Primitives are compared and copied by value. [`Value::Function`] and
/// [`Value::Object`] wrap shared handles: a clone refers to the same
/// underlying function or object, so it stays reference-equal to the
/// original (see [`Value::ref_eq`]).
#[derive(Clone, Default)]
pub enum Value {
    /// No value at all (a missing attribute reads as `Undefined`).
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Function(FunctionRef),
    Object(ObjectRef),
}

impl Value {
    /// Build a plain object from `(key, value)` pairs, preserving order.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(ObjectRef::from_entries(entries))
    }

    /// Build an array from its elements.
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Value::Object(ObjectRef::from_items(items))
    }

    /// Build a function value from its name and source text.
    pub fn function(name: impl Into<String>, source: impl Into<String>) -> Self {
        Value::Function(FunctionRef::new(name, source))
    }

    /// Returns `true` for `undefined` and `null`.
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// The object handle, if this value is an object or array.
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// The function handle, if this value is callable.
    pub fn as_function(&self) -> Option<&FunctionRef> {
        match self {
            Value::Function(func) => Some(func),
            _ => None,
        }
    }

    /// A short name for the value's runtime type, as used in messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            Value::Object(obj) if obj.is_array() => "array",
            Value::Object(_) => "object",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.inspect())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

impl From<FunctionRef> for Value {
    fn from(func: FunctionRef) -> Self {
        Value::Function(func)
    }
}

/// Whether an object handle is a plain keyed object or an array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Plain,
    Array,
}

struct ObjectCell {
    kind: ObjectKind,
    entries: RwLock<IndexMap<String, Value>>,
}

/// A shared, insertion-ordered object or array.
///
/// Entries may be added after construction, which is how cyclic graphs are
/// built. Arrays key their elements by decimal index.
#[derive(Clone)]
pub struct ObjectRef(Arc<ObjectCell>);

impl ObjectRef {
    /// Create an empty object of the given kind.
    pub fn new(kind: ObjectKind) -> Self {
        Self(Arc::new(ObjectCell {
            kind,
            entries: RwLock::new(IndexMap::new()),
        }))
    }

    /// Create an empty plain object.
    pub fn plain() -> Self {
        Self::new(ObjectKind::Plain)
    }

    /// Create an empty array.
    pub fn array() -> Self {
        Self::new(ObjectKind::Array)
    }

    /// Create a plain object from `(key, value)` pairs.
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let obj = Self::plain();
        for (key, value) in entries {
            obj.insert(key, value);
        }
        obj
    }

    /// Create an array from its elements.
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let obj = Self::array();
        for item in items {
            obj.push(item);
        }
        obj
    }

    pub fn kind(&self) -> ObjectKind {
        self.0.kind
    }

    pub fn is_array(&self) -> bool {
        self.0.kind == ObjectKind::Array
    }

    /// Set `key` to `value`, returning the previous value if any.
    pub fn insert(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value)
    }

    /// Append `value` under the next index.
    pub fn push(&self, value: Value) {
        let mut entries = self
            .0
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let index = entries.len().to_string();
        entries.insert(index, value);
    }

    /// The value stored under `key`, if present.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.read().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    /// Own keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// A point-in-time copy of the entries.
    ///
    /// The copy holds value handles, not deep copies, so identities are
    /// preserved. No lock is held once this returns.
    pub fn snapshot(&self) -> IndexMap<String, Value> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns `true` if both handles point at the same object.
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared cell, used to track visited objects.
    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, IndexMap<String, Value>> {
        self.0
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({})", Value::Object(self.clone()).inspect())
    }
}

#[derive(Debug)]
struct FunctionData {
    name: String,
    source: String,
}

/// A shared callable, represented by its name and source text.
///
/// Two functions are only ever equal by identity; their text is kept for
/// display.
#[derive(Clone)]
pub struct FunctionRef(Arc<FunctionData>);

impl FunctionRef {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self(Arc::new(FunctionData {
            name: name.into(),
            source: source.into(),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn source(&self) -> &str {
        &self.0.source
    }

    /// Source text when known, otherwise a `[Function: name]` tag.
    pub fn text(&self) -> String {
        if self.0.source.is_empty() {
            self.tag()
        } else {
            self.0.source.clone()
        }
    }

    /// The `[Function: name]` tag used by dumps.
    pub fn tag(&self) -> String {
        if self.0.name.is_empty() {
            "[Function (anonymous)]".to_string()
        } else {
            format!("[Function: {}]", self.0.name)
        }
    }

    pub fn ptr_eq(&self, other: &FunctionRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionRef({})", self.tag())
    }
}
