//! Identity and structural equality.
//!
//! [`Value::ref_eq`] answers "is this the same value?" without looking
//! inside composites. [`Value::deep_eq`] walks objects and arrays and
//! compares their content.

use crate::value::{ObjectRef, Value};

impl Value {
    /// Identity equality.
    ///
    /// Primitives compare by value. Numbers follow `===` except that `NaN`
    /// is the same as `NaN`, so `+0` and `-0` are identical. Functions and
    /// objects compare by handle identity.
    pub fn ref_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => strict_number_eq(*a, *b),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Structural equality.
    ///
    /// Objects are equal when they have the same kind, the same key set and
    /// structurally equal values under each key. `NaN` equals `NaN` and
    /// `+0` equals `-0`. Functions are only equal to themselves. Cycles are
    /// handled: a pair of objects already under comparison is assumed equal.
    pub fn deep_eq(&self, other: &Value) -> bool {
        let mut in_progress = Vec::new();
        deep_eq_inner(self, other, &mut in_progress)
    }
}

fn strict_number_eq(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn deep_eq_inner(a: &Value, b: &Value, in_progress: &mut Vec<(usize, usize)>) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => strict_number_eq(*x, *y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Function(x), Value::Function(y)) => x.ptr_eq(y),
        (Value::Object(x), Value::Object(y)) => objects_eq(x, y, in_progress),
        _ => false,
    }
}

fn objects_eq(a: &ObjectRef, b: &ObjectRef, in_progress: &mut Vec<(usize, usize)>) -> bool {
    if a.ptr_eq(b) {
        return true;
    }
    if a.kind() != b.kind() {
        return false;
    }

    let pair = (a.addr(), b.addr());
    if in_progress.contains(&pair) {
        return true;
    }

    let left = a.snapshot();
    let right = b.snapshot();
    if left.len() != right.len() {
        return false;
    }

    in_progress.push(pair);
    let equal = left.iter().all(|(key, lv)| match right.get(key) {
        Some(rv) => deep_eq_inner(lv, rv, in_progress),
        None => false,
    });
    in_progress.pop();
    equal
}
