//! Value differ: explain how two attribute values differ.
//!
//! The pair is classified up front into a [`ValuePair`], then each shape has
//! its own reporting rule. Rendering failures never escape: a value without
//! a strict JSON form is reported as a warning carrying the raw value.

use whyrender_value::{FunctionRef, ObjectRef, SerializationError, Value, ValueKind};

use crate::report::{DiffEntry, DiffReport, Rendered};

/// The shape of a `(previous, next)` pair, decided before any diffing.
#[derive(Debug)]
pub enum ValuePair<'a> {
    BothAbsent,
    /// Exactly one side is `undefined` or `null`.
    OneAbsent {
        previous_absent: bool,
    },
    BothComposite(&'a ObjectRef, &'a ObjectRef),
    BothCallable(&'a FunctionRef, &'a FunctionRef),
    /// Two primitives of the same kind.
    SamePrimitive,
    Mismatch {
        previous: ValueKind,
        next: ValueKind,
    },
}

impl<'a> ValuePair<'a> {
    pub fn classify(previous: &'a Value, next: &'a Value) -> Self {
        match (previous, next) {
            (p, n) if p.is_absent() && n.is_absent() => ValuePair::BothAbsent,
            (p, n) if p.is_absent() || n.is_absent() => ValuePair::OneAbsent {
                previous_absent: p.is_absent(),
            },
            (Value::Object(p), Value::Object(n)) => ValuePair::BothComposite(p, n),
            (Value::Function(p), Value::Function(n)) => ValuePair::BothCallable(p, n),
            (p, n) => {
                let (pk, nk) = (p.kind(), n.kind());
                if pk == nk {
                    ValuePair::SamePrimitive
                } else {
                    ValuePair::Mismatch { previous: pk, next: nk }
                }
            }
        }
    }
}

/// Produce a diff report for one changed attribute.
pub fn diff_values(previous: &Value, next: &Value) -> DiffReport {
    match ValuePair::classify(previous, next) {
        ValuePair::BothAbsent => DiffReport::new(),
        ValuePair::OneAbsent { previous_absent } => {
            let (message, previous, next) = if previous_absent {
                (
                    format!("previous value is {}, next value is present", previous.type_name()),
                    Rendered::Raw(previous.clone()),
                    render_present(next),
                )
            } else {
                (
                    format!("next value is {}, previous value was present", next.type_name()),
                    render_present(previous),
                    Rendered::Raw(next.clone()),
                )
            };
            DiffReport::single(DiffEntry::Warning {
                key: None,
                message,
                previous,
                next,
            })
        }
        ValuePair::BothComposite(p, n) => diff_composites(p, n),
        ValuePair::BothCallable(p, n) => DiffReport::single(DiffEntry::Function {
            previous: p.text(),
            next: n.text(),
        }),
        ValuePair::SamePrimitive => DiffReport::single(DiffEntry::Primitive {
            previous: render_primitive(previous),
            next: render_primitive(next),
        }),
        ValuePair::Mismatch {
            previous: pk,
            next: nk,
        } => DiffReport::single(DiffEntry::TypeMismatch {
            message: format!("type mismatch: previous is {pk}, next is {nk}"),
            previous: previous.clone(),
            next: next.clone(),
        }),
    }
}

/// Compare every key of `next` against the same key of `previous`.
///
/// Keys only present in `previous` are not visited. A key missing from
/// `previous` renders as `undefined`.
fn diff_composites(previous: &ObjectRef, next: &ObjectRef) -> DiffReport {
    let mut report = DiffReport::new();

    for (key, next_value) in next.snapshot() {
        let previous_value = previous.get(&key).unwrap_or_default();
        if previous_value.deep_eq(&next_value) {
            continue;
        }

        match (render_field(&previous_value), render_field(&next_value)) {
            (Ok(p), Ok(n)) => report.push(DiffEntry::Field {
                key,
                previous: p,
                next: n,
            }),
            (Err(err), _) | (_, Err(err)) => report.push(DiffEntry::Warning {
                message: format!("unable to render {key:?} for comparison: {err}"),
                key: Some(key),
                previous: Rendered::Raw(previous_value),
                next: Rendered::Raw(next_value),
            }),
        }
    }

    report
}

fn render_field(value: &Value) -> Result<String, SerializationError> {
    match value.to_json_string() {
        Err(SerializationError::Undefined) => Ok("undefined".to_string()),
        other => other,
    }
}

fn render_present(value: &Value) -> Rendered {
    if let Value::Function(func) = value {
        return Rendered::Source(func.text());
    }
    match value.to_json_string() {
        Ok(json) => Rendered::Json(json),
        Err(_) => Rendered::Raw(value.clone()),
    }
}

fn render_primitive(value: &Value) -> String {
    value.to_json_string().unwrap_or_else(|_| value.inspect())
}
