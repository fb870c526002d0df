//! Change detector: find the attributes that differ between two renders.
//!
//! Every key from either map is checked twice, once for identity and once
//! for structure. A key is reported when either check fails, together with
//! a [`ChangeReason`] and a value diff. Nothing is logged here; rendering the
//! result is left to the caller.

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use whyrender_value::{ObjectRef, Value};

use crate::error::{ComparatorError, DetectError, DetectResult, Side};
use crate::report::DiffReport;
use crate::value_diff::diff_values;

/// Why an attribute was reported as changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeReason {
    /// Different identity and different structure.
    DifferentObjects,
    /// Same identity but the structural check disagrees. Points at
    /// mutation in place.
    ChangedInPlace,
    /// Equal structure behind a new identity, the usual cause of a
    /// needless render.
    SameStructureNewIdentity,
    /// Catch-all for a difference no other reason describes.
    ObjectsDiffer,
}

impl ChangeReason {
    /// Classify a key from its two equality checks.
    ///
    /// Returns `None` when both checks pass. The checks are tested in fixed
    /// precedence; [`ChangeReason::ObjectsDiffer`] is never produced by the
    /// four boolean combinations and only guards the chain.
    #[allow(clippy::nonminimal_bool, clippy::overly_complex_bool_expr)]
    pub fn classify(ref_equal: bool, struct_equal: bool) -> Option<Self> {
        if ref_equal && struct_equal {
            return None;
        }
        let reason = if !ref_equal && !struct_equal {
            ChangeReason::DifferentObjects
        } else if ref_equal && !struct_equal {
            ChangeReason::ChangedInPlace
        } else if !ref_equal && struct_equal {
            ChangeReason::SameStructureNewIdentity
        } else {
            ChangeReason::ObjectsDiffer
        };
        Some(reason)
    }

    /// Human-readable description.
    pub fn message(&self) -> &'static str {
        match self {
            ChangeReason::DifferentObjects => "changed and are different objects",
            ChangeReason::ChangedInPlace => "changed",
            ChangeReason::SameStructureNewIdentity => {
                "same structurally, but different object identity"
            }
            ChangeReason::ObjectsDiffer => "objects are different",
        }
    }
}

impl fmt::Display for ChangeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Everything known about one changed attribute.
#[derive(Clone, Debug, Serialize)]
pub struct ChangeDescriptor {
    pub previous_value: Value,
    pub next_value: Value,
    pub reason: ChangeReason,
    pub diff: DiffReport,
}

/// The outcome of comparing two attribute maps.
#[derive(Clone, Debug, Serialize)]
pub struct ComparisonResult {
    /// Caller label, carried through untouched.
    pub tag: String,
    /// Component label, carried through untouched.
    pub display_name: String,
    /// The verdict a memoization layer would have received.
    pub props_equal: bool,
    /// Changed attributes in first-seen key order.
    pub changes: IndexMap<String, ChangeDescriptor>,
}

impl ComparisonResult {
    /// Returns `true` if no attribute changed.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changed attributes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn get(&self, key: &str) -> Option<&ChangeDescriptor> {
        self.changes.get(key)
    }

    pub fn changed_keys(&self) -> impl Iterator<Item = &str> {
        self.changes.keys().map(String::as_str)
    }

    /// Number of changed attributes with the given reason.
    pub fn count_by_reason(&self, reason: ChangeReason) -> usize {
        self.changes
            .values()
            .filter(|c| c.reason == reason)
            .count()
    }
}

/// Custom equality over two whole attribute maps.
///
/// Implemented for any `Fn(&Value, &Value) -> Result<bool, ComparatorError>`.
pub trait PropsComparator {
    fn compare(&self, previous: &Value, next: &Value) -> Result<bool, ComparatorError>;
}

impl<F> PropsComparator for F
where
    F: Fn(&Value, &Value) -> Result<bool, ComparatorError>,
{
    fn compare(&self, previous: &Value, next: &Value) -> Result<bool, ComparatorError> {
        self(previous, next)
    }
}

/// Compare two attribute maps and report every changed key.
///
/// `tag` and `display_name` are copied into the result for the reporter.
/// The comparator, if any, only decides [`ComparisonResult::props_equal`];
/// every key is analysed either way. Without one the verdict is identity
/// of the two maps.
pub fn detect(
    tag: &str,
    display_name: &str,
    previous: &Value,
    next: &Value,
    comparator: Option<&dyn PropsComparator>,
) -> DetectResult<ComparisonResult> {
    let previous_map = attribute_map(previous, Side::Previous)?;
    let next_map = attribute_map(next, Side::Next)?;

    let props_equal = match comparator {
        Some(cmp) => cmp.compare(previous, next).map_err(DetectError::Comparator)?,
        None => previous.ref_eq(next),
    };

    let changes = detect_changes(previous_map, next_map);

    Ok(ComparisonResult {
        tag: tag.to_string(),
        display_name: display_name.to_string(),
        props_equal,
        changes,
    })
}

/// Per-key analysis of two attribute maps.
pub fn detect_changes(
    previous: &ObjectRef,
    next: &ObjectRef,
) -> IndexMap<String, ChangeDescriptor> {
    let previous_entries = previous.snapshot();
    let next_entries = next.snapshot();

    let mut changes = IndexMap::new();
    for key in union_keys(previous_entries.keys(), next_entries.keys()) {
        let previous_value = previous_entries.get(&key).cloned().unwrap_or_default();
        let next_value = next_entries.get(&key).cloned().unwrap_or_default();

        let ref_equal = previous_value.ref_eq(&next_value);
        let struct_equal = previous_value.deep_eq(&next_value);
        let Some(reason) = ChangeReason::classify(ref_equal, struct_equal) else {
            continue;
        };

        let diff = diff_values(&previous_value, &next_value);
        changes.insert(
            key,
            ChangeDescriptor {
                previous_value,
                next_value,
                reason,
                diff,
            },
        );
    }
    changes
}

/// Keys of `previous` in order, then keys of `next` not seen yet.
pub fn union_keys<'a>(
    previous: impl IntoIterator<Item = &'a String>,
    next: impl IntoIterator<Item = &'a String>,
) -> IndexSet<String> {
    previous.into_iter().chain(next).cloned().collect()
}

fn attribute_map(value: &Value, side: Side) -> DetectResult<&ObjectRef> {
    value.as_object().ok_or(DetectError::InvalidInput {
        side,
        kind: value.kind(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{DiagnosticChannel, DiffEntry};
    use proptest::prelude::*;

    fn props<const N: usize>(pairs: [(&str, Value); N]) -> Value {
        Value::object(pairs)
    }

    #[test]
    fn identical_map_reference_has_no_changes() {
        let p = props([
            ("a", Value::from(1)),
            ("nan", Value::Number(f64::NAN)),
            ("style", Value::object([("color", Value::from("red"))])),
        ]);
        let result = detect("t", "C", &p, &p, None).unwrap();
        assert!(result.is_empty());
        assert!(result.props_equal);
    }

    #[test]
    fn labels_are_carried_through() {
        let p = props([]);
        let result = detect("[perf]", "UserCard", &p, &props([]), None).unwrap();
        assert_eq!(result.tag, "[perf]");
        assert_eq!(result.display_name, "UserCard");
        assert!(!result.props_equal);
    }

    #[test]
    fn unchanged_keys_are_omitted() {
        let shared = Value::object([("x", Value::from(1))]);
        let prev = props([("a", Value::from(1)), ("s", shared.clone())]);
        let next = props([("a", Value::from(1)), ("s", shared)]);
        assert!(detect("t", "C", &prev, &next, None).unwrap().is_empty());
    }

    #[test]
    fn new_identity_same_structure() {
        let prev = props([("a", Value::from(1)), ("b", Value::object([("x", Value::from(1))]))]);
        let next = props([("a", Value::from(1)), ("b", Value::object([("x", Value::from(1))]))]);

        let result = detect("t", "C", &prev, &next, None).unwrap();
        assert_eq!(result.changed_keys().collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(
            result.get("b").unwrap().reason,
            ChangeReason::SameStructureNewIdentity
        );
        assert!(result.get("b").unwrap().diff.is_empty());
    }

    #[test]
    fn different_objects() {
        let prev = props([("a", Value::object::<&str, _>([]))]);
        let next = props([("a", Value::object([("y", Value::from(1))]))]);

        let result = detect("t", "C", &prev, &next, None).unwrap();
        let change = result.get("a").unwrap();
        assert_eq!(change.reason, ChangeReason::DifferentObjects);
        assert!(change.diff.field("y").is_some());
    }

    #[test]
    fn changed_primitive_is_different_objects() {
        let result = detect(
            "t",
            "C",
            &props([("a", Value::from(1))]),
            &props([("a", Value::from(2))]),
            None,
        )
        .unwrap();
        let change = result.get("a").unwrap();
        assert_eq!(change.reason, ChangeReason::DifferentObjects);
        assert_eq!(change.diff.channel(DiagnosticChannel::Primitives).count(), 1);
    }

    #[test]
    fn one_sided_keys_are_included() {
        let prev = props([("only_prev", Value::from(1))]);
        let next = props([("only_next", Value::from(2))]);

        let result = detect("t", "C", &prev, &next, None).unwrap();
        assert_eq!(
            result.changed_keys().collect::<Vec<_>>(),
            vec!["only_prev", "only_next"]
        );
        assert!(result.get("only_prev").unwrap().next_value.ref_eq(&Value::Undefined));
        assert!(result.get("only_next").unwrap().previous_value.ref_eq(&Value::Undefined));
    }

    #[test]
    fn explicit_undefined_matches_missing_key() {
        let prev = props([("a", Value::Undefined)]);
        let next = props([]);
        assert!(detect("t", "C", &prev, &next, None).unwrap().is_empty());
    }

    #[test]
    fn signed_zero_is_not_a_change() {
        let prev = props([("a", Value::from(0.0))]);
        let next = props([("a", Value::from(-0.0))]);
        assert!(detect("t", "C", &prev, &next, None).unwrap().is_empty());
    }

    #[test]
    fn union_preserves_first_seen_order() {
        let prev = vec!["b".to_string(), "a".to_string()];
        let next = vec!["c".to_string(), "a".to_string(), "d".to_string()];
        let keys: Vec<_> = union_keys(&prev, &next).into_iter().collect();
        assert_eq!(keys, vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn absent_previous_reports_warning() {
        let prev = props([("c", Value::Undefined)]);
        let next = props([("c", Value::object([("y", Value::from(1))]))]);

        let result = detect("t", "C", &prev, &next, None).unwrap();
        let change = result.get("c").unwrap();
        assert_eq!(change.diff.channel(DiagnosticChannel::Warnings).count(), 1);
    }

    #[test]
    fn functions_report_text() {
        let prev = props([("f", Value::function("f", "() => a"))]);
        let next = props([("f", Value::function("f", "() => b"))]);

        let result = detect("t", "C", &prev, &next, None).unwrap();
        let change = result.get("f").unwrap();
        assert_eq!(change.reason, ChangeReason::DifferentObjects);
        assert!(matches!(
            &change.diff.entries()[0],
            DiffEntry::Function { previous, next } if previous == "() => a" && next == "() => b"
        ));
    }

    #[test]
    fn non_map_inputs_are_rejected() {
        let map = props([]);
        let err = detect("t", "C", &Value::Null, &map, None).unwrap_err();
        assert!(matches!(err, DetectError::InvalidInput { side: Side::Previous, .. }));

        let err = detect("t", "C", &map, &Value::from(3), None).unwrap_err();
        assert!(matches!(err, DetectError::InvalidInput { side: Side::Next, .. }));
        assert_eq!(err.to_string(), "next props must be a key-value map, got number");
    }

    #[test]
    fn comparator_overrides_verdict_only() {
        let prev = props([("a", Value::from(1))]);
        let next = props([("a", Value::from(2))]);
        let always_equal = |_: &Value, _: &Value| -> Result<bool, ComparatorError> { Ok(true) };

        let result = detect(
            "t",
            "C",
            &prev,
            &next,
            Some(&always_equal as &dyn PropsComparator),
        )
        .unwrap();
        assert!(result.props_equal);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn comparator_failure_propagates() {
        let prev = props([]);
        let failing = |_: &Value, _: &Value| -> Result<bool, ComparatorError> {
            Err("comparator exploded".into())
        };

        let err = detect(
            "t",
            "C",
            &prev,
            &prev,
            Some(&failing as &dyn PropsComparator),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "comparator exploded");
        let inner = err.into_comparator_error().unwrap();
        assert_eq!(inner.to_string(), "comparator exploded");
    }

    #[test]
    fn classification_truth_table() {
        assert_eq!(ChangeReason::classify(true, true), None);
        assert_eq!(
            ChangeReason::classify(false, false),
            Some(ChangeReason::DifferentObjects)
        );
        assert_eq!(
            ChangeReason::classify(true, false),
            Some(ChangeReason::ChangedInPlace)
        );
        assert_eq!(
            ChangeReason::classify(false, true),
            Some(ChangeReason::SameStructureNewIdentity)
        );
    }

    #[test]
    fn reason_messages() {
        assert_eq!(
            ChangeReason::SameStructureNewIdentity.to_string(),
            "same structurally, but different object identity"
        );
        assert_eq!(ChangeReason::ObjectsDiffer.message(), "objects are different");
    }

    #[test]
    fn count_by_reason() {
        let prev = props([
            ("a", Value::object::<&str, _>([])),
            ("b", Value::from(1)),
            ("c", Value::from(true)),
        ]);
        let next = props([
            ("a", Value::object::<&str, _>([])),
            ("b", Value::from(2)),
            ("c", Value::from(true)),
        ]);
        let result = detect("t", "C", &prev, &next, None).unwrap();
        assert_eq!(result.count_by_reason(ChangeReason::SameStructureNewIdentity), 1);
        assert_eq!(result.count_by_reason(ChangeReason::DifferentObjects), 1);
    }

    fn arb_leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Undefined),
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            (-5i32..5).prop_map(Value::from),
            "[a-c]{0,2}".prop_map(Value::String),
            (-3i32..3).prop_map(|n| Value::object([("n", Value::from(n))])),
        ]
    }

    fn arb_props() -> impl Strategy<Value = Value> {
        proptest::collection::vec(("[a-e]", arb_leaf()), 0..6)
            .prop_map(|pairs| Value::object(pairs))
    }

    proptest! {
        #[test]
        fn self_comparison_is_empty(p in arb_props()) {
            let result = detect("t", "C", &p, &p, None).unwrap();
            prop_assert!(result.is_empty());
        }

        #[test]
        fn detection_is_idempotent(p in arb_props(), n in arb_props()) {
            let first = detect("t", "C", &p, &n, None).unwrap();
            let second = detect("t", "C", &p, &n, None).unwrap();
            prop_assert_eq!(
                serde_json::to_value(&first).unwrap(),
                serde_json::to_value(&second).unwrap()
            );
        }

        #[test]
        fn every_change_matches_truth_table(p in arb_props(), n in arb_props()) {
            let result = detect("t", "C", &p, &n, None).unwrap();
            let (pm, nm) = (p.as_object().unwrap(), n.as_object().unwrap());
            for (key, change) in &result.changes {
                let pv = pm.get(key).unwrap_or_default();
                let nv = nm.get(key).unwrap_or_default();
                let expected = ChangeReason::classify(pv.ref_eq(&nv), pv.deep_eq(&nv));
                prop_assert_eq!(Some(change.reason), expected);
            }
            for key in union_keys(&pm.keys(), &nm.keys()) {
                let pv = pm.get(&key).unwrap_or_default();
                let nv = nm.get(&key).unwrap_or_default();
                let unchanged = pv.ref_eq(&nv) && pv.deep_eq(&nv);
                prop_assert_eq!(unchanged, result.get(&key).is_none());
            }
        }
    }
}
