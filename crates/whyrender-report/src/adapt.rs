//! Drop-in equality hook for memoized components.

use tracing::{debug, warn};
use whyrender_diff::{detect, ComparisonResult};
use whyrender_value::Value;

use crate::config::ReportConfig;

/// Equality hook that explains itself.
///
/// Runs change detection on the two attribute maps, logs each changed
/// attribute at debug level, and returns whether the two maps are the very
/// same object. Inputs that are not maps are logged and compared the same
/// way.
pub fn adapt_comparator(previous: &Value, next: &Value) -> bool {
    adapt_comparator_with(&ReportConfig::default(), previous, next)
}

/// [`adapt_comparator`] with explicit labels.
pub fn adapt_comparator_with(config: &ReportConfig, previous: &Value, next: &Value) -> bool {
    match detect(&config.tag, &config.display_name, previous, next, None) {
        Ok(result) => log_result(&result),
        Err(e) => warn!(
            tag = %config.tag,
            component = %config.display_name,
            error = %e,
            "skipping render diagnostics"
        ),
    }
    previous.ref_eq(next)
}

fn log_result(result: &ComparisonResult) {
    debug!(
        tag = %result.tag,
        component = %result.display_name,
        props_equal = result.props_equal,
        changed = result.len(),
        "render check"
    );
    for (key, change) in &result.changes {
        debug!(
            tag = %result.tag,
            component = %result.display_name,
            prop = %key,
            reason = change.reason.message(),
            previous = %change.previous_value,
            next = %change.next_value,
            findings = change.diff.len(),
            "prop changed"
        );
    }
}
