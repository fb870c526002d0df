//! Change detection engine for whyrender.
//!
//! Given the previous and next attribute maps of a rendered component,
//! finds the attributes that changed, classifies why, and explains the
//! difference one level deep.
//!
//! # Key Types
//!
//! - [`detect`] / [`ComparisonResult`] -- Per-key change detection with a verdict
//! - [`ChangeDescriptor`] / [`ChangeReason`] -- One changed attribute and its cause
//! - [`diff_values`] / [`DiffReport`] / [`DiffEntry`] -- Value-level diff findings
//! - [`diff_sources`] / [`SourceDiff`] -- Line diff of function source text

pub mod detect;
pub mod error;
pub mod report;
pub mod source_diff;
pub mod value_diff;

pub use detect::{
    detect, detect_changes, union_keys, ChangeDescriptor, ChangeReason, ComparisonResult,
    PropsComparator,
};
pub use error::{ComparatorError, DetectError, DetectResult, Side};
pub use report::{DiagnosticChannel, DiffEntry, DiffReport, Rendered};
pub use source_diff::{diff_sources, SourceDiff, SourceHunk, SourceLine};
pub use value_diff::{diff_values, ValuePair};
