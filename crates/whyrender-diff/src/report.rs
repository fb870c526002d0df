//! Plain-data diff reports produced by the value differ.

use std::fmt;

use serde::Serialize;
use whyrender_value::Value;

/// The category a diff entry belongs to.
///
/// `Field` entries carry a sub-key of a composite value; the other four are
/// the reserved diagnostic channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticChannel {
    Field,
    Warnings,
    Functions,
    Primitives,
    Errors,
}

impl fmt::Display for DiagnosticChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticChannel::Field => "field",
            DiagnosticChannel::Warnings => "warnings",
            DiagnosticChannel::Functions => "functions",
            DiagnosticChannel::Primitives => "primitives",
            DiagnosticChannel::Errors => "errors",
        };
        f.write_str(name)
    }
}

/// How one side of a warning was rendered.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "form", content = "value", rename_all = "snake_case")]
pub enum Rendered {
    /// Function text.
    Source(String),
    /// Strict JSON text.
    Json(String),
    /// The value itself, when no string form could be produced.
    Raw(Value),
}

impl Rendered {
    /// Text suitable for display.
    pub fn display(&self) -> String {
        match self {
            Rendered::Source(text) | Rendered::Json(text) => text.clone(),
            Rendered::Raw(value) => value.inspect(),
        }
    }
}

/// One finding of the value differ.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "channel", rename_all = "snake_case")]
pub enum DiffEntry {
    /// A sub-key of two composites whose values differ.
    Field {
        key: String,
        previous: String,
        next: String,
    },
    /// Something could not be rendered or compared in full.
    #[serde(rename = "warnings")]
    Warning {
        key: Option<String>,
        message: String,
        previous: Rendered,
        next: Rendered,
    },
    /// Two distinct callables, shown as text.
    #[serde(rename = "functions")]
    Function { previous: String, next: String },
    /// Two primitives of the same kind.
    #[serde(rename = "primitives")]
    Primitive { previous: String, next: String },
    /// Values of different kinds.
    #[serde(rename = "errors")]
    TypeMismatch {
        message: String,
        previous: Value,
        next: Value,
    },
}

impl DiffEntry {
    pub fn channel(&self) -> DiagnosticChannel {
        match self {
            DiffEntry::Field { .. } => DiagnosticChannel::Field,
            DiffEntry::Warning { .. } => DiagnosticChannel::Warnings,
            DiffEntry::Function { .. } => DiagnosticChannel::Functions,
            DiffEntry::Primitive { .. } => DiagnosticChannel::Primitives,
            DiffEntry::TypeMismatch { .. } => DiagnosticChannel::Errors,
        }
    }

    /// The sub-key this entry refers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            DiffEntry::Field { key, .. } => Some(key),
            DiffEntry::Warning { key, .. } => key.as_deref(),
            _ => None,
        }
    }
}

/// Ordered findings for one pair of values.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct DiffReport {
    entries: Vec<DiffEntry>,
}

impl DiffReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A report holding a single entry.
    pub fn single(entry: DiffEntry) -> Self {
        Self {
            entries: vec![entry],
        }
    }

    pub fn push(&mut self, entry: DiffEntry) {
        self.entries.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[DiffEntry] {
        &self.entries
    }

    /// Entries in the given channel, in report order.
    pub fn channel(&self, channel: DiagnosticChannel) -> impl Iterator<Item = &DiffEntry> {
        self.entries.iter().filter(move |e| e.channel() == channel)
    }

    /// The entry for a composite sub-key, whether a field diff or a warning.
    pub fn field(&self, key: &str) -> Option<&DiffEntry> {
        self.entries.iter().find(|e| e.key() == Some(key))
    }
}

impl<'a> IntoIterator for &'a DiffReport {
    type Item = &'a DiffEntry;
    type IntoIter = std::slice::Iter<'a, DiffEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
