//! Reporting for whyrender.
//!
//! Turns a [`ComparisonResult`] into text or JSON for people to read, and
//! provides [`adapt_comparator`], a drop-in equality hook for memoized
//! components that logs why a render happened.

pub mod adapt;
pub mod config;
pub mod error;
pub mod render;

pub use adapt::{adapt_comparator, adapt_comparator_with};
pub use config::{ReportConfig, ReportFormat};
pub use error::{ReportError, ReportResult};
pub use render::{render_text, report_diagnostics};

pub use whyrender_diff::ComparisonResult;
