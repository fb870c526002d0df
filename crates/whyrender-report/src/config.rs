use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// How comparison results are labelled and rendered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Prefix for every text line.
    pub tag: String,
    /// Component name used when a result carries none.
    pub display_name: String,
    pub format: ReportFormat,
    pub color: bool,
    /// Print the raw previous and next values of each changed attribute.
    pub show_values: bool,
    /// Lines of context around changed lines of function source.
    pub source_context: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            tag: "[whyrender]".to_string(),
            display_name: "Component".to_string(),
            format: ReportFormat::Text,
            color: true,
            show_values: true,
            source_context: 2,
        }
    }
}

impl ReportConfig {
    pub fn from_toml_str(text: &str) -> ReportResult<Self> {
        toml::from_str(text).map_err(|e| ReportError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> ReportResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ReportError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }
}
