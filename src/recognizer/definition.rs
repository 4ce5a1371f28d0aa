use crate::error::{LaunchError, Result};
use crate::recognizer::{FilteredRecognizer, Recognizer};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One recognizer as declared in a TOML table
///
/// # Example TOML
/// ```toml
/// [[recognizer]]
/// identifiers = ["default", "qt.qpa.wayland"]
/// name = "app"
/// pattern = '^Using Wayland-EGL$'
/// ```
///
/// Without `pattern` the recognizer is unconditional. Several identifiers
/// in one table share a single recognizer, including its seen keys.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct RecognizerDefinition {
    /// Identifiers routed to this recognizer (ignored for fallbacks)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,

    /// Record name; defaults to the line's identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Secondary pattern matched from the start of the reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl RecognizerDefinition {
    /// Compile into a live recognizer; `label` names it in errors
    pub fn build(&self, label: &str) -> Result<Recognizer> {
        let Some(pattern) = &self.pattern else {
            return Ok(Recognizer::unconditional(self.name.clone()));
        };

        // Anchor at the start only; the pattern need not consume the reason
        let anchored = format!("^(?:{})", pattern);
        let regex = Regex::new(&anchored).map_err(|source| LaunchError::Pattern {
            label: label.to_string(),
            source,
        })?;

        Ok(Recognizer::Filtered(FilteredRecognizer::new(
            self.name.clone(),
            regex,
        )))
    }
}

/// Full recognizer table: identifier-keyed entries plus the fallback chain
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RecognizerTable {
    #[serde(default)]
    pub recognizer: Vec<RecognizerDefinition>,

    /// Tried in order for lines without an identifier
    #[serde(default)]
    pub fallback: Vec<RecognizerDefinition>,
}
