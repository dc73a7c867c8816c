//! Print job types

use serde::Deserialize;

/// A receipt print request
///
/// Immutable once submitted; `timestamp` is whatever the caller supplies
/// (the server never stamps jobs itself).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintJob {
    /// Main payload, printed large and bold
    pub text: String,
    /// Optional message block above the payload
    #[serde(default)]
    pub custom_text: Option<String>,
    /// Optional caller-supplied timestamp line
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl PrintJob {
    /// A job carrying only the main payload
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            custom_text: None,
            timestamp: None,
        }
    }
}
