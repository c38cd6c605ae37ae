//! The canonical outcome of one dispatch.

use serde::{Deserialize, Serialize};

/// Result envelope returned to the driving loop for every `act` call.
///
/// `error` is set only for recoverable failures; fatal conditions are
/// returned as `Err(ActionError)` instead and never produce an envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionResult {
    /// Signals task completion to the driving loop
    #[serde(default)]
    pub is_done: bool,
    /// Human/LLM-readable outcome
    #[serde(default)]
    pub extracted_content: Option<String>,
    /// Recoverable failure message
    #[serde(default)]
    pub error: Option<String>,
    /// Whether the content should stay in the loop's conversational memory
    #[serde(default)]
    pub include_in_memory: bool,
}

impl ActionResult {
    /// Creates an empty successful result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a result carrying content.
    #[must_use]
    pub fn content(content: impl Into<String>, include_in_memory: bool) -> Self {
        Self {
            extracted_content: Some(content.into()),
            include_in_memory,
            ..Self::default()
        }
    }

    /// Creates a terminal result.
    #[must_use]
    pub fn done(content: impl Into<String>) -> Self {
        Self {
            is_done: true,
            extracted_content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Creates a recoverable failure. Failures are always kept in memory so
    /// the loop can react to them.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            include_in_memory: true,
            ..Self::default()
        }
    }

    /// Returns true if no error was recorded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
