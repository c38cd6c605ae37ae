//! Configuration types.

use serde::{Deserialize, Serialize};

use crate::error::ActionError;
use crate::logging::LoggingConfig;
use crate::schema::ValidationPolicy;

/// Top-level configuration for a controller.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActionsConfig {
    /// Action names hidden from schema export and dispatch
    pub exclude_actions: Vec<String>,
    /// How parameter payloads are validated
    pub validation: ValidationPolicy,
    /// Subscriber settings
    pub logging: LoggingConfig,
}

impl ActionsConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds names to the exclusion list.
    #[must_use]
    pub fn with_excluded<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_actions.extend(names.into_iter().map(Into::into));
        self
    }

    /// Sets the validation policy.
    #[must_use]
    pub fn with_validation(mut self, policy: ValidationPolicy) -> Self {
        self.validation = policy;
        self
    }

    /// Checks values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error for blank exclusion entries.
    pub fn validate(&self) -> Result<(), ActionError> {
        if let Some(pos) = self.exclude_actions.iter().position(|n| n.trim().is_empty()) {
            return Err(ActionError::configuration(
                "exclude_actions",
                format!("entry {pos} is blank"),
            ));
        }
        Ok(())
    }
}
