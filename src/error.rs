//! Error types for action registration and dispatch.
//!
//! Errors split into two groups. Setup and contract violations
//! (duplicate or unknown actions, malformed handler results, bad
//! configuration) are fatal and returned as `Err` to the caller. Everything
//! else is recoverable and ends up in `ActionResult::error` so the driving
//! loop can keep going.
//!
//! No external error crates (anyhow, thiserror, eyre) are used.

use crate::types::DispatchId;
use std::fmt;

/// Errors that can occur while registering or dispatching actions.
///
/// The kind is boxed to keep `Result<_, ActionError>` small.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionError {
    /// Dispatch that produced the error, when known
    pub correlation_id: Option<DispatchId>,
    kind: Box<ActionErrorKind>,
}

/// Specific action error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionErrorKind {
    /// An action with the same name is already registered
    DuplicateAction {
        /// The conflicting action name
        action: String,
    },
    /// The requested action is not registered or has been excluded
    UnknownAction {
        /// The requested action name
        action: String,
        /// Closest visible action name, if any is similar
        suggestion: Option<String>,
    },
    /// The request or its parameters failed validation
    Validation {
        /// The action being validated, if the request named one
        action: Option<String>,
        /// What was invalid
        reason: String,
    },
    /// The context does not provide a resource the action declared
    MissingDependency {
        /// The action that declared the resource
        action: String,
        /// The missing resource key
        resource: String,
    },
    /// The handler failed while running
    HandlerFailed {
        /// The failure message reported by the handler
        reason: String,
    },
    /// The handler returned a value that is not text, an envelope, or nothing
    InvalidHandlerResult {
        /// The action whose handler misbehaved
        action: String,
        /// Short description of what was returned
        found: String,
    },
    /// Configuration could not be loaded or applied
    Configuration {
        /// The field or source that was invalid
        field: String,
        /// Why it was invalid
        reason: String,
    },
}

impl ActionError {
    /// Creates a new ActionError with the given kind.
    #[must_use]
    pub fn new(kind: ActionErrorKind) -> Self {
        Self {
            correlation_id: None,
            kind: Box::new(kind),
        }
    }

    /// Attaches the dispatch id this error belongs to.
    #[must_use]
    pub fn with_correlation(mut self, correlation_id: DispatchId) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Returns a reference to the error kind.
    #[must_use]
    pub fn kind(&self) -> &ActionErrorKind {
        &self.kind
    }

    /// Creates a duplicate action error.
    #[must_use]
    pub fn duplicate_action(action: impl Into<String>) -> Self {
        Self::new(ActionErrorKind::DuplicateAction {
            action: action.into(),
        })
    }

    /// Creates an unknown action error.
    #[must_use]
    pub fn unknown_action(action: impl Into<String>, suggestion: Option<String>) -> Self {
        Self::new(ActionErrorKind::UnknownAction {
            action: action.into(),
            suggestion,
        })
    }

    /// Creates a parameter validation error for a named action.
    #[must_use]
    pub fn validation(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ActionErrorKind::Validation {
            action: Some(action.into()),
            reason: reason.into(),
        })
    }

    /// Creates a request-shape validation error that is not tied to one action.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::new(ActionErrorKind::Validation {
            action: None,
            reason: reason.into(),
        })
    }

    /// Creates a missing dependency error.
    #[must_use]
    pub fn missing_dependency(action: impl Into<String>, resource: impl Into<String>) -> Self {
        Self::new(ActionErrorKind::MissingDependency {
            action: action.into(),
            resource: resource.into(),
        })
    }

    /// Creates a handler failure.
    #[must_use]
    pub fn handler_failed(reason: impl Into<String>) -> Self {
        Self::new(ActionErrorKind::HandlerFailed {
            reason: reason.into(),
        })
    }

    /// Creates an invalid handler result error.
    #[must_use]
    pub fn invalid_handler_result(action: impl Into<String>, found: impl Into<String>) -> Self {
        Self::new(ActionErrorKind::InvalidHandlerResult {
            action: action.into(),
            found: found.into(),
        })
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ActionErrorKind::Configuration {
            field: field.into(),
            reason: reason.into(),
        })
    }

    /// Returns true if this error must stop the calling flow.
    ///
    /// Fatal errors are never folded into an `ActionResult`.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            *self.kind,
            ActionErrorKind::DuplicateAction { .. }
                | ActionErrorKind::UnknownAction { .. }
                | ActionErrorKind::InvalidHandlerResult { .. }
                | ActionErrorKind::Configuration { .. }
        )
    }

    /// Returns true if this is a duplicate registration.
    #[must_use]
    pub fn is_duplicate_action(&self) -> bool {
        matches!(*self.kind, ActionErrorKind::DuplicateAction { .. })
    }

    /// Returns true if the action was not found.
    #[must_use]
    pub fn is_unknown_action(&self) -> bool {
        matches!(*self.kind, ActionErrorKind::UnknownAction { .. })
    }

    /// Returns true if this is a validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(*self.kind, ActionErrorKind::Validation { .. })
    }

    /// Returns true if a required resource was missing.
    #[must_use]
    pub fn is_missing_dependency(&self) -> bool {
        matches!(*self.kind, ActionErrorKind::MissingDependency { .. })
    }

    /// Returns true if the handler returned an unsupported result.
    #[must_use]
    pub fn is_invalid_handler_result(&self) -> bool {
        matches!(*self.kind, ActionErrorKind::InvalidHandlerResult { .. })
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(*self.kind, ActionErrorKind::Configuration { .. })
    }

    /// The text placed in `ActionResult::error` for a recoverable failure.
    ///
    /// Handler failures keep the handler's own message verbatim; every other
    /// kind uses its display form without the correlation prefix.
    #[must_use]
    pub fn envelope_message(&self) -> String {
        match self.kind.as_ref() {
            ActionErrorKind::HandlerFailed { reason } => reason.clone(),
            kind => KindDisplay(kind).to_string(),
        }
    }
}

struct KindDisplay<'a>(&'a ActionErrorKind);

impl fmt::Display for KindDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            ActionErrorKind::DuplicateAction { action } => {
                write!(
                    f,
                    "action '{}' is already registered; choose a different name or exclude the existing action",
                    action
                )
            }
            ActionErrorKind::UnknownAction { action, suggestion } => {
                write!(
                    f,
                    "action '{}' is not registered; the exported schema and the dispatch table disagree",
                    action
                )?;
                if let Some(suggestion) = suggestion {
                    write!(f, " (did you mean '{}'?)", suggestion)?;
                }
                Ok(())
            }
            ActionErrorKind::Validation {
                action: Some(action),
                reason,
            } => {
                write!(f, "invalid parameters for action '{}': {}", action, reason)
            }
            ActionErrorKind::Validation {
                action: None,
                reason,
            } => {
                write!(f, "invalid action request: {}", reason)
            }
            ActionErrorKind::MissingDependency { action, resource } => {
                write!(
                    f,
                    "action '{}' requires resource '{}' but the context does not provide it",
                    action, resource
                )
            }
            ActionErrorKind::HandlerFailed { reason } => {
                write!(f, "action failed: {}", reason)
            }
            ActionErrorKind::InvalidHandlerResult { action, found } => {
                write!(
                    f,
                    "action '{}' returned an unsupported result ({}); handlers must return text, an ActionResult, or nothing",
                    action, found
                )
            }
            ActionErrorKind::Configuration { field, reason } => {
                write!(f, "invalid configuration for '{}': {}", field, reason)
            }
        }
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref corr_id) = self.correlation_id {
            write!(f, "[{}] ", corr_id)?;
        }
        write!(f, "{}", KindDisplay(&self.kind))
    }
}

impl std::error::Error for ActionError {}
