//! Parameter binding.
//!
//! Binding turns a raw payload into the exact arguments a handler gets:
//! validated parameters plus the resources its action declared. Nothing is
//! looked up by inspecting the handler.

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::any::Any;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use crate::action::ActionSpec;
use crate::context::{Context, ResourceKey};
use crate::error::ActionError;
use crate::schema::ValidationPolicy;
use crate::session::{BrowserSession, ExtractionModel};

fn secret_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"<secret>(.*?)</secret>").expect("secret placeholder pattern is valid")
    })
}

/// Validates payloads and assembles handler arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterBinder {
    policy: ValidationPolicy,
}

impl ParameterBinder {
    /// Creates a binder with the given validation policy.
    #[must_use]
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    /// The policy applied to every payload.
    #[must_use]
    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Binds one payload for `spec`.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error if the payload does not match the
    /// parameter schema, or `MissingDependency` if the context lacks a
    /// declared resource. The handler must not run in either case.
    pub fn bind(
        &self,
        spec: &ActionSpec,
        payload: &Value,
        ctx: &Context,
    ) -> Result<BoundArgs, ActionError> {
        let mut params = spec
            .parameters()
            .validate(payload, &self.policy)
            .map_err(|violation| ActionError::validation(spec.name(), violation.to_string()))?;

        for key in spec.required_resources() {
            if !ctx.has(*key) {
                return Err(ActionError::missing_dependency(spec.name(), key.as_str()));
            }
        }

        let mut has_sensitive_data = false;
        if let Some(secrets) = ctx.sensitive_data() {
            for value in params.values_mut() {
                has_sensitive_data |= replace_secrets(value, secrets);
            }
        }

        let declared = |key: ResourceKey| spec.required_resources().contains(&key);
        Ok(BoundArgs {
            action: spec.name().to_string(),
            params,
            has_sensitive_data,
            session: ctx.session().filter(|_| declared(ResourceKey::Session)).cloned(),
            page_extraction_llm: ctx
                .page_extraction_llm()
                .filter(|_| declared(ResourceKey::PageExtractionLlm))
                .cloned(),
            sensitive_data: ctx
                .sensitive_data()
                .filter(|_| declared(ResourceKey::SensitiveData))
                .cloned(),
            available_file_paths: ctx
                .available_file_paths()
                .filter(|_| declared(ResourceKey::AvailableFilePaths))
                .cloned(),
            state: ctx.state().filter(|_| declared(ResourceKey::State)).cloned(),
        })
    }
}

/// Replaces `<secret>name</secret>` placeholders in every string under
/// `value`. Unknown names are left untouched. Returns true if anything was
/// replaced.
fn replace_secrets(value: &mut Value, secrets: &HashMap<String, String>) -> bool {
    match value {
        Value::String(text) => {
            let mut replaced = false;
            let substituted = secret_pattern().replace_all(text, |caps: &regex::Captures<'_>| {
                match secrets.get(&caps[1]) {
                    Some(secret) => {
                        replaced = true;
                        secret.clone()
                    }
                    None => caps[0].to_string(),
                }
            });
            if replaced {
                *text = substituted.into_owned();
            }
            replaced
        }
        Value::Array(items) => items
            .iter_mut()
            .fold(false, |acc, item| replace_secrets(item, secrets) | acc),
        Value::Object(map) => map
            .values_mut()
            .fold(false, |acc, item| replace_secrets(item, secrets) | acc),
        _ => false,
    }
}

/// The arguments one handler invocation receives.
///
/// Only resources the action declared are present; asking for any other
/// resource is reported as a missing dependency.
#[derive(Clone)]
pub struct BoundArgs {
    action: String,
    params: Map<String, Value>,
    has_sensitive_data: bool,
    session: Option<Arc<dyn BrowserSession>>,
    page_extraction_llm: Option<Arc<dyn ExtractionModel>>,
    sensitive_data: Option<Arc<HashMap<String, String>>>,
    available_file_paths: Option<Arc<Vec<PathBuf>>>,
    state: Option<Arc<dyn Any + Send + Sync>>,
}

impl BoundArgs {
    /// Name of the action being invoked.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Validated parameters, with defaults filled in and secrets substituted.
    #[must_use]
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// A single parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// A string parameter.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error if the field is absent or not a string.
    pub fn str_param(&self, name: &str) -> Result<&str, ActionError> {
        self.params
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ActionError::validation(&self.action, format!("field '{name}' must be a string"))
            })
    }

    /// Deserializes all parameters into a typed struct.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error if the parameters do not fit `T`.
    pub fn params_as<T: DeserializeOwned>(&self) -> Result<T, ActionError> {
        serde_json::from_value(Value::Object(self.params.clone()))
            .map_err(|e| ActionError::validation(&self.action, e.to_string()))
    }

    /// Whether a secret placeholder was substituted into the parameters.
    #[must_use]
    pub fn has_sensitive_data(&self) -> bool {
        self.has_sensitive_data
    }

    /// The browser session.
    ///
    /// # Errors
    ///
    /// Returns `MissingDependency` unless the action declared `Session`.
    pub fn session(&self) -> Result<&Arc<dyn BrowserSession>, ActionError> {
        self.session
            .as_ref()
            .ok_or_else(|| self.missing(ResourceKey::Session))
    }

    /// The content-extraction model.
    ///
    /// # Errors
    ///
    /// Returns `MissingDependency` unless the action declared `PageExtractionLlm`.
    pub fn page_extraction_llm(&self) -> Result<&Arc<dyn ExtractionModel>, ActionError> {
        self.page_extraction_llm
            .as_ref()
            .ok_or_else(|| self.missing(ResourceKey::PageExtractionLlm))
    }

    /// The secret placeholder map.
    ///
    /// # Errors
    ///
    /// Returns `MissingDependency` unless the action declared `SensitiveData`.
    pub fn sensitive_data(&self) -> Result<&HashMap<String, String>, ActionError> {
        self.sensitive_data
            .as_deref()
            .ok_or_else(|| self.missing(ResourceKey::SensitiveData))
    }

    /// The files the action may upload.
    ///
    /// # Errors
    ///
    /// Returns `MissingDependency` unless the action declared `AvailableFilePaths`.
    pub fn available_file_paths(&self) -> Result<&[PathBuf], ActionError> {
        self.available_file_paths
            .as_deref()
            .map(Vec::as_slice)
            .ok_or_else(|| self.missing(ResourceKey::AvailableFilePaths))
    }

    /// The caller state, downcast to `T`.
    ///
    /// # Errors
    ///
    /// Returns `MissingDependency` unless the action declared `State`, or a
    /// handler failure if the state is not a `T`.
    pub fn state<T>(&self) -> Result<Arc<T>, ActionError>
    where
        T: Any + Send + Sync,
    {
        let state = self
            .state
            .clone()
            .ok_or_else(|| self.missing(ResourceKey::State))?;
        state.downcast::<T>().map_err(|_| {
            ActionError::handler_failed(format!(
                "state for action '{}' is not a {}",
                self.action,
                std::any::type_name::<T>()
            ))
        })
    }

    fn missing(&self, key: ResourceKey) -> ActionError {
        ActionError::missing_dependency(&self.action, key.as_str())
    }
}

impl std::fmt::Debug for BoundArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundArgs")
            .field("action", &self.action)
            .field("param_names", &self.params.keys().collect::<Vec<_>>())
            .field("has_sensitive_data", &self.has_sensitive_data)
            .field("session", &self.session.is_some())
            .field("page_extraction_llm", &self.page_extraction_llm.is_some())
            .field("available_file_paths", &self.available_file_paths)
            .field("state", &self.state.is_some())
            .finish_non_exhaustive()
    }
}
