//! Immutable action metadata.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::action::handler::ActionHandler;
use crate::context::ResourceKey;
use crate::error::ActionError;
use crate::schema::{ActionVariant, ParamSchema};

/// Longest name accepted by common function-calling APIs.
const MAX_NAME_LEN: usize = 64;

/// Everything the registry knows about one action.
///
/// # Example
///
/// ```rust
/// use acton_actions::action::{handler_fn, ActionSpec, HandlerOutput};
/// use acton_actions::context::ResourceKey;
/// use acton_actions::schema::{ParamSchema, ParamType};
///
/// let spec = ActionSpec::new(
///     "search_web",
///     "Search the web with a custom engine",
///     handler_fn(|args| async move {
///         let query = args.str_param("query")?;
///         Ok(HandlerOutput::Text(format!("results for {query}")))
///     }),
/// )
/// .with_params(ParamSchema::new().required("query", ParamType::String))
/// .requires(ResourceKey::Session);
///
/// assert_eq!(spec.name(), "search_web");
/// ```
#[derive(Clone)]
pub struct ActionSpec {
    name: String,
    description: String,
    parameters: ParamSchema,
    required_resources: BTreeSet<ResourceKey>,
    handler: Arc<dyn ActionHandler>,
}

impl ActionSpec {
    /// Creates a spec with no parameters and no resource needs.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl ActionHandler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: ParamSchema::new(),
            required_resources: BTreeSet::new(),
            handler: Arc::new(handler),
        }
    }

    /// Sets the parameter schema.
    #[must_use]
    pub fn with_params(mut self, parameters: ParamSchema) -> Self {
        self.parameters = parameters;
        self
    }

    /// Declares a resource the handler needs from the context.
    #[must_use]
    pub fn requires(mut self, resource: ResourceKey) -> Self {
        self.required_resources.insert(resource);
        self
    }

    /// Declares several resources at once.
    #[must_use]
    pub fn requires_all<I>(mut self, resources: I) -> Self
    where
        I: IntoIterator<Item = ResourceKey>,
    {
        self.required_resources.extend(resources);
        self
    }

    /// Globally unique action name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description used for schema export.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Parameter schema.
    #[must_use]
    pub fn parameters(&self) -> &ParamSchema {
        &self.parameters
    }

    /// Declared resource needs, in key order.
    #[must_use]
    pub fn required_resources(&self) -> &BTreeSet<ResourceKey> {
        &self.required_resources
    }

    pub(crate) fn handler(&self) -> Arc<dyn ActionHandler> {
        Arc::clone(&self.handler)
    }

    /// Checks the name is usable as a union key and a function name.
    pub(crate) fn validate_name(&self) -> Result<(), ActionError> {
        if self.name.is_empty() {
            return Err(ActionError::configuration("name", "action names cannot be empty"));
        }
        if self.name.len() > MAX_NAME_LEN {
            return Err(ActionError::configuration(
                "name",
                format!(
                    "action name '{}' is longer than {MAX_NAME_LEN} characters",
                    self.name
                ),
            ));
        }
        if let Some(bad) = self
            .name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(ActionError::configuration(
                "name",
                format!(
                    "action name '{}' contains '{bad}'; use letters, digits, '_' or '-'",
                    self.name
                ),
            ));
        }
        Ok(())
    }

    /// The union case this action contributes to the exported schema.
    #[must_use]
    pub fn to_variant(&self) -> ActionVariant {
        ActionVariant {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.parameters.to_json_schema(),
        }
    }
}

impl fmt::Debug for ActionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionSpec")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("required_resources", &self.required_resources)
            .finish_non_exhaustive()
    }
}
