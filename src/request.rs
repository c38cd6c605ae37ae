//! The action choice produced by the reasoning engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ActionError;

/// A sparse record naming the action to run.
///
/// Each key is an action name and its value the parameters. `null` fields
/// count as absent. Exactly one populated field is expected per step.
///
/// # Example
///
/// ```rust
/// use acton_actions::request::ActionRequest;
/// use serde_json::json;
///
/// let request = ActionRequest::from_value(json!({
///     "go_to_url": {"url": "https://example.com"},
///     "click_element": null
/// }))
/// .unwrap();
///
/// let (name, params) = request.single().unwrap();
/// assert_eq!(name, "go_to_url");
/// assert_eq!(params["url"], "https://example.com");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionRequest {
    fields: Map<String, Value>,
}

impl ActionRequest {
    /// Creates a request for one action.
    #[must_use]
    pub fn new(action: impl Into<String>, params: Value) -> Self {
        let mut fields = Map::new();
        fields.insert(action.into(), params);
        Self { fields }
    }

    /// Adds another field. Only useful to build malformed requests in tests
    /// or to replay raw engine output.
    #[must_use]
    pub fn with(mut self, action: impl Into<String>, params: Value) -> Self {
        self.fields.insert(action.into(), params);
        self
    }

    /// Parses a request from an arbitrary JSON value.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error if the value is not an object.
    pub fn from_value(value: Value) -> Result<Self, ActionError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ActionError::invalid_request(format!(
                "expected an object keyed by action name, got {}",
                json_type(&other)
            ))),
        }
    }

    /// Parses a request from JSON text.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error if the text is not a JSON object.
    pub fn from_json(text: &str) -> Result<Self, ActionError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ActionError::invalid_request(format!("malformed JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Populated fields, in the order the engine emitted them.
    pub fn populated(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .filter(|(_, params)| !params.is_null())
            .map(|(name, params)| (name.as_str(), params))
    }

    /// The one populated field.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error when no field or more than one field is
    /// populated. An ambiguous request is never resolved by picking one.
    pub fn single(&self) -> Result<(&str, &Value), ActionError> {
        let mut populated = self.populated();
        let Some(first) = populated.next() else {
            return Err(ActionError::invalid_request(
                "no action is populated; set exactly one action field",
            ));
        };
        if populated.next().is_none() {
            return Ok(first);
        }

        let names: Vec<&str> = self.populated().map(|(name, _)| name).collect();
        Err(ActionError::invalid_request(format!(
            "{} actions are populated ({}); exactly one action may run per step",
            names.len(),
            names.join(", ")
        )))
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
