//! Schema export for the reasoning engine.
//!
//! `ActionSchema` is the discriminated union of every visible action: one
//! variant per action, keyed by its name. It is computed on demand from the
//! registry and never cached.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Function-calling definition of one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The name of the action
    pub name: String,
    /// Description of what the action does
    pub description: String,
    /// JSON Schema for the action's parameters
    pub input_schema: Value,
}

/// One case of the action union.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionVariant {
    /// Action name, also the discriminating key
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON Schema of the parameters
    pub parameters: Value,
}

/// Discriminated union of all visible actions, in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionSchema {
    variants: Vec<ActionVariant>,
}

impl ActionSchema {
    /// Creates a schema from already-ordered variants.
    #[must_use]
    pub fn new(variants: Vec<ActionVariant>) -> Self {
        Self { variants }
    }

    /// The union cases.
    #[must_use]
    pub fn variants(&self) -> &[ActionVariant] {
        &self.variants
    }

    /// Names of all cases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|v| v.name.as_str())
    }

    /// Returns true if the named action is part of the union.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.variants.iter().any(|v| v.name == name)
    }

    /// Number of cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Returns true if no action is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Renders the union as a JSON Schema for structured output.
    ///
    /// Each case is an object with exactly one property, the action name,
    /// whose value is that action's parameter object.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let cases: Vec<Value> = self
            .variants
            .iter()
            .map(|variant| {
                json!({
                    "type": "object",
                    "title": variant.name,
                    "description": variant.description,
                    "properties": { variant.name.clone(): variant.parameters },
                    "required": [variant.name],
                    "additionalProperties": false
                })
            })
            .collect();

        json!({
            "title": "ActionRequest",
            "description": "Exactly one action to execute in this step",
            "type": "object",
            "oneOf": cases
        })
    }

    /// Renders one function-calling definition per action.
    #[must_use]
    pub fn to_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.variants
            .iter()
            .map(|variant| ToolDefinition {
                name: variant.name.clone(),
                description: variant.description.clone(),
                input_schema: variant.parameters.clone(),
            })
            .collect()
    }

    /// Renders a plain-text listing for a system prompt.
    ///
    /// One line pair per action: `description: ` followed by
    /// `{name: {properties}}`.
    #[must_use]
    pub fn prompt_description(&self) -> String {
        self.variants
            .iter()
            .map(|variant| {
                let properties = variant
                    .parameters
                    .get("properties")
                    .cloned()
                    .unwrap_or_else(|| json!({}));
                format!("{}: \n{{{}: {}}}", variant.description, variant.name, properties)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
