//! Typed parameter shapes for actions.
//!
//! A `ParamSchema` is an ordered list of named fields. It is the single
//! source for both validation of incoming payloads and the JSON Schema the
//! reasoning engine sees.

use serde_json::{json, Map, Value};

/// The type of a single parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamType {
    /// A JSON string
    String,
    /// A whole number (fits in `i64`)
    Integer,
    /// Any finite number
    Number,
    /// `true` or `false`
    Boolean,
    /// A homogeneous list
    Array(Box<ParamType>),
    /// A nested object with its own fields
    Object(ParamSchema),
    /// One of a fixed set of strings
    Enum(Vec<String>),
    /// Any JSON value, unchecked
    Any,
}

impl ParamType {
    /// Creates an array type with the given item type.
    #[must_use]
    pub fn array(items: ParamType) -> Self {
        Self::Array(Box::new(items))
    }

    /// Creates a nested object type.
    #[must_use]
    pub fn object(schema: ParamSchema) -> Self {
        Self::Object(schema)
    }

    /// Creates a string enumeration.
    #[must_use]
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(values.into_iter().map(Into::into).collect())
    }

    /// Short name used in validation messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Enum(_) => "enum",
            Self::Any => "any",
        }
    }

    /// Renders the type as a JSON Schema fragment.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        match self {
            Self::String => json!({"type": "string"}),
            Self::Integer => json!({"type": "integer"}),
            Self::Number => json!({"type": "number"}),
            Self::Boolean => json!({"type": "boolean"}),
            Self::Array(items) => json!({"type": "array", "items": items.to_json_schema()}),
            Self::Object(schema) => schema.to_json_schema(),
            Self::Enum(values) => json!({"type": "string", "enum": values}),
            Self::Any => json!({}),
        }
    }
}

/// A single named parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamField {
    /// Field name as it appears in the payload
    pub name: String,
    /// Expected type
    pub ty: ParamType,
    /// Whether the field must be present and non-null
    pub required: bool,
    /// Description shown to the reasoning engine
    pub description: Option<String>,
    /// Value used when an optional field is absent
    pub default: Option<Value>,
    /// Inclusive lower bound for numeric fields
    pub minimum: Option<i64>,
    /// Inclusive upper bound for numeric fields
    pub maximum: Option<i64>,
}

impl ParamField {
    /// Creates a required field.
    #[must_use]
    pub fn required(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            description: None,
            default: None,
            minimum: None,
            maximum: None,
        }
    }

    /// Creates an optional field.
    #[must_use]
    pub fn optional(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            required: false,
            ..Self::required(name, ty)
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the default used when the field is absent.
    ///
    /// Only meaningful for optional fields.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Sets the inclusive lower bound of a numeric field.
    #[must_use]
    pub fn with_minimum(mut self, minimum: i64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    /// Sets the inclusive upper bound of a numeric field.
    #[must_use]
    pub fn with_maximum(mut self, maximum: i64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    fn to_json_schema(&self) -> Value {
        let mut schema = self.ty.to_json_schema();
        if let Value::Object(ref mut map) = schema {
            if let Some(minimum) = self.minimum {
                map.insert("minimum".to_string(), json!(minimum));
            }
            if let Some(maximum) = self.maximum {
                map.insert("maximum".to_string(), json!(maximum));
            }
            if let Some(ref description) = self.description {
                map.insert("description".to_string(), json!(description));
            }
            if let Some(ref default) = self.default {
                map.insert("default".to_string(), default.clone());
            }
        }
        schema
    }
}

/// The parameter shape of one action.
///
/// Fields keep their declaration order, which is also the order of the
/// exported JSON Schema properties.
///
/// # Example
///
/// ```rust
/// use acton_actions::schema::{ParamSchema, ParamType};
///
/// let schema = ParamSchema::new()
///     .required("index", ParamType::Integer)
///     .required("text", ParamType::String);
///
/// assert_eq!(schema.len(), 2);
/// assert!(schema.get("text").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSchema {
    fields: Vec<ParamField>,
}

impl ParamSchema {
    /// Creates a schema with no fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field. A later field with the same name replaces the earlier one.
    #[must_use]
    pub fn field(mut self, field: ParamField) -> Self {
        self.fields.retain(|existing| existing.name != field.name);
        self.fields.push(field);
        self
    }

    /// Adds a required field.
    #[must_use]
    pub fn required(self, name: impl Into<String>, ty: ParamType) -> Self {
        self.field(ParamField::required(name, ty))
    }

    /// Adds an optional field.
    #[must_use]
    pub fn optional(self, name: impl Into<String>, ty: ParamType) -> Self {
        self.field(ParamField::optional(name, ty))
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Iterates fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &ParamField> {
        self.fields.iter()
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Renders the schema as a JSON Schema object.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in &self.fields {
            properties.insert(field.name.clone(), field.to_json_schema());
            if field.required {
                required.push(json!(field.name));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false
        })
    }
}
