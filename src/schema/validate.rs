//! Payload validation against a `ParamSchema`.
//!
//! Validation is governed by an explicit `ValidationPolicy`:
//!
//! - `unknown_fields`: `reject` (default) fails on any field the schema does
//!   not declare; `ignore` drops such fields before binding.
//! - `coerce_scalars`: when `false` (default) types must match exactly. When
//!   `true`, numeric strings are accepted for integer/number fields and
//!   `"true"`/`"false"` for boolean fields.
//!
//! Independent of policy: integral floats such as `3.0` are accepted for
//! integer fields, `null` counts as absent for optional fields, and absent
//! optional fields with a default receive that default. Field bounds
//! (`minimum`/`maximum`) are checked after any coercion.

use crate::schema::param::{ParamField, ParamSchema, ParamType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// What to do with payload fields the schema does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFields {
    /// Fail validation
    #[default]
    Reject,
    /// Drop the field silently
    Ignore,
}

/// Policy applied when validating action parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Handling of undeclared fields
    pub unknown_fields: UnknownFields,
    /// Whether string scalars may be converted to numbers and booleans
    pub coerce_scalars: bool,
}

impl ValidationPolicy {
    /// Exact types, undeclared fields rejected.
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Undeclared fields dropped and scalar strings coerced.
    ///
    /// Closer to what LLM output usually needs when the model is sloppy
    /// about quoting numbers.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            unknown_fields: UnknownFields::Ignore,
            coerce_scalars: true,
        }
    }
}

/// A single validation failure, located by a dotted field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Path of the offending field (`""` for the payload root)
    pub path: String,
    /// What was wrong
    pub reason: String,
}

impl SchemaViolation {
    fn new(path: &str, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.reason)
        } else {
            write!(f, "field '{}': {}", self.path, self.reason)
        }
    }
}

impl std::error::Error for SchemaViolation {}

impl ParamSchema {
    /// Validates a payload and returns the normalized parameters.
    ///
    /// The returned map contains only declared fields, with defaults applied
    /// and coerced values substituted.
    ///
    /// # Errors
    ///
    /// Returns the first `SchemaViolation` found, in field declaration order.
    pub fn validate(
        &self,
        payload: &Value,
        policy: &ValidationPolicy,
    ) -> Result<Map<String, Value>, SchemaViolation> {
        match payload {
            Value::Object(map) => validate_object(self, map, "", policy),
            other => Err(SchemaViolation::new(
                "",
                format!("expected an object of parameters, found {}", describe(other)),
            )),
        }
    }
}

fn validate_object(
    schema: &ParamSchema,
    map: &Map<String, Value>,
    path: &str,
    policy: &ValidationPolicy,
) -> Result<Map<String, Value>, SchemaViolation> {
    if policy.unknown_fields == UnknownFields::Reject {
        if let Some(unknown) = map.keys().find(|key| schema.get(key).is_none()) {
            return Err(SchemaViolation::new(
                &join(path, unknown),
                "unknown field; remove it or check the action schema",
            ));
        }
    }

    let mut out = Map::new();
    for field in schema.fields() {
        let field_path = join(path, &field.name);
        match map.get(&field.name) {
            None | Some(Value::Null) if field.required => {
                return Err(SchemaViolation::new(&field_path, "missing required field"));
            }
            None | Some(Value::Null) => {
                if let Some(ref default) = field.default {
                    out.insert(field.name.clone(), default.clone());
                }
            }
            Some(value) => {
                let checked = validate_value(&field.ty, value, &field_path, policy)?;
                check_bounds(field, &checked, &field_path)?;
                out.insert(field.name.clone(), checked);
            }
        }
    }
    Ok(out)
}

fn validate_value(
    ty: &ParamType,
    value: &Value,
    path: &str,
    policy: &ValidationPolicy,
) -> Result<Value, SchemaViolation> {
    let mismatch = || {
        SchemaViolation::new(
            path,
            format!("expected {}, found {}", ty.type_name(), describe(value)),
        )
    };

    match ty {
        ParamType::Any => Ok(value.clone()),
        ParamType::String => match value {
            Value::String(_) => Ok(value.clone()),
            _ => Err(mismatch()),
        },
        ParamType::Integer => match value {
            Value::Number(n) => integer_from_number(n).ok_or_else(mismatch),
            Value::String(s) if policy.coerce_scalars => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| mismatch()),
            _ => Err(mismatch()),
        },
        ParamType::Number => match value {
            Value::Number(_) => Ok(value.clone()),
            Value::String(s) if policy.coerce_scalars => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(mismatch),
            _ => Err(mismatch()),
        },
        ParamType::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) if policy.coerce_scalars => {
                match s.trim().to_ascii_lowercase().as_str() {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    _ => Err(mismatch()),
                }
            }
            _ => Err(mismatch()),
        },
        ParamType::Enum(allowed) => match value {
            Value::String(s) if allowed.iter().any(|a| a == s) => Ok(value.clone()),
            Value::String(s) => Err(SchemaViolation::new(
                path,
                format!("'{}' is not one of [{}]", s, allowed.join(", ")),
            )),
            _ => Err(mismatch()),
        },
        ParamType::Array(items) => match value {
            Value::Array(elements) => elements
                .iter()
                .enumerate()
                .map(|(i, element)| validate_value(items, element, &format!("{path}[{i}]"), policy))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            _ => Err(mismatch()),
        },
        ParamType::Object(nested) => match value {
            Value::Object(map) => validate_object(nested, map, path, policy).map(Value::Object),
            _ => Err(mismatch()),
        },
    }
}

fn check_bounds(field: &ParamField, value: &Value, path: &str) -> Result<(), SchemaViolation> {
    let Value::Number(n) = value else {
        return Ok(());
    };
    let below = |bound: i64| match n.as_i64() {
        Some(i) => i < bound,
        None => n.as_f64().is_some_and(|f| f < bound as f64),
    };
    let above = |bound: i64| match n.as_i64() {
        Some(i) => i > bound,
        None => n.as_f64().is_some_and(|f| f > bound as f64),
    };

    if let Some(minimum) = field.minimum.filter(|&m| below(m)) {
        return Err(SchemaViolation::new(
            path,
            format!("must be at least {minimum}, found {n}"),
        ));
    }
    if let Some(maximum) = field.maximum.filter(|&m| above(m)) {
        return Err(SchemaViolation::new(
            path,
            format!("must be at most {maximum}, found {n}"),
        ));
    }
    Ok(())
}

fn integer_from_number(n: &Number) -> Option<Value> {
    if let Some(i) = n.as_i64() {
        return Some(Value::from(i));
    }
    let f = n.as_f64()?;
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(Value::from(f as i64))
    } else {
        None
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn click_schema() -> ParamSchema {
        ParamSchema::new().required("index", ParamType::Integer)
    }

    #[test]
    fn accepts_valid_payload() {
        let params = click_schema()
            .validate(&json!({"index": 4}), &ValidationPolicy::strict())
            .unwrap();
        assert_eq!(params["index"], 4);
    }

    #[test]
    fn rejects_missing_required_field() {
        let err = click_schema()
            .validate(&json!({}), &ValidationPolicy::strict())
            .unwrap_err();
        assert_eq!(err.path, "index");
        assert!(err.to_string().contains("missing required field"));
    }

    #[test]
    fn null_required_field_counts_as_missing() {
        let err = click_schema()
            .validate(&json!({"index": null}), &ValidationPolicy::strict())
            .unwrap_err();
        assert!(err.reason.contains("missing required field"));
    }

    #[test]
    fn rejects_non_object_payload() {
        let err = click_schema()
            .validate(&json!([1, 2]), &ValidationPolicy::strict())
            .unwrap_err();
        assert!(err.path.is_empty());
        assert!(err.to_string().contains("found array"));
    }

    #[test]
    fn strict_policy_rejects_unknown_fields() {
        let err = click_schema()
            .validate(&json!({"index": 1, "xpath": "//a"}), &ValidationPolicy::strict())
            .unwrap_err();
        assert_eq!(err.path, "xpath");
        assert!(err.reason.contains("unknown field"));
    }

    #[test]
    fn ignore_policy_drops_unknown_fields() {
        let policy = ValidationPolicy {
            unknown_fields: UnknownFields::Ignore,
            coerce_scalars: false,
        };
        let params = click_schema()
            .validate(&json!({"index": 1, "xpath": "//a"}), &policy)
            .unwrap();
        assert!(params.get("xpath").is_none());
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn strict_policy_rejects_numeric_strings() {
        let err = click_schema()
            .validate(&json!({"index": "3"}), &ValidationPolicy::strict())
            .unwrap_err();
        assert!(err.reason.contains("expected integer, found string"));
    }

    #[test]
    fn lenient_policy_coerces_scalars() {
        let schema = ParamSchema::new()
            .required("index", ParamType::Integer)
            .required("ratio", ParamType::Number)
            .required("force", ParamType::Boolean);
        let params = schema
            .validate(
                &json!({"index": " 3 ", "ratio": "0.5", "force": "TRUE"}),
                &ValidationPolicy::lenient(),
            )
            .unwrap();
        assert_eq!(params["index"], 3);
        assert_eq!(params["ratio"], 0.5);
        assert_eq!(params["force"], true);
    }

    #[test]
    fn integral_float_is_an_integer() {
        let params = click_schema()
            .validate(&json!({"index": 2.0}), &ValidationPolicy::strict())
            .unwrap();
        assert_eq!(params["index"], json!(2));

        let err = click_schema()
            .validate(&json!({"index": 2.5}), &ValidationPolicy::strict())
            .unwrap_err();
        assert!(err.reason.contains("expected integer"));
    }

    #[test]
    fn minimum_rejects_negative_index() {
        let schema = ParamSchema::new()
            .field(ParamField::required("index", ParamType::Integer).with_minimum(0));

        let err = schema
            .validate(&json!({"index": -1}), &ValidationPolicy::strict())
            .unwrap_err();
        assert_eq!(err.path, "index");
        assert_eq!(err.reason, "must be at least 0, found -1");

        let params = schema
            .validate(&json!({"index": 0}), &ValidationPolicy::strict())
            .unwrap();
        assert_eq!(params["index"], 0);
    }

    #[test]
    fn maximum_applies_after_coercion() {
        let schema = ParamSchema::new().field(
            ParamField::optional("amount", ParamType::Integer)
                .with_minimum(0)
                .with_maximum(i64::from(u32::MAX)),
        );

        let err = schema
            .validate(&json!({"amount": "5000000000"}), &ValidationPolicy::lenient())
            .unwrap_err();
        assert!(err.reason.starts_with("must be at most 4294967295"));

        let params = schema
            .validate(&json!({"amount": u32::MAX}), &ValidationPolicy::strict())
            .unwrap();
        assert_eq!(params["amount"], json!(u32::MAX));
    }

    #[test]
    fn optional_field_gets_default() {
        let schema = ParamSchema::new().field(
            ParamField::optional("amount", ParamType::Integer).with_default(json!(500)),
        );
        let params = schema.validate(&json!({}), &ValidationPolicy::strict()).unwrap();
        assert_eq!(params["amount"], 500);
    }

    #[test]
    fn optional_field_without_default_is_omitted() {
        let schema = ParamSchema::new().optional("amount", ParamType::Integer);
        let params = schema
            .validate(&json!({"amount": null}), &ValidationPolicy::strict())
            .unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn enum_rejects_unlisted_value() {
        let schema = ParamSchema::new().required("method", ParamType::one_of(["GET", "POST"]));
        let err = schema
            .validate(&json!({"method": "DELETE"}), &ValidationPolicy::strict())
            .unwrap_err();
        assert!(err.reason.contains("'DELETE' is not one of [GET, POST]"));
    }

    #[test]
    fn nested_paths_are_reported() {
        let item = ParamSchema::new().required("qty", ParamType::Integer);
        let schema = ParamSchema::new().required("items", ParamType::array(ParamType::object(item)));
        let err = schema
            .validate(
                &json!({"items": [{"qty": 1}, {"qty": "two"}]}),
                &ValidationPolicy::strict(),
            )
            .unwrap_err();
        assert_eq!(err.path, "items[1].qty");
    }

    #[test]
    fn any_accepts_everything() {
        let schema = ParamSchema::new().required("payload", ParamType::Any);
        let params = schema
            .validate(&json!({"payload": {"deep": [1, "x"]}}), &ValidationPolicy::strict())
            .unwrap();
        assert_eq!(params["payload"]["deep"][1], "x");
    }

    #[test]
    fn policy_deserializes_from_toml() {
        let policy: ValidationPolicy =
            toml::from_str("unknown_fields = \"ignore\"\ncoerce_scalars = true").unwrap();
        assert_eq!(policy, ValidationPolicy::lenient());
    }
}
