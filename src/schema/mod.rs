//! Parameter schemas: typed shapes, payload validation, and union export.

mod export;
mod param;
mod validate;

pub use export::{ActionSchema, ActionVariant, ToolDefinition};
pub use param::{ParamField, ParamSchema, ParamType};
pub use validate::{SchemaViolation, UnknownFields, ValidationPolicy};
