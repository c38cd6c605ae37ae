//! # Acton-Actions: Action Registry and Dispatch for Browser Agents
//!
//! The capability layer between a reasoning engine and a browser session.
//! Actions are registered once with a typed parameter schema and the
//! resources they need; the registry exports them as a discriminated union
//! for structured output, and the controller executes exactly one chosen
//! action per step.
//!
//! ## Architecture
//!
//! - **ActionSpec**: Name, description, parameter schema, declared resources, handler
//! - **Registry**: Frozen name to spec table with exclusion and schema export
//! - **Context**: Per-call bundle of caller-owned resources
//! - **ParameterBinder**: Validation plus resource injection by declared key
//! - **Controller**: `act(request, context)` returning one `ActionResult`
//! - **Builtins**: The default browser action set over [`session::BrowserSession`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use acton_actions::prelude::*;
//! use std::sync::Arc;
//!
//! let controller = Controller::builder()
//!     .exclude(["search_google"])
//!     .with_default_actions()
//!     .build()?;
//!
//! // Hand this to the reasoning engine as its structured-output schema
//! let schema = controller.action_schema().to_json_schema();
//!
//! let ctx = Context::new().with_session(Arc::new(my_browser));
//! let request = ActionRequest::from_json(&engine_output)?;
//! let result = controller.act(&request, &ctx).await?;
//! ```

pub mod action;
pub mod binder;
pub mod builtins;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod logging;
pub mod registry;
pub mod request;
pub mod result;
pub mod schema;
pub mod session;
pub mod types;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{
        handler_fn, ActionHandler, ActionSpec, HandlerFuture, HandlerOutput, HandlerResult,
    };
    pub use crate::binder::{BoundArgs, ParameterBinder};
    pub use crate::builtins::BuiltinActions;
    pub use crate::config::ActionsConfig;
    pub use crate::context::{Context, ResourceKey};
    pub use crate::controller::{Controller, ControllerBuilder};
    pub use crate::error::{ActionError, ActionErrorKind};
    pub use crate::logging::{init_logging, LogLevel, LoggingConfig};
    pub use crate::registry::{Registry, RegistryBuilder};
    pub use crate::request::ActionRequest;
    pub use crate::result::ActionResult;
    pub use crate::schema::{
        ActionSchema, ParamField, ParamSchema, ParamType, ToolDefinition, UnknownFields,
        ValidationPolicy,
    };
    pub use crate::session::{
        BrowserSession, DropdownOption, ElementInfo, ExtractionModel, ScrollDirection,
        SessionError,
    };
    pub use crate::types::DispatchId;
}
