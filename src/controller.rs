//! The dispatcher.
//!
//! A [`Controller`] owns a frozen [`Registry`] and turns one
//! [`ActionRequest`] plus a [`Context`] into one [`ActionResult`]. Each call
//! runs at most one handler. Ordering across calls is the driving loop's
//! job; the controller only needs `&self` and is safe to share.
//!
//! # Example
//!
//! ```rust
//! use acton_actions::prelude::*;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let controller = Controller::builder()
//!     .register(ActionSpec::new(
//!         "greet",
//!         "Say hello",
//!         handler_fn(|args| async move {
//!             let name = args.str_param("name")?;
//!             Ok(HandlerOutput::Text(format!("hello {name}")))
//!         }),
//!     )
//!     .with_params(ParamSchema::new().required("name", ParamType::String)))
//!     .build()
//!     .unwrap();
//!
//! let request = ActionRequest::new("greet", json!({"name": "Ada"}));
//! let result = controller.act(&request, &Context::new()).await.unwrap();
//! assert_eq!(result.extracted_content.as_deref(), Some("hello Ada"));
//! # });
//! ```

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

use crate::action::ActionSpec;
use crate::binder::ParameterBinder;
use crate::builtins::BuiltinActions;
use crate::config::ActionsConfig;
use crate::context::Context;
use crate::error::ActionError;
use crate::registry::{Registry, RegistryBuilder};
use crate::request::ActionRequest;
use crate::result::ActionResult;
use crate::schema::{ActionSchema, ParamSchema, ValidationPolicy};
use crate::types::DispatchId;

/// Builder for a [`Controller`].
///
/// Nothing is registered until [`build`](Self::build); defaults come first,
/// then custom actions in the order they were added.
#[derive(Debug, Default)]
#[must_use]
pub struct ControllerBuilder {
    excluded: Vec<String>,
    policy: ValidationPolicy,
    output_schema: Option<ParamSchema>,
    default_actions: bool,
    custom: Vec<ActionSpec>,
}

impl ControllerBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies exclusions and the validation policy from a config file.
    #[allow(clippy::wrong_self_convention)]
    pub fn from_config(mut self, config: &ActionsConfig) -> Self {
        self.excluded.extend(config.exclude_actions.iter().cloned());
        self.policy = config.validation;
        self
    }

    /// Hides actions from schema export and dispatch.
    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(names.into_iter().map(Into::into));
        self
    }

    /// Sets how parameter payloads are validated.
    pub fn validation_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Gives the built-in `done` action a structured parameter schema.
    pub fn output_schema(mut self, schema: ParamSchema) -> Self {
        self.output_schema = Some(schema);
        self
    }

    /// Registers the built-in browser actions.
    pub fn with_default_actions(mut self) -> Self {
        self.default_actions = true;
        self
    }

    /// Adds a custom action.
    pub fn register(mut self, spec: ActionSpec) -> Self {
        self.custom.push(spec);
        self
    }

    /// Registers everything and freezes the table.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAction` if two actions share a name, or a
    /// `Configuration` error for an unusable name.
    pub fn build(self) -> Result<Controller, ActionError> {
        let mut registry = RegistryBuilder::new().exclude(self.excluded);
        if self.default_actions {
            for spec in BuiltinActions::all(self.output_schema).into_specs() {
                registry.register(spec)?;
            }
        }
        for spec in self.custom {
            registry.register(spec)?;
        }

        let registry = registry.build();
        tracing::info!(actions = registry.len(), "Controller ready");
        Ok(Controller::new(registry, self.policy))
    }
}

/// Validates, binds, invokes, and normalizes one action per call.
#[derive(Debug, Clone)]
pub struct Controller {
    registry: Arc<Registry>,
    binder: ParameterBinder,
}

impl Controller {
    /// Starts building a controller.
    pub fn builder() -> ControllerBuilder {
        ControllerBuilder::new()
    }

    /// Wraps an already built registry.
    #[must_use]
    pub fn new(registry: Registry, policy: ValidationPolicy) -> Self {
        Self {
            registry: Arc::new(registry),
            binder: ParameterBinder::new(policy),
        }
    }

    /// The frozen action table.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The union of all visible actions, for the reasoning engine.
    #[must_use]
    pub fn action_schema(&self) -> ActionSchema {
        self.registry.build_schema()
    }

    /// Executes the single action named by `request`.
    ///
    /// Recoverable failures (bad request shape, invalid parameters, missing
    /// resources, handler errors and panics) come back as `Ok` with
    /// `ActionResult::error` set.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAction` if the request names an action that is not
    /// visible, and `InvalidHandlerResult` if the handler broke its return
    /// contract. Both carry the dispatch id.
    pub async fn act(
        &self,
        request: &ActionRequest,
        ctx: &Context,
    ) -> Result<ActionResult, ActionError> {
        let dispatch_id = DispatchId::new();
        let span = tracing::info_span!(
            "act",
            dispatch_id = %dispatch_id,
            action = tracing::field::Empty
        );
        self.dispatch(request, ctx, &dispatch_id)
            .instrument(span)
            .await
    }

    async fn dispatch(
        &self,
        request: &ActionRequest,
        ctx: &Context,
        dispatch_id: &DispatchId,
    ) -> Result<ActionResult, ActionError> {
        let (name, payload) = match request.single() {
            Ok(field) => field,
            Err(e) => return Ok(recoverable(&e)),
        };
        tracing::Span::current().record("action", name);

        let spec = self.registry.lookup(name).map_err(|e| {
            tracing::error!(error = %e, "Request names an action outside the schema");
            e.with_correlation(dispatch_id.clone())
        })?;

        let args = match self.binder.bind(spec, payload, ctx) {
            Ok(args) => args,
            Err(e) => return Ok(recoverable(&e)),
        };

        tracing::info!("Executing action");
        let started = Instant::now();
        let handler = spec.handler();
        let outcome = AssertUnwindSafe(async move { handler.call(args).await })
            .catch_unwind()
            .await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::debug!(duration_ms, "Action finished");

        match outcome {
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::warn!(panic = %message, "Action panicked");
                Ok(ActionResult::failure(message))
            }
            Ok(Err(e)) => Ok(recoverable(&e)),
            Ok(Ok(output)) => output.normalize(name).map_err(|e| {
                tracing::error!(error = %e, "Handler broke its return contract");
                e.with_correlation(dispatch_id.clone())
            }),
        }
    }
}

fn recoverable(err: &ActionError) -> ActionResult {
    tracing::warn!(error = %err, "Action failed");
    ActionResult::failure(err.envelope_message())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "action panicked".to_string()
    }
}
