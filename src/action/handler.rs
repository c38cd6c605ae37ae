//! Handler trait and return-value normalization.

use serde_json::Value;
use std::fmt::{self, Debug};
use std::future::Future;
use std::pin::Pin;

use crate::binder::BoundArgs;
use crate::error::ActionError;
use crate::result::ActionResult;

/// What a handler resolves to.
pub type HandlerResult = Result<HandlerOutput, ActionError>;

/// The future returned by [`ActionHandler::call`].
pub type HandlerFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send + 'static>>;

/// Trait for action handlers.
///
/// A handler receives validated parameters plus the resources its action
/// declared. Returning `Err` is a recoverable failure and becomes
/// `ActionResult::error`.
///
/// # Example
///
/// ```rust
/// use acton_actions::action::{ActionHandler, HandlerFuture, HandlerOutput};
/// use acton_actions::binder::BoundArgs;
///
/// #[derive(Debug)]
/// struct Echo;
///
/// impl ActionHandler for Echo {
///     fn call(&self, args: BoundArgs) -> HandlerFuture {
///         Box::pin(async move {
///             let text = args.str_param("text")?.to_string();
///             Ok(HandlerOutput::Text(text))
///         })
///     }
/// }
/// ```
pub trait ActionHandler: Send + Sync + Debug {
    /// Runs the action.
    fn call(&self, args: BoundArgs) -> HandlerFuture;
}

/// Raw return value of a handler, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutput {
    /// Plain text, wrapped as `extracted_content`
    Text(String),
    /// A complete envelope, passed through unchanged
    Result(ActionResult),
    /// No value; yields an empty successful envelope
    Nothing,
    /// An untyped value from a dynamic handler
    Json(Value),
}

impl HandlerOutput {
    /// Folds the output into the canonical envelope.
    ///
    /// `Json` is accepted when it is `null`, a string, or an object with
    /// exactly the envelope's fields. Anything else is a handler contract
    /// violation.
    pub fn normalize(self, action: &str) -> Result<ActionResult, ActionError> {
        match self {
            Self::Text(text) => Ok(ActionResult::content(text, false)),
            Self::Result(result) => Ok(result),
            Self::Nothing => Ok(ActionResult::new()),
            Self::Json(Value::Null) => Ok(ActionResult::new()),
            Self::Json(Value::String(text)) => Ok(ActionResult::content(text, false)),
            Self::Json(value @ Value::Object(_)) => serde_json::from_value(value.clone())
                .map_err(|_| ActionError::invalid_handler_result(action, describe(&value))),
            Self::Json(other) => Err(ActionError::invalid_handler_result(action, describe(&other))),
        }
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(_) => "string".to_string(),
        Value::Array(items) => format!("array of {} items", items.len()),
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            format!("object with fields [{}]", keys.join(", "))
        }
    }
}

impl From<String> for HandlerOutput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for HandlerOutput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<ActionResult> for HandlerOutput {
    fn from(result: ActionResult) -> Self {
        Self::Result(result)
    }
}

impl From<()> for HandlerOutput {
    fn from((): ()) -> Self {
        Self::Nothing
    }
}

/// Adapter that turns an async closure into an [`ActionHandler`].
pub struct FnHandler<F> {
    f: F,
}

impl<F> Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

impl<F, Fut> ActionHandler for FnHandler<F>
where
    F: Fn(BoundArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, args: BoundArgs) -> HandlerFuture {
        Box::pin((self.f)(args))
    }
}

/// Wraps an async closure as a handler.
///
/// ```rust
/// use acton_actions::action::{handler_fn, HandlerOutput};
///
/// let handler = handler_fn(|args| async move {
///     let query = args.str_param("query")?;
///     Ok(HandlerOutput::Text(format!("searched for {query}")))
/// });
/// ```
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(BoundArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    FnHandler { f }
}
