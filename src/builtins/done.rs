//! Task completion built-in action.

use serde::Deserialize;

use crate::action::{ActionHandler, ActionSpec, HandlerFuture, HandlerOutput};
use crate::binder::BoundArgs;
use crate::error::ActionError;
use crate::result::ActionResult;
use crate::schema::{ParamField, ParamSchema, ParamType};

/// Completes the task.
///
/// With no output schema the action takes free text. With one, its
/// parameters are that schema and the result content is their JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoneAction {
    structured: bool,
}

#[derive(Debug, Deserialize)]
struct DoneArgs {
    text: String,
}

impl DoneAction {
    /// Returns the action spec, optionally with a structured output schema.
    #[must_use]
    pub fn spec(output: Option<ParamSchema>) -> ActionSpec {
        let structured = output.is_some();
        let params = output.unwrap_or_else(|| {
            ParamSchema::new().field(
                ParamField::required("text", ParamType::String)
                    .with_description("Final answer for the task"),
            )
        });
        ActionSpec::new("done", "Complete task", Self { structured }).with_params(params)
    }
}

impl ActionHandler for DoneAction {
    fn call(&self, args: BoundArgs) -> HandlerFuture {
        let structured = self.structured;
        Box::pin(async move {
            let content = if structured {
                serde_json::to_string(args.params())
                    .map_err(|e| ActionError::handler_failed(format!("cannot encode output: {e}")))?
            } else {
                args.params_as::<DoneArgs>()?.text
            };
            Ok(HandlerOutput::Result(ActionResult::done(content)))
        })
    }
}
