//! Native `<select>` built-in actions.

use serde::Deserialize;

use crate::action::{ActionHandler, ActionSpec, HandlerFuture, HandlerOutput};
use crate::binder::BoundArgs;
use crate::builtins::{index_field, require_element};
use crate::context::ResourceKey;
use crate::result::ActionResult;
use crate::schema::{ParamSchema, ParamType};

/// Lists the options of a native dropdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetDropdownOptionsAction;

#[derive(Debug, Deserialize)]
struct IndexArgs {
    index: usize,
}

impl GetDropdownOptionsAction {
    /// Returns the action spec.
    #[must_use]
    pub fn spec() -> ActionSpec {
        ActionSpec::new(
            "get_dropdown_options",
            "Get all options from a native dropdown",
            Self,
        )
        .with_params(ParamSchema::new().field(index_field()))
        .requires(ResourceKey::Session)
    }
}

impl ActionHandler for GetDropdownOptionsAction {
    fn call(&self, args: BoundArgs) -> HandlerFuture {
        Box::pin(async move {
            let IndexArgs { index } = args.params_as()?;
            let session = args.session()?;
            require_element(session.as_ref(), index).await?;

            let msg = match session.dropdown_options(index).await {
                Ok(options) if options.is_empty() => {
                    "No options found in any frame for dropdown".to_string()
                }
                Ok(options) => {
                    // JSON-encoded so the model copies the exact text back.
                    let mut lines: Vec<String> = options
                        .iter()
                        .map(|option| {
                            let text = serde_json::Value::String(option.text.clone());
                            format!("{}: text={text}", option.index)
                        })
                        .collect();
                    lines.push("Use the exact text string in select_dropdown_option".to_string());
                    lines.join("\n")
                }
                Err(e) => {
                    tracing::warn!(index, error = %e, "Failed to get dropdown options");
                    format!("Error getting options: {e}")
                }
            };
            Ok(HandlerOutput::Result(ActionResult::content(msg, true)))
        })
    }
}

/// Selects a dropdown option by its visible text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectDropdownOptionAction;

#[derive(Debug, Deserialize)]
struct SelectArgs {
    index: usize,
    text: String,
}

impl SelectDropdownOptionAction {
    /// Returns the action spec.
    #[must_use]
    pub fn spec() -> ActionSpec {
        ActionSpec::new(
            "select_dropdown_option",
            "Select dropdown option for interactive element index by the text of the option you \
             want to select",
            Self,
        )
        .with_params(
            ParamSchema::new()
                .field(index_field())
                .required("text", ParamType::String),
        )
        .requires(ResourceKey::Session)
    }
}

impl ActionHandler for SelectDropdownOptionAction {
    fn call(&self, args: BoundArgs) -> HandlerFuture {
        Box::pin(async move {
            let SelectArgs { index, text } = args.params_as()?;
            let session = args.session()?;
            let element = require_element(session.as_ref(), index).await?;

            if element.tag_name != "select" {
                tracing::warn!(index, tag = %element.tag_name, "Element is not a select");
                let msg = format!(
                    "Cannot select option: Element with index {index} is a {}, not a select",
                    element.tag_name
                );
                return Ok(HandlerOutput::Result(ActionResult::content(msg, true)));
            }

            let result = match session.select_dropdown_option(index, &text).await {
                Ok(values) if values.is_empty() => ActionResult::content(
                    format!("Could not select option '{text}' in any frame"),
                    true,
                ),
                Ok(values) => ActionResult::content(
                    format!("selected option {text} with value {values:?}"),
                    true,
                ),
                Err(e) => ActionResult::failure(format!("Selection failed: {e}")),
            };
            Ok(HandlerOutput::Result(result))
        })
    }
}
