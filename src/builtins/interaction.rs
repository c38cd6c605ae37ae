//! Element interaction built-in actions: click, type, send keys.

use serde::Deserialize;

use crate::action::{ActionHandler, ActionSpec, HandlerFuture, HandlerOutput};
use crate::binder::BoundArgs;
use crate::builtins::{index_field, require_element};
use crate::context::ResourceKey;
use crate::result::ActionResult;
use crate::schema::{ParamField, ParamSchema, ParamType};

fn element_params() -> ParamSchema {
    ParamSchema::new()
        .field(index_field())
        .field(
            ParamField::optional("xpath", ParamType::String)
                .with_description("XPath of the element, if known"),
        )
}

/// Clicks an interactive element.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickElementAction;

#[derive(Debug, Deserialize)]
struct ClickArgs {
    index: usize,
}

impl ClickElementAction {
    /// Returns the action spec.
    #[must_use]
    pub fn spec() -> ActionSpec {
        ActionSpec::new("click_element", "Click element", Self)
            .with_params(element_params())
            .requires(ResourceKey::Session)
    }
}

impl ActionHandler for ClickElementAction {
    fn call(&self, args: BoundArgs) -> HandlerFuture {
        Box::pin(async move {
            let ClickArgs { index } = args.params_as()?;
            let session = args.session()?;
            let element = require_element(session.as_ref(), index).await?;

            if element.is_file_uploader {
                let msg = format!(
                    "Index {index} - has an element which opens file upload dialog. \
                     To upload files please use a specific function to upload files"
                );
                tracing::info!("{msg}");
                return Ok(HandlerOutput::Result(ActionResult::content(msg, true)));
            }

            let initial_tabs = session.tab_count().await?;
            let download = match session.click_element(index).await {
                Ok(download) => download,
                Err(e) => {
                    tracing::warn!(
                        index,
                        error = %e,
                        "Element not clickable, most likely the page changed"
                    );
                    return Ok(HandlerOutput::Result(ActionResult::failure(e.to_string())));
                }
            };

            let mut msg = match download {
                Some(path) => format!("💾  Downloaded file to {path}"),
                None => format!("🖱️  Clicked button with index {index}: {}", element.text),
            };
            if session.tab_count().await? > initial_tabs {
                msg.push_str(" - New tab opened - switching to it");
                session.switch_tab(-1).await?;
            }

            tracing::info!("{msg}");
            Ok(HandlerOutput::Result(ActionResult::content(msg, true)))
        })
    }
}

/// Types text into an input element.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputTextAction;

#[derive(Debug, Deserialize)]
struct InputArgs {
    index: usize,
    text: String,
}

impl InputTextAction {
    /// Returns the action spec.
    #[must_use]
    pub fn spec() -> ActionSpec {
        ActionSpec::new(
            "input_text",
            "Input text into a input interactive element",
            Self,
        )
        .with_params(element_params().required("text", ParamType::String))
        .requires(ResourceKey::Session)
    }
}

impl ActionHandler for InputTextAction {
    fn call(&self, args: BoundArgs) -> HandlerFuture {
        Box::pin(async move {
            let InputArgs { index, text } = args.params_as()?;
            let session = args.session()?;
            require_element(session.as_ref(), index).await?;
            session.input_text(index, &text).await?;

            let msg = if args.has_sensitive_data() {
                format!("⌨️  Input sensitive data into index {index}")
            } else {
                format!("⌨️  Input {text} into index {index}")
            };
            tracing::info!("{msg}");
            Ok(HandlerOutput::Result(ActionResult::content(msg, true)))
        })
    }
}

/// Sends special keys or shortcuts to the page.
#[derive(Debug, Clone, Copy, Default)]
pub struct SendKeysAction;

#[derive(Debug, Deserialize)]
struct KeysArgs {
    keys: String,
}

impl SendKeysAction {
    /// Returns the action spec.
    #[must_use]
    pub fn spec() -> ActionSpec {
        ActionSpec::new(
            "send_keys",
            "Send strings of special keys like Escape, Backspace, Insert, PageDown, Delete, \
             Enter. Shortcuts such as `Control+o`, `Control+Shift+T` are supported as well.",
            Self,
        )
        .with_params(ParamSchema::new().required("keys", ParamType::String))
        .requires(ResourceKey::Session)
    }
}

impl ActionHandler for SendKeysAction {
    fn call(&self, args: BoundArgs) -> HandlerFuture {
        Box::pin(async move {
            let KeysArgs { keys } = args.params_as()?;
            let session = args.session()?;

            match session.press_keys(&keys).await {
                Ok(()) => {}
                Err(e) if e.is_unknown_key() => {
                    tracing::debug!(keys = %keys, "Unknown key, sending characters one by one");
                    for ch in keys.chars() {
                        let mut buf = [0u8; 4];
                        session.press_keys(ch.encode_utf8(&mut buf)).await?;
                    }
                }
                Err(e) => return Err(e.into()),
            }

            let msg = format!("⌨️  Sent keys: {keys}");
            tracing::info!("{msg}");
            Ok(HandlerOutput::Result(ActionResult::content(msg, true)))
        })
    }
}
