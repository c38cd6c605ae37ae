//! Tab built-in actions.

use serde::Deserialize;

use crate::action::{ActionHandler, ActionSpec, HandlerFuture, HandlerOutput};
use crate::binder::BoundArgs;
use crate::context::ResourceKey;
use crate::result::ActionResult;
use crate::schema::{ParamSchema, ParamType};

/// Switches the focused tab.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwitchTabAction;

#[derive(Debug, Deserialize)]
struct SwitchTabArgs {
    page_id: i64,
}

impl SwitchTabAction {
    /// Returns the action spec.
    #[must_use]
    pub fn spec() -> ActionSpec {
        ActionSpec::new("switch_tab", "Switch tab", Self)
            .with_params(ParamSchema::new().required("page_id", ParamType::Integer))
            .requires(ResourceKey::Session)
    }
}

impl ActionHandler for SwitchTabAction {
    fn call(&self, args: BoundArgs) -> HandlerFuture {
        Box::pin(async move {
            let SwitchTabArgs { page_id } = args.params_as()?;
            args.session()?.switch_tab(page_id).await?;

            let msg = format!("🔄  Switched to tab {page_id}");
            tracing::info!("{msg}");
            Ok(HandlerOutput::Result(ActionResult::content(msg, true)))
        })
    }
}

/// Opens a URL in a new tab.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenTabAction;

#[derive(Debug, Deserialize)]
struct OpenTabArgs {
    url: String,
}

impl OpenTabAction {
    /// Returns the action spec.
    #[must_use]
    pub fn spec() -> ActionSpec {
        ActionSpec::new("open_tab", "Open url in new tab", Self)
            .with_params(ParamSchema::new().required("url", ParamType::String))
            .requires(ResourceKey::Session)
    }
}

impl ActionHandler for OpenTabAction {
    fn call(&self, args: BoundArgs) -> HandlerFuture {
        Box::pin(async move {
            let OpenTabArgs { url } = args.params_as()?;
            args.session()?.open_tab(&url).await?;

            let msg = format!("🔗  Opened new tab with {url}");
            tracing::info!("{msg}");
            Ok(HandlerOutput::Result(ActionResult::content(msg, true)))
        })
    }
}
