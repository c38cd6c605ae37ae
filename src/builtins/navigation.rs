//! Navigation built-in actions: search, go to URL, go back.

use serde::Deserialize;
use url::Url;

use crate::action::{ActionHandler, ActionSpec, HandlerFuture, HandlerOutput};
use crate::binder::BoundArgs;
use crate::context::ResourceKey;
use crate::error::ActionError;
use crate::result::ActionResult;
use crate::schema::{ParamSchema, ParamType};

const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search";

/// Searches Google in the current tab.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchGoogleAction;

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
}

impl SearchGoogleAction {
    /// Returns the action spec.
    #[must_use]
    pub fn spec() -> ActionSpec {
        ActionSpec::new(
            "search_google",
            "Search the query in Google in the current tab, the query should be a search query \
             like humans search in Google, concrete and not vague or super long. More the single \
             most important items.",
            Self,
        )
        .with_params(ParamSchema::new().required("query", ParamType::String))
        .requires(ResourceKey::Session)
    }

    /// Builds the results URL. `udm=14` selects the plain "Web" results tab.
    pub(crate) fn search_url(query: &str) -> Result<Url, ActionError> {
        Url::parse_with_params(GOOGLE_SEARCH_URL, &[("q", query), ("udm", "14")])
            .map_err(|e| ActionError::handler_failed(format!("cannot build search URL: {e}")))
    }
}

impl ActionHandler for SearchGoogleAction {
    fn call(&self, args: BoundArgs) -> HandlerFuture {
        Box::pin(async move {
            let SearchArgs { query } = args.params_as()?;
            let url = Self::search_url(&query)?;
            args.session()?.navigate(url.as_str()).await?;

            let msg = format!("🔍  Searched for \"{query}\" in Google");
            tracing::info!("{msg}");
            Ok(HandlerOutput::Result(ActionResult::content(msg, true)))
        })
    }
}

/// Navigates the current tab to a URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoToUrlAction;

#[derive(Debug, Deserialize)]
struct UrlArgs {
    url: String,
}

impl GoToUrlAction {
    /// Returns the action spec.
    #[must_use]
    pub fn spec() -> ActionSpec {
        ActionSpec::new("go_to_url", "Navigate to URL in the current tab", Self)
            .with_params(ParamSchema::new().required("url", ParamType::String))
            .requires(ResourceKey::Session)
    }
}

impl ActionHandler for GoToUrlAction {
    fn call(&self, args: BoundArgs) -> HandlerFuture {
        Box::pin(async move {
            let UrlArgs { url } = args.params_as()?;
            args.session()?.navigate(&url).await?;

            let msg = format!("🔗  Navigated to {url}");
            tracing::info!("{msg}");
            Ok(HandlerOutput::Result(ActionResult::content(msg, true)))
        })
    }
}

/// Goes back in the current tab's history.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoBackAction;

impl GoBackAction {
    /// Returns the action spec.
    #[must_use]
    pub fn spec() -> ActionSpec {
        ActionSpec::new("go_back", "Go back", Self).requires(ResourceKey::Session)
    }
}

impl ActionHandler for GoBackAction {
    fn call(&self, args: BoundArgs) -> HandlerFuture {
        Box::pin(async move {
            args.session()?.go_back().await?;

            let msg = "🔙  Navigated back";
            tracing::info!("{msg}");
            Ok(HandlerOutput::Result(ActionResult::content(msg, true)))
        })
    }
}
