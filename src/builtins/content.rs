//! Page content built-in actions: extraction and scrolling.

use serde::Deserialize;

use crate::action::{ActionHandler, ActionSpec, HandlerFuture, HandlerOutput};
use crate::binder::BoundArgs;
use crate::context::ResourceKey;
use crate::error::ActionError;
use crate::result::ActionResult;
use crate::schema::{ParamField, ParamSchema, ParamType};
use crate::session::ScrollDirection;

/// Line width used when rendering page HTML as text.
const TEXT_WIDTH: usize = 120;

const EXTRACTION_PROMPT: &str = "Your task is to extract the content of the page. You will be \
    given a page and a goal and you should extract all relevant information around this goal \
    from the page. If the goal is vague, summarize the page. Respond in json format.";

/// Extracts goal-specific information from the current page with an LLM.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractContentAction;

#[derive(Debug, Deserialize)]
struct ExtractArgs {
    goal: String,
}

impl ExtractContentAction {
    /// Returns the action spec.
    #[must_use]
    pub fn spec() -> ActionSpec {
        ActionSpec::new(
            "extract_content",
            "Extract page content to retrieve specific information from the page, e.g. all \
             company names, a specific description, all information about, links with companies \
             in structured format or simply links",
            Self,
        )
        .with_params(ParamSchema::new().required("goal", ParamType::String))
        .requires_all([ResourceKey::Session, ResourceKey::PageExtractionLlm])
    }

    /// Renders page HTML as plain text with markdown-style links.
    pub(crate) fn page_text(html: &str) -> Result<String, ActionError> {
        html2text::from_read(html.as_bytes(), TEXT_WIDTH)
            .map_err(|e| ActionError::handler_failed(format!("failed to convert page HTML: {e}")))
    }

    fn prompt(goal: &str, page: &str) -> String {
        format!("{EXTRACTION_PROMPT} Extraction goal: {goal}, Page: {page}")
    }
}

impl ActionHandler for ExtractContentAction {
    fn call(&self, args: BoundArgs) -> HandlerFuture {
        Box::pin(async move {
            let ExtractArgs { goal } = args.params_as()?;
            let html = args.session()?.page_html().await?;
            let content = Self::page_text(&html)?;

            let llm = args.page_extraction_llm()?;
            let result = match llm.complete(&Self::prompt(&goal, &content)).await {
                Ok(output) => {
                    ActionResult::content(format!("📄  Extracted from page\n: {output}\n"), true)
                }
                Err(e) => {
                    // The raw page is too large to keep in memory.
                    tracing::debug!(error = %e, "Extraction model failed, returning page text");
                    ActionResult::content(format!("📄  Extracted from page\n: {content}\n"), false)
                }
            };
            Ok(HandlerOutput::Result(result))
        })
    }
}

/// Scrolls the page up or down.
#[derive(Debug, Clone, Copy)]
pub struct ScrollAction {
    direction: ScrollDirection,
}

#[derive(Debug, Deserialize)]
struct ScrollArgs {
    amount: Option<u32>,
}

impl ScrollAction {
    /// Returns the `scroll_down` spec.
    #[must_use]
    pub fn down() -> ActionSpec {
        Self::spec(ScrollDirection::Down)
    }

    /// Returns the `scroll_up` spec.
    #[must_use]
    pub fn up() -> ActionSpec {
        Self::spec(ScrollDirection::Up)
    }

    fn spec(direction: ScrollDirection) -> ActionSpec {
        let dir = direction.as_str();
        ActionSpec::new(
            format!("scroll_{dir}"),
            format!(
                "Scroll {dir} the page by pixel amount - if no amount is specified, scroll {dir} one page"
            ),
            Self { direction },
        )
        .with_params(ParamSchema::new().field(
            ParamField::optional("amount", ParamType::Integer)
                .with_description("Pixels to scroll")
                .with_minimum(0)
                .with_maximum(i64::from(u32::MAX)),
        ))
        .requires(ResourceKey::Session)
    }
}

impl ActionHandler for ScrollAction {
    fn call(&self, args: BoundArgs) -> HandlerFuture {
        let direction = self.direction;
        Box::pin(async move {
            let ScrollArgs { amount } = args.params_as()?;
            args.session()?.scroll(direction, amount).await?;

            let amount = amount.map_or_else(|| "one page".to_string(), |px| format!("{px} pixels"));
            let msg = format!("🔍  Scrolled {} the page by {amount}", direction.as_str());
            tracing::info!("{msg}");
            Ok(HandlerOutput::Result(ActionResult::content(msg, true)))
        })
    }
}

/// Scrolls a piece of text into view.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollToTextAction;

#[derive(Debug, Deserialize)]
struct TextArgs {
    text: String,
}

impl ScrollToTextAction {
    /// Returns the action spec.
    #[must_use]
    pub fn spec() -> ActionSpec {
        ActionSpec::new(
            "scroll_to_text",
            "If you dont find something which you want to interact with, scroll to it",
            Self,
        )
        .with_params(ParamSchema::new().required("text", ParamType::String))
        .requires(ResourceKey::Session)
    }
}

impl ActionHandler for ScrollToTextAction {
    fn call(&self, args: BoundArgs) -> HandlerFuture {
        Box::pin(async move {
            let TextArgs { text } = args.params_as()?;
            let result = match args.session()?.scroll_to_text(&text).await {
                Ok(true) => ActionResult::content(format!("🔍  Scrolled to text: {text}"), true),
                Ok(false) => ActionResult::content(
                    format!("Text '{text}' not found or not visible on page"),
                    true,
                ),
                Err(e) => ActionResult::failure(format!("Failed to scroll to text '{text}': {e}")),
            };
            Ok(HandlerOutput::Result(result))
        })
    }
}
