//! Test doubles for built-in action tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::action::ActionSpec;
use crate::binder::ParameterBinder;
use crate::context::Context;
use crate::error::ActionError;
use crate::result::ActionResult;
use crate::session::{
    BrowserSession, DropdownOption, ElementInfo, ExtractionModel, ScrollDirection, SessionError,
};

/// Binds and runs one action the way the controller does, minus logging.
pub(crate) async fn run(
    spec: &ActionSpec,
    params: Value,
    ctx: &Context,
) -> Result<ActionResult, ActionError> {
    let args = ParameterBinder::default().bind(spec, &params, ctx)?;
    spec.handler().call(args).await?.normalize(spec.name())
}

pub(crate) fn button(index: usize, text: &str) -> ElementInfo {
    ElementInfo {
        index,
        tag_name: "button".to_string(),
        text: text.to_string(),
        xpath: None,
        is_file_uploader: false,
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeSession {
    calls: Mutex<Vec<String>>,
    elements: HashMap<usize, ElementInfo>,
    tabs: Mutex<usize>,
    tab_queries: AtomicUsize,
    pub(crate) download: Option<String>,
    pub(crate) click_opens_tab: bool,
    pub(crate) click_error: Option<String>,
    pub(crate) html: String,
    pub(crate) reject_combos: bool,
    pub(crate) text_visible: bool,
    pub(crate) options: Vec<DropdownOption>,
    pub(crate) options_error: Option<String>,
}

impl FakeSession {
    pub(crate) fn new() -> Self {
        Self {
            tabs: Mutex::new(1),
            ..Self::default()
        }
    }

    pub(crate) fn with_element(mut self, element: ElementInfo) -> Self {
        self.elements.insert(element.index, element);
        self
    }

    pub(crate) fn into_context(self) -> (Arc<Self>, Context) {
        let session = Arc::new(self);
        let ctx = Context::new().with_session(session.clone());
        (session, ctx)
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn tab_queries(&self) -> usize {
        self.tab_queries.load(Ordering::SeqCst)
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        self.record(format!("navigate {url}"));
        Ok(())
    }

    async fn go_back(&self) -> Result<(), SessionError> {
        self.record("go_back");
        Ok(())
    }

    async fn element(&self, index: usize) -> Result<Option<ElementInfo>, SessionError> {
        Ok(self.elements.get(&index).cloned())
    }

    async fn click_element(&self, index: usize) -> Result<Option<String>, SessionError> {
        self.record(format!("click {index}"));
        if let Some(ref message) = self.click_error {
            return Err(SessionError::other(message.clone()));
        }
        if self.click_opens_tab {
            *self.tabs.lock().unwrap() += 1;
        }
        Ok(self.download.clone())
    }

    async fn tab_count(&self) -> Result<usize, SessionError> {
        self.tab_queries.fetch_add(1, Ordering::SeqCst);
        Ok(*self.tabs.lock().unwrap())
    }

    async fn switch_tab(&self, page_id: i64) -> Result<(), SessionError> {
        self.record(format!("switch_tab {page_id}"));
        Ok(())
    }

    async fn open_tab(&self, url: &str) -> Result<(), SessionError> {
        self.record(format!("open_tab {url}"));
        *self.tabs.lock().unwrap() += 1;
        Ok(())
    }

    async fn input_text(&self, index: usize, text: &str) -> Result<(), SessionError> {
        self.record(format!("input {index} {text}"));
        Ok(())
    }

    async fn page_html(&self) -> Result<String, SessionError> {
        Ok(self.html.clone())
    }

    async fn scroll(
        &self,
        direction: ScrollDirection,
        pixels: Option<u32>,
    ) -> Result<(), SessionError> {
        let amount = pixels.map_or_else(|| "page".to_string(), |p| p.to_string());
        self.record(format!("scroll {} {amount}", direction.as_str()));
        Ok(())
    }

    async fn press_keys(&self, keys: &str) -> Result<(), SessionError> {
        if self.reject_combos && keys.chars().count() > 1 {
            return Err(SessionError::unknown_key(keys));
        }
        self.record(format!("press {keys}"));
        Ok(())
    }

    async fn scroll_to_text(&self, text: &str) -> Result<bool, SessionError> {
        self.record(format!("scroll_to_text {text}"));
        Ok(self.text_visible)
    }

    async fn dropdown_options(&self, _index: usize) -> Result<Vec<DropdownOption>, SessionError> {
        match self.options_error {
            Some(ref message) => Err(SessionError::other(message.clone())),
            None => Ok(self.options.clone()),
        }
    }

    async fn select_dropdown_option(
        &self,
        index: usize,
        text: &str,
    ) -> Result<Vec<String>, SessionError> {
        self.record(format!("select {index} {text}"));
        Ok(self
            .options
            .iter()
            .filter(|option| option.text == text)
            .map(|option| option.value.clone())
            .collect())
    }

    async fn upload_file(&self, index: usize, path: &Path) -> Result<(), SessionError> {
        self.record(format!("upload {index} {}", path.display()));
        Ok(())
    }
}

#[derive(Debug)]
pub(crate) struct FakeLlm {
    reply: Result<String, SessionError>,
    prompts: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub(crate) fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(SessionError::other(message)),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExtractionModel for FakeLlm {
    async fn complete(&self, prompt: &str) -> Result<String, SessionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()
    }
}
