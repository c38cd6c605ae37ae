//! Per-call resource bundle.
//!
//! A `Context` only borrows long-lived resources through `Arc`s; the
//! dispatcher reads from it and never mutates or keeps it.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::session::{BrowserSession, ExtractionModel};

/// Names a resource an action may declare in `required_resources`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKey {
    /// The browser automation session
    Session,
    /// The content-extraction language model
    PageExtractionLlm,
    /// Map of secret placeholder names to real values
    SensitiveData,
    /// Files the action may upload
    AvailableFilePaths,
    /// Opaque caller-supplied state
    State,
}

impl ResourceKey {
    /// Every key, in declaration order.
    pub const ALL: [ResourceKey; 5] = [
        Self::Session,
        Self::PageExtractionLlm,
        Self::SensitiveData,
        Self::AvailableFilePaths,
        Self::State,
    ];

    /// Snake-case name used in errors and configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::PageExtractionLlm => "page_extraction_llm",
            Self::SensitiveData => "sensitive_data",
            Self::AvailableFilePaths => "available_file_paths",
            Self::State => "state",
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared resources for one dispatch.
///
/// Cloning is cheap; every resource is reference counted.
///
/// # Example
///
/// ```rust
/// use acton_actions::context::{Context, ResourceKey};
/// use std::collections::HashMap;
///
/// let ctx = Context::new()
///     .with_sensitive_data(HashMap::from([("pw".to_string(), "hunter2".to_string())]));
///
/// assert!(ctx.has(ResourceKey::SensitiveData));
/// assert!(!ctx.has(ResourceKey::Session));
/// ```
#[derive(Clone, Default)]
pub struct Context {
    session: Option<Arc<dyn BrowserSession>>,
    page_extraction_llm: Option<Arc<dyn ExtractionModel>>,
    sensitive_data: Option<Arc<HashMap<String, String>>>,
    available_file_paths: Option<Arc<Vec<PathBuf>>>,
    state: Option<Arc<dyn Any + Send + Sync>>,
}

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a browser session.
    #[must_use]
    pub fn with_session(mut self, session: Arc<dyn BrowserSession>) -> Self {
        self.session = Some(session);
        self
    }

    /// Attaches the content-extraction model.
    #[must_use]
    pub fn with_page_extraction_llm(mut self, llm: Arc<dyn ExtractionModel>) -> Self {
        self.page_extraction_llm = Some(llm);
        self
    }

    /// Attaches the secret placeholder map.
    #[must_use]
    pub fn with_sensitive_data(mut self, data: HashMap<String, String>) -> Self {
        self.sensitive_data = Some(Arc::new(data));
        self
    }

    /// Attaches the list of files actions may upload.
    #[must_use]
    pub fn with_available_file_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.available_file_paths = Some(Arc::new(paths.into_iter().map(Into::into).collect()));
        self
    }

    /// Attaches opaque caller state. Handlers downcast it back.
    #[must_use]
    pub fn with_state<T>(mut self, state: Arc<T>) -> Self
    where
        T: Any + Send + Sync,
    {
        let state: Arc<dyn Any + Send + Sync> = state;
        self.state = Some(state);
        self
    }

    /// Returns true if the context provides the resource.
    #[must_use]
    pub fn has(&self, key: ResourceKey) -> bool {
        match key {
            ResourceKey::Session => self.session.is_some(),
            ResourceKey::PageExtractionLlm => self.page_extraction_llm.is_some(),
            ResourceKey::SensitiveData => self.sensitive_data.is_some(),
            ResourceKey::AvailableFilePaths => self.available_file_paths.is_some(),
            ResourceKey::State => self.state.is_some(),
        }
    }

    /// The browser session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&Arc<dyn BrowserSession>> {
        self.session.as_ref()
    }

    /// The extraction model, if any.
    #[must_use]
    pub fn page_extraction_llm(&self) -> Option<&Arc<dyn ExtractionModel>> {
        self.page_extraction_llm.as_ref()
    }

    /// The secret placeholder map, if any.
    #[must_use]
    pub fn sensitive_data(&self) -> Option<&Arc<HashMap<String, String>>> {
        self.sensitive_data.as_ref()
    }

    /// The uploadable files, if any.
    #[must_use]
    pub fn available_file_paths(&self) -> Option<&Arc<Vec<PathBuf>>> {
        self.available_file_paths.as_ref()
    }

    /// The opaque caller state, if any.
    #[must_use]
    pub fn state(&self) -> Option<&Arc<dyn Any + Send + Sync>> {
        self.state.as_ref()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secret values never reach logs.
        f.debug_struct("Context")
            .field("session", &self.session)
            .field("page_extraction_llm", &self.page_extraction_llm)
            .field(
                "sensitive_data",
                &self
                    .sensitive_data
                    .as_ref()
                    .map(|data| data.keys().cloned().collect::<Vec<_>>()),
            )
            .field("available_file_paths", &self.available_file_paths)
            .field("state", &self.state.is_some())
            .finish()
    }
}
