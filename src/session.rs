//! External collaborators the built-in actions drive.
//!
//! The dispatcher itself never touches these traits; only handlers do, and
//! only after declaring the matching `ResourceKey`. Implementations live in
//! the embedding application (a CDP driver, a Playwright bridge, a test
//! double).

use async_trait::async_trait;
use std::fmt;
use std::path::Path;

use crate::error::ActionError;

/// Snapshot of one interactive element from the current page's selector map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementInfo {
    /// Highlight index the reasoning engine refers to
    pub index: usize,
    /// Lowercase tag name (`button`, `select`, ...)
    pub tag_name: String,
    /// Visible text up to the next interactive element
    pub text: String,
    /// XPath of the element, if the driver tracks one
    pub xpath: Option<String>,
    /// Whether clicking the element opens a native file chooser
    pub is_file_uploader: bool,
}

/// One option of a native `<select>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    /// Position within the dropdown
    pub index: usize,
    /// Display text
    pub text: String,
    /// Submitted value
    pub value: String,
}

/// Direction for page scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Towards the top of the page
    Up,
    /// Towards the bottom of the page
    Down,
}

impl ScrollDirection {
    /// Lowercase name used in result messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// A live browser automation session.
///
/// One session is shared mutable state with a single writer; the driving
/// loop serializes calls against it.
#[async_trait]
pub trait BrowserSession: Send + Sync + fmt::Debug {
    /// Navigates the current tab and waits for the load to settle.
    async fn navigate(&self, url: &str) -> Result<(), SessionError>;

    /// Goes back in the current tab's history.
    async fn go_back(&self) -> Result<(), SessionError>;

    /// Looks up an element of the current selector map.
    async fn element(&self, index: usize) -> Result<Option<ElementInfo>, SessionError>;

    /// Clicks an element. Returns the saved path if the click started a download.
    async fn click_element(&self, index: usize) -> Result<Option<String>, SessionError>;

    /// Number of open tabs.
    async fn tab_count(&self) -> Result<usize, SessionError>;

    /// Switches to a tab. Negative ids count from the end, `-1` is the newest tab.
    async fn switch_tab(&self, page_id: i64) -> Result<(), SessionError>;

    /// Opens a new tab at the given URL and focuses it.
    async fn open_tab(&self, url: &str) -> Result<(), SessionError>;

    /// Types text into an input element.
    async fn input_text(&self, index: usize, text: &str) -> Result<(), SessionError>;

    /// Full HTML of the current page.
    async fn page_html(&self) -> Result<String, SessionError>;

    /// Scrolls by `pixels`, or by one viewport height when `None`.
    async fn scroll(&self, direction: ScrollDirection, pixels: Option<u32>)
        -> Result<(), SessionError>;

    /// Sends a key or key combination such as `Escape` or `Control+a`.
    async fn press_keys(&self, keys: &str) -> Result<(), SessionError>;

    /// Scrolls the first element containing `text` into view.
    ///
    /// Returns false if no visible element matched.
    async fn scroll_to_text(&self, text: &str) -> Result<bool, SessionError>;

    /// Options of the `<select>` at `index`.
    async fn dropdown_options(&self, index: usize) -> Result<Vec<DropdownOption>, SessionError>;

    /// Selects the option whose text matches exactly. Returns the selected values.
    async fn select_dropdown_option(
        &self,
        index: usize,
        text: &str,
    ) -> Result<Vec<String>, SessionError>;

    /// Sets the file of a file input element.
    async fn upload_file(&self, index: usize, path: &Path) -> Result<(), SessionError>;
}

/// The language model used to pull targeted information out of page text.
#[async_trait]
pub trait ExtractionModel: Send + Sync + fmt::Debug {
    /// Sends a single prompt and returns the completion text.
    async fn complete(&self, prompt: &str) -> Result<String, SessionError>;
}

/// Failure reported by a session or extraction model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionError {
    kind: SessionErrorKind,
}

/// Specific session failure types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionErrorKind {
    /// No element with that index in the current selector map
    ElementNotFound {
        /// The requested index
        index: usize,
    },
    /// The driver does not recognize a key name
    UnknownKey {
        /// The rejected key
        key: String,
    },
    /// Navigation failed or timed out
    Navigation {
        /// Target URL
        url: String,
        /// Driver message
        reason: String,
    },
    /// Any other driver or model failure
    Other {
        /// Driver message
        message: String,
    },
}

impl SessionError {
    /// Creates a new SessionError with the given kind.
    #[must_use]
    pub fn new(kind: SessionErrorKind) -> Self {
        Self { kind }
    }

    /// Returns a reference to the error kind.
    #[must_use]
    pub fn kind(&self) -> &SessionErrorKind {
        &self.kind
    }

    /// Creates an element-not-found error.
    #[must_use]
    pub fn element_not_found(index: usize) -> Self {
        Self::new(SessionErrorKind::ElementNotFound { index })
    }

    /// Creates an unknown-key error.
    #[must_use]
    pub fn unknown_key(key: impl Into<String>) -> Self {
        Self::new(SessionErrorKind::UnknownKey { key: key.into() })
    }

    /// Creates a navigation error.
    #[must_use]
    pub fn navigation(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(SessionErrorKind::Navigation {
            url: url.into(),
            reason: reason.into(),
        })
    }

    /// Creates a generic driver error.
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(SessionErrorKind::Other {
            message: message.into(),
        })
    }

    /// Returns true if the driver rejected a key name.
    #[must_use]
    pub fn is_unknown_key(&self) -> bool {
        matches!(self.kind, SessionErrorKind::UnknownKey { .. })
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SessionErrorKind::ElementNotFound { index } => {
                write!(
                    f,
                    "Element with index {index} does not exist - retry or use alternative actions"
                )
            }
            SessionErrorKind::UnknownKey { key } => write!(f, "Unknown key: \"{key}\""),
            SessionErrorKind::Navigation { url, reason } => {
                write!(f, "navigation to '{url}' failed: {reason}")
            }
            SessionErrorKind::Other { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<SessionError> for ActionError {
    fn from(err: SessionError) -> Self {
        ActionError::handler_failed(err.to_string())
    }
}
