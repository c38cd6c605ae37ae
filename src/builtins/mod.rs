//! Built-in browser actions.
//!
//! Every action here is implemented against [`BrowserSession`] and declares
//! the resources it needs, so the same set works with any driver.
//!
//! ## Available Actions
//!
//! ### Completion
//! - **done**: Finish the task, with free text or a structured output
//!
//! ### Navigation
//! - **search_google**, **go_to_url**, **go_back**
//! - **switch_tab**, **open_tab**
//!
//! ### Interaction
//! - **click_element**, **input_text**, **send_keys**
//! - **get_dropdown_options**, **select_dropdown_option**
//! - **upload_file**: Restricted to the context's allowed-file list
//!
//! ### Content
//! - **extract_content**: Page text filtered through an extraction model
//! - **scroll_down**, **scroll_up**, **scroll_to_text**
//!
//! ## Usage
//!
//! ```rust
//! use acton_actions::builtins::BuiltinActions;
//!
//! let builtins = BuiltinActions::all(None);
//! assert!(builtins.names().any(|name| name == "go_to_url"));
//!
//! let subset = BuiltinActions::select(&["go_to_url", "done"], None).unwrap();
//! assert_eq!(subset.len(), 2);
//! ```

mod content;
mod done;
mod dropdown;
mod interaction;
mod navigation;
mod tabs;
mod upload;

#[cfg(test)]
pub(crate) mod testing;

pub use content::{ExtractContentAction, ScrollAction, ScrollToTextAction};
pub use done::DoneAction;
pub use dropdown::{GetDropdownOptionsAction, SelectDropdownOptionAction};
pub use interaction::{ClickElementAction, InputTextAction, SendKeysAction};
pub use navigation::{GoBackAction, GoToUrlAction, SearchGoogleAction};
pub use tabs::{OpenTabAction, SwitchTabAction};
pub use upload::UploadFileAction;

use crate::action::ActionSpec;
use crate::error::ActionError;
use crate::schema::{ParamField, ParamSchema, ParamType};
use crate::session::{BrowserSession, ElementInfo, SessionError};

/// Required element index. Negative indexes fail validation.
pub(crate) fn index_field() -> ParamField {
    ParamField::required("index", ParamType::Integer).with_minimum(0)
}

/// Looks up an element, turning a missing index into a handler failure.
pub(crate) async fn require_element(
    session: &dyn BrowserSession,
    index: usize,
) -> Result<ElementInfo, ActionError> {
    session
        .element(index)
        .await?
        .ok_or_else(|| SessionError::element_not_found(index).into())
}

/// The default action set, in registration order.
#[derive(Debug, Clone, Default)]
pub struct BuiltinActions {
    specs: Vec<ActionSpec>,
}

impl BuiltinActions {
    /// All built-in actions. `output` becomes the parameter schema of `done`.
    #[must_use]
    pub fn all(output: Option<ParamSchema>) -> Self {
        Self {
            specs: vec![
                DoneAction::spec(output),
                SearchGoogleAction::spec(),
                GoToUrlAction::spec(),
                GoBackAction::spec(),
                ClickElementAction::spec(),
                InputTextAction::spec(),
                SwitchTabAction::spec(),
                OpenTabAction::spec(),
                ExtractContentAction::spec(),
                ScrollAction::down(),
                ScrollAction::up(),
                SendKeysAction::spec(),
                ScrollToTextAction::spec(),
                GetDropdownOptionsAction::spec(),
                SelectDropdownOptionAction::spec(),
                UploadFileAction::spec(),
            ],
        }
    }

    /// Only the named built-ins, in the order given.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAction` for a name that is not a built-in.
    pub fn select(names: &[&str], output: Option<ParamSchema>) -> Result<Self, ActionError> {
        let all = Self::all(output);
        let specs = names
            .iter()
            .map(|name| {
                all.specs
                    .iter()
                    .find(|spec| spec.name() == *name)
                    .cloned()
                    .ok_or_else(|| ActionError::unknown_action(*name, None))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { specs })
    }

    /// Names of every built-in action.
    #[must_use]
    pub fn available() -> Vec<&'static str> {
        vec![
            "done",
            "search_google",
            "go_to_url",
            "go_back",
            "click_element",
            "input_text",
            "switch_tab",
            "open_tab",
            "extract_content",
            "scroll_down",
            "scroll_up",
            "send_keys",
            "scroll_to_text",
            "get_dropdown_options",
            "select_dropdown_option",
            "upload_file",
        ]
    }

    /// Names in this set.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(ActionSpec::name)
    }

    /// Number of actions in this set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Consumes the set, yielding specs for registration.
    #[must_use]
    pub fn into_specs(self) -> Vec<ActionSpec> {
        self.specs
    }
}
