//! File upload built-in action.

use serde::Deserialize;
use std::path::PathBuf;

use crate::action::{ActionHandler, ActionSpec, HandlerFuture, HandlerOutput};
use crate::binder::BoundArgs;
use crate::builtins::{index_field, require_element};
use crate::context::ResourceKey;
use crate::result::ActionResult;
use crate::schema::{ParamSchema, ParamType};

/// Sets a file on a file input element.
///
/// Only paths from the context's allowed-file list can be uploaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct UploadFileAction;

#[derive(Debug, Deserialize)]
struct UploadArgs {
    index: usize,
    path: PathBuf,
}

impl UploadFileAction {
    /// Returns the action spec.
    #[must_use]
    pub fn spec() -> ActionSpec {
        ActionSpec::new(
            "upload_file",
            "Upload file to interactive element with file path",
            Self,
        )
        .with_params(
            ParamSchema::new()
                .field(index_field())
                .required("path", ParamType::String),
        )
        .requires_all([ResourceKey::Session, ResourceKey::AvailableFilePaths])
    }
}

impl ActionHandler for UploadFileAction {
    fn call(&self, args: BoundArgs) -> HandlerFuture {
        Box::pin(async move {
            let UploadArgs { index, path } = args.params_as()?;
            if !args.available_file_paths()?.contains(&path) {
                tracing::warn!(path = %path.display(), "Upload of unlisted file refused");
                return Ok(HandlerOutput::Result(ActionResult::failure(format!(
                    "File path {} is not available",
                    path.display()
                ))));
            }

            let session = args.session()?;
            require_element(session.as_ref(), index).await?;
            session.upload_file(index, &path).await?;

            let msg = format!("📁  Successfully uploaded file to index {index}");
            tracing::info!("{msg}");
            Ok(HandlerOutput::Result(ActionResult::content(msg, true)))
        })
    }
}
