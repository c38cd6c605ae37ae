//! Integration tests for acton-actions.
//!
//! These tests drive the public API end to end:
//! - Registration, exclusion, and schema export
//! - Dispatch against a recording browser session
//! - Failure folding and fatal contract violations

use acton_actions::builtins::{ClickElementAction, GoToUrlAction};
use acton_actions::prelude::*;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Browser double that records every call it receives.
#[derive(Debug, Default)]
struct RecordingSession {
    calls: Mutex<Vec<String>>,
    elements: HashMap<usize, ElementInfo>,
}

impl RecordingSession {
    fn with_button(mut self, index: usize, text: &str) -> Self {
        self.elements.insert(
            index,
            ElementInfo {
                index,
                tag_name: "button".to_string(),
                text: text.to_string(),
                xpath: None,
                is_file_uploader: false,
            },
        );
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with(prefix))
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BrowserSession for RecordingSession {
    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        self.record(format!("navigate {url}"));
        Ok(())
    }

    async fn go_back(&self) -> Result<(), SessionError> {
        self.record("go_back".to_string());
        Ok(())
    }

    async fn element(&self, index: usize) -> Result<Option<ElementInfo>, SessionError> {
        Ok(self.elements.get(&index).cloned())
    }

    async fn click_element(&self, index: usize) -> Result<Option<String>, SessionError> {
        self.record(format!("click {index}"));
        Ok(None)
    }

    async fn tab_count(&self) -> Result<usize, SessionError> {
        Ok(1)
    }

    async fn switch_tab(&self, page_id: i64) -> Result<(), SessionError> {
        self.record(format!("switch_tab {page_id}"));
        Ok(())
    }

    async fn open_tab(&self, url: &str) -> Result<(), SessionError> {
        self.record(format!("open_tab {url}"));
        Ok(())
    }

    async fn input_text(&self, index: usize, text: &str) -> Result<(), SessionError> {
        self.record(format!("input {index} {text}"));
        Ok(())
    }

    async fn page_html(&self) -> Result<String, SessionError> {
        Ok("<html><body><p>Hello</p></body></html>".to_string())
    }

    async fn scroll(
        &self,
        direction: ScrollDirection,
        pixels: Option<u32>,
    ) -> Result<(), SessionError> {
        self.record(format!("scroll {} {pixels:?}", direction.as_str()));
        Ok(())
    }

    async fn press_keys(&self, keys: &str) -> Result<(), SessionError> {
        self.record(format!("press {keys}"));
        Ok(())
    }

    async fn scroll_to_text(&self, text: &str) -> Result<bool, SessionError> {
        self.record(format!("scroll_to_text {text}"));
        Ok(true)
    }

    async fn dropdown_options(&self, _index: usize) -> Result<Vec<DropdownOption>, SessionError> {
        Ok(Vec::new())
    }

    async fn select_dropdown_option(
        &self,
        _index: usize,
        _text: &str,
    ) -> Result<Vec<String>, SessionError> {
        Ok(Vec::new())
    }

    async fn upload_file(&self, index: usize, path: &Path) -> Result<(), SessionError> {
        self.record(format!("upload {index} {}", path.display()));
        Ok(())
    }
}

fn session_context(session: &Arc<RecordingSession>) -> Context {
    Context::new().with_session(session.clone())
}

fn counting_action(name: &str, counter: Arc<AtomicUsize>) -> ActionSpec {
    ActionSpec::new(
        name,
        "counts invocations",
        handler_fn(move |_args| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(HandlerOutput::Nothing)
            }
        }),
    )
}

fn fixed_output(name: &str, output: HandlerOutput) -> ActionSpec {
    ActionSpec::new(
        name,
        "returns a fixed output",
        handler_fn(move |_args| {
            let output = output.clone();
            async move { Ok(output) }
        }),
    )
}

// =============================================================================
// Exclusion and navigation
// =============================================================================

/// Excluded click_element is unknown while go_to_url drives the session.
#[tokio::test]
async fn test_exclusion_and_navigation() {
    let controller = Controller::builder()
        .register(GoToUrlAction::spec())
        .register(ClickElementAction::spec())
        .exclude(["click_element"])
        .build()
        .expect("registration succeeds");

    let session = Arc::new(RecordingSession::default().with_button(0, "Buy"));
    let ctx = session_context(&session);

    let err = controller
        .act(&ActionRequest::new("click_element", json!({"index": 0})), &ctx)
        .await
        .unwrap_err();
    assert!(err.is_unknown_action());
    assert!(session.calls().is_empty());

    let result = controller
        .act(
            &ActionRequest::new("go_to_url", json!({"url": "https://example.com"})),
            &ctx,
        )
        .await
        .unwrap();

    assert!(result
        .extracted_content
        .as_deref()
        .unwrap()
        .contains("https://example.com"));
    assert!(result.error.is_none());
    assert_eq!(
        session.calls_starting_with("navigate"),
        vec!["navigate https://example.com"]
    );
}

/// An excluded name and a never-registered name are indistinguishable.
#[tokio::test]
async fn test_exclusion_is_invisible() {
    let controller = Controller::builder()
        .with_default_actions()
        .exclude(["search_google"])
        .build()
        .unwrap();

    let schema = controller.action_schema();
    assert!(!schema.contains("search_google"));
    assert!(!schema.to_json_schema().to_string().contains("search_google"));
    assert!(!schema.prompt_description().contains("search_google"));

    let ctx = Context::new();
    let excluded = controller
        .act(&ActionRequest::new("search_google", json!({"query": "q"})), &ctx)
        .await
        .unwrap_err();
    let never = controller
        .act(&ActionRequest::new("search_bing", json!({"query": "q"})), &ctx)
        .await
        .unwrap_err();

    assert!(excluded.is_unknown_action());
    assert!(never.is_unknown_action());
    assert_eq!(
        excluded.kind(),
        &ActionErrorKind::UnknownAction {
            action: "search_google".to_string(),
            suggestion: None,
        }
    );
}

// =============================================================================
// Missing dependency
// =============================================================================

/// A declared resource absent from the context is a recoverable error and the
/// handler never runs.
#[tokio::test]
async fn test_missing_dependency_skips_handler() {
    let counter = Arc::new(AtomicUsize::new(0));
    let controller = Controller::builder()
        .register(
            counting_action("input_text", counter.clone())
                .with_params(
                    ParamSchema::new()
                        .required("index", ParamType::Integer)
                        .required("text", ParamType::String),
                )
                .requires(ResourceKey::Session),
        )
        .build()
        .unwrap();

    let result = controller
        .act(
            &ActionRequest::new("input_text", json!({"index": 1, "text": "hi"})),
            &Context::new(),
        )
        .await
        .unwrap();

    assert!(!result.is_done);
    let error = result.error.expect("missing dependency is reported");
    assert!(error.contains("input_text"));
    assert!(error.contains("'session'"));
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Dispatch laws
// =============================================================================

/// An envelope returned by a handler comes back unchanged, exactly once.
#[tokio::test]
async fn test_pass_through_envelope() {
    let envelope = ActionResult {
        is_done: false,
        extracted_content: Some("custom".to_string()),
        error: None,
        include_in_memory: true,
    };
    let controller = Controller::builder()
        .register(fixed_output("custom", HandlerOutput::Result(envelope.clone())))
        .build()
        .unwrap();

    let result = controller
        .act(&ActionRequest::new("custom", json!({})), &Context::new())
        .await
        .unwrap();
    assert_eq!(result, envelope);
}

/// The handler runs exactly once per call.
#[tokio::test]
async fn test_handler_invoked_once_per_call() {
    let counter = Arc::new(AtomicUsize::new(0));
    let controller = Controller::builder()
        .register(counting_action("tick", counter.clone()))
        .build()
        .unwrap();

    let request = ActionRequest::new("tick", json!({}));
    for expected in 1..=3 {
        controller.act(&request, &Context::new()).await.unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), expected);
    }
}

/// A payload missing a required field never reaches the handler.
#[tokio::test]
async fn test_validate_before_call() {
    let counter = Arc::new(AtomicUsize::new(0));
    let controller = Controller::builder()
        .register(
            counting_action("go_to_url", counter.clone())
                .with_params(ParamSchema::new().required("url", ParamType::String)),
        )
        .build()
        .unwrap();

    let result = controller
        .act(&ActionRequest::new("go_to_url", json!({})), &Context::new())
        .await
        .unwrap();

    assert!(!result.is_done);
    assert!(result.error.unwrap().contains("missing required field"));
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

/// An integer outside its declared bounds never reaches the handler.
#[tokio::test]
async fn test_bounded_integer_validated_before_call() {
    let counter = Arc::new(AtomicUsize::new(0));
    let controller = Controller::builder()
        .register(
            counting_action("pick", counter.clone()).with_params(
                ParamSchema::new()
                    .field(ParamField::required("index", ParamType::Integer).with_minimum(0)),
            ),
        )
        .build()
        .unwrap();

    let result = controller
        .act(&ActionRequest::new("pick", json!({"index": -1})), &Context::new())
        .await
        .unwrap();

    assert!(!result.is_done);
    assert!(result.error.unwrap().contains("must be at least 0, found -1"));
    assert_eq!(counter.load(Ordering::SeqCst), 0);

    controller
        .act(&ActionRequest::new("pick", json!({"index": 0})), &Context::new())
        .await
        .unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

/// A negative element index is refused before the browser is touched.
#[tokio::test]
async fn test_click_negative_index_skips_session() {
    let controller = Controller::builder()
        .register(ClickElementAction::spec())
        .build()
        .unwrap();
    let session = Arc::new(RecordingSession::default().with_button(0, "Buy"));

    let result = controller
        .act(
            &ActionRequest::new("click_element", json!({"index": -1})),
            &session_context(&session),
        )
        .await
        .unwrap();

    let error = result.error.unwrap();
    assert!(error.contains("field 'index'"));
    assert!(!error.contains("usize"));
    assert!(session.calls().is_empty());
}

/// Unknown fields are rejected by default and ignored by the lenient policy.
#[tokio::test]
async fn test_validation_policy_controls_unknown_fields() {
    let session = Arc::new(RecordingSession::default());
    let ctx = session_context(&session);
    let request = ActionRequest::new(
        "go_to_url",
        json!({"url": "https://example.com", "new_tab": true}),
    );

    let strict = Controller::builder()
        .register(GoToUrlAction::spec())
        .build()
        .unwrap();
    let result = strict.act(&request, &ctx).await.unwrap();
    assert!(result.error.unwrap().contains("new_tab"));
    assert!(session.calls().is_empty());

    let lenient = Controller::builder()
        .validation_policy(ValidationPolicy::lenient())
        .register(GoToUrlAction::spec())
        .build()
        .unwrap();
    let result = lenient.act(&request, &ctx).await.unwrap();
    assert!(result.error.is_none());
    assert_eq!(session.calls(), vec!["navigate https://example.com"]);
}

/// Handler failures become envelopes and later calls still work.
#[tokio::test]
async fn test_handler_failure_is_recoverable() {
    let controller = Controller::builder()
        .register(ActionSpec::new(
            "flaky",
            "fails",
            handler_fn(|_args| async { Err(ActionError::handler_failed("upstream timed out")) }),
        ))
        .register(ActionSpec::new(
            "crashy",
            "panics",
            handler_fn(|args| async move {
                let index = args.param("index").and_then(Value::as_u64).unwrap_or(0);
                let items: Vec<u64> = Vec::new();
                Ok(HandlerOutput::Text(items[index as usize].to_string()))
            })
        )
        .with_params(ParamSchema::new().optional("index", ParamType::Integer)))
        .register(fixed_output("ok", HandlerOutput::from("fine")))
        .build()
        .unwrap();
    let ctx = Context::new();

    let failed = controller
        .act(&ActionRequest::new("flaky", json!({})), &ctx)
        .await
        .unwrap();
    assert_eq!(failed.error.as_deref(), Some("upstream timed out"));
    assert!(!failed.is_done);

    let panicked = controller
        .act(&ActionRequest::new("crashy", json!({"index": 3})), &ctx)
        .await
        .unwrap();
    assert!(panicked.error.unwrap().contains("index out of bounds"));

    let ok = controller
        .act(&ActionRequest::new("ok", json!({})), &ctx)
        .await
        .unwrap();
    assert_eq!(ok.extracted_content.as_deref(), Some("fine"));
}

/// No return value yields an empty successful envelope.
#[tokio::test]
async fn test_empty_return() {
    let controller = Controller::builder()
        .register(fixed_output("noop", HandlerOutput::Nothing))
        .build()
        .unwrap();

    let result = controller
        .act(&ActionRequest::new("noop", json!({})), &Context::new())
        .await
        .unwrap();
    assert!(!result.is_done);
    assert!(result.error.is_none());
    assert!(result.extracted_content.is_none());
}

/// An unsupported return shape is fatal and tagged with the dispatch id.
#[tokio::test]
async fn test_invalid_handler_result_is_fatal() {
    let controller = Controller::builder()
        .register(fixed_output("count", HandlerOutput::Json(json!([1, 2, 3]))))
        .build()
        .unwrap();

    let err = controller
        .act(&ActionRequest::new("count", json!({})), &Context::new())
        .await
        .unwrap_err();
    assert!(err.is_invalid_handler_result());
    assert!(err.is_fatal());
    let id = err.correlation_id.clone().expect("dispatch id attached");
    assert!(err.to_string().starts_with(&format!("[{id}]")));
}

/// Requests naming two actions are refused without running either.
#[tokio::test]
async fn test_multi_field_request_is_rejected() {
    let counter = Arc::new(AtomicUsize::new(0));
    let controller = Controller::builder()
        .register(counting_action("scroll_down", counter.clone()))
        .register(counting_action("go_back", counter.clone()))
        .build()
        .unwrap();

    let request = ActionRequest::from_json(r#"{"scroll_down": {}, "go_back": {}, "done": null}"#)
        .unwrap();
    let result = controller.act(&request, &Context::new()).await.unwrap();

    assert!(result.error.unwrap().contains("2 actions are populated"));
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Registration
// =============================================================================

/// A second spec with the same name fails and leaves the first in place.
#[test]
fn test_duplicate_registration() {
    let mut builder = Registry::builder();
    builder
        .register(fixed_output("echo", HandlerOutput::from("first")))
        .unwrap();
    let err = builder
        .register(fixed_output("echo", HandlerOutput::from("second")))
        .unwrap_err();
    assert!(err.is_duplicate_action());
    assert!(err.is_fatal());

    let registry = builder.build();
    assert_eq!(registry.len(), 1);
}

/// Schema export is deterministic and ordered like registration.
#[test]
fn test_schema_export_forms() {
    let controller = Controller::builder()
        .with_default_actions()
        .build()
        .unwrap();
    let schema = controller.action_schema();

    assert_eq!(schema.to_json_schema(), controller.action_schema().to_json_schema());
    assert_eq!(
        schema.names().collect::<Vec<_>>(),
        BuiltinActions::available()
    );

    let tools = schema.to_tool_definitions();
    let click = tools.iter().find(|t| t.name == "click_element").unwrap();
    assert_eq!(click.input_schema["required"], json!(["index"]));
    assert_eq!(click.input_schema["properties"]["index"]["minimum"], 0);
    let scroll = tools.iter().find(|t| t.name == "scroll_down").unwrap();
    assert_eq!(
        scroll.input_schema["properties"]["amount"]["maximum"],
        json!(u32::MAX)
    );
    assert!(schema
        .prompt_description()
        .contains("Navigate to URL in the current tab: \n{go_to_url: "));
}

// =============================================================================
// Custom actions
// =============================================================================

/// A deployment replaces search_google with its own search_web action.
#[tokio::test]
async fn test_custom_search_replaces_google() {
    let search_web = ActionSpec::new(
        "search_web",
        "Search the web for a query",
        handler_fn(|args| async move {
            let query = args.str_param("query")?.to_string();
            let url = format!("https://search.example/?q={query}");
            args.session()?.navigate(&url).await?;
            Ok(HandlerOutput::Result(ActionResult::content(
                format!("Searched for {query}"),
                true,
            )))
        }),
    )
    .with_params(ParamSchema::new().required("query", ParamType::String))
    .requires(ResourceKey::Session);

    let controller = Controller::builder()
        .with_default_actions()
        .exclude(["search_google"])
        .register(search_web)
        .build()
        .unwrap();

    let schema = controller.action_schema();
    assert!(schema.contains("search_web"));
    assert!(!schema.contains("search_google"));

    let session = Arc::new(RecordingSession::default());
    let result = controller
        .act(
            &ActionRequest::new("search_web", json!({"query": "rust"})),
            &session_context(&session),
        )
        .await
        .unwrap();

    assert_eq!(result.extracted_content.as_deref(), Some("Searched for rust"));
    assert_eq!(session.calls(), vec!["navigate https://search.example/?q=rust"]);
}

/// Secrets are substituted before the session sees them and masked after.
#[tokio::test]
async fn test_sensitive_data_round_trip() {
    let controller = Controller::builder()
        .with_default_actions()
        .build()
        .unwrap();
    let session = Arc::new(RecordingSession::default().with_button(2, ""));
    let ctx = session_context(&session).with_sensitive_data(HashMap::from([(
        "password".to_string(),
        "correct horse".to_string(),
    )]));

    let result = controller
        .act(
            &ActionRequest::new(
                "input_text",
                json!({"index": 2, "text": "<secret>password</secret>"}),
            ),
            &ctx,
        )
        .await
        .unwrap();

    assert_eq!(session.calls(), vec!["input 2 correct horse"]);
    let content = result.extracted_content.unwrap();
    assert!(!content.contains("correct horse"));
    assert!(content.contains("sensitive data"));
}

/// A structured done action validates against the output schema.
#[tokio::test]
async fn test_done_with_output_schema() {
    let controller = Controller::builder()
        .output_schema(
            ParamSchema::new()
                .required("product", ParamType::String)
                .required("in_stock", ParamType::Boolean),
        )
        .with_default_actions()
        .build()
        .unwrap();

    let result = controller
        .act(
            &ActionRequest::new("done", json!({"product": "kettle", "in_stock": true})),
            &Context::new(),
        )
        .await
        .unwrap();

    assert!(result.is_done);
    let content: Value = serde_json::from_str(&result.extracted_content.unwrap()).unwrap();
    assert_eq!(content, json!({"product": "kettle", "in_stock": true}));
}

/// One controller serves independent contexts concurrently.
#[tokio::test]
async fn test_concurrent_contexts() {
    let controller = Arc::new(
        Controller::builder()
            .with_default_actions()
            .build()
            .unwrap(),
    );

    let mut handles = Vec::new();
    for i in 0..4 {
        let controller = Arc::clone(&controller);
        handles.push(tokio::spawn(async move {
            let session = Arc::new(RecordingSession::default());
            let url = format!("https://site{i}.test");
            controller
                .act(
                    &ActionRequest::new("go_to_url", json!({ "url": url })),
                    &session_context(&session),
                )
                .await
                .unwrap();
            (url, session.calls())
        }));
    }

    for handle in handles {
        let (url, calls) = handle.await.unwrap();
        assert_eq!(calls, vec![format!("navigate {url}")]);
    }
}

/// Config files drive exclusion and validation.
#[test]
fn test_controller_from_config_file() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("acton-actions.toml");
    std::fs::write(
        &path,
        "exclude_actions = [\"upload_file\", \"extract_content\"]\n\n[validation]\nunknown_fields = \"ignore\"\n",
    )?;

    let config = acton_actions::config::from_path(&path)?;
    let controller = Controller::builder()
        .from_config(&config)
        .with_default_actions()
        .build()?;

    assert!(!controller.registry().contains("upload_file"));
    assert!(!controller.registry().contains("extract_content"));
    assert_eq!(
        controller.registry().len(),
        BuiltinActions::available().len() - 2
    );
    Ok(())
}
