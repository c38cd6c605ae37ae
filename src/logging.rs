//! Tracing subscriber setup.
//!
//! Logs always go to stderr. File logging with daily rotation is opt-in and
//! writes to an XDG-compliant location unless `log_dir` is set. `RUST_LOG`
//! overrides the configured level when present.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Logging configuration.
///
/// # Example
///
/// ```rust
/// use acton_actions::logging::{LogLevel, LoggingConfig};
///
/// let config = LoggingConfig::new()
///     .with_app_name("shopping-agent")
///     .with_level(LogLevel::Debug)
///     .with_log_dir("/tmp/agent-logs");
///
/// assert!(config.to_file);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether to install a subscriber at all.
    pub enabled: bool,
    /// The application name used for log file naming.
    pub app_name: String,
    /// Level used when `RUST_LOG` is unset.
    pub level: LogLevel,
    /// Also write to a daily rolling file.
    pub to_file: bool,
    /// Custom log directory. If None, uses XDG data dir + "acton-actions/logs".
    pub log_dir: Option<PathBuf>,
}

impl LoggingConfig {
    /// Creates a new LoggingConfig with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a disabled logging configuration.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Sets the application name for log file naming.
    #[must_use]
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// Sets a custom log directory and turns file logging on.
    #[must_use]
    pub fn with_log_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(path.into());
        self.to_file = true;
        self
    }

    /// Sets the log level filter.
    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            app_name: "acton-actions".to_string(),
            level: LogLevel::default(),
            to_file: false,
            log_dir: None,
        }
    }
}

/// Log level filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level - most verbose.
    Trace,
    /// Debug level.
    Debug,
    /// Info level - default.
    #[default]
    Info,
    /// Warn level.
    Warn,
    /// Error level - least verbose.
    Error,
}

impl LogLevel {
    /// Converts to tracing_subscriber LevelFilter.
    #[must_use]
    pub fn to_filter(self) -> tracing_subscriber::filter::LevelFilter {
        match self {
            Self::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
            Self::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
            Self::Info => tracing_subscriber::filter::LevelFilter::INFO,
            Self::Warn => tracing_subscriber::filter::LevelFilter::WARN,
            Self::Error => tracing_subscriber::filter::LevelFilter::ERROR,
        }
    }
}

/// Guard that must be held to keep file logging flushing.
///
/// Holds nothing when file logging is off.
pub struct LoggingGuard {
    _guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

impl fmt::Debug for LoggingGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingGuard")
            .field("file", &self._guard.is_some())
            .finish()
    }
}

static LOGGING_GUARD: std::sync::OnceLock<LoggingGuard> = std::sync::OnceLock::new();

/// Errors that can occur during logging initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingError {
    /// The specific error that occurred.
    pub kind: LoggingErrorKind,
}

/// Specific logging error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingErrorKind {
    /// Failed to determine XDG data directory.
    NoDataDir,
    /// Failed to create log directory.
    CreateDirFailed {
        /// The path that could not be created.
        path: PathBuf,
        /// The reason for failure.
        reason: String,
    },
    /// Subscriber initialization failed.
    SubscriberInitFailed {
        /// The reason for failure.
        reason: String,
    },
}

impl LoggingError {
    /// Creates a new LoggingError with the given kind.
    #[must_use]
    pub fn new(kind: LoggingErrorKind) -> Self {
        Self { kind }
    }

    /// Creates an error for missing XDG data directory.
    #[must_use]
    pub fn no_data_dir() -> Self {
        Self::new(LoggingErrorKind::NoDataDir)
    }

    /// Creates an error for failed directory creation.
    #[must_use]
    pub fn create_dir_failed(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::new(LoggingErrorKind::CreateDirFailed {
            path,
            reason: reason.into(),
        })
    }

    /// Creates an error for subscriber initialization failure.
    #[must_use]
    pub fn subscriber_init_failed(reason: impl Into<String>) -> Self {
        Self::new(LoggingErrorKind::SubscriberInitFailed {
            reason: reason.into(),
        })
    }

    /// Returns true if a global subscriber was already installed.
    #[must_use]
    pub fn is_subscriber_init_failed(&self) -> bool {
        matches!(self.kind, LoggingErrorKind::SubscriberInitFailed { .. })
    }
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LoggingErrorKind::NoDataDir => {
                write!(
                    f,
                    "could not determine XDG data directory; \
                     set XDG_DATA_HOME or use a custom log_dir"
                )
            }
            LoggingErrorKind::CreateDirFailed { path, reason } => {
                write!(
                    f,
                    "failed to create log directory '{}': {}; check permissions",
                    path.display(),
                    reason
                )
            }
            LoggingErrorKind::SubscriberInitFailed { reason } => {
                write!(
                    f,
                    "failed to initialize tracing subscriber: {}; \
                     a subscriber may already be set",
                    reason
                )
            }
        }
    }
}

impl std::error::Error for LoggingError {}

/// Returns the directory log files are written to.
///
/// # Errors
///
/// Returns `NoDataDir` if no custom directory is set and the XDG data
/// directory cannot be determined.
pub fn log_dir(config: &LoggingConfig) -> Result<PathBuf, LoggingError> {
    if let Some(ref custom_dir) = config.log_dir {
        return Ok(custom_dir.clone());
    }

    dirs::data_local_dir()
        .map(|dir| dir.join("acton-actions").join("logs"))
        .ok_or_else(LoggingError::no_data_dir)
}

/// Installs the global tracing subscriber.
///
/// # Returns
///
/// `Ok(Some(LoggingGuard))` if a subscriber was installed.
/// `Ok(None)` if logging is disabled in config.
/// `Err(LoggingError)` if the log directory is unusable or a subscriber is
/// already installed.
///
/// # Example
///
/// ```rust,ignore
/// use acton_actions::logging::{init_logging, LoggingConfig};
///
/// let _guard = init_logging(&LoggingConfig::default())?;
/// // File output keeps flushing while _guard is held
/// ```
pub fn init_logging(config: &LoggingConfig) -> Result<Option<LoggingGuard>, LoggingError> {
    if !config.enabled {
        return Ok(None);
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(config.level.to_filter().into()));

    let (file_layer, guard) = if config.to_file {
        let dir = log_dir(config)?;
        std::fs::create_dir_all(&dir)
            .map_err(|e| LoggingError::create_dir_failed(dir.clone(), e.to_string()))?;

        let file_appender =
            tracing_appender::rolling::daily(&dir, format!("{}.log", config.app_name));
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::subscriber_init_failed(e.to_string()))?;

    Ok(Some(LoggingGuard { _guard: guard }))
}

/// Installs the subscriber once and keeps the guard for the process lifetime.
///
/// Returns `Ok(false)` if logging is disabled or was already installed here.
pub fn init_and_store_logging(config: &LoggingConfig) -> Result<bool, LoggingError> {
    if LOGGING_GUARD.get().is_some() {
        return Ok(false);
    }

    match init_logging(config)? {
        Some(guard) => {
            let _ = LOGGING_GUARD.set(guard);
            Ok(true)
        }
        None => Ok(false),
    }
}
