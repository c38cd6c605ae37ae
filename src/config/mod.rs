//! Configuration management.
//!
//! # Configuration File Format
//!
//! Configuration is stored in TOML format. The search order is:
//! 1. `./acton-actions.toml` (project-local)
//! 2. `~/.config/acton-actions/config.toml` (XDG config)
//!
//! # Example Configuration
//!
//! ```toml
//! # Hide actions from this deployment
//! exclude_actions = ["search_google"]
//!
//! [validation]
//! unknown_fields = "reject"   # or "ignore"
//! coerce_scalars = false
//!
//! [logging]
//! level = "info"
//! to_file = true
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use acton_actions::config;
//! use acton_actions::controller::Controller;
//!
//! let config = config::load()?;
//! let controller = Controller::builder()
//!     .from_config(&config)
//!     .with_default_actions()
//!     .build()?;
//! ```

mod file;
mod types;

pub use file::{from_path, from_str, load, search_paths, xdg_config_dir};
pub use types::ActionsConfig;
