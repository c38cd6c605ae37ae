//! Action definitions and handler traits.
//!
//! An action is an `ActionSpec` (name, description, parameters, resource
//! needs) plus the `ActionHandler` that runs it.

mod handler;
mod spec;

pub use handler::{
    handler_fn, ActionHandler, FnHandler, HandlerFuture, HandlerOutput, HandlerResult,
};
pub use spec::ActionSpec;
