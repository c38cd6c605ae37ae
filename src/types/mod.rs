//! Identifier types shared across the crate.

mod dispatch_id;

pub use dispatch_id::{DispatchId, InvalidDispatchId};
