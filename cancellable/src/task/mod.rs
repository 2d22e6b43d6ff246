//! Cancellable task wrapper.
//!
//! This module provides:
//! - CancellableTask, the one-shot state machine around an inner future
//! - Triggers for the initial callbacks
//! - Observer, the future that reports the inner outcome to its task

mod cancellable;
mod triggers;

pub use cancellable::{CancellableTask, Observer};
pub use triggers::{
    CancelledCallback, FinallyCallback, FulfilledCallback, RejectedCallback,
    StateChangedCallback, Triggers,
};
