//! Error types for task operations.
//!
//! The only failure this crate reports is caller misuse: modifying or
//! cancelling a task that has already reached a terminal state. Rejections
//! of the inner operation are ordinary outcomes and are delivered through
//! the rejection callback instead.

use crate::core::TaskState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// A caller-facing operation that is only valid while a task is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOperation {
    /// Registration of fulfillment/rejection callbacks.
    Then,
    /// Registration of the rejection callback.
    Catch,
    /// Registration of the settlement callback.
    Finally,
    /// Cancellation request.
    Cancel,
}

impl fmt::Display for TaskOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Then => write!(f, "then"),
            Self::Catch => write!(f, "catch"),
            Self::Finally => write!(f, "finally"),
            Self::Cancel => write!(f, "cancel"),
        }
    }
}

/// Error raised when an operation is attempted on a task that is no longer pending.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot modify a settled task: {operation} called in state '{state}'")]
pub struct InvalidStateError {
    /// The rejected operation.
    pub operation: TaskOperation,
    /// The state the task was in.
    pub state: TaskState,
}

impl InvalidStateError {
    /// Creates a new invalid state error.
    #[must_use]
    pub fn new(operation: TaskOperation, state: TaskState) -> Self {
        Self { operation, state }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!("InvalidStateError"));
        map.insert("operation".to_string(), serde_json::json!(self.operation.to_string()));
        map.insert("state".to_string(), serde_json::json!(self.state.to_string()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}
