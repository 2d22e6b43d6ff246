//! Task state enum.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle state of a [`CancellableTask`](crate::task::CancellableTask).
///
/// A task starts in [`TaskState::Pending`] and moves to exactly one of the
/// terminal states. There is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// The inner operation has not settled and the task was not cancelled.
    #[default]
    Pending,
    /// The inner operation completed with a value.
    Fulfilled,
    /// The inner operation completed with a rejection reason.
    Rejected,
    /// The task was cancelled before the inner operation settled.
    Cancelled,
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Fulfilled => write!(f, "fulfilled"),
            Self::Rejected => write!(f, "rejected"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl TaskState {
    /// Returns true if no further transition is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns true if the inner operation settled (fulfilled or rejected).
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Fulfilled | Self::Rejected)
    }

    /// Returns true if the task was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
