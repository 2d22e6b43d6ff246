//! Terminal transitions and their payloads.

use super::TaskState;

/// A terminal transition together with the payload its callback receives.
///
/// Settlement (`on_finally`) is not a transition of its own: it is
/// dispatched after [`Transition::Fulfilled`] and [`Transition::Rejected`]
/// and never after [`Transition::Cancelled`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition<T, E, C> {
    /// The inner operation produced a value.
    Fulfilled(T),
    /// The inner operation produced a rejection reason.
    Rejected(E),
    /// The caller cancelled the task, with an optional cause.
    Cancelled(Option<C>),
}

impl<T, E, C> Transition<T, E, C> {
    /// Returns the state this transition leads to.
    #[must_use]
    pub fn target(&self) -> TaskState {
        match self {
            Self::Fulfilled(_) => TaskState::Fulfilled,
            Self::Rejected(_) => TaskState::Rejected,
            Self::Cancelled(_) => TaskState::Cancelled,
        }
    }

    /// Returns true if this transition is followed by the settlement callback.
    #[must_use]
    pub fn settles(&self) -> bool {
        self.target().is_settled()
    }
}

impl<T, E, C> From<Result<T, E>> for Transition<T, E, C> {
    fn from(outcome: Result<T, E>) -> Self {
        match outcome {
            Ok(value) => Self::Fulfilled(value),
            Err(reason) => Self::Rejected(reason),
        }
    }
}
