//! Construction options and callback slots.

use crate::core::TaskState;
use std::fmt;
use std::sync::Arc;

/// Invoked on every state transition with `(from, to)`.
pub type StateChangedCallback = Arc<dyn Fn(TaskState, TaskState) + Send + Sync>;
/// Invoked once when the task is cancelled, with the optional cause.
pub type CancelledCallback<C> = Box<dyn FnOnce(Option<C>) + Send>;
/// Invoked once when the inner operation produces a value.
pub type FulfilledCallback<T> = Box<dyn FnOnce(T) + Send>;
/// Invoked once when the inner operation produces a rejection reason.
pub type RejectedCallback<E> = Box<dyn FnOnce(E) + Send>;
/// Invoked once after the outcome callback of a settled (not cancelled) task.
pub type FinallyCallback = Box<dyn FnOnce() + Send>;

/// Initial callbacks and options for a [`CancellableTask`](super::CancellableTask).
///
/// `on_state_changed` and `on_cancelled` are fixed for the lifetime of the
/// task. The other three can be replaced later with `then`, `catch` and
/// `finally` while the task is still pending.
///
/// ```
/// use cancellable::task::Triggers;
///
/// let triggers: Triggers<u32, String, &str> = Triggers::new()
///     .with_name("fetch-profile")
///     .with_on_fulfilled(|value| println!("got {value}"))
///     .with_on_cancelled(|cause| println!("cancelled: {cause:?}"));
/// ```
pub struct Triggers<T, E, C> {
    pub(crate) name: Option<String>,
    pub(crate) on_state_changed: Option<StateChangedCallback>,
    pub(crate) on_cancelled: Option<CancelledCallback<C>>,
    pub(crate) slots: CallbackSlots<T, E>,
}

impl<T, E, C> Default for Triggers<T, E, C> {
    fn default() -> Self {
        Self {
            name: None,
            on_state_changed: None,
            on_cancelled: None,
            slots: CallbackSlots::default(),
        }
    }
}

impl<T, E, C> Triggers<T, E, C> {
    /// Creates an empty set of triggers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates triggers with only a fulfillment callback.
    #[must_use]
    pub fn fulfilled<F>(on_fulfilled: F) -> Self
    where
        F: FnOnce(T) + Send + 'static,
    {
        Self::new().with_on_fulfilled(on_fulfilled)
    }

    /// Sets a label used in logs and snapshots.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the state change observer.
    #[must_use]
    pub fn with_on_state_changed<F>(mut self, callback: F) -> Self
    where
        F: Fn(TaskState, TaskState) + Send + Sync + 'static,
    {
        self.on_state_changed = Some(Arc::new(callback));
        self
    }

    /// Sets the cancellation callback.
    #[must_use]
    pub fn with_on_cancelled<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(Option<C>) + Send + 'static,
    {
        self.on_cancelled = Some(Box::new(callback));
        self
    }

    /// Sets the fulfillment callback.
    #[must_use]
    pub fn with_on_fulfilled<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(T) + Send + 'static,
    {
        self.slots.on_fulfilled = Some(Box::new(callback));
        self
    }

    /// Sets the rejection callback.
    #[must_use]
    pub fn with_on_rejected<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(E) + Send + 'static,
    {
        self.slots.on_rejected = Some(Box::new(callback));
        self
    }

    /// Sets the settlement callback.
    #[must_use]
    pub fn with_on_finally<F>(mut self, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.slots.on_finally = Some(Box::new(callback));
        self
    }
}

impl<T, E, C> fmt::Debug for Triggers<T, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Triggers")
            .field("name", &self.name)
            .field("on_state_changed", &self.on_state_changed.is_some())
            .field("on_cancelled", &self.on_cancelled.is_some())
            .field("slots", &self.slots)
            .finish()
    }
}

/// The replaceable callbacks. Assignment overwrites; nothing is queued.
pub(crate) struct CallbackSlots<T, E> {
    pub(crate) on_fulfilled: Option<FulfilledCallback<T>>,
    pub(crate) on_rejected: Option<RejectedCallback<E>>,
    pub(crate) on_finally: Option<FinallyCallback>,
}

impl<T, E> Default for CallbackSlots<T, E> {
    fn default() -> Self {
        Self {
            on_fulfilled: None,
            on_rejected: None,
            on_finally: None,
        }
    }
}

impl<T, E> fmt::Debug for CallbackSlots<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSlots")
            .field("on_fulfilled", &self.on_fulfilled.is_some())
            .field("on_rejected", &self.on_rejected.is_some())
            .field("on_finally", &self.on_finally.is_some())
            .finish()
    }
}
