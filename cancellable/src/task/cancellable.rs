//! The cancellable task state machine.

use super::triggers::{CallbackSlots, CancelledCallback, StateChangedCallback, Triggers};
use crate::core::{TaskSnapshot, TaskState, Transition};
use crate::errors::{InvalidStateError, TaskOperation};
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

/// A one-shot wrapper around an async operation that can be cancelled by
/// its observer.
///
/// The wrapper never stops the inner operation. Cancelling only flips the
/// task to [`TaskState::Cancelled`], fires the cancellation callback, and
/// makes the wrapper ignore whatever the inner operation eventually
/// produces.
///
/// Exactly one of the fulfillment, rejection and cancellation callbacks
/// fires over the lifetime of a task. The settlement callback (`finally`)
/// fires after fulfillment or rejection, never after cancellation.
///
/// Cloning yields another handle to the same task.
pub struct CancellableTask<T, E, C> {
    shared: Arc<Shared<T, E, C>>,
}

struct Shared<T, E, C> {
    id: Uuid,
    name: Option<String>,
    created_at: DateTime<Utc>,
    on_state_changed: Option<StateChangedCallback>,
    inner: Mutex<TaskInner<T, E, C>>,
    state_tx: watch::Sender<TaskState>,
}

struct TaskInner<T, E, C> {
    state: TaskState,
    settled_at: Option<DateTime<Utc>>,
    on_cancelled: Option<CancelledCallback<C>>,
    slots: CallbackSlots<T, E>,
}

/// Drives the inner operation and reports its outcome to the task.
///
/// Returned by [`CancellableTask::detached`] for callers that want to run
/// the observation on their own executor.
#[must_use = "the task never settles unless its observer is polled"]
pub struct Observer {
    future: BoxFuture<'static, ()>,
}

impl Future for Observer {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        self.future.poll_unpin(cx)
    }
}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer").finish_non_exhaustive()
    }
}

impl<T, E, C> CancellableTask<T, E, C>
where
    T: Send + 'static,
    E: Send + 'static,
    C: Send + 'static,
{
    /// Wraps `inner` and spawns its observer on the current tokio runtime.
    ///
    /// Returns immediately. Callbacks are delivered once `inner` completes,
    /// or synchronously from [`cancel`](Self::cancel).
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn new<F>(inner: F, triggers: Triggers<T, E, C>) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        let (task, observer) = Self::detached(inner, triggers);
        tokio::spawn(observer);
        task
    }

    /// Wraps `inner` without spawning anything.
    ///
    /// The returned [`Observer`] must be polled to completion for the task
    /// to learn about the inner operation's outcome.
    pub fn detached<F>(inner: F, triggers: Triggers<T, E, C>) -> (Self, Observer)
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        let Triggers {
            name,
            on_state_changed,
            on_cancelled,
            slots,
        } = triggers;

        let (state_tx, _) = watch::channel(TaskState::Pending);
        let task = Self {
            shared: Arc::new(Shared {
                id: Uuid::new_v4(),
                name,
                created_at: Utc::now(),
                on_state_changed,
                inner: Mutex::new(TaskInner {
                    state: TaskState::Pending,
                    settled_at: None,
                    on_cancelled,
                    slots,
                }),
                state_tx,
            }),
        };

        debug!(task_id = %task.id(), task_name = ?task.name(), "Task created");

        let observed = task.clone();
        let future = async move {
            match AssertUnwindSafe(inner).catch_unwind().await {
                Ok(outcome) => observed.settle(outcome),
                Err(_) => warn!(
                    task_id = %observed.id(),
                    "Inner operation panicked; task stays pending"
                ),
            }
        };

        (task, Observer { future: future.boxed() })
    }

    /// Returns the current state. Never has side effects.
    #[must_use]
    pub fn state(&self) -> TaskState {
        self.shared.inner.lock().state
    }

    /// Returns true while no terminal transition has happened.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state() == TaskState::Pending
    }

    /// Returns the unique task identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    /// Returns the task label, if one was configured.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.shared.name.as_deref()
    }

    /// Returns a serializable view of the task.
    #[must_use]
    pub fn snapshot(&self) -> TaskSnapshot {
        let inner = self.shared.inner.lock();
        TaskSnapshot {
            id: self.shared.id,
            name: self.shared.name.clone(),
            state: inner.state,
            created_at: self.shared.created_at,
            settled_at: inner.settled_at,
        }
    }

    /// Replaces the fulfillment callback and clears the rejection callback.
    ///
    /// Repeated calls overwrite instead of chaining: only the last
    /// registration fires.
    pub fn then<F>(&self, on_fulfilled: F) -> Result<&Self, InvalidStateError>
    where
        F: FnOnce(T) + Send + 'static,
    {
        self.modify(TaskOperation::Then, |slots| {
            slots.on_fulfilled = Some(Box::new(on_fulfilled));
            slots.on_rejected = None;
        })
    }

    /// Replaces both the fulfillment and the rejection callbacks.
    pub fn then_with<F, R>(&self, on_fulfilled: F, on_rejected: R) -> Result<&Self, InvalidStateError>
    where
        F: FnOnce(T) + Send + 'static,
        R: FnOnce(E) + Send + 'static,
    {
        self.modify(TaskOperation::Then, |slots| {
            slots.on_fulfilled = Some(Box::new(on_fulfilled));
            slots.on_rejected = Some(Box::new(on_rejected));
        })
    }

    /// Replaces the rejection callback.
    pub fn catch<R>(&self, on_rejected: R) -> Result<&Self, InvalidStateError>
    where
        R: FnOnce(E) + Send + 'static,
    {
        self.modify(TaskOperation::Catch, |slots| {
            slots.on_rejected = Some(Box::new(on_rejected));
        })
    }

    /// Removes the rejection callback.
    pub fn clear_catch(&self) -> Result<&Self, InvalidStateError> {
        self.modify(TaskOperation::Catch, |slots| slots.on_rejected = None)
    }

    /// Replaces the settlement callback.
    pub fn finally<F>(&self, on_finally: F) -> Result<&Self, InvalidStateError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.modify(TaskOperation::Finally, |slots| {
            slots.on_finally = Some(Box::new(on_finally));
        })
    }

    /// Removes the settlement callback.
    pub fn clear_finally(&self) -> Result<&Self, InvalidStateError> {
        self.modify(TaskOperation::Finally, |slots| slots.on_finally = None)
    }

    /// Cancels the task.
    ///
    /// The state becomes [`TaskState::Cancelled`] before this returns, and
    /// the state change and cancellation callbacks run on the calling
    /// thread. The inner operation keeps running; its outcome is discarded.
    pub fn cancel(&self, cause: impl Into<Option<C>>) -> Result<(), InvalidStateError> {
        self.transition(Transition::Cancelled(cause.into()))
            .map_err(|state| {
                debug!(task_id = %self.id(), %state, "Rejected cancel on terminal task");
                InvalidStateError::new(TaskOperation::Cancel, state)
            })
    }

    /// Waits until the task reaches a terminal state and returns it.
    ///
    /// Resolves after the terminal transition's callbacks have run. Never
    /// resolves if the task is never cancelled and its observer is dropped
    /// before the inner operation completes.
    pub async fn terminated(&self) -> TaskState {
        let mut rx = self.shared.state_tx.subscribe();
        let state = match rx.wait_for(TaskState::is_terminal).await {
            Ok(state) => *state,
            Err(_) => self.state(),
        };
        state
    }

    fn modify<M>(&self, operation: TaskOperation, mutate: M) -> Result<&Self, InvalidStateError>
    where
        M: FnOnce(&mut CallbackSlots<T, E>),
    {
        let mut inner = self.shared.inner.lock();
        if inner.state != TaskState::Pending {
            debug!(
                task_id = %self.id(),
                %operation,
                state = %inner.state,
                "Rejected registration on terminal task"
            );
            return Err(InvalidStateError::new(operation, inner.state));
        }
        mutate(&mut inner.slots);
        Ok(self)
    }

    fn settle(&self, outcome: Result<T, E>) {
        if let Err(state) = self.transition(outcome.into()) {
            debug!(task_id = %self.id(), %state, "Discarded inner outcome after cancellation");
        }
    }

    /// Performs a terminal transition, or returns the current state if the
    /// task is already terminal. Callbacks run after the lock is released.
    fn transition(&self, transition: Transition<T, E, C>) -> Result<(), TaskState> {
        let to = transition.target();
        let (from, on_cancelled, slots) = {
            let mut inner = self.shared.inner.lock();
            if inner.state.is_terminal() {
                return Err(inner.state);
            }
            let from = inner.state;
            inner.state = to;
            inner.settled_at = Some(Utc::now());
            (
                from,
                inner.on_cancelled.take(),
                std::mem::take(&mut inner.slots),
            )
        };

        debug!(task_id = %self.id(), task_name = ?self.name(), %from, %to, "Task state changed");

        if let Some(ref on_state_changed) = self.shared.on_state_changed {
            self.invoke("on_state_changed", || on_state_changed(from, to));
        }

        match transition {
            Transition::Fulfilled(value) => {
                if let Some(on_fulfilled) = slots.on_fulfilled {
                    self.invoke("on_fulfilled", move || on_fulfilled(value));
                }
            }
            Transition::Rejected(reason) => {
                if let Some(on_rejected) = slots.on_rejected {
                    self.invoke("on_rejected", move || on_rejected(reason));
                }
            }
            Transition::Cancelled(cause) => {
                if let Some(on_cancelled) = on_cancelled {
                    self.invoke("on_cancelled", move || on_cancelled(cause));
                }
            }
        }

        if to.is_settled() {
            if let Some(on_finally) = slots.on_finally {
                self.invoke("on_finally", on_finally);
            }
        }

        self.shared.state_tx.send_replace(to);
        Ok(())
    }

    fn invoke<F: FnOnce()>(&self, callback: &str, f: F) {
        if let Err(e) = std::panic::catch_unwind(AssertUnwindSafe(f)) {
            warn!(task_id = %self.id(), callback, "Task callback panicked: {:?}", e);
        }
    }
}

impl<T, E, C> Clone for CancellableTask<T, E, C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, E, C> fmt::Debug for CancellableTask<T, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.inner.lock();
        f.debug_struct("CancellableTask")
            .field("id", &self.shared.id)
            .field("name", &self.shared.name)
            .field("state", &inner.state)
            .field("slots", &inner.slots)
            .finish()
    }
}
