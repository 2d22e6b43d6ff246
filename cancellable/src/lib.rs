//! # Cancellable
//!
//! A one-shot wrapper around a single async operation that lets its
//! observer stop caring about the result.
//!
//! The wrapped operation is never interrupted. Cancelling a task only
//! changes what the task reports:
//!
//! - **One terminal outcome**: exactly one of the fulfillment, rejection and
//!   cancellation callbacks fires
//! - **Settlement callback**: `finally` fires after fulfillment or
//!   rejection, never after cancellation
//! - **Overwrite, not chain**: `then`, `catch` and `finally` replace the
//!   previous registration while the task is pending
//! - **Guarded**: modifying or cancelling a terminal task returns
//!   [`InvalidStateError`](errors::InvalidStateError)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cancellable::prelude::*;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let task: CancellableTask<(), String, &str> = CancellableTask::new(
//!     async {
//!         tokio::time::sleep(Duration::from_secs(2)).await;
//!         Ok::<_, String>(())
//!     },
//!     Triggers::new()
//!         .with_on_cancelled(|cause| println!("cancelled: {cause:?}"))
//!         .with_on_finally(|| println!("never printed")),
//! );
//!
//! let canceller = task.clone();
//! tokio::spawn(async move {
//!     tokio::time::sleep(Duration::from_secs(1)).await;
//!     let _ = canceller.cancel("user abort");
//! });
//!
//! assert_eq!(task.terminated().await, TaskState::Cancelled);
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod core;
pub mod errors;
pub mod observability;
pub mod task;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{TaskSnapshot, TaskState, Transition};
    pub use crate::errors::{InvalidStateError, TaskOperation};
    pub use crate::observability::{init_tracing, LogFormat};
    pub use crate::task::{CancellableTask, Observer, Triggers};
}
