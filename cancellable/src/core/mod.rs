//! Core types shared by the task implementation.

mod snapshot;
mod state;
mod transition;

pub use snapshot::TaskSnapshot;
pub use state::TaskState;
pub use transition::Transition;
