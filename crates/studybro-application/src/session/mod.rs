//! Session state and the in-flight operation guard.

mod guard;
mod state;

pub use guard::{OperationGuard, OperationPermit};
pub use state::SessionState;
