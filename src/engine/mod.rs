//! The machine runtime: instances, errors, retries, and the host
//! delegation contract.
//!
//! Execution is single-threaded and synchronous: guards, callbacks and
//! the transition body run inline, in the caller's thread, in a fixed
//! order. The engine takes no locks - definitions are immutable and an
//! instance's mutable state belongs to one logical unit of work at a
//! time; callers needing mutual exclusion supply it externally and
//! surface conflicts as [`MachineError::Conflict`].

pub mod error;
pub mod host;
pub mod instance;
pub mod retry;

pub use error::{MachineError, Rejection};
pub use host::MachineHost;
pub use instance::{MachineInstance, Outcome};
pub use retry::{retry_conflicts, DEFAULT_MAX_RETRIES};
