//! Transition records handed to after and after-commit callbacks.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Record of a single executed transition.
///
/// Records are immutable values describing a move from one state to
/// another, together with the data payload the caller supplied and the
/// moment the mutation happened. The engine builds one per successful
/// transition and passes it to matching `after` callbacks; callers
/// replay it to `run_after_commit` once their own unit of work has
/// committed.
///
/// # Example
///
/// ```rust
/// use machina::core::{State, TransitionRecord};
/// use serde::{Deserialize, Serialize};
/// use serde_json::json;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum TaskState {
///     Pending,
///     Running,
/// }
///
/// impl State for TaskState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Pending => "Pending",
///             Self::Running => "Running",
///         }
///     }
/// }
///
/// let record = TransitionRecord::new(
///     TaskState::Pending,
///     TaskState::Running,
///     json!({"worker": 7}),
/// );
/// assert_eq!(record.from, TaskState::Pending);
/// assert_eq!(record.to, TaskState::Running);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<S: State> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// The data payload supplied with the transition request
    pub data: Value,
    /// When the state mutation occurred
    pub timestamp: DateTime<Utc>,
}

impl<S: State> TransitionRecord<S> {
    /// Create a record stamped with the current time.
    pub fn new(from: S, to: S, data: Value) -> Self {
        Self {
            from,
            to,
            data,
            timestamp: Utc::now(),
        }
    }
}
