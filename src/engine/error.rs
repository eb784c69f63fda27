//! Runtime error taxonomy for the machine engine.

use thiserror::Error;

/// Expected rule violations: the closed set of outcomes the permissive
/// transition form converts to [`Outcome::Rejected`](crate::engine::Outcome::Rejected)
/// instead of an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("No transition from '{from}' to '{to}'")]
    NoTransition { from: String, to: String },

    #[error("Guard blocked transition from '{from}' to '{to}'")]
    GuardBlocked { from: String, to: String },
}

/// Errors surfaced by machine instances and their collaborators.
///
/// Only the [`Rejected`](MachineError::Rejected) arm is ever
/// "swallowed", and only by the permissive transition form. Everything
/// else always propagates: [`Conflict`](MachineError::Conflict) is
/// consumed solely by [`retry_conflicts`](crate::engine::retry_conflicts)
/// within its attempt budget, and [`Failed`](MachineError::Failed)
/// wraps arbitrary guard/callback/body failures transparently.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("Invalid state '{state}' for this machine")]
    InvalidState { state: String },

    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("Transition conflict: {reason}")]
    Conflict { reason: String },

    #[error(transparent)]
    Failed(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl MachineError {
    /// A conflict raised by caller-supplied logic (e.g. an
    /// optimistic-lock version mismatch).
    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }

    /// Wrap an arbitrary collaborator failure.
    pub fn failed(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Failed(err.into())
    }

    /// Whether this error is retryable by `retry_conflicts`.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Whether this error is an expected rule violation.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// The rejection reason, if this error is one.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(reason) => Some(reason),
            _ => None,
        }
    }
}
