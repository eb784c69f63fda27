//! Core State trait for machine states.
//!
//! Every state type used with a machine definition must implement this
//! trait, which provides pure methods for inspecting state properties
//! without side effects.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for machine states.
///
/// All methods are pure - no side effects. States represent immutable
/// values that describe a position in a state machine's vocabulary.
///
/// # Required Traits
///
/// - `Clone`: states are copied into transition records
/// - `Eq` + `Hash`: states are compared and indexed by the definition
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `DeserializeOwned`: states must be serializable so
///   callers can persist the current-state value themselves
///
/// # Example
///
/// ```rust
/// use machina::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum OrderState {
///     Pending,
///     CheckingOut,
///     Cancelled,
/// }
///
/// impl State for OrderState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Pending => "Pending",
///             Self::CheckingOut => "CheckingOut",
///             Self::Cancelled => "Cancelled",
///         }
///     }
/// }
/// ```
pub trait State: Clone + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync {
    /// Get the state's name for display/logging.
    ///
    /// Returns a static string reference for zero-cost naming.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestState {
        Pending,
        CheckingOut,
        Cancelled,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Pending => "Pending",
                Self::CheckingOut => "CheckingOut",
                Self::Cancelled => "Cancelled",
            }
        }
    }

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(TestState::Pending.name(), "Pending");
        assert_eq!(TestState::CheckingOut.name(), "CheckingOut");
        assert_eq!(TestState::Cancelled.name(), "Cancelled");
    }

    #[test]
    fn state_serializes_correctly() {
        let state = TestState::Pending;
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: TestState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }

    #[test]
    fn state_is_cloneable_and_comparable() {
        let state = TestState::CheckingOut;
        let cloned = state.clone();
        assert_eq!(state, cloned);
        assert_ne!(state, TestState::Cancelled);
    }
}
