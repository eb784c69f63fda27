//! Match patterns scoping guards and callbacks to transitions.
//!
//! A pattern selects the `(from, to)` edges a handler applies to.
//! Either side may be left open, in which case it matches any state.

use super::state::State;
use serde::{Deserialize, Serialize};

/// Optional-field match pattern over a transition edge.
///
/// A `None` side is a wildcard. Patterns are evaluated by a linear scan
/// over registered handlers, in registration order.
///
/// # Example
///
/// ```rust
/// use machina::core::{Pattern, State};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Phase {
///     Draft,
///     Review,
///     Published,
/// }
///
/// impl State for Phase {
///     fn name(&self) -> &str {
///         match self {
///             Self::Draft => "Draft",
///             Self::Review => "Review",
///             Self::Published => "Published",
///         }
///     }
/// }
///
/// // Matches any transition into Published, regardless of source.
/// let pattern = Pattern::to(Phase::Published);
///
/// assert!(pattern.matches(&Phase::Review, &Phase::Published));
/// assert!(!pattern.matches(&Phase::Draft, &Phase::Review));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Pattern<S: State> {
    from: Option<S>,
    to: Option<S>,
}

impl<S: State> Pattern<S> {
    /// Match every transition.
    pub fn any() -> Self {
        Self {
            from: None,
            to: None,
        }
    }

    /// Match transitions leaving the given state, to any target.
    pub fn from(state: S) -> Self {
        Self {
            from: Some(state),
            to: None,
        }
    }

    /// Match transitions entering the given state, from any source.
    pub fn to(state: S) -> Self {
        Self {
            from: None,
            to: Some(state),
        }
    }

    /// Match exactly one edge.
    pub fn between(from: S, to: S) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// The source side of the pattern, if constrained.
    pub fn from_state(&self) -> Option<&S> {
        self.from.as_ref()
    }

    /// The target side of the pattern, if constrained.
    pub fn to_state(&self) -> Option<&S> {
        self.to.as_ref()
    }

    /// Check whether this pattern matches the given edge (pure).
    pub fn matches(&self, from: &S, to: &S) -> bool {
        let from_ok = self.from.as_ref().is_none_or(|f| f == from);
        let to_ok = self.to.as_ref().is_none_or(|t| t == to);
        from_ok && to_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

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
    fn any_matches_every_edge() {
        let pattern = Pattern::any();

        assert!(pattern.matches(&TestState::Pending, &TestState::CheckingOut));
        assert!(pattern.matches(&TestState::CheckingOut, &TestState::Cancelled));
        assert!(pattern.matches(&TestState::Pending, &TestState::Pending));
    }

    #[test]
    fn from_constrains_source_only() {
        let pattern = Pattern::from(TestState::Pending);

        assert!(pattern.matches(&TestState::Pending, &TestState::CheckingOut));
        assert!(pattern.matches(&TestState::Pending, &TestState::Cancelled));
        assert!(!pattern.matches(&TestState::CheckingOut, &TestState::Cancelled));
    }

    #[test]
    fn to_constrains_target_only() {
        let pattern = Pattern::to(TestState::Cancelled);

        assert!(pattern.matches(&TestState::Pending, &TestState::Cancelled));
        assert!(pattern.matches(&TestState::CheckingOut, &TestState::Cancelled));
        assert!(!pattern.matches(&TestState::Pending, &TestState::CheckingOut));
    }

    #[test]
    fn between_matches_exactly_one_edge() {
        let pattern = Pattern::between(TestState::Pending, TestState::CheckingOut);

        assert!(pattern.matches(&TestState::Pending, &TestState::CheckingOut));
        assert!(!pattern.matches(&TestState::Pending, &TestState::Cancelled));
        assert!(!pattern.matches(&TestState::CheckingOut, &TestState::Cancelled));
    }

    #[test]
    fn pattern_serializes_correctly() {
        let pattern = Pattern::between(TestState::Pending, TestState::Cancelled);
        let json = serde_json::to_string(&pattern).unwrap();
        let deserialized: Pattern<TestState> = serde_json::from_str(&json).unwrap();

        assert!(deserialized.matches(&TestState::Pending, &TestState::Cancelled));
        assert!(!deserialized.matches(&TestState::Pending, &TestState::CheckingOut));
    }
}
