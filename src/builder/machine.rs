//! Builder for constructing machine definitions.

use crate::builder::error::BuildError;
use crate::core::{Guard, Pattern, State, TransitionRecord};
use crate::definition::{HandlerChain, MachineDefinition, StateSet, TransitionTable};
use crate::engine::MachineError;
use serde_json::Value;
use std::sync::Arc;

/// Builder for constructing machine definitions with a fluent API.
///
/// Declarations are validated as they are made: duplicate states, a
/// second initial state, or a rule referencing an undeclared state all
/// fail immediately rather than at first use.
///
/// # Example
///
/// ```rust
/// use machina::builder::DefinitionBuilder;
/// use machina::core::Pattern;
/// use machina::state_enum;
///
/// state_enum! {
///     enum DocState {
///         Draft,
///         Review,
///         Published,
///     }
/// }
///
/// struct Doc {
///     approved: bool,
/// }
///
/// let definition = DefinitionBuilder::<DocState, Doc>::new()
///     .initial(DocState::Draft)?
///     .state(DocState::Review)?
///     .state(DocState::Published)?
///     .transition(DocState::Draft, DocState::Review)?
///     .transition(DocState::Review, DocState::Published)?
///     .guard(Pattern::to(DocState::Published), |doc: &Doc| doc.approved)?
///     .build()?;
///
/// assert_eq!(definition.states().len(), 3);
/// # Ok::<(), machina::builder::BuildError>(())
/// ```
pub struct DefinitionBuilder<S: State, Subj> {
    states: Vec<S>,
    initial: Option<S>,
    table: TransitionTable<S>,
    handlers: HandlerChain<S, Subj>,
}

impl<S: State, Subj> DefinitionBuilder<S, Subj> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            initial: None,
            table: TransitionTable::new(),
            handlers: HandlerChain::new(),
        }
    }

    /// Declare a state.
    /// Returns an error if the state is already declared.
    pub fn state(mut self, state: S) -> Result<Self, BuildError> {
        self.declare(state)?;
        Ok(self)
    }

    /// Declare a state and mark it initial (required, exactly once).
    pub fn initial(mut self, state: S) -> Result<Self, BuildError> {
        if let Some(first) = &self.initial {
            return Err(BuildError::MultipleInitialStates {
                first: first.name().to_string(),
                second: state.name().to_string(),
            });
        }
        self.declare(state.clone())?;
        self.initial = Some(state);
        Ok(self)
    }

    /// Declare a permitted edge between two declared states.
    /// Duplicate edges are silently idempotent.
    pub fn transition(mut self, from: S, to: S) -> Result<Self, BuildError> {
        self.check_declared(&from)?;
        self.check_declared(&to)?;
        self.table.insert(from, to);
        Ok(self)
    }

    /// Declare one edge per target: `from -> to` for each `to`.
    pub fn transitions(
        mut self,
        from: S,
        targets: impl IntoIterator<Item = S>,
    ) -> Result<Self, BuildError> {
        self.check_declared(&from)?;
        for to in targets {
            self.check_declared(&to)?;
            self.table.insert(from.clone(), to);
        }
        Ok(self)
    }

    /// Append a guard scoped by the given pattern.
    ///
    /// All guards matching a requested edge must pass for the
    /// transition to proceed. The predicate must be pure: it also runs
    /// for introspection queries.
    pub fn guard<F>(mut self, pattern: Pattern<S>, predicate: F) -> Result<Self, BuildError>
    where
        F: Fn(&Subj) -> bool + Send + Sync + 'static,
    {
        self.check_pattern(&pattern)?;
        self.handlers.push_guard(pattern, Guard::new(predicate));
        Ok(self)
    }

    /// Append a before-callback scoped by the given pattern.
    ///
    /// Before-callbacks run after guards and before the state
    /// mutation, with `(subject, target, data)`. An error aborts the
    /// transition with no mutation.
    pub fn before<F>(mut self, pattern: Pattern<S>, handler: F) -> Result<Self, BuildError>
    where
        F: Fn(&mut Subj, &S, &Value) -> Result<(), MachineError> + Send + Sync + 'static,
    {
        self.check_pattern(&pattern)?;
        self.handlers.push_before(pattern, Arc::new(handler));
        Ok(self)
    }

    /// Append an after-callback scoped by the given pattern.
    ///
    /// After-callbacks run once the state mutation is visible, with
    /// `(subject, record)`.
    pub fn after<F>(mut self, pattern: Pattern<S>, handler: F) -> Result<Self, BuildError>
    where
        F: Fn(&mut Subj, &TransitionRecord<S>) -> Result<(), MachineError> + Send + Sync + 'static,
    {
        self.check_pattern(&pattern)?;
        self.handlers.push_after(pattern, Arc::new(handler));
        Ok(self)
    }

    /// Append an after-commit callback scoped by the given pattern.
    ///
    /// The engine never runs these itself; the caller triggers them
    /// via [`MachineInstance::run_after_commit`](crate::engine::MachineInstance::run_after_commit)
    /// once its own unit of work has committed.
    pub fn after_commit<F>(mut self, pattern: Pattern<S>, handler: F) -> Result<Self, BuildError>
    where
        F: Fn(&mut Subj, &TransitionRecord<S>) -> Result<(), MachineError> + Send + Sync + 'static,
    {
        self.check_pattern(&pattern)?;
        self.handlers.push_after_commit(pattern, Arc::new(handler));
        Ok(self)
    }

    /// Build the definition.
    /// Returns an error if no initial state was declared.
    pub fn build(self) -> Result<MachineDefinition<S, Subj>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let states = StateSet::new(self.states, initial);
        Ok(MachineDefinition::new(states, self.table, self.handlers))
    }

    fn declare(&mut self, state: S) -> Result<(), BuildError> {
        if self.states.contains(&state) {
            return Err(BuildError::DuplicateState {
                state: state.name().to_string(),
            });
        }
        self.states.push(state);
        Ok(())
    }

    fn check_declared(&self, state: &S) -> Result<(), BuildError> {
        if self.states.contains(state) {
            Ok(())
        } else {
            Err(BuildError::UnknownState {
                state: state.name().to_string(),
            })
        }
    }

    fn check_pattern(&self, pattern: &Pattern<S>) -> Result<(), BuildError> {
        if let Some(from) = pattern.from_state() {
            self.check_declared(from)?;
        }
        if let Some(to) = pattern.to_state() {
            self.check_declared(to)?;
        }
        Ok(())
    }
}

impl<S: State, Subj> Default for DefinitionBuilder<S, Subj> {
    fn default() -> Self {
        Self::new()
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

    fn base_builder() -> DefinitionBuilder<TestState, ()> {
        DefinitionBuilder::new()
            .initial(TestState::Pending)
            .unwrap()
            .state(TestState::CheckingOut)
            .unwrap()
            .state(TestState::Cancelled)
            .unwrap()
    }

    #[test]
    fn builder_requires_initial_state() {
        let result = DefinitionBuilder::<TestState, ()>::new()
            .state(TestState::Pending)
            .unwrap()
            .build();

        assert!(matches!(result, Err(BuildError::MissingInitialState)));
    }

    #[test]
    fn duplicate_state_declaration_fails() {
        let result = base_builder().state(TestState::CheckingOut);

        assert_eq!(
            result.err(),
            Some(BuildError::DuplicateState {
                state: "CheckingOut".to_string()
            })
        );
    }

    #[test]
    fn second_initial_state_fails() {
        let result = base_builder().initial(TestState::Cancelled);

        assert_eq!(
            result.err(),
            Some(BuildError::MultipleInitialStates {
                first: "Pending".to_string(),
                second: "Cancelled".to_string()
            })
        );
    }

    #[test]
    fn transition_rejects_undeclared_states() {
        let result = DefinitionBuilder::<TestState, ()>::new()
            .initial(TestState::Pending)
            .unwrap()
            .transition(TestState::Pending, TestState::CheckingOut);

        assert_eq!(
            result.err(),
            Some(BuildError::UnknownState {
                state: "CheckingOut".to_string()
            })
        );
    }

    #[test]
    fn guard_pattern_rejects_undeclared_states() {
        let result = DefinitionBuilder::<TestState, ()>::new()
            .initial(TestState::Pending)
            .unwrap()
            .guard(Pattern::to(TestState::Cancelled), |_| true);

        assert_eq!(
            result.err(),
            Some(BuildError::UnknownState {
                state: "Cancelled".to_string()
            })
        );
    }

    #[test]
    fn duplicate_edges_are_idempotent() {
        let definition = base_builder()
            .transition(TestState::Pending, TestState::CheckingOut)
            .unwrap()
            .transition(TestState::Pending, TestState::CheckingOut)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(definition.transitions().len(), 1);
    }

    #[test]
    fn transitions_expands_one_source_to_many_targets() {
        let definition = base_builder()
            .transitions(
                TestState::Pending,
                [TestState::CheckingOut, TestState::Cancelled],
            )
            .unwrap()
            .build()
            .unwrap();

        assert!(definition.has_edge(&TestState::Pending, &TestState::CheckingOut));
        assert!(definition.has_edge(&TestState::Pending, &TestState::Cancelled));
        assert!(!definition.has_edge(&TestState::CheckingOut, &TestState::Cancelled));
    }

    #[test]
    fn fluent_api_builds_definition() {
        let definition = base_builder()
            .transition(TestState::Pending, TestState::CheckingOut)
            .unwrap()
            .guard(Pattern::any(), |_| true)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(definition.initial_state(), &TestState::Pending);
        assert_eq!(definition.states().len(), 3);
    }

    #[test]
    fn empty_transition_table_is_permitted() {
        let definition = DefinitionBuilder::<TestState, ()>::new()
            .initial(TestState::Pending)
            .unwrap()
            .build()
            .unwrap();

        assert!(definition.transitions().is_empty());
    }
}
