//! Machine instances: a shared definition bound to one live state.

use crate::core::{State, TransitionRecord};
use crate::definition::MachineDefinition;
use crate::engine::error::{MachineError, Rejection};
use serde_json::Value;
use std::sync::Arc;

/// Result kind of the permissive transition form.
///
/// `Rejected` carries the expected rule violation (missing edge or a
/// blocking guard); every other failure stays an error on the outer
/// `Result`, so unexpected problems are never swallowed by
/// construction.
#[derive(Debug)]
pub enum Outcome<R> {
    /// The transition executed; carries the body's return value.
    Completed(R),
    /// The transition was rejected by the rule table or a guard.
    Rejected(Rejection),
}

impl<R> Outcome<R> {
    /// Whether the transition executed.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Whether the transition was rejected.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// The body's return value, if the transition executed.
    pub fn completed(self) -> Option<R> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }

    /// The rejection reason, if the transition was rejected.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Completed(_) => None,
            Self::Rejected(reason) => Some(reason),
        }
    }
}

/// One live binding of a shared [`MachineDefinition`] to a mutable
/// current-state value.
///
/// The subject object stays externally owned: queries borrow it
/// immutably, transitions borrow it mutably for the duration of the
/// call, and the instance never stores it. The current state is always
/// a member of the definition's state set and changes only inside a
/// successful transition, after every guard, before-callback and the
/// caller body completed without error.
///
/// # Example
///
/// ```rust
/// use machina::builder::DefinitionBuilder;
/// use machina::core::Pattern;
/// use machina::engine::MachineInstance;
/// use machina::state_enum;
/// use serde_json::Value;
/// use std::sync::Arc;
///
/// state_enum! {
///     enum OrderState {
///         Pending,
///         CheckingOut,
///         Cancelled,
///     }
/// }
///
/// struct Order {
///     in_stock: bool,
/// }
///
/// let definition = Arc::new(
///     DefinitionBuilder::<OrderState, Order>::new()
///         .initial(OrderState::Pending)?
///         .state(OrderState::CheckingOut)?
///         .state(OrderState::Cancelled)?
///         .transitions(
///             OrderState::Pending,
///             [OrderState::CheckingOut, OrderState::Cancelled],
///         )?
///         .transition(OrderState::CheckingOut, OrderState::Cancelled)?
///         .guard(Pattern::to(OrderState::CheckingOut), |o: &Order| o.in_stock)?
///         .build()?,
/// );
///
/// let mut order = Order { in_stock: true };
/// let mut machine = MachineInstance::new(Arc::clone(&definition));
///
/// assert_eq!(machine.current_state(), &OrderState::Pending);
/// assert!(machine.can_transition_to(&order, &OrderState::CheckingOut));
///
/// machine.transition_to(&mut order, OrderState::CheckingOut, Value::Null)?;
/// assert_eq!(
///     machine.allowed_transitions(&order),
///     vec![OrderState::Cancelled],
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct MachineInstance<S: State, Subj> {
    definition: Arc<MachineDefinition<S, Subj>>,
    current: S,
}

impl<S: State, Subj> std::fmt::Debug for MachineInstance<S, Subj> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MachineInstance")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl<S: State, Subj> MachineInstance<S, Subj> {
    /// Create an instance starting at the definition's initial state.
    pub fn new(definition: Arc<MachineDefinition<S, Subj>>) -> Self {
        let current = definition.initial_state().clone();
        Self {
            definition,
            current,
        }
    }

    /// Create an instance at an explicit state (e.g. one reloaded from
    /// the caller's storage).
    /// Fails with [`MachineError::InvalidState`] if the value is not
    /// in the definition's state set.
    pub fn with_state(
        definition: Arc<MachineDefinition<S, Subj>>,
        state: S,
    ) -> Result<Self, MachineError> {
        if !definition.contains_state(&state) {
            return Err(MachineError::InvalidState {
                state: state.name().to_string(),
            });
        }
        Ok(Self {
            definition,
            current: state,
        })
    }

    /// The shared definition this instance executes against.
    pub fn definition(&self) -> &MachineDefinition<S, Subj> {
        &self.definition
    }

    /// The live current state (pure).
    pub fn current_state(&self) -> &S {
        &self.current
    }

    /// Whether the current state is one of the given states (pure).
    pub fn in_state(&self, states: &[S]) -> bool {
        states.contains(&self.current)
    }

    /// Destinations reachable from the current state, in edge
    /// declaration order, for which all matching guards pass.
    ///
    /// Guards run here for introspection alone; they must be pure.
    pub fn allowed_transitions(&self, subject: &Subj) -> Vec<S> {
        self.definition
            .targets_from(&self.current)
            .filter(|to| self.definition.guards_pass(subject, &self.current, to))
            .cloned()
            .collect()
    }

    /// Whether `(current, target)` is a permitted edge and all matching
    /// guards pass.
    pub fn can_transition_to(&self, subject: &Subj, target: &S) -> bool {
        self.definition.has_edge(&self.current, target)
            && self.definition.guards_pass(subject, &self.current, target)
    }

    /// Execute a transition with no caller body. Strict form: rule
    /// violations come back as [`MachineError::Rejected`].
    pub fn transition_to(
        &mut self,
        subject: &mut Subj,
        target: S,
        data: Value,
    ) -> Result<(), MachineError> {
        self.transition_to_with(subject, target, data, |_, _| Ok(()))
    }

    /// Execute a transition, strict form, with a caller body.
    ///
    /// Pipeline: validate the edge, run matching guards in declaration
    /// order, run matching before-callbacks, invoke the body, mutate
    /// the current state, then run matching after-callbacks. The body's
    /// return value becomes the overall return value. Any error from a
    /// before-callback or the body aborts before the mutation and
    /// propagates unmodified; after-callbacks run once the mutation is
    /// already visible, so their errors propagate without undoing it.
    ///
    /// After-commit callbacks are never run here - see
    /// [`run_after_commit`](Self::run_after_commit).
    pub fn transition_to_with<R, F>(
        &mut self,
        subject: &mut Subj,
        target: S,
        data: Value,
        body: F,
    ) -> Result<R, MachineError>
    where
        F: FnOnce(&mut Subj, &Value) -> Result<R, MachineError>,
    {
        if !self.definition.has_edge(&self.current, &target) {
            return Err(Rejection::NoTransition {
                from: self.current.name().to_string(),
                to: target.name().to_string(),
            }
            .into());
        }

        if !self.definition.guards_pass(subject, &self.current, &target) {
            return Err(Rejection::GuardBlocked {
                from: self.current.name().to_string(),
                to: target.name().to_string(),
            }
            .into());
        }

        for handler in self
            .definition
            .handlers()
            .before_matching(&self.current, &target)
        {
            handler(subject, &target, &data)?;
        }

        let value = body(subject, &data)?;

        // The single point of state mutation.
        let record = TransitionRecord::new(self.current.clone(), target.clone(), data);
        self.current = target;

        for handler in self
            .definition
            .handlers()
            .after_matching(&record.from, &record.to)
        {
            handler(subject, &record)?;
        }

        Ok(value)
    }

    /// Execute a transition, permissive form, with no caller body.
    pub fn try_transition_to(
        &mut self,
        subject: &mut Subj,
        target: S,
        data: Value,
    ) -> Result<Outcome<()>, MachineError> {
        self.try_transition_to_with(subject, target, data, |_, _| Ok(()))
    }

    /// Execute a transition, permissive form, with a caller body.
    ///
    /// Identical to [`transition_to_with`](Self::transition_to_with),
    /// except exactly the expected rule violations (missing edge,
    /// blocking guard) come back as [`Outcome::Rejected`]. Every other
    /// error - from a guard's collaborators, a callback, or the body -
    /// propagates unmodified.
    pub fn try_transition_to_with<R, F>(
        &mut self,
        subject: &mut Subj,
        target: S,
        data: Value,
        body: F,
    ) -> Result<Outcome<R>, MachineError>
    where
        F: FnOnce(&mut Subj, &Value) -> Result<R, MachineError>,
    {
        match self.transition_to_with(subject, target, data, body) {
            Ok(value) => Ok(Outcome::Completed(value)),
            Err(MachineError::Rejected(reason)) => Ok(Outcome::Rejected(reason)),
            Err(err) => Err(err),
        }
    }

    /// Run the after-commit callbacks matching `(from, to)`.
    ///
    /// The engine has no notion of "commit": the caller invokes this
    /// once its own unit of work (e.g. a surrounding persistence
    /// transaction) has committed, replaying the edge and data of the
    /// transition it just committed.
    pub fn run_after_commit(
        &self,
        subject: &mut Subj,
        from: &S,
        to: &S,
        data: &Value,
    ) -> Result<(), MachineError> {
        let record = TransitionRecord::new(from.clone(), to.clone(), data.clone());
        for handler in self.definition.handlers().after_commit_matching(from, to) {
            handler(subject, &record)?;
        }
        Ok(())
    }
}
