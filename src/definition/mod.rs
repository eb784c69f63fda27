//! Compiled machine definitions.
//!
//! A [`MachineDefinition`] is the immutable rule table a machine type
//! declares once: its state vocabulary, the directed transition table,
//! and the ordered guard/callback chain. It is built by
//! [`DefinitionBuilder`](crate::builder::DefinitionBuilder), typically
//! held in an `Arc` (or a `OnceLock` for process-lifetime sharing), and
//! read concurrently by every
//! [`MachineInstance`](crate::engine::MachineInstance) of that type.

use crate::core::{Guard, Pattern, State, TransitionRecord};
use crate::engine::MachineError;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Callback invoked before the state mutation, with the subject, the
/// target state, and the data payload.
pub type BeforeFn<S, Subj> =
    Arc<dyn Fn(&mut Subj, &S, &Value) -> Result<(), MachineError> + Send + Sync>;

/// Callback invoked after the state mutation (or after the caller's
/// commit, for the after-commit phase), with the subject and the
/// transition record.
pub type AfterFn<S, Subj> =
    Arc<dyn Fn(&mut Subj, &TransitionRecord<S>) -> Result<(), MachineError> + Send + Sync>;

/// The declared vocabulary of valid states and which one is initial.
#[derive(Clone, Debug)]
pub struct StateSet<S: State> {
    states: Vec<S>,
    index: HashSet<S>,
    initial: S,
}

impl<S: State> StateSet<S> {
    pub(crate) fn new(states: Vec<S>, initial: S) -> Self {
        let index = states.iter().cloned().collect();
        Self {
            states,
            index,
            initial,
        }
    }

    /// The state an uninitialized machine resolves to.
    pub fn initial(&self) -> &S {
        &self.initial
    }

    /// Whether the given state was declared.
    pub fn contains(&self, state: &S) -> bool {
        self.index.contains(state)
    }

    /// Declared states, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.states.iter()
    }

    /// Number of declared states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no states were declared. A built definition always has
    /// at least the initial state.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Directed adjacency: the set of permitted `(from, to)` edges.
///
/// Edges are kept in declaration order so destination queries are
/// deterministic. Duplicate insertion is idempotent.
#[derive(Clone, Debug, Default)]
pub struct TransitionTable<S: State> {
    edges: Vec<(S, S)>,
}

impl<S: State> TransitionTable<S> {
    pub(crate) fn new() -> Self {
        Self { edges: Vec::new() }
    }

    pub(crate) fn insert(&mut self, from: S, to: S) {
        if !self.contains(&from, &to) {
            self.edges.push((from, to));
        }
    }

    /// Whether `(from, to)` is a permitted edge.
    pub fn contains(&self, from: &S, to: &S) -> bool {
        self.edges.iter().any(|(f, t)| f == from && t == to)
    }

    /// Destinations reachable from `from`, in declaration order.
    pub fn targets_from<'a>(&'a self, from: &'a S) -> impl Iterator<Item = &'a S> {
        self.edges
            .iter()
            .filter(move |(f, _)| f == from)
            .map(|(_, t)| t)
    }

    /// All edges, in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = (&S, &S)> {
        self.edges.iter().map(|(f, t)| (f, t))
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the table has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

struct GuardRule<S: State, Subj> {
    pattern: Pattern<S>,
    guard: Guard<Subj>,
}

struct BeforeRule<S: State, Subj> {
    pattern: Pattern<S>,
    handler: BeforeFn<S, Subj>,
}

struct AfterRule<S: State, Subj> {
    pattern: Pattern<S>,
    handler: AfterFn<S, Subj>,
}

/// Ordered, pattern-scoped guards and callbacks.
///
/// Within a phase, rules run in registration order. A rule applies to
/// a transition when its pattern matches the `(from, to)` edge.
pub struct HandlerChain<S: State, Subj> {
    guards: Vec<GuardRule<S, Subj>>,
    before: Vec<BeforeRule<S, Subj>>,
    after: Vec<AfterRule<S, Subj>>,
    after_commit: Vec<AfterRule<S, Subj>>,
}

impl<S: State, Subj> HandlerChain<S, Subj> {
    pub(crate) fn new() -> Self {
        Self {
            guards: Vec::new(),
            before: Vec::new(),
            after: Vec::new(),
            after_commit: Vec::new(),
        }
    }

    pub(crate) fn push_guard(&mut self, pattern: Pattern<S>, guard: Guard<Subj>) {
        self.guards.push(GuardRule { pattern, guard });
    }

    pub(crate) fn push_before(&mut self, pattern: Pattern<S>, handler: BeforeFn<S, Subj>) {
        self.before.push(BeforeRule { pattern, handler });
    }

    pub(crate) fn push_after(&mut self, pattern: Pattern<S>, handler: AfterFn<S, Subj>) {
        self.after.push(AfterRule { pattern, handler });
    }

    pub(crate) fn push_after_commit(&mut self, pattern: Pattern<S>, handler: AfterFn<S, Subj>) {
        self.after_commit.push(AfterRule { pattern, handler });
    }

    /// Guards matching the edge, in registration order.
    pub fn guards_matching<'a>(
        &'a self,
        from: &'a S,
        to: &'a S,
    ) -> impl Iterator<Item = &'a Guard<Subj>> {
        self.guards
            .iter()
            .filter(move |rule| rule.pattern.matches(from, to))
            .map(|rule| &rule.guard)
    }

    pub(crate) fn before_matching<'a>(
        &'a self,
        from: &'a S,
        to: &'a S,
    ) -> impl Iterator<Item = &'a BeforeFn<S, Subj>> {
        self.before
            .iter()
            .filter(move |rule| rule.pattern.matches(from, to))
            .map(|rule| &rule.handler)
    }

    pub(crate) fn after_matching<'a>(
        &'a self,
        from: &'a S,
        to: &'a S,
    ) -> impl Iterator<Item = &'a AfterFn<S, Subj>> {
        self.after
            .iter()
            .filter(move |rule| rule.pattern.matches(from, to))
            .map(|rule| &rule.handler)
    }

    pub(crate) fn after_commit_matching<'a>(
        &'a self,
        from: &'a S,
        to: &'a S,
    ) -> impl Iterator<Item = &'a AfterFn<S, Subj>> {
        self.after_commit
            .iter()
            .filter(move |rule| rule.pattern.matches(from, to))
            .map(|rule| &rule.handler)
    }
}

/// Immutable compiled definition of one machine type.
///
/// Built once via [`MachineDefinition::builder`], then shared
/// (read-only) by every instance of that type. Safe for unsynchronized
/// concurrent reads across threads.
///
/// # Example
///
/// ```rust
/// use machina::builder::DefinitionBuilder;
/// use machina::core::Pattern;
/// use machina::state_enum;
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
/// let definition = DefinitionBuilder::<OrderState, Order>::new()
///     .initial(OrderState::Pending)?
///     .state(OrderState::CheckingOut)?
///     .state(OrderState::Cancelled)?
///     .transitions(
///         OrderState::Pending,
///         [OrderState::CheckingOut, OrderState::Cancelled],
///     )?
///     .transition(OrderState::CheckingOut, OrderState::Cancelled)?
///     .guard(Pattern::to(OrderState::CheckingOut), |order: &Order| {
///         order.in_stock
///     })?
///     .build()?;
///
/// assert_eq!(definition.initial_state(), &OrderState::Pending);
/// assert!(definition.has_edge(&OrderState::Pending, &OrderState::Cancelled));
/// # Ok::<(), machina::builder::BuildError>(())
/// ```
pub struct MachineDefinition<S: State, Subj> {
    states: StateSet<S>,
    table: TransitionTable<S>,
    handlers: HandlerChain<S, Subj>,
}

impl<S: State, Subj> MachineDefinition<S, Subj> {
    pub(crate) fn new(
        states: StateSet<S>,
        table: TransitionTable<S>,
        handlers: HandlerChain<S, Subj>,
    ) -> Self {
        Self {
            states,
            table,
            handlers,
        }
    }

    /// Start a builder for a new definition.
    pub fn builder() -> crate::builder::DefinitionBuilder<S, Subj> {
        crate::builder::DefinitionBuilder::new()
    }

    /// The declared initial state.
    pub fn initial_state(&self) -> &S {
        self.states.initial()
    }

    /// The declared state vocabulary.
    pub fn states(&self) -> &StateSet<S> {
        &self.states
    }

    /// The declared transition table.
    pub fn transitions(&self) -> &TransitionTable<S> {
        &self.table
    }

    /// Whether the given state was declared.
    pub fn contains_state(&self, state: &S) -> bool {
        self.states.contains(state)
    }

    /// Whether `(from, to)` is a permitted edge.
    pub fn has_edge(&self, from: &S, to: &S) -> bool {
        self.table.contains(from, to)
    }

    /// Destinations reachable from `from` by the table alone, in
    /// declaration order, without consulting guards.
    pub fn targets_from<'a>(&'a self, from: &'a S) -> impl Iterator<Item = &'a S> {
        self.table.targets_from(from)
    }

    /// Evaluate all guards matching `(from, to)` against the subject,
    /// in registration order. True when every one passes.
    pub fn guards_pass(&self, subject: &Subj, from: &S, to: &S) -> bool {
        self.handlers
            .guards_matching(from, to)
            .all(|guard| guard.check(subject))
    }

    pub(crate) fn handlers(&self) -> &HandlerChain<S, Subj> {
        &self.handlers
    }
}
