//! Machina: a declarative finite state machine engine
//!
//! Machina separates the static shape of a state machine from its
//! runtime. A machine type declares its states, its permitted
//! transitions, and pattern-scoped guards and callbacks once, producing
//! an immutable [`MachineDefinition`] shared by every instance. Each
//! runtime object then binds that definition to one live current-state
//! value via a [`MachineInstance`], which validates requested
//! transitions, runs guards and callbacks in declaration order, and
//! mutates state at exactly one point.
//!
//! # Core Concepts
//!
//! - **State**: type-safe state vocabulary via the [`State`] trait
//! - **Definition**: immutable rule table built by [`DefinitionBuilder`]
//! - **Guards**: pure predicates that control transitions
//! - **Callbacks**: before / after / after-commit hooks scoped by
//!   [`Pattern`]
//! - **Retries**: [`retry_conflicts`] for optimistic-concurrency
//!   callers
//!
//! # Example
//!
//! ```rust
//! use machina::{DefinitionBuilder, MachineInstance, Pattern, state_enum};
//! use serde_json::Value;
//! use std::sync::Arc;
//!
//! state_enum! {
//!     enum OrderState {
//!         Pending,
//!         CheckingOut,
//!         Cancelled,
//!     }
//! }
//!
//! struct Order {
//!     in_stock: bool,
//! }
//!
//! let definition = Arc::new(
//!     DefinitionBuilder::<OrderState, Order>::new()
//!         .initial(OrderState::Pending)?
//!         .state(OrderState::CheckingOut)?
//!         .state(OrderState::Cancelled)?
//!         .transitions(
//!             OrderState::Pending,
//!             [OrderState::CheckingOut, OrderState::Cancelled],
//!         )?
//!         .transition(OrderState::CheckingOut, OrderState::Cancelled)?
//!         .guard(Pattern::to(OrderState::CheckingOut), |o: &Order| o.in_stock)?
//!         .build()?,
//! );
//!
//! let mut order = Order { in_stock: false };
//! let mut machine = MachineInstance::new(Arc::clone(&definition));
//!
//! // Out of stock: the guard blocks checkout but not cancellation.
//! assert!(!machine.can_transition_to(&order, &OrderState::CheckingOut));
//! assert_eq!(
//!     machine.allowed_transitions(&order),
//!     vec![OrderState::Cancelled],
//! );
//!
//! // Restocked: checkout proceeds.
//! order.in_stock = true;
//! machine.transition_to(&mut order, OrderState::CheckingOut, Value::Null)?;
//! assert_eq!(machine.current_state(), &OrderState::CheckingOut);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod core;
pub mod definition;
pub mod engine;

// Re-export commonly used types
pub use crate::builder::{BuildError, DefinitionBuilder};
pub use crate::core::{Guard, Pattern, State, TransitionRecord};
pub use crate::definition::{MachineDefinition, StateSet, TransitionTable};
pub use crate::engine::{
    retry_conflicts, MachineError, MachineHost, MachineInstance, Outcome, Rejection,
    DEFAULT_MAX_RETRIES,
};
