//! Core state machine types.
//!
//! This module contains the building blocks shared by the definition
//! and engine layers:
//! - State vocabulary via the `State` trait
//! - Guard predicates for transition control
//! - Match patterns scoping guards and callbacks to edges
//! - Transition records handed to callbacks
//!
//! All logic in this module is pure (no side effects).

mod guard;
mod pattern;
mod record;
mod state;

pub use guard::Guard;
pub use pattern::Pattern;
pub use record::TransitionRecord;
pub use state::State;
