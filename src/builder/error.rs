//! Build errors for machine definition construction.

use thiserror::Error;

/// Errors that can occur while declaring a machine definition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("State '{state}' is already declared")]
    DuplicateState { state: String },

    #[error("Initial state is already '{first}'; cannot also mark '{second}' initial")]
    MultipleInitialStates { first: String, second: String },

    #[error("State '{state}' is not declared. Call .state(state) or .initial(state) first")]
    UnknownState { state: String },

    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,
}
