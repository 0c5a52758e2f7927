//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, PartialEq)]
pub enum FloeError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// A row of a stochastic policy is not a probability distribution.
    #[error("Invalid probability distribution in state {state}: {reason}")]
    InvalidDistribution {
        /// State of the offending row.
        state: usize,
        /// What is wrong with the row.
        reason: String,
    },

    /// Action index outside `0..n_actions`.
    #[error("Action {action} is out of range, the number of actions is {n_actions}")]
    ActionOutOfRange {
        /// The given action.
        action: usize,
        /// The number of actions.
        n_actions: usize,
    },

    /// State index outside `0..n_states`.
    #[error("State {state} is out of range, the number of states is {n_states}")]
    StateOutOfRange {
        /// The given state.
        state: usize,
        /// The number of states.
        n_states: usize,
    },

    /// A numeric parameter outside its domain.
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Name of the parameter.
        name: &'static str,
        /// Why the value is rejected.
        reason: String,
    },

    /// Two tables or sequences do not have matching shapes.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Expected shape.
        expected: Vec<usize>,
        /// Actual shape.
        actual: Vec<usize>,
    },

    /// An environment model is inconsistent.
    #[error("Invalid model: {0}")]
    InvalidModel(String),
}

/// Checks `state < n_states`.
pub fn check_state(state: usize, n_states: usize) -> Result<(), FloeError> {
    if state < n_states {
        Ok(())
    } else {
        Err(FloeError::StateOutOfRange { state, n_states })
    }
}

/// Checks `action < n_actions`.
pub fn check_action(action: usize, n_actions: usize) -> Result<(), FloeError> {
    if action < n_actions {
        Ok(())
    } else {
        Err(FloeError::ActionOutOfRange { action, n_actions })
    }
}

/// Checks that a discount factor lies in `[0, 1]`.
pub fn check_gamma(gamma: f64) -> Result<(), FloeError> {
    if (0.0..=1.0).contains(&gamma) {
        Ok(())
    } else {
        Err(FloeError::InvalidParameter {
            name: "gamma",
            reason: format!("{} is not in [0, 1]", gamma),
        })
    }
}
