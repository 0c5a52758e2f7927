//! Environment step.
use super::{Action, State};

/// Represents an action, next state and reward tuple `(a_t, s_t+1, r_t)`.
///
/// An environment emits a [`Step`] object at every interaction step.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    /// Action.
    pub act: Action,

    /// The state after the transition.
    pub obs: State,

    /// Native reward of the environment.
    pub reward: f64,

    /// Flag denoting if episode is terminated.
    pub is_terminated: bool,

    /// Flag denoting if episode is truncated.
    pub is_truncated: bool,
}

impl Step {
    /// Constructs a [`Step`] object.
    pub fn new(
        obs: State,
        act: Action,
        reward: f64,
        is_terminated: bool,
        is_truncated: bool,
    ) -> Self {
        Step {
            act,
            obs,
            reward,
            is_terminated,
            is_truncated,
        }
    }

    #[inline]
    /// Terminated or truncated.
    pub fn is_done(&self) -> bool {
        self.is_terminated || self.is_truncated
    }
}
