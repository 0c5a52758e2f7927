//! Policy.
use super::{Action, State};
use anyhow::Result;
use rand::Rng;

/// A policy on a discrete environment.
///
/// Policy is a mapping from a state to an action.
/// The mapping can be either of deterministic or stochastic. Any randomness
/// is drawn from the given random number generator.
pub trait Policy {
    /// Sample an action in the given state.
    fn sample<R: Rng + ?Sized>(&self, state: State, rng: &mut R) -> Result<Action>;
}
