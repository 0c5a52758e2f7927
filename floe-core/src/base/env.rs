//! Environment.
use super::Step;
use crate::record::Record;
use anyhow::Result;

/// Index of a state in `0..n_states`.
pub type State = usize;

/// Index of an action in `0..n_actions`.
pub type Action = usize;

/// Represents a finite, discrete environment, typically an MDP.
///
/// States and actions are plain indices. The environment owns whatever
/// randomness its dynamics need; it is seeded once in [`Env::build`].
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// The number of states.
    fn n_states(&self) -> usize;

    /// The number of actions.
    fn n_actions(&self) -> usize;

    /// Resets the environment and returns the initial state.
    fn reset(&mut self) -> Result<State>;

    /// Performes an environment step.
    ///
    /// The reward in the returned [`Step`] is the native reward of the
    /// environment. Reward shaping is applied by the caller.
    fn step(&mut self, a: Action) -> Result<(Step, Record)>;

    /// Returns a text rendering of the current state, if the environment has one.
    fn render(&self) -> Option<String> {
        None
    }
}
