//! Agent.
use super::Env;
use crate::{record::Record, DeterministicPolicy, QTable, StochasticPolicy};
use anyhow::Result;

/// Represents a tabular control loop on an environment.
///
/// One call of [`Agent::train_step`] is one iteration of the loop: a whole
/// episode for Monte Carlo control, a single environment step for temporal
/// difference control.
pub trait Agent {
    /// Performs one iteration of the control loop on the environment and
    /// returns some information.
    fn train_step<E: Env>(&mut self, env: &mut E) -> Result<Record>;

    /// The current action-value table.
    fn q_table(&self) -> &QTable;

    /// The current behaviour policy.
    fn policy(&self) -> &StochasticPolicy;

    /// The exploration parameter used by the latest policy improvement.
    fn epsilon(&self) -> f64;

    /// The number of iterations performed so far.
    fn n_iters(&self) -> usize;

    /// Extracts the greedy policy from the current action-value table.
    ///
    /// Ties are broken uniformly at random with the agent's random number generator.
    fn greedy_policy(&mut self) -> DeterministicPolicy;
}
