//! Success rate of a policy over a number of episodes.
use super::Evaluator;
use crate::{record::Record, Env, Policy};
use anyhow::Result;
use log::{debug, info};
use rand::{rngs::SmallRng, SeedableRng};

/// Measures the success rate of a policy with the native reward of the environment.
///
/// Each episode is reset and capped at `max_steps` steps. The native reward of
/// the step that ends the episode is summed over episodes; an episode that
/// does not end within the budget contributes 0. The result is
/// `100 * sum / n_episodes`, stored under the key `"success_rate"`.
///
/// No reward shaping is applied here.
pub struct DefaultEvaluator<E: Env> {
    n_episodes: usize,
    max_steps: usize,
    env: E,
    rng: SmallRng,
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs an evaluator, building the environment from `config`.
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize, max_steps: usize) -> Result<Self> {
        Ok(Self::from_env(
            E::build(config, seed)?,
            seed,
            n_episodes,
            max_steps,
        ))
    }

    /// Constructs an evaluator on an already built environment.
    ///
    /// `seed` seeds the random number generator used to sample actions of
    /// stochastic policies.
    pub fn from_env(env: E, seed: i64, n_episodes: usize, max_steps: usize) -> Self {
        Self {
            n_episodes,
            max_steps,
            env,
            rng: SmallRng::seed_from_u64(seed as u64),
        }
    }

    /// The environment used for evaluation.
    pub fn env(&self) -> &E {
        &self.env
    }
}

impl<E: Env> Evaluator for DefaultEvaluator<E> {
    fn evaluate<P: Policy>(&mut self, policy: &P) -> Result<Record> {
        let mut r_total = 0f64;

        for ix in 0..self.n_episodes {
            let mut state = self.env.reset()?;

            for _ in 0..self.max_steps {
                let act = policy.sample(state, &mut self.rng)?;
                let (step, _) = self.env.step(act)?;
                if step.is_done() {
                    r_total += step.reward;
                    debug!("Episode {}, reward = {}", ix, step.reward);
                    break;
                }
                state = step.obs;
            }
        }

        let success_rate = 100.0 * r_total / self.n_episodes.max(1) as f64;
        info!(
            "Success rate over {} episodes: {:.1}",
            self.n_episodes, success_rate
        );
        Ok(Record::from_scalar("success_rate", success_rate as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dummy::ChainEnv, DeterministicPolicy, StochasticPolicy};
    use ndarray::arr2;

    #[test]
    fn test_success_rate_of_fixed_policies() -> Result<()> {
        let mut evaluator = DefaultEvaluator::<ChainEnv>::new(&Default::default(), 0, 20, 50)?;

        let good = DeterministicPolicy::new(vec![0, 0], 2)?;
        let record = evaluator.evaluate(&good)?;
        assert_eq!(record.get_scalar("success_rate")?, 100.0);

        // never leaves the initial state
        let idle = DeterministicPolicy::new(vec![1, 1], 2)?;
        let record = evaluator.evaluate(&idle)?;
        assert_eq!(record.get_scalar("success_rate")?, 0.0);
        Ok(())
    }

    #[test]
    fn test_stochastic_policy_eventually_succeeds() -> Result<()> {
        let mut evaluator = DefaultEvaluator::<ChainEnv>::new(&Default::default(), 3, 100, 500)?;
        let policy = StochasticPolicy::from_array(arr2(&[[0.5, 0.5], [0.5, 0.5]]))?;
        let record = evaluator.evaluate(&policy)?;
        assert_eq!(record.get_scalar("success_rate")?, 100.0);
        Ok(())
    }
}
