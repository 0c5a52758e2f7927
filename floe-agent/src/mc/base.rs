//! First-visit Monte Carlo control with a GLIE schedule.
use super::{mc_policy_evaluation, MonteCarloConfig};
use crate::{discounted_returns, epsilon_greedy_policy_improve, glie_epsilon};
use anyhow::Result;
use floe_core::{
    error::{check_gamma, FloeError},
    record::{Record, RecordValue},
    Agent, DeterministicPolicy, Env, QTable, Sampler, StochasticPolicy, VisitCounts,
};
use log::{debug, trace};
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// First-visit Monte Carlo control with a GLIE schedule.
///
/// The `k`-th call of [`Agent::train_step`] samples an episode with the
/// current policy, evaluates it with [`mc_policy_evaluation`], sets
/// `epsilon = 1 / (k + 1)` and rebuilds the whole policy epsilon-greedily.
/// The initial policy is uniform.
pub struct MonteCarloGlie<R = SmallRng> {
    gamma: f64,
    sampler: Sampler,
    q: QTable,
    visits: VisitCounts,
    policy: StochasticPolicy,
    epsilon: f64,
    n_iters: usize,
    rng: R,
}

impl MonteCarloGlie<SmallRng> {
    /// Constructs the agent for an environment with the given sizes.
    pub fn build(config: MonteCarloConfig, n_states: usize, n_actions: usize) -> Result<Self> {
        check_gamma(config.gamma)?;
        Ok(Self {
            gamma: config.gamma,
            sampler: Sampler::new(config.shaping, config.max_steps),
            q: QTable::new(n_states, n_actions),
            visits: VisitCounts::new(n_states, n_actions),
            policy: StochasticPolicy::uniform(n_states, n_actions),
            epsilon: 1.0,
            n_iters: 0,
            rng: SmallRng::seed_from_u64(config.seed),
        })
    }

    /// Constructs the agent for the given environment.
    pub fn from_env<E: Env>(config: MonteCarloConfig, env: &E) -> Result<Self> {
        Self::build(config, env.n_states(), env.n_actions())
    }
}

impl<R: Rng> MonteCarloGlie<R> {
    /// Replaces the random number generator.
    pub fn with_rng<R2: Rng>(self, rng: R2) -> MonteCarloGlie<R2> {
        MonteCarloGlie {
            gamma: self.gamma,
            sampler: self.sampler,
            q: self.q,
            visits: self.visits,
            policy: self.policy,
            epsilon: self.epsilon,
            n_iters: self.n_iters,
            rng,
        }
    }

    /// Visit counts of the first-visit evaluation.
    pub fn visits(&self) -> &VisitCounts {
        &self.visits
    }
}

impl<R: Rng> Agent for MonteCarloGlie<R> {
    fn train_step<E: Env>(&mut self, env: &mut E) -> Result<Record> {
        if env.n_states() != self.q.n_states() || env.n_actions() != self.q.n_actions() {
            return Err(FloeError::ShapeMismatch {
                expected: vec![self.q.n_states(), self.q.n_actions()],
                actual: vec![env.n_states(), env.n_actions()],
            }
            .into());
        }

        let episode = self
            .sampler
            .generate_episode(env, &self.policy, &mut self.rng)?;
        let returns = discounted_returns(&episode, self.gamma)?;
        mc_policy_evaluation(&episode, &returns, &mut self.q, &mut self.visits)?;

        self.n_iters += 1;
        self.epsilon = glie_epsilon(self.n_iters + 1);
        self.policy = epsilon_greedy_policy_improve(&self.q, self.epsilon)?;

        let ret = returns.first().copied().unwrap_or(0.0);
        debug!(
            "Episode {}: {} steps, return = {}",
            self.n_iters,
            episode.len(),
            ret
        );
        trace!("Q = {:?}", self.q.as_array());

        Ok(Record::from_slice(&[
            ("episode_length", RecordValue::Scalar(episode.len() as f32)),
            ("return", RecordValue::Scalar(ret as f32)),
            (
                "returns",
                RecordValue::Array1(returns.iter().map(|&g| g as f32).collect()),
            ),
        ]))
    }

    fn q_table(&self) -> &QTable {
        &self.q
    }

    fn policy(&self) -> &StochasticPolicy {
        &self.policy
    }

    fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn n_iters(&self) -> usize {
        self.n_iters
    }

    fn greedy_policy(&mut self) -> DeterministicPolicy {
        self.q.greedy_policy(&mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floe_core::{dummy::ChainEnv, RewardShaping};

    #[test]
    fn test_epsilon_schedule() -> Result<()> {
        let mut env = ChainEnv::build(&Default::default(), 0)?;
        let config = MonteCarloConfig::default().shaping(RewardShaping::default().hazard_states(vec![]));
        let mut agent = MonteCarloGlie::from_env(config, &env)?;
        assert_eq!(agent.epsilon(), 1.0);

        for k in 1..=4 {
            agent.train_step(&mut env)?;
            assert_eq!(agent.epsilon(), 1.0 / (k + 1) as f64);
        }
        assert_eq!(agent.n_iters(), 4);
        Ok(())
    }

    #[test]
    fn test_record_holds_returns_of_episode() -> Result<()> {
        let mut env = ChainEnv::build(&Default::default(), 0)?;
        let config = MonteCarloConfig::default().shaping(RewardShaping::default().hazard_states(vec![]));
        let mut agent = MonteCarloGlie::from_env(config, &env)?;

        let record = agent.train_step(&mut env)?;
        let returns = record.get_array1("returns")?;
        assert_eq!(returns.len() as f32, record.get_scalar("episode_length")?);
        assert_eq!(returns[0], record.get_scalar("return")?);
        // the last step reaches the goal
        assert_eq!(*returns.last().unwrap(), 10.0);
        Ok(())
    }

    #[test]
    fn test_shape_mismatch() -> Result<()> {
        let mut env = ChainEnv::build(&Default::default(), 0)?;
        let mut agent = MonteCarloGlie::build(MonteCarloConfig::default(), 3, 2)?;
        assert!(agent.train_step(&mut env).is_err());
        Ok(())
    }

    #[test]
    fn test_invalid_gamma() {
        assert!(MonteCarloGlie::build(MonteCarloConfig::default().gamma(2.0), 2, 2).is_err());
    }
}
