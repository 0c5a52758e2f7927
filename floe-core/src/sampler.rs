//! Sampling of shaped transitions and episodes.
use crate::{Action, Env, Policy, RewardShaping, State};
use anyhow::Result;
use log::trace;
use rand::Rng;

/// Default step budget of an episode.
pub const DEFAULT_MAX_STEPS: usize = 500;

/// One step `(s_t, a_t, r_t)` of an episode, with the shaped reward.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// State in which the action was taken.
    pub state: State,

    /// Action.
    pub action: Action,

    /// Shaped reward.
    pub reward: f64,
}

/// Sequence of transitions from the initial state.
pub type Episode = Vec<Transition>;

/// Outcome of a single environment step with the shaped reward.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapedStep {
    /// Action taken.
    pub action: Action,

    /// Shaped reward.
    pub reward: f64,

    /// The state after the transition.
    pub next_state: State,

    /// Terminated or truncated.
    pub is_done: bool,
}

/// Interacts with an environment and shapes the rewards it emits.
#[derive(Clone, Debug)]
pub struct Sampler {
    shaping: RewardShaping,
    max_steps: usize,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new(RewardShaping::default(), DEFAULT_MAX_STEPS)
    }
}

impl Sampler {
    /// Creates a sampler.
    ///
    /// `max_steps` is the step budget of [`Sampler::generate_episode`].
    pub fn new(shaping: RewardShaping, max_steps: usize) -> Self {
        Self { shaping, max_steps }
    }

    /// Reward shaping.
    pub fn shaping(&self) -> &RewardShaping {
        &self.shaping
    }

    /// Step budget of an episode.
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Applies the given action in `state` and shapes the reward.
    pub fn step<E: Env>(&self, env: &mut E, state: State, action: Action) -> Result<ShapedStep> {
        let (step, _) = env.step(action)?;
        let reward = self.shaping.shape(&step);
        trace!(
            "s = {}, a = {}, r = {}, s' = {}, done = {}",
            state,
            action,
            reward,
            step.obs,
            step.is_done()
        );

        Ok(ShapedStep {
            action,
            reward,
            next_state: step.obs,
            is_done: step.is_done(),
        })
    }

    /// Samples an action from the policy in `state` and applies it.
    pub fn take_one_step<E, P, R>(
        &self,
        env: &mut E,
        policy: &P,
        state: State,
        rng: &mut R,
    ) -> Result<ShapedStep>
    where
        E: Env,
        P: Policy,
        R: Rng + ?Sized,
    {
        let action = policy.sample(state, rng)?;
        self.step(env, state, action)
    }

    /// Resets the environment and samples an episode with the policy.
    ///
    /// The episode ends when the environment is done or after `max_steps` steps.
    pub fn generate_episode<E, P, R>(&self, env: &mut E, policy: &P, rng: &mut R) -> Result<Episode>
    where
        E: Env,
        P: Policy,
        R: Rng + ?Sized,
    {
        let mut state = env.reset()?;
        let mut episode = Vec::new();

        for _ in 0..self.max_steps {
            let step = self.take_one_step(env, policy, state, rng)?;
            episode.push(Transition {
                state,
                action: step.action,
                reward: step.reward,
            });
            if step.is_done {
                break;
            }
            state = step.next_state;
        }

        Ok(episode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dummy::ChainEnv, DeterministicPolicy};
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_episode_stops_at_termination() -> Result<()> {
        let mut env = ChainEnv::build(&Default::default(), 0)?;
        let policy = DeterministicPolicy::new(vec![0, 0], 2)?;
        let mut rng = SmallRng::seed_from_u64(0);
        let sampler = Sampler::new(RewardShaping::default().hazard_states(vec![]), 500);

        let episode = sampler.generate_episode(&mut env, &policy, &mut rng)?;
        assert_eq!(
            episode,
            vec![Transition {
                state: 0,
                action: 0,
                reward: 10.0
            }]
        );
        Ok(())
    }

    #[test]
    fn test_episode_respects_step_budget() -> Result<()> {
        let mut env = ChainEnv::build(&Default::default(), 0)?;
        let policy = DeterministicPolicy::new(vec![1, 1], 2)?;
        let mut rng = SmallRng::seed_from_u64(0);
        let sampler = Sampler::new(RewardShaping::default().hazard_states(vec![]), 7);

        let episode = sampler.generate_episode(&mut env, &policy, &mut rng)?;
        assert_eq!(episode.len(), 7);
        assert!(episode.iter().all(|t| t.state == 0 && t.reward == -1.0));
        Ok(())
    }

    #[test]
    fn test_hazard_is_shaped() -> Result<()> {
        let mut env = ChainEnv::build(&Default::default(), 0)?;
        let sampler = Sampler::new(RewardShaping::default().hazard_states(vec![1]), 500);
        let s = env.reset()?;
        let step = sampler.step(&mut env, s, 0)?;
        assert_eq!(step.reward, -10.0);
        assert_eq!(step.next_state, 1);
        assert!(step.is_done);
        Ok(())
    }
}
