//! One-step temporal difference control.
use super::{q_learning_target, sarsa_target, td_update, TdConfig, TdMethod};
use crate::{epsilon_greedy_row, glie_epsilon};
use anyhow::Result;
use floe_core::{
    error::{check_gamma, FloeError},
    record::{Record, RecordValue},
    Action, Agent, DeterministicPolicy, Env, Policy, QTable, Sampler, State, StochasticPolicy,
    DEFAULT_MAX_STEPS,
};
use log::{debug, trace};
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// One-step temporal difference control, SARSA or Q-learning.
///
/// The agent carries the current state and the action chosen in it across
/// calls of [`Agent::train_step`], each of which is a single environment
/// step. At the `k`-th step:
///
/// 1. `epsilon = 1 / k`.
/// 2. The carried action is applied and the reward is shaped.
/// 3. The next action `a'` is sampled from the current policy in the next state `s'`.
/// 4. `Q[s, a]` moves towards `r + gamma * Q[s', a']` (SARSA) or
///    `r + gamma * max_a' Q[s', a']` (Q-learning) by the step size `alpha`.
/// 5. Only the policy row of `s` is rebuilt epsilon-greedily.
/// 6. If the episode is done, the environment is reset and a fresh action
///    is sampled at the next step; otherwise `(s', a')` is carried.
pub struct TdControl<R = SmallRng> {
    method: TdMethod,
    gamma: f64,
    alpha: f64,
    max_episode_steps: Option<usize>,
    sampler: Sampler,
    q: QTable,
    policy: StochasticPolicy,
    epsilon: f64,
    n_iters: usize,
    n_episodes: usize,
    episode_steps: usize,
    current: Option<(State, Action)>,
    rng: R,
}

impl TdControl<SmallRng> {
    /// Constructs the agent for an environment with the given sizes.
    pub fn build(config: TdConfig, n_states: usize, n_actions: usize) -> Result<Self> {
        check_gamma(config.gamma)?;
        if !(config.alpha > 0.0 && config.alpha <= 1.0) {
            return Err(FloeError::InvalidParameter {
                name: "alpha",
                reason: format!("{} is not in (0, 1]", config.alpha),
            }
            .into());
        }

        Ok(Self {
            method: config.method,
            gamma: config.gamma,
            alpha: config.alpha,
            max_episode_steps: config.max_episode_steps,
            sampler: Sampler::new(config.shaping, DEFAULT_MAX_STEPS),
            q: QTable::new(n_states, n_actions),
            policy: StochasticPolicy::uniform(n_states, n_actions),
            epsilon: 1.0,
            n_iters: 0,
            n_episodes: 0,
            episode_steps: 0,
            current: None,
            rng: SmallRng::seed_from_u64(config.seed),
        })
    }

    /// Constructs the agent for the given environment.
    pub fn from_env<E: Env>(config: TdConfig, env: &E) -> Result<Self> {
        Self::build(config, env.n_states(), env.n_actions())
    }
}

impl<R: Rng> TdControl<R> {
    /// Replaces the random number generator.
    pub fn with_rng<R2: Rng>(self, rng: R2) -> TdControl<R2> {
        TdControl {
            method: self.method,
            gamma: self.gamma,
            alpha: self.alpha,
            max_episode_steps: self.max_episode_steps,
            sampler: self.sampler,
            q: self.q,
            policy: self.policy,
            epsilon: self.epsilon,
            n_iters: self.n_iters,
            n_episodes: self.n_episodes,
            episode_steps: self.episode_steps,
            current: self.current,
            rng,
        }
    }

    /// Target of the update.
    pub fn method(&self) -> TdMethod {
        self.method
    }

    /// The number of finished episodes.
    pub fn n_episodes(&self) -> usize {
        self.n_episodes
    }

    fn target(&self, reward: f64, next_state: State, next_action: Action) -> Result<f64, FloeError> {
        match self.method {
            TdMethod::Sarsa => sarsa_target(&self.q, reward, next_state, next_action, self.gamma),
            TdMethod::QLearning => q_learning_target(&self.q, reward, next_state, self.gamma),
        }
    }
}

impl<R: Rng> Agent for TdControl<R> {
    fn train_step<E: Env>(&mut self, env: &mut E) -> Result<Record> {
        if env.n_states() != self.q.n_states() || env.n_actions() != self.q.n_actions() {
            return Err(FloeError::ShapeMismatch {
                expected: vec![self.q.n_states(), self.q.n_actions()],
                actual: vec![env.n_states(), env.n_actions()],
            }
            .into());
        }

        self.n_iters += 1;
        self.epsilon = glie_epsilon(self.n_iters);

        let (s, a) = match self.current {
            Some(pair) => pair,
            None => {
                let s = env.reset()?;
                (s, self.policy.sample(s, &mut self.rng)?)
            }
        };

        let step = self.sampler.step(env, s, a)?;
        let s1 = step.next_state;
        let a1 = self.policy.sample(s1, &mut self.rng)?;
        let target = self.target(step.reward, s1, a1)?;
        let td_error = td_update(&mut self.q, s, a, target, self.alpha)?;
        let row = epsilon_greedy_row(self.q.row(s), self.epsilon)?;
        self.policy.set_row(s, row)?;
        trace!("Q[{}, {}] = {}", s, a, self.q.get(s, a));

        self.episode_steps += 1;
        let is_cut = self
            .max_episode_steps
            .map_or(false, |max_steps| self.episode_steps >= max_steps);
        if step.is_done || is_cut {
            self.n_episodes += 1;
            debug!(
                "Episode {} finished after {} steps at iteration {}",
                self.n_episodes, self.episode_steps, self.n_iters
            );
            self.episode_steps = 0;
            self.current = None;
        } else {
            self.current = Some((s1, a1));
        }

        Ok(Record::from_slice(&[
            ("reward", RecordValue::Scalar(step.reward as f32)),
            ("td_error", RecordValue::Scalar(td_error as f32)),
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
