//! Configuration of [`TdControl`](super::TdControl).
use anyhow::Result;
use floe_core::RewardShaping;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Target of the temporal difference update.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
pub enum TdMethod {
    /// On-policy, bootstraps on the sampled next action.
    Sarsa,

    /// Off-policy, bootstraps on the best next action.
    QLearning,
}

/// Configuration of [`TdControl`](super::TdControl).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TdConfig {
    /// Target of the update.
    pub method: TdMethod,

    /// Discount factor.
    pub gamma: f64,

    /// Step size.
    pub alpha: f64,

    /// If given, an episode longer than this is cut and the environment is reset.
    pub max_episode_steps: Option<usize>,

    /// Reward shaping of transitions.
    pub shaping: RewardShaping,

    /// Seed of the random number generator of the agent.
    pub seed: u64,
}

impl Default for TdConfig {
    fn default() -> Self {
        Self {
            method: TdMethod::QLearning,
            gamma: 0.9,
            alpha: 0.1,
            max_episode_steps: None,
            shaping: RewardShaping::default(),
            seed: 42,
        }
    }
}

impl TdConfig {
    /// Default configuration of SARSA.
    pub fn sarsa() -> Self {
        Self::default().method(TdMethod::Sarsa)
    }

    /// Default configuration of Q-learning.
    pub fn q_learning() -> Self {
        Self::default().method(TdMethod::QLearning)
    }

    /// Sets the target of the update.
    pub fn method(mut self, v: TdMethod) -> Self {
        self.method = v;
        self
    }

    /// Sets the discount factor.
    pub fn gamma(mut self, v: f64) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the step size.
    pub fn alpha(mut self, v: f64) -> Self {
        self.alpha = v;
        self
    }

    /// Sets the maximum length of an episode.
    pub fn max_episode_steps(mut self, v: Option<usize>) -> Self {
        self.max_episode_steps = v;
        self
    }

    /// Sets the reward shaping.
    pub fn shaping(mut self, v: RewardShaping) -> Self {
        self.shaping = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Constructs [`TdConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TdConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
