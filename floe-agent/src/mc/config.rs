//! Configuration of [`MonteCarloGlie`](super::MonteCarloGlie).
use anyhow::Result;
use floe_core::{RewardShaping, DEFAULT_MAX_STEPS};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`MonteCarloGlie`](super::MonteCarloGlie).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct MonteCarloConfig {
    /// Discount factor.
    pub gamma: f64,

    /// Step budget of a sampled episode.
    pub max_steps: usize,

    /// Reward shaping of sampled transitions.
    pub shaping: RewardShaping,

    /// Seed of the random number generator of the agent.
    pub seed: u64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            max_steps: DEFAULT_MAX_STEPS,
            shaping: RewardShaping::default(),
            seed: 42,
        }
    }
}

impl MonteCarloConfig {
    /// Sets the discount factor.
    pub fn gamma(mut self, v: f64) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the step budget of a sampled episode.
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
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

    /// Constructs [`MonteCarloConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`MonteCarloConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
