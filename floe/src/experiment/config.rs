//! Configuration of an experiment.
use anyhow::Result;
use clap::ValueEnum;
use floe_core::RewardShaping;
use floe_lake::FrozenLakeConfig;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Control algorithm compared in an experiment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Algorithm {
    /// First-visit Monte Carlo control with GLIE exploration.
    MonteCarlo,

    /// On-policy temporal difference control.
    Sarsa,

    /// Off-policy temporal difference control.
    QLearning,
}

impl Algorithm {
    /// Name used in the accuracy lines of the report.
    pub fn label(self) -> &'static str {
        match self {
            Self::MonteCarlo => "MC GLIE",
            Self::Sarsa => "TD SARSA",
            Self::QLearning => "Q Learning",
        }
    }

    /// Banner printed before the algorithm is trained.
    pub fn banner(self) -> &'static str {
        match self {
            Self::MonteCarlo => "Beginning Monte Carlo",
            Self::Sarsa => "Beginning Temporal-Difference",
            Self::QLearning => "Beginning Q-Learning",
        }
    }

    pub(crate) fn index(self) -> u64 {
        match self {
            Self::MonteCarlo => 0,
            Self::Sarsa => 1,
            Self::QLearning => 2,
        }
    }
}

/// Configuration of [`run_experiment`](super::run_experiment).
///
/// The default reproduces the reference experiment: ten repetitions of SARSA
/// and Q-learning on the slippery 4x4 lake, each trained for 100000
/// environment steps and evaluated on 500 episodes.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ExperimentConfig {
    /// The number of repetitions of every algorithm.
    pub repetitions: usize,

    /// Training steps of the temporal difference algorithms.
    pub iterations: usize,

    /// Algorithms run in every repetition, in order.
    pub algorithms: Vec<Algorithm>,

    /// Discount factor.
    pub gamma: f64,

    /// Step size of the temporal difference algorithms.
    pub alpha: f64,

    /// Training episodes of Monte Carlo control.
    pub mc_iterations: usize,

    /// The number of evaluation episodes.
    pub n_eval_episodes: usize,

    /// Step budget of an evaluation episode.
    pub eval_max_steps: usize,

    /// Interval of recording agent information in iterations.
    pub record_interval: usize,

    /// The lake trained and evaluated on.
    pub lake: FrozenLakeConfig,

    /// Reward shaping applied during training.
    pub shaping: RewardShaping,

    /// Base seed, from which the seeds of every run are derived.
    pub seed: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            repetitions: 10,
            iterations: 100_000,
            algorithms: vec![Algorithm::Sarsa, Algorithm::QLearning],
            gamma: 0.9,
            alpha: 0.1,
            mc_iterations: 10_000,
            n_eval_episodes: 500,
            eval_max_steps: 500,
            record_interval: 100,
            lake: FrozenLakeConfig::stochastic_4x4(),
            shaping: RewardShaping::default(),
            seed: 42,
        }
    }
}

impl ExperimentConfig {
    /// Sets the number of repetitions.
    pub fn repetitions(mut self, v: usize) -> Self {
        self.repetitions = v;
        self
    }

    /// Sets the training steps of the temporal difference algorithms.
    pub fn iterations(mut self, v: usize) -> Self {
        self.iterations = v;
        self
    }

    /// Sets the algorithms.
    pub fn algorithms(mut self, v: Vec<Algorithm>) -> Self {
        self.algorithms = v;
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

    /// Sets the training episodes of Monte Carlo control.
    pub fn mc_iterations(mut self, v: usize) -> Self {
        self.mc_iterations = v;
        self
    }

    /// Sets the number of evaluation episodes.
    pub fn n_eval_episodes(mut self, v: usize) -> Self {
        self.n_eval_episodes = v;
        self
    }

    /// Sets the step budget of an evaluation episode.
    pub fn eval_max_steps(mut self, v: usize) -> Self {
        self.eval_max_steps = v;
        self
    }

    /// Sets the record interval.
    pub fn record_interval(mut self, v: usize) -> Self {
        self.record_interval = v;
        self
    }

    /// Sets the lake.
    pub fn lake(mut self, v: FrozenLakeConfig) -> Self {
        self.lake = v;
        self
    }

    /// Sets the reward shaping.
    pub fn shaping(mut self, v: RewardShaping) -> Self {
        self.shaping = v;
        self
    }

    /// Sets the base seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Loads [`ExperimentConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ExperimentConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_experiment_config() -> Result<()> {
        let config = ExperimentConfig::default()
            .repetitions(3)
            .algorithms(vec![Algorithm::MonteCarlo, Algorithm::QLearning])
            .lake(FrozenLakeConfig::deterministic_4x4())
            .seed(7);

        let dir = TempDir::new("experiment_config")?;
        let path = dir.path().join("experiment_config.yaml");
        config.save(&path)?;
        let config_ = ExperimentConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_algorithm_labels() {
        assert_eq!(Algorithm::Sarsa.label(), "TD SARSA");
        assert_eq!(Algorithm::QLearning.label(), "Q Learning");
        assert_eq!(Algorithm::Sarsa.banner(), "Beginning Temporal-Difference");
        assert_eq!(Algorithm::QLearning.banner(), "Beginning Q-Learning");
    }
}
