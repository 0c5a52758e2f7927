//! Reward shaping applied to training transitions.
use crate::{State, Step};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Shapes the native reward of an environment step for training.
///
/// The rules are applied in order:
///
/// 1. If the step ends the episode with a positive native reward, the reward
///    becomes `goal_reward`.
/// 2. Then, if the new state is a hazard state, the reward becomes
///    `hazard_reward`, overriding the first rule.
/// 3. Otherwise, if the episode is not done, the reward becomes `step_reward`.
///
/// In any other case the native reward is kept.
/// Evaluation always uses the native reward.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct RewardShaping {
    /// States penalized with `hazard_reward`.
    pub hazard_states: Vec<State>,

    /// Reward for ending the episode with a positive native reward.
    pub goal_reward: f64,

    /// Reward for entering a hazard state.
    pub hazard_reward: f64,

    /// Reward for any other step of an ongoing episode.
    pub step_reward: f64,
}

impl Default for RewardShaping {
    fn default() -> Self {
        Self {
            hazard_states: vec![7, 9, 12],
            goal_reward: 10.0,
            hazard_reward: -10.0,
            step_reward: -1.0,
        }
    }
}

impl RewardShaping {
    /// Sets the hazard states.
    pub fn hazard_states(mut self, v: Vec<State>) -> Self {
        self.hazard_states = v;
        self
    }

    /// Sets the reward for reaching the goal.
    pub fn goal_reward(mut self, v: f64) -> Self {
        self.goal_reward = v;
        self
    }

    /// Sets the reward for entering a hazard state.
    pub fn hazard_reward(mut self, v: f64) -> Self {
        self.hazard_reward = v;
        self
    }

    /// Sets the reward for the other steps.
    pub fn step_reward(mut self, v: f64) -> Self {
        self.step_reward = v;
        self
    }

    /// Returns `true` if the given state is a hazard state.
    pub fn is_hazard(&self, state: State) -> bool {
        self.hazard_states.contains(&state)
    }

    /// Shaped reward of the given step.
    pub fn shape(&self, step: &Step) -> f64 {
        let done = step.is_done();
        let mut reward = step.reward;
        if done && reward > 0.0 {
            reward = self.goal_reward;
        }
        if self.is_hazard(step.obs) {
            self.hazard_reward
        } else if !done {
            self.step_reward
        } else {
            reward
        }
    }

    /// Constructs [`RewardShaping`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`RewardShaping`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
