//! Tabular model-free control on the frozen lake.
//!
//! The workspace consists of the following crates:
//!
//! * [floe-core](floe_core) provides the environment and agent traits, the
//!   action-value and policy tables, reward shaping, the episode sampler, the
//!   evaluator, the trainer and the record system.
//! * [floe-lake](floe_lake) provides discrete MDP environments, including
//!   the frozen-lake grid world.
//! * [floe-agent](floe_agent) provides first-visit Monte Carlo control,
//!   SARSA and Q-learning.
//! * floe, this crate, runs the experiment comparing them: repeated
//!   training and evaluation, summarized by the mean and variance of the
//!   success rate of the greedy policies. The `floe` binary is its command
//!   line interface.
pub mod experiment;
pub use experiment::{
    render_episode, run_experiment, run_single, summarize, Algorithm, ExperimentConfig,
    ExperimentReport, RunResult, Summary,
};
