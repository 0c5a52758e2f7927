//! Repeated training and evaluation of control algorithms on the lake.
mod config;
pub use config::{Algorithm, ExperimentConfig};

use anyhow::Result;
use csv::WriterBuilder;
use floe_agent::{MonteCarloConfig, MonteCarloGlie, TdConfig, TdControl, TdMethod};
use floe_core::{
    record::{AggregateRecorder, BufferedRecorder, NullRecorder},
    util::rollout_with_recorder,
    Agent, DefaultEvaluator, DeterministicPolicy, Env, Evaluator, Trainer, TrainerConfig,
};
use floe_lake::{draw_policy_map, FrozenLake};
use log::info;
use rand::{rngs::SmallRng, SeedableRng};
use serde::Serialize;
use std::{fs::File, path::Path};

/// Result of training and evaluating one algorithm in one repetition.
#[derive(Clone, Debug)]
pub struct RunResult {
    /// The algorithm.
    pub algorithm: Algorithm,

    /// Index of the repetition, starting from 0.
    pub repetition: usize,

    /// Seed of the run.
    pub seed: u64,

    /// Success rate of the greedy policy in percent.
    pub success_rate: f32,

    /// Wall-clock duration of training in seconds.
    pub elapsed_secs: f32,

    /// Greedy policy extracted after training.
    pub policy: DeterministicPolicy,

    /// The greedy policy drawn on the lake.
    pub policy_map: Vec<Vec<String>>,
}

/// Mean and population variance of the success rates of an algorithm.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    /// The algorithm.
    pub algorithm: Algorithm,

    /// Mean of the success rates.
    pub mean: f64,

    /// Population variance of the success rates.
    pub variance: f64,
}

/// All runs of an experiment.
#[derive(Clone, Debug)]
pub struct ExperimentReport {
    /// Runs in the order they were performed.
    pub runs: Vec<RunResult>,

    /// One summary per algorithm, in the order of the configuration.
    pub summaries: Vec<Summary>,
}

#[derive(Debug, Serialize)]
struct RunRow {
    repetition: usize,
    algorithm: &'static str,
    seed: u64,
    success_rate: f32,
    elapsed_secs: f32,
    policy: String,
}

impl From<&RunResult> for RunRow {
    fn from(run: &RunResult) -> Self {
        Self {
            repetition: run.repetition,
            algorithm: run.algorithm.label(),
            seed: run.seed,
            success_rate: run.success_rate,
            elapsed_secs: run.elapsed_secs,
            policy: run.policy_map.iter().flatten().cloned().collect::<Vec<_>>().join(" "),
        }
    }
}

impl ExperimentReport {
    /// Builds a report from runs, summarizing every algorithm in `algorithms`.
    pub fn new(runs: Vec<RunResult>, algorithms: &[Algorithm]) -> Self {
        let summaries = algorithms
            .iter()
            .map(|&algorithm| {
                let rates = runs
                    .iter()
                    .filter(|run| run.algorithm == algorithm)
                    .map(|run| run.success_rate as f64)
                    .collect::<Vec<_>>();
                let (mean, variance) = summarize(&rates);
                Summary {
                    algorithm,
                    mean,
                    variance,
                }
            })
            .collect();

        Self { runs, summaries }
    }

    /// Summary of the given algorithm.
    pub fn summary(&self, algorithm: Algorithm) -> Option<&Summary> {
        self.summaries.iter().find(|s| s.algorithm == algorithm)
    }

    /// Writes one CSV row per run.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut wtr = WriterBuilder::new().from_writer(File::create(path)?);
        for run in self.runs.iter() {
            wtr.serialize(RunRow::from(run))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Mean and population variance of the values, `(0, 0)` if there are none.
pub fn summarize(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance)
}

fn run_seed(base: u64, algorithm: Algorithm, repetition: usize) -> u64 {
    base.wrapping_add(1000 * repetition as u64 + 100 * algorithm.index())
}

fn train_and_evaluate<A: Agent>(
    config: &ExperimentConfig,
    agent: &mut A,
    max_iters: usize,
    seed: u64,
    recorder: &mut dyn AggregateRecorder,
) -> Result<(DeterministicPolicy, f32, f32)> {
    let mut env = FrozenLake::build(&config.lake, seed as i64)?;
    let mut trainer = Trainer::build(
        TrainerConfig::default()
            .max_iters(max_iters)
            .record_interval(config.record_interval)
            .flush_record_interval((max_iters / 10).max(1)),
    );
    let record = trainer.train(&mut env, agent, recorder)?;
    let policy = agent.greedy_policy();

    // Evaluation runs on its own lake so that training does not shift its randomness.
    let mut evaluator = DefaultEvaluator::<FrozenLake>::new(
        &config.lake,
        seed.wrapping_add(1) as i64,
        config.n_eval_episodes,
        config.eval_max_steps,
    )?;
    let success_rate = evaluator.evaluate(&policy)?.get_scalar("success_rate")?;

    Ok((policy, success_rate, record.get_scalar("elapsed_secs")?))
}

/// Trains and evaluates one algorithm in one repetition.
///
/// Seeds of the training lake, the agent and the evaluation lake are derived
/// from the base seed, the algorithm and the repetition index, so a run can be
/// reproduced on its own.
pub fn run_single(
    config: &ExperimentConfig,
    algorithm: Algorithm,
    repetition: usize,
    recorder: &mut dyn AggregateRecorder,
) -> Result<RunResult> {
    let seed = run_seed(config.seed, algorithm, repetition);
    let lake = FrozenLake::build(&config.lake, seed as i64)?;
    let (n_states, n_actions) = (lake.n_states(), lake.n_actions());

    let (policy, success_rate, elapsed_secs) = match algorithm {
        Algorithm::MonteCarlo => {
            let agent_config = MonteCarloConfig::default()
                .gamma(config.gamma)
                .shaping(config.shaping.clone())
                .seed(seed.wrapping_add(2));
            let mut agent = MonteCarloGlie::build(agent_config, n_states, n_actions)?;
            train_and_evaluate(config, &mut agent, config.mc_iterations, seed, recorder)?
        }
        Algorithm::Sarsa | Algorithm::QLearning => {
            let method = match algorithm {
                Algorithm::Sarsa => TdMethod::Sarsa,
                _ => TdMethod::QLearning,
            };
            let agent_config = TdConfig::default()
                .method(method)
                .gamma(config.gamma)
                .alpha(config.alpha)
                .shaping(config.shaping.clone())
                .seed(seed.wrapping_add(2));
            let mut agent = TdControl::build(agent_config, n_states, n_actions)?;
            train_and_evaluate(config, &mut agent, config.iterations, seed, recorder)?
        }
    };

    let policy_map = draw_policy_map(&policy, &lake)?;
    info!(
        "{} repetition {}: success rate {}",
        algorithm.label(),
        repetition,
        success_rate
    );

    Ok(RunResult {
        algorithm,
        repetition,
        seed,
        success_rate,
        elapsed_secs,
        policy,
        policy_map,
    })
}

/// Runs every configured algorithm in every repetition.
///
/// Training records are discarded; use [`run_single`] with a recorder to keep them.
pub fn run_experiment(config: &ExperimentConfig) -> Result<ExperimentReport> {
    let mut runs = Vec::with_capacity(config.repetitions * config.algorithms.len());
    for repetition in 0..config.repetitions {
        for &algorithm in config.algorithms.iter() {
            runs.push(run_single(config, algorithm, repetition, &mut NullRecorder::new())?);
        }
    }
    Ok(ExperimentReport::new(runs, &config.algorithms))
}

/// Rolls out a policy on a freshly built lake and returns the rendered frames.
pub fn render_episode(
    config: &ExperimentConfig,
    policy: &DeterministicPolicy,
    seed: u64,
) -> Result<Vec<String>> {
    let mut env = FrozenLake::build(&config.lake, seed as i64)?;
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut recorder = BufferedRecorder::new();
    rollout_with_recorder(&mut env, policy, &mut rng, config.eval_max_steps, &mut recorder)?;

    Ok(recorder
        .iter()
        .filter_map(|record| record.get_string("frame").ok())
        .collect())
}
