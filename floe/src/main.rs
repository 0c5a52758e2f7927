use anyhow::Result;
use clap::Parser;
use floe::{render_episode, run_single, Algorithm, ExperimentConfig, ExperimentReport};
use floe_core::record::LogRecorder;
use floe_lake::{format_policy_map, FrozenLakeConfig};
use std::path::PathBuf;

/// Compares tabular control algorithms on the frozen lake.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// YAML file of the experiment configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Algorithm to run, can be given more than once
    #[arg(short, long, value_enum)]
    algo: Vec<Algorithm>,

    /// Number of repetitions
    #[arg(short, long)]
    repetitions: Option<usize>,

    /// Training steps of the temporal difference algorithms
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Use the lake without slipping
    #[arg(short, long, default_value_t = false)]
    deterministic: bool,

    /// Base seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Render one episode of every learned policy
    #[arg(long, default_value_t = false)]
    render: bool,

    /// Write per-run results to a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Save the resolved configuration to a YAML file
    #[arg(long)]
    save_config: Option<PathBuf>,
}

fn resolve_config(args: &Args) -> Result<ExperimentConfig> {
    let mut config = match &args.config {
        Some(path) => ExperimentConfig::load(path)?,
        None => ExperimentConfig::default(),
    };
    if !args.algo.is_empty() {
        config = config.algorithms(args.algo.clone());
    }
    if let Some(v) = args.repetitions {
        config = config.repetitions(v);
    }
    if let Some(v) = args.iterations {
        config = config.iterations(v);
    }
    if args.deterministic {
        let lake = config.lake.clone().is_slippery(false);
        config = config.lake(lake);
    }
    if let Some(v) = args.seed {
        config = config.seed(v);
    }
    Ok(config)
}

fn run(config: &ExperimentConfig, render: bool) -> Result<ExperimentReport> {
    let mut runs = vec![];
    let mut recorder = LogRecorder::new();

    for repetition in 0..config.repetitions {
        println!("--- Training Session {} ---", repetition);
        for &algorithm in config.algorithms.iter() {
            println!();
            println!("-------------------------");
            println!("{}", algorithm.banner());
            println!("-------------------------");

            let result = run_single(config, algorithm, repetition, &mut recorder)?;
            println!("{} Accuracy: {}", algorithm.label(), result.success_rate);
            println!("{}", format_policy_map(&result.policy_map));

            if render {
                for frame in render_episode(config, &result.policy, result.seed)? {
                    println!("{}", frame);
                }
            }
            runs.push(result);
        }
        println!();
    }

    Ok(ExperimentReport::new(runs, &config.algorithms))
}

fn print_summary(report: &ExperimentReport) {
    for summary in report.summaries.iter() {
        println!(
            "{} Accuracy Mean: {}",
            summary.algorithm.label(),
            summary.mean
        );
        println!(
            "{} Accuracy Variance: {}",
            summary.algorithm.label(),
            summary.variance
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = resolve_config(&args)?;
    if let Some(path) = &args.save_config {
        config.save(path)?;
    }

    let report = run(&config, args.render)?;
    print_summary(&report);

    if let Some(path) = &args.csv {
        report.write_csv(path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn args() -> Args {
        Args {
            config: None,
            algo: vec![],
            repetitions: None,
            iterations: None,
            deterministic: false,
            seed: None,
            render: false,
            csv: None,
            save_config: None,
        }
    }

    #[test]
    fn test_no_flags_give_default_experiment() -> Result<()> {
        assert_eq!(resolve_config(&args())?, ExperimentConfig::default());
        Ok(())
    }

    #[test]
    fn test_flags_override_config_file() -> Result<()> {
        let tmp_dir = TempDir::new("floe_cli")?;
        let path = tmp_dir.path().join("experiment.yaml");
        ExperimentConfig::default().repetitions(4).seed(3).save(&path)?;

        let config = resolve_config(&Args {
            config: Some(path),
            algo: vec![Algorithm::MonteCarlo],
            iterations: Some(10),
            deterministic: true,
            ..args()
        })?;
        assert_eq!(config.repetitions, 4);
        assert_eq!(config.seed, 3);
        assert_eq!(config.iterations, 10);
        assert_eq!(config.algorithms, vec![Algorithm::MonteCarlo]);
        assert_eq!(config.lake, FrozenLakeConfig::deterministic_4x4());
        Ok(())
    }

    #[test]
    fn test_run_small_experiment() -> Result<()> {
        let config = ExperimentConfig::default()
            .repetitions(1)
            .iterations(200)
            .mc_iterations(5)
            .n_eval_episodes(5)
            .algorithms(vec![Algorithm::MonteCarlo, Algorithm::Sarsa]);
        let report = run(&config, true)?;
        assert_eq!(report.runs.len(), 2);
        print_summary(&report);
        Ok(())
    }
}
