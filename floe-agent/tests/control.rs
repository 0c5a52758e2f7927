use anyhow::Result;
use floe_agent::{MonteCarloConfig, MonteCarloGlie, TdConfig, TdControl, TdMethod};
use floe_core::{
    dummy::ChainEnv, Agent, DefaultEvaluator, Env, Evaluator, RewardShaping,
};
use floe_lake::{FrozenLake, FrozenLakeConfig};
use rand::{rngs::StdRng, SeedableRng};

/// The chain has no hazard: reaching state 1 gives 10, looping in state 0 gives -1.
fn chain_shaping() -> RewardShaping {
    RewardShaping::default().hazard_states(vec![])
}

#[test]
fn test_q_learning_on_chain() -> Result<()> {
    let mut env = ChainEnv::build(&Default::default(), 0)?;
    let config = TdConfig::q_learning()
        .alpha(0.5)
        .gamma(0.9)
        .shaping(chain_shaping());
    let mut agent = TdControl::from_env(config, &env)?;

    for _ in 0..50 {
        agent.train_step(&mut env)?;
    }
    let q = agent.q_table();
    assert!(q.get(0, 0) > q.get(0, 1), "{:?}", q.as_array());
    assert_eq!(agent.greedy_policy().action(0)?, 0);
    Ok(())
}

#[test]
fn test_sarsa_on_chain() -> Result<()> {
    let mut env = ChainEnv::build(&Default::default(), 0)?;
    let config = TdConfig::sarsa()
        .alpha(0.5)
        .gamma(0.9)
        .shaping(chain_shaping());
    let mut agent = TdControl::from_env(config, &env)?.with_rng(StdRng::seed_from_u64(1));

    for _ in 0..100 {
        agent.train_step(&mut env)?;
    }
    let q = agent.q_table();
    assert!(q.get(0, 0) > q.get(0, 1), "{:?}", q.as_array());
    assert_eq!(agent.greedy_policy().action(0)?, 0);
    Ok(())
}

#[test]
fn test_monte_carlo_on_chain() -> Result<()> {
    let mut env = ChainEnv::build(&Default::default(), 0)?;
    let config = MonteCarloConfig::default().gamma(0.9).shaping(chain_shaping());
    let mut agent = MonteCarloGlie::from_env(config, &env)?;

    for _ in 0..50 {
        agent.train_step(&mut env)?;
    }
    let q = agent.q_table();
    // the first visit of (0, 0) always ends the episode with 10
    assert_eq!(q.get(0, 0), 10.0);
    assert!(q.get(0, 1) < q.get(0, 0));
    assert_eq!(agent.greedy_policy().action(0)?, 0);
    assert_eq!(agent.visits().get(0, 0), 50);
    Ok(())
}

#[test]
fn test_same_seed_same_run() -> Result<()> {
    let run = || -> Result<Vec<f64>> {
        let config = FrozenLakeConfig::stochastic_4x4();
        let mut env = FrozenLake::build(&config, 7)?;
        let mut agent = TdControl::from_env(TdConfig::sarsa().seed(11), &env)?;
        for _ in 0..2_000 {
            agent.train_step(&mut env)?;
        }
        Ok(agent.q_table().as_array().iter().copied().collect())
    };
    assert_eq!(run()?, run()?);
    Ok(())
}

fn solves_deterministic_lake(method: TdMethod) -> Result<f32> {
    let config = FrozenLakeConfig::deterministic_4x4();
    let mut env = FrozenLake::build(&config, 0)?;
    let mut agent = TdControl::from_env(TdConfig::default().method(method), &env)?;
    for _ in 0..30_000 {
        agent.train_step(&mut env)?;
    }

    let policy = agent.greedy_policy();
    let mut evaluator = DefaultEvaluator::<FrozenLake>::new(&config, 0, 10, 500)?;
    Ok(evaluator.evaluate(&policy)?.get_scalar("success_rate")?)
}

#[test_log::test]
fn test_q_learning_solves_deterministic_lake() -> Result<()> {
    assert_eq!(solves_deterministic_lake(TdMethod::QLearning)?, 100.0);
    Ok(())
}

#[test_log::test]
fn test_sarsa_solves_deterministic_lake() -> Result<()> {
    assert_eq!(solves_deterministic_lake(TdMethod::Sarsa)?, 100.0);
    Ok(())
}
