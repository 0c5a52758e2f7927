use anyhow::Result;
use floe_core::{
    dummy::ChainEnv,
    record::{BufferedRecorder, LogRecorder, Record},
    Agent, DeterministicPolicy, Env, QTable, Sampler, StochasticPolicy, Trainer, TrainerConfig,
};
use rand::{rngs::SmallRng, SeedableRng};

/// Takes uniformly random steps and counts them.
struct RandomWalker {
    q: QTable,
    policy: StochasticPolicy,
    sampler: Sampler,
    state: Option<usize>,
    n_iters: usize,
    rng: SmallRng,
}

impl RandomWalker {
    fn new() -> Self {
        Self {
            q: QTable::new(2, 2),
            policy: StochasticPolicy::uniform(2, 2),
            sampler: Sampler::default(),
            state: None,
            n_iters: 0,
            rng: SmallRng::seed_from_u64(0),
        }
    }
}

impl Agent for RandomWalker {
    fn train_step<E: Env>(&mut self, env: &mut E) -> Result<Record> {
        let state = match self.state {
            Some(s) => s,
            None => env.reset()?,
        };
        let step = self
            .sampler
            .take_one_step(env, &self.policy, state, &mut self.rng)?;
        self.state = if step.is_done {
            None
        } else {
            Some(step.next_state)
        };
        self.n_iters += 1;
        Ok(Record::from_scalar("reward", step.reward as f32))
    }

    fn q_table(&self) -> &QTable {
        &self.q
    }

    fn policy(&self) -> &StochasticPolicy {
        &self.policy
    }

    fn epsilon(&self) -> f64 {
        1.0
    }

    fn n_iters(&self) -> usize {
        self.n_iters
    }

    fn greedy_policy(&mut self) -> DeterministicPolicy {
        self.q.greedy_policy(&mut self.rng)
    }
}

#[test]
fn test_trainer_runs_max_iters() -> Result<()> {
    let mut env = ChainEnv::build(&Default::default(), 0)?;
    let mut agent = RandomWalker::new();
    let mut recorder = BufferedRecorder::new();
    let config = TrainerConfig::default()
        .max_iters(100)
        .record_interval(10)
        .flush_record_interval(50);
    let mut trainer = Trainer::build(config);

    let before = chrono::Local::now();
    let record = trainer.train(&mut env, &mut agent, &mut recorder)?;
    assert_eq!(agent.n_iters(), 100);
    assert!(record.get_datetime("started_at")? >= before);
    let (q, shape) = record.get_array2("q")?;
    assert_eq!(shape, [2, 2]);
    assert_eq!(q, vec![0.0; 4]);
    assert_eq!(record.get_scalar("iters")?, 100.0);
    assert!(record.get_scalar("elapsed_secs")? >= 0.0);

    // flushed at 50 and 100; the final flush finds the storage empty
    let records = recorder.into_records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get_scalar("step")?, 50.0);
    assert_eq!(records[0].get_scalar("iter_max")?, 50.0);
    assert_eq!(records[1].get_scalar("iter_min")?, 60.0);
    assert_eq!(records[1].get_scalar("epsilon_mean")?, 1.0);
    Ok(())
}

#[test_log::test]
fn test_trainer_with_log_recorder() -> Result<()> {
    let mut env = ChainEnv::build(&Default::default(), 0)?;
    let mut agent = RandomWalker::new();
    let mut recorder = LogRecorder::new();
    let mut trainer = Trainer::build(
        TrainerConfig::default()
            .max_iters(30)
            .record_interval(1)
            .flush_record_interval(7),
    );

    trainer.train(&mut env, &mut agent, &mut recorder)?;
    assert_eq!(agent.n_iters(), 30);
    Ok(())
}

#[test]
fn test_zero_intervals_never_record() -> Result<()> {
    let mut env = ChainEnv::build(&Default::default(), 0)?;
    let mut agent = RandomWalker::new();
    let mut recorder = BufferedRecorder::new();
    let mut trainer = Trainer::build(
        TrainerConfig::default()
            .max_iters(5)
            .record_interval(0)
            .flush_record_interval(0),
    );

    trainer.train(&mut env, &mut agent, &mut recorder)?;
    assert!(recorder.is_empty());
    Ok(())
}
