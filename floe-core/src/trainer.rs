//! Train [`Agent`].
mod config;
use crate::{
    record::{
        AggregateRecorder, Record,
        RecordValue::{DateTime, Scalar},
    },
    Agent, Env,
};
use anyhow::Result;
use chrono::Local;
pub use config::TrainerConfig;
use log::{debug, info};
use std::time::SystemTime;

fn is_due(iter: usize, interval: usize) -> bool {
    interval > 0 && iter % interval == 0
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Runs a tabular control loop for a fixed number of iterations.
///
/// # Training loop
///
/// 0. Given an environment implementing [`Env`], an agent implementing
///    [`Agent`] and a recorder implementing [`AggregateRecorder`].
/// 1. Start a timer.
/// 2. Call [`Agent::train_step`]: one episode for Monte Carlo control, one
///    environment step for temporal difference control. `iter += 1`.
/// 3. If `iter % record_interval == 0`, add `"iter"` and `"epsilon"` to the
///    record returned by the agent and store it in the recorder.
/// 4. If `iter % flush_record_interval == 0`, flush the recorder.
/// 5. If `iter == max_iters`, finish the loop, otherwise go back to 2.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|Action|B[Env]
///     B -->|Step|C[Sampler]
///     C -->|shaped reward|A
///     A -->|Record|D[AggregateRecorder]
/// ```
///
/// The agent owns its [`Sampler`](crate::Sampler), which shapes the native
/// reward of each [`Step`](crate::Step) before the agent updates its tables.
pub struct Trainer {
    /// The number of iterations.
    max_iters: usize,

    /// Interval of recording agent information in iterations.
    record_interval: usize,

    /// Interval of flushing records in iterations.
    flush_record_interval: usize,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Self {
        Self {
            max_iters: config.max_iters,
            record_interval: config.record_interval,
            flush_record_interval: config.flush_record_interval,
        }
    }

    /// Trains the agent.
    ///
    /// Returns a record with the start time (`"started_at"`), the number of
    /// iterations (`"iters"`), the wall-clock duration of training in seconds
    /// (`"elapsed_secs"`) and the final action-value table (`"q"`).
    pub fn train<E, A>(
        &mut self,
        env: &mut E,
        agent: &mut A,
        recorder: &mut dyn AggregateRecorder,
    ) -> Result<Record>
    where
        E: Env,
        A: Agent,
    {
        info!("Starts training for {} iterations", self.max_iters);
        let started_at = Local::now();
        let timer = SystemTime::now();

        for iter in 1..=self.max_iters {
            let mut record = agent.train_step(env)?;

            if is_due(iter, self.record_interval) {
                record.insert("iter", Scalar(iter as f32));
                record.insert("epsilon", Scalar(agent.epsilon() as f32));
                recorder.store(record);
            }

            if is_due(iter, self.flush_record_interval) {
                debug!("Flushes records at iteration {}", iter);
                recorder.flush(iter as _);
            }
        }
        recorder.flush(self.max_iters as _);

        let elapsed = timer.elapsed()?;
        info!(
            "Finished training, {} iterations in {:.2} minutes",
            self.max_iters,
            elapsed.as_secs_f32() / 60.0
        );

        Ok(Record::from_slice(&[
            ("started_at", DateTime(started_at)),
            ("iters", Scalar(self.max_iters as f32)),
            ("elapsed_secs", Scalar(elapsed.as_secs_f32())),
            ("q", agent.q_table().to_record_value()),
        ]))
    }
}
