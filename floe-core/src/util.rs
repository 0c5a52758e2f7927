//! Utilities for interaction of policies and environments.
use crate::{
    record::{Record, RecordValue, Recorder},
    Env, Policy,
};
use anyhow::Result;
use rand::Rng;

/// Runs a single episode with a policy, writing every step to the recorder.
///
/// Each record holds the step index (`"step"`), the state before the step
/// (`"state"`), the action (`"action"`), the native reward (`"reward"`) and,
/// if the environment supports rendering, the frame after the step
/// (`"frame"`). The frame of the initial state is written first with
/// step index 0 and no action.
///
/// Returns the number of steps taken and the native reward of the last step.
pub fn rollout_with_recorder<E, P, G, R>(
    env: &mut E,
    policy: &P,
    rng: &mut G,
    max_steps: usize,
    recorder: &mut R,
) -> Result<(usize, f64)>
where
    E: Env,
    P: Policy,
    G: Rng + ?Sized,
    R: Recorder,
{
    let mut state = env.reset()?;
    let mut last_reward = 0.0;
    let mut n_steps = 0;

    let mut record = Record::from_scalar("step", 0.0);
    record.insert("state", RecordValue::Scalar(state as f32));
    if let Some(frame) = env.render() {
        record.insert("frame", RecordValue::String(frame));
    }
    recorder.write(record);

    while n_steps < max_steps {
        let act = policy.sample(state, rng)?;
        let (step, mut record) = env.step(act)?;
        n_steps += 1;
        last_reward = step.reward;

        record.insert("step", RecordValue::Scalar(n_steps as f32));
        record.insert("state", RecordValue::Scalar(state as f32));
        record.insert("action", RecordValue::Scalar(act as f32));
        record.insert("reward", RecordValue::Scalar(step.reward as f32));
        if let Some(frame) = env.render() {
            record.insert("frame", RecordValue::String(frame));
        }
        recorder.write(record);

        if step.is_done() {
            break;
        }
        state = step.obs;
    }

    Ok((n_steps, last_reward))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dummy::ChainEnv, record::BufferedRecorder, DeterministicPolicy};
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_rollout_writes_frames() -> Result<()> {
        let mut env = ChainEnv::build(&Default::default(), 0)?;
        let policy = DeterministicPolicy::new(vec![0, 0], 2)?;
        let mut rng = SmallRng::seed_from_u64(0);
        let mut recorder = BufferedRecorder::new();

        let (n_steps, reward) =
            rollout_with_recorder(&mut env, &policy, &mut rng, 10, &mut recorder)?;
        assert_eq!(n_steps, 1);
        assert_eq!(reward, 1.0);

        let frames: Vec<String> = recorder
            .iter()
            .map(|r| r.get_string("frame"))
            .collect::<Result<_, _>>()?;
        assert_eq!(frames, vec!["[*] [ ]", "[ ] [*]"]);
        Ok(())
    }
}
