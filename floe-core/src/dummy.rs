//! Small environments used in tests and documentation.
use crate::{
    error::check_action,
    record::{Record, RecordValue},
    Action, Env, State, Step,
};
use anyhow::Result;

/// Configuration of [`ChainEnv`].
#[derive(Clone, Debug, Default)]
pub struct ChainConfig;

/// Two-state chain.
///
/// * Action 0 in state 0 moves to state 1 with reward 1 and terminates the episode.
/// * Action 1 in state 0 stays in state 0 with reward 0.
/// * State 1 is absorbing.
///
/// Episodes always start in state 0.
#[derive(Clone, Debug)]
pub struct ChainEnv {
    state: State,
}

impl Env for ChainEnv {
    type Config = ChainConfig;

    fn build(_config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self { state: 0 })
    }

    fn n_states(&self) -> usize {
        2
    }

    fn n_actions(&self) -> usize {
        2
    }

    fn reset(&mut self) -> Result<State> {
        self.state = 0;
        Ok(self.state)
    }

    fn step(&mut self, a: Action) -> Result<(Step, Record)> {
        check_action(a, 2)?;
        let step = match (self.state, a) {
            (0, 0) => {
                self.state = 1;
                Step::new(1, a, 1.0, true, false)
            }
            (0, _) => Step::new(0, a, 0.0, false, false),
            _ => Step::new(1, a, 0.0, true, false),
        };
        let record = Record::from_slice(&[("state", RecordValue::Scalar(self.state as f32))]);
        Ok((step, record))
    }

    fn render(&self) -> Option<String> {
        Some(if self.state == 0 { "[*] [ ]" } else { "[ ] [*]" }.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_env() -> Result<()> {
        let mut env = ChainEnv::build(&ChainConfig, 0)?;
        assert_eq!(env.reset()?, 0);
        let (step, _) = env.step(1)?;
        assert_eq!(step, Step::new(0, 1, 0.0, false, false));
        let (step, record) = env.step(0)?;
        assert!(step.is_done());
        assert_eq!(step.reward, 1.0);
        assert_eq!(record.get_scalar("state")?, 1.0);
        assert!(env.step(2).is_err());
        Ok(())
    }
}
