//! Finite MDP given by an explicit transition model.
use anyhow::Result;
use floe_core::{
    error::{check_action, check_state, FloeError},
    record::{Record, RecordValue},
    Action, Env, State, Step,
};
use log::trace;
use rand::{
    distributions::{Distribution, WeightedIndex},
    rngs::SmallRng,
    SeedableRng,
};
use serde::{Deserialize, Serialize};

const PROB_TOLERANCE: f64 = 1e-6;

/// One possible result of taking an action in a state.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Outcome {
    /// Probability of this outcome.
    pub prob: f64,

    /// The state after the transition.
    pub next_state: State,

    /// Reward of the transition.
    pub reward: f64,

    /// Whether the transition terminates the episode.
    pub done: bool,
}

impl Outcome {
    /// Constructs an outcome.
    pub fn new(prob: f64, next_state: State, reward: f64, done: bool) -> Self {
        Self {
            prob,
            next_state,
            reward,
            done,
        }
    }
}

/// Configuration of [`DiscreteEnv`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct DiscreteEnvConfig {
    /// `transitions[s][a]` lists the outcomes of taking `a` in `s`.
    pub transitions: Vec<Vec<Vec<Outcome>>>,

    /// Initial state distribution.
    pub isd: Vec<f64>,

    /// If given, episodes are truncated after this number of steps.
    pub max_steps: Option<usize>,
}

fn check_probs(probs: &[f64], what: impl Fn() -> String) -> Result<(), FloeError> {
    if probs.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(FloeError::InvalidModel(format!(
            "{} has a negative or non-finite probability",
            what()
        )));
    }
    let sum: f64 = probs.iter().sum();
    if (sum - 1.0).abs() > PROB_TOLERANCE {
        return Err(FloeError::InvalidModel(format!(
            "probabilities of {} sum to {}",
            what(),
            sum
        )));
    }
    Ok(())
}

impl DiscreteEnvConfig {
    /// Constructs a configuration without truncation.
    pub fn new(transitions: Vec<Vec<Vec<Outcome>>>, isd: Vec<f64>) -> Self {
        Self {
            transitions,
            isd,
            max_steps: None,
        }
    }

    /// Sets the number of steps after which episodes are truncated.
    pub fn max_steps(mut self, v: Option<usize>) -> Self {
        self.max_steps = v;
        self
    }

    /// The number of states.
    pub fn n_states(&self) -> usize {
        self.transitions.len()
    }

    /// The number of actions.
    pub fn n_actions(&self) -> usize {
        self.transitions.first().map_or(0, |row| row.len())
    }

    /// Checks the consistency of the model.
    ///
    /// Every state must have the same positive number of actions, every
    /// action at least one outcome, outcome probabilities and the initial
    /// state distribution must be distributions, and next states must be in
    /// range.
    pub fn validate(&self) -> Result<(), FloeError> {
        let n_states = self.n_states();
        let n_actions = self.n_actions();
        if n_states == 0 || n_actions == 0 {
            return Err(FloeError::InvalidModel(
                "the model has no state or no action".to_string(),
            ));
        }
        if self.isd.len() != n_states {
            return Err(FloeError::ShapeMismatch {
                expected: vec![n_states],
                actual: vec![self.isd.len()],
            });
        }
        check_probs(&self.isd, || "the initial state distribution".to_string())?;

        for (s, row) in self.transitions.iter().enumerate() {
            if row.len() != n_actions {
                return Err(FloeError::ShapeMismatch {
                    expected: vec![n_states, n_actions],
                    actual: vec![s, row.len()],
                });
            }
            for (a, outcomes) in row.iter().enumerate() {
                if outcomes.is_empty() {
                    return Err(FloeError::InvalidModel(format!(
                        "no outcome for state {} and action {}",
                        s, a
                    )));
                }
                if let Some(o) = outcomes.iter().find(|o| o.next_state >= n_states) {
                    return Err(FloeError::StateOutOfRange {
                        state: o.next_state,
                        n_states,
                    });
                }
                let probs: Vec<f64> = outcomes.iter().map(|o| o.prob).collect();
                check_probs(&probs, || format!("state {} and action {}", s, a))?;
            }
        }
        Ok(())
    }
}

/// Finite MDP sampling its transitions from an explicit model.
///
/// Randomness of the transitions and of the initial state is drawn from the
/// environment's own random number generator, seeded in [`Env::build`].
pub struct DiscreteEnv {
    config: DiscreteEnvConfig,
    dists: Vec<Vec<WeightedIndex<f64>>>,
    isd: WeightedIndex<f64>,
    state: State,
    last_action: Option<Action>,
    n_steps: usize,
    rng: SmallRng,
}

impl DiscreteEnv {
    /// The current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// The action of the latest step, `None` right after a reset.
    pub fn last_action(&self) -> Option<Action> {
        self.last_action
    }

    /// The outcomes of taking `a` in `s`.
    pub fn outcomes(&self, s: State, a: Action) -> Result<&[Outcome], FloeError> {
        check_state(s, self.config.n_states())?;
        check_action(a, self.config.n_actions())?;
        Ok(&self.config.transitions[s][a])
    }

    /// The transition model.
    pub fn config(&self) -> &DiscreteEnvConfig {
        &self.config
    }
}

impl Env for DiscreteEnv {
    type Config = DiscreteEnvConfig;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        config.validate()?;

        let dists = config
            .transitions
            .iter()
            .map(|row| {
                row.iter()
                    .map(|outcomes| WeightedIndex::new(outcomes.iter().map(|o| o.prob)))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        let isd = WeightedIndex::new(config.isd.iter())?;
        let mut rng = SmallRng::seed_from_u64(seed as u64);
        let state = isd.sample(&mut rng);

        Ok(Self {
            config: config.clone(),
            dists,
            isd,
            state,
            last_action: None,
            n_steps: 0,
            rng,
        })
    }

    fn n_states(&self) -> usize {
        self.config.n_states()
    }

    fn n_actions(&self) -> usize {
        self.config.n_actions()
    }

    fn reset(&mut self) -> Result<State> {
        self.state = self.isd.sample(&mut self.rng);
        self.last_action = None;
        self.n_steps = 0;
        Ok(self.state)
    }

    fn step(&mut self, a: Action) -> Result<(Step, Record)> {
        check_action(a, self.n_actions())?;

        let ix = self.dists[self.state][a].sample(&mut self.rng);
        let outcome = &self.config.transitions[self.state][a][ix];
        trace!(
            "{} --({})--> {} with prob {}",
            self.state,
            a,
            outcome.next_state,
            outcome.prob
        );

        self.state = outcome.next_state;
        self.last_action = Some(a);
        self.n_steps += 1;
        let is_truncated = !outcome.done
            && self
                .config
                .max_steps
                .map_or(false, |max_steps| self.n_steps >= max_steps);

        let step = Step::new(
            outcome.next_state,
            a,
            outcome.reward,
            outcome.done,
            is_truncated,
        );
        let record = Record::from_slice(&[("prob", RecordValue::Scalar(outcome.prob as f32))]);

        Ok((step, record))
    }
}
