#![warn(missing_docs)]
//! Core components of tabular model-free control.
//!
//! The crate provides the pieces shared by every control loop:
//!
//! * [`Env`], the contract of a finite, discrete environment, and [`Step`], the
//!   outcome of one interaction.
//! * Dense tables over `(state, action)` pairs: [`QTable`], [`VisitCounts`],
//!   [`StochasticPolicy`] and [`DeterministicPolicy`].
//! * [`RewardShaping`] and the [`Sampler`], which produce shaped transitions and
//!   whole [`Episode`]s.
//! * [`Trainer`], which drives an [`Agent`] for a fixed number of iterations,
//!   and [`DefaultEvaluator`], which measures the success rate of a policy.
//! * [`record`], a small key-value record system used for logging.
pub mod dummy;
pub mod error;
pub mod record;
pub mod util;

mod base;
pub use base::{Action, Agent, Env, Policy, State, Step};

mod table;
pub use table::{
    maximizers, DeterministicPolicy, QTable, StochasticPolicy, VisitCounts, ROW_SUM_TOLERANCE,
};

mod shaping;
pub use shaping::RewardShaping;

mod sampler;
pub use sampler::{Episode, Sampler, ShapedStep, Transition, DEFAULT_MAX_STEPS};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

mod trainer;
pub use trainer::{Trainer, TrainerConfig};
