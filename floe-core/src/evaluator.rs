//! Evaluate policies.
use crate::{record::Record, Policy};
use anyhow::Result;
mod default_evaluator;
pub use default_evaluator::DefaultEvaluator;

/// Evaluate a [`Policy`].
pub trait Evaluator {
    /// Evaluates the policy and returns the results in a [`Record`].
    fn evaluate<P: Policy>(&mut self, policy: &P) -> Result<Record>;
}
