//! First-visit Monte Carlo control.
mod base;
mod config;
mod evaluation;
pub use base::MonteCarloGlie;
pub use config::MonteCarloConfig;
pub use evaluation::mc_policy_evaluation;
