#![warn(missing_docs)]
//! Tabular model-free control.
//!
//! * [`MonteCarloGlie`] - first-visit Monte Carlo control with a GLIE schedule.
//! * [`TdControl`] - one-step temporal difference control, either on-policy
//!   ([`TdMethod::Sarsa`]) or off-policy ([`TdMethod::QLearning`]).
//!
//! Both implement [`Agent`](floe_core::Agent) and keep their behaviour
//! policy epsilon-greedy with respect to their action values, where
//! epsilon decays as the reciprocal of the iteration counter. The building
//! blocks are exposed as free functions: [`discounted_returns`],
//! [`mc_policy_evaluation`], [`epsilon_greedy_row`],
//! [`epsilon_greedy_policy_improve`] and the TD targets.
mod explorer;
pub mod mc;
mod returns;
pub mod td;
pub use explorer::{
    check_epsilon, epsilon_greedy_policy_improve, epsilon_greedy_row, glie_epsilon,
};
pub use mc::{mc_policy_evaluation, MonteCarloConfig, MonteCarloGlie};
pub use returns::discounted_returns;
pub use td::{q_learning_target, sarsa_target, td_update, TdConfig, TdControl, TdMethod};
