//! One-step temporal difference control.
mod base;
mod config;
mod update;
pub use base::TdControl;
pub use config::{TdConfig, TdMethod};
pub use update::{q_learning_target, sarsa_target, td_update};
