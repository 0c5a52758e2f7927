//! Discrete environments for tabular control.
//!
//! [`DiscreteEnv`] is a finite MDP given by an explicit transition model:
//! for every state and action, a list of [`Outcome`]s with their
//! probabilities. [`FrozenLake`] builds the model of the frozen-lake grid
//! world on top of it.
//!
//! ```rust
//! use floe_core::Env;
//! use floe_lake::{FrozenLake, FrozenLakeConfig};
//!
//! let config = FrozenLakeConfig::deterministic_4x4();
//! let mut env = FrozenLake::build(&config, 42).unwrap();
//! let s = env.reset().unwrap();
//! assert_eq!(s, 0);
//!
//! // move right along the first row
//! let (step, _) = env.step(2).unwrap();
//! assert_eq!(step.obs, 1);
//! assert!(!step.is_done());
//! ```
mod discrete;
mod frozen_lake;
mod policy_map;

pub use discrete::{DiscreteEnv, DiscreteEnvConfig, Outcome};
pub use frozen_lake::{FrozenLake, FrozenLakeConfig, LakeAction, Tile};
pub use policy_map::{draw_policy_map, format_policy_map};
