//! Core functionalities.
mod agent;
mod env;
mod policy;
mod step;
pub use agent::Agent;
pub use env::{Action, Env, State};
pub use policy::Policy;
pub use step::Step;
