use anyhow::Result;
use floe_core::{error::check_gamma, Transition};

/// Discounted return from every step of an episode.
///
/// `G[i] = r[i] + gamma * r[i + 1] + ... + gamma^(T - 1 - i) * r[T - 1]`,
/// accumulated backwards from the last step.
pub fn discounted_returns(episode: &[Transition], gamma: f64) -> Result<Vec<f64>> {
    check_gamma(gamma)?;

    let mut returns = vec![0.0; episode.len()];
    let mut g = 0.0;
    for (i, t) in episode.iter().enumerate().rev() {
        g = t.reward + gamma * g;
        returns[i] = g;
    }
    Ok(returns)
}
