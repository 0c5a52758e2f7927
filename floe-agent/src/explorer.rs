//! Epsilon-greedy policy improvement.
use anyhow::Result;
use floe_core::{error::FloeError, maximizers, QTable, StochasticPolicy};
use ndarray::{Array1, Array2, ArrayView1};

/// Checks that the exploration parameter lies in `(0, 1]`.
pub fn check_epsilon(epsilon: f64) -> Result<(), FloeError> {
    if epsilon > 0.0 && epsilon <= 1.0 {
        Ok(())
    } else {
        Err(FloeError::InvalidParameter {
            name: "epsilon",
            reason: format!("{} is not in (0, 1]", epsilon),
        })
    }
}

/// Exploration parameter after `k` iterations, `1 / k`.
///
/// `k = 0` is treated as `k = 1`.
pub fn glie_epsilon(k: usize) -> f64 {
    1.0 / k.max(1) as f64
}

/// Epsilon-greedy distribution over actions for one row of action values.
///
/// Every action gets `epsilon / n_actions`. The remaining `1 - epsilon` is
/// split evenly among all actions attaining the maximum of the row.
pub fn epsilon_greedy_row(q_row: ArrayView1<f64>, epsilon: f64) -> Result<Array1<f64>> {
    check_epsilon(epsilon)?;

    let n_actions = q_row.len();
    let best = maximizers(q_row);
    if best.is_empty() {
        return Err(FloeError::InvalidParameter {
            name: "q_row",
            reason: format!("{} has no maximum", q_row),
        }
        .into());
    }

    let base = epsilon / n_actions as f64;
    let bonus = (1.0 - epsilon) / best.len() as f64;
    let mut row = Array1::from_elem(n_actions, base);
    for a in best {
        row[a] += bonus;
    }
    Ok(row)
}

/// Epsilon-greedy policy with respect to the whole action-value table.
pub fn epsilon_greedy_policy_improve(q: &QTable, epsilon: f64) -> Result<StochasticPolicy> {
    let mut probs = Array2::zeros((q.n_states(), q.n_actions()));
    for s in 0..q.n_states() {
        probs.row_mut(s).assign(&epsilon_greedy_row(q.row(s), epsilon)?);
    }
    Ok(StochasticPolicy::from_array(probs)?)
}
