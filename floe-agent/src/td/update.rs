use floe_core::{
    error::{check_state, FloeError},
    Action, QTable, State,
};

/// On-policy target `r + gamma * Q[s', a']` with the sampled next action `a'`.
pub fn sarsa_target(
    q: &QTable,
    reward: f64,
    next_state: State,
    next_action: Action,
    gamma: f64,
) -> Result<f64, FloeError> {
    Ok(reward + gamma * q.try_get(next_state, next_action)?)
}

/// Off-policy target `r + gamma * max_a' Q[s', a']`.
pub fn q_learning_target(
    q: &QTable,
    reward: f64,
    next_state: State,
    gamma: f64,
) -> Result<f64, FloeError> {
    check_state(next_state, q.n_states())?;
    Ok(reward + gamma * q.max_value(next_state))
}

/// Moves `Q[s, a]` towards the target by the step size `alpha`.
///
/// Returns the temporal difference error `target - Q[s, a]` before the update.
pub fn td_update(
    q: &mut QTable,
    s: State,
    a: Action,
    target: f64,
    alpha: f64,
) -> Result<f64, FloeError> {
    let v = q.try_get(s, a)?;
    let td_error = target - v;
    q.try_set(s, a, v + alpha * td_error)?;
    Ok(td_error)
}
