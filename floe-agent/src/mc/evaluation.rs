use anyhow::Result;
use floe_core::{
    error::{check_action, check_state, FloeError},
    Action, QTable, State, Transition, VisitCounts,
};
use std::collections::HashSet;
use xxhash_rust::xxh3::Xxh3Builder;

/// First-visit Monte Carlo evaluation of one episode.
///
/// For each step `i` whose pair `(s, a)` has not occurred earlier in the
/// episode, the visit count `n` of the pair is incremented and
/// `Q[s, a] += (G[i] - Q[s, a]) / n`. Later occurrences of the pair in the
/// same episode are skipped.
///
/// `returns[i]` is the return from step `i`, see
/// [`discounted_returns`](crate::discounted_returns).
pub fn mc_policy_evaluation(
    episode: &[Transition],
    returns: &[f64],
    q: &mut QTable,
    visits: &mut VisitCounts,
) -> Result<()> {
    if episode.len() != returns.len() {
        return Err(FloeError::ShapeMismatch {
            expected: vec![episode.len()],
            actual: vec![returns.len()],
        }
        .into());
    }

    for t in episode.iter() {
        check_state(t.state, q.n_states())?;
        check_action(t.action, q.n_actions())?;
    }

    let mut visited = HashSet::<(State, Action), Xxh3Builder>::default();
    for (t, g) in episode.iter().zip(returns.iter()) {
        if !visited.insert((t.state, t.action)) {
            continue;
        }
        let n = visits.increment(t.state, t.action);
        let v = q.get(t.state, t.action);
        q.set(t.state, t.action, v + (g - v) / n as f64);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition(state: State, action: Action, reward: f64) -> Transition {
        Transition {
            state,
            action,
            reward,
        }
    }

    #[test]
    fn test_first_visit_only() -> Result<()> {
        // (1, 0) is visited at steps 2 and 5
        let episode = vec![
            transition(0, 1, -1.0),
            transition(2, 0, -1.0),
            transition(1, 0, -1.0),
            transition(3, 1, -1.0),
            transition(2, 1, -1.0),
            transition(1, 0, 10.0),
        ];
        let returns = vec![6.0, 7.0, 8.0, 9.0, 10.0, 11.0];
        let mut q = QTable::new(4, 2);
        let mut visits = VisitCounts::new(4, 2);

        mc_policy_evaluation(&episode, &returns, &mut q, &mut visits)?;
        assert_eq!(q.get(1, 0), 8.0);
        assert_eq!(visits.get(1, 0), 1);
        assert_eq!(q.get(0, 1), 6.0);
        assert_eq!(q.get(2, 1), 10.0);
        Ok(())
    }

    #[test]
    fn test_incremental_mean_over_episodes() -> Result<()> {
        let episode = vec![transition(0, 0, 0.0)];
        let mut q = QTable::new(1, 1);
        let mut visits = VisitCounts::new(1, 1);

        for g in [2.0, 4.0, 9.0].iter() {
            mc_policy_evaluation(&episode, &[*g], &mut q, &mut visits)?;
        }
        assert_eq!(visits.get(0, 0), 3);
        assert!((q.get(0, 0) - 5.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_length_mismatch() {
        let episode = vec![transition(0, 0, 0.0)];
        let mut q = QTable::new(1, 1);
        let mut visits = VisitCounts::new(1, 1);
        assert!(mc_policy_evaluation(&episode, &[], &mut q, &mut visits).is_err());
        assert!(mc_policy_evaluation(&[transition(1, 0, 0.0)], &[0.0], &mut q, &mut visits).is_err());
    }

    #[test]
    fn test_invalid_transition_leaves_tables_untouched() {
        // the last step has an action out of range
        let episode = vec![
            transition(0, 0, -1.0),
            transition(1, 1, -1.0),
            transition(1, 2, 10.0),
        ];
        let mut q = QTable::new(2, 2);
        let mut visits = VisitCounts::new(2, 2);
        let err = mc_policy_evaluation(&episode, &[8.0, 9.0, 10.0], &mut q, &mut visits).unwrap_err();
        assert_eq!(
            err.downcast_ref::<FloeError>(),
            Some(&FloeError::ActionOutOfRange {
                action: 2,
                n_actions: 2
            })
        );
        assert_eq!(q, QTable::new(2, 2));
        assert_eq!(visits, VisitCounts::new(2, 2));
    }
}
