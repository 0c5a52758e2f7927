#![allow(clippy::float_cmp)]
//! Dense tables indexed by `(state, action)` pairs.
use crate::{
    error::{check_action, check_state, FloeError},
    record::RecordValue,
    Action, Policy, State,
};
use anyhow::Result;
use itertools::Itertools;
use ndarray::{Array1, Array2, ArrayView1};
use rand::{
    distributions::{Distribution, WeightedIndex},
    seq::SliceRandom,
    Rng,
};

/// Tolerance on the sum of a row of a [`StochasticPolicy`].
pub const ROW_SUM_TOLERANCE: f64 = 1e-6;

/// Returns all actions attaining the maximum of the given row.
///
/// Values are compared exactly, so every action sharing the maximum is returned.
pub fn maximizers(row: ArrayView1<f64>) -> Vec<Action> {
    let max = row.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
    row.iter().positions(|&v| v == max).collect()
}

/// Action-value table `Q[s, a]`.
#[derive(Clone, Debug, PartialEq)]
pub struct QTable(Array2<f64>);

impl QTable {
    /// Constructs a table of zeros.
    pub fn new(n_states: usize, n_actions: usize) -> Self {
        Self(Array2::zeros((n_states, n_actions)))
    }

    /// Wraps an existing array of shape `[n_states, n_actions]`.
    pub fn from_array(values: Array2<f64>) -> Self {
        Self(values)
    }

    /// The number of states.
    pub fn n_states(&self) -> usize {
        self.0.nrows()
    }

    /// The number of actions.
    pub fn n_actions(&self) -> usize {
        self.0.ncols()
    }

    /// Returns `Q[s, a]`.
    ///
    /// # Panics
    ///
    /// Panics if `s` or `a` is out of range. Use [`QTable::try_get`] for a checked read.
    pub fn get(&self, s: State, a: Action) -> f64 {
        self.0[[s, a]]
    }

    /// Sets `Q[s, a]`.
    ///
    /// # Panics
    ///
    /// Panics if `s` or `a` is out of range. Use [`QTable::try_set`] for a checked write.
    pub fn set(&mut self, s: State, a: Action, v: f64) {
        self.0[[s, a]] = v;
    }

    /// Returns `Q[s, a]`, or an error if the pair is out of range.
    pub fn try_get(&self, s: State, a: Action) -> Result<f64, FloeError> {
        check_state(s, self.n_states())?;
        check_action(a, self.n_actions())?;
        Ok(self.0[[s, a]])
    }

    /// Sets `Q[s, a]`, or returns an error if the pair is out of range.
    pub fn try_set(&mut self, s: State, a: Action, v: f64) -> Result<(), FloeError> {
        check_state(s, self.n_states())?;
        check_action(a, self.n_actions())?;
        self.0[[s, a]] = v;
        Ok(())
    }

    /// Row of the given state.
    pub fn row(&self, s: State) -> ArrayView1<f64> {
        self.0.row(s)
    }

    /// `max_a Q[s, a]`.
    pub fn max_value(&self, s: State) -> f64 {
        self.0.row(s).fold(f64::NEG_INFINITY, |m, &v| m.max(v))
    }

    /// All actions attaining `max_a Q[s, a]`.
    pub fn maximizers(&self, s: State) -> Vec<Action> {
        maximizers(self.0.row(s))
    }

    /// Greedy deterministic policy, drawing uniformly among tied maximizers.
    pub fn greedy_policy<R: Rng + ?Sized>(&self, rng: &mut R) -> DeterministicPolicy {
        let actions = (0..self.n_states())
            .map(|s| self.maximizers(s).choose(rng).copied().unwrap_or_default())
            .collect();

        DeterministicPolicy {
            actions,
            n_actions: self.n_actions(),
        }
    }

    /// Underlying array.
    pub fn as_array(&self) -> &Array2<f64> {
        &self.0
    }

    /// Converts the table into a value of a [`Record`](crate::record::Record).
    pub fn to_record_value(&self) -> RecordValue {
        RecordValue::Array2(
            self.0.iter().map(|&v| v as f32).collect(),
            [self.n_states(), self.n_actions()],
        )
    }
}

/// Number of episodes in which each `(state, action)` pair was first-visited.
#[derive(Clone, Debug, PartialEq)]
pub struct VisitCounts(Array2<u64>);

impl VisitCounts {
    /// Constructs a table of zeros.
    pub fn new(n_states: usize, n_actions: usize) -> Self {
        Self(Array2::zeros((n_states, n_actions)))
    }

    /// Returns the count of `(s, a)`.
    pub fn get(&self, s: State, a: Action) -> u64 {
        self.0[[s, a]]
    }

    /// Increments the count of `(s, a)` and returns the new count.
    pub fn increment(&mut self, s: State, a: Action) -> u64 {
        self.0[[s, a]] += 1;
        self.0[[s, a]]
    }

    /// Underlying array.
    pub fn as_array(&self) -> &Array2<u64> {
        &self.0
    }
}

fn check_row(state: State, row: ArrayView1<f64>) -> Result<(), FloeError> {
    if let Some(p) = row.iter().find(|p| !p.is_finite() || **p < 0.0) {
        return Err(FloeError::InvalidDistribution {
            state,
            reason: format!("{} is not a probability", p),
        });
    }
    let sum = row.sum();
    if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
        return Err(FloeError::InvalidDistribution {
            state,
            reason: format!("the row sums to {}", sum),
        });
    }
    Ok(())
}

/// Stochastic policy as a dense `[n_states, n_actions]` table.
///
/// Every row is a probability distribution over actions. Rows are checked
/// whenever they are set.
#[derive(Clone, Debug, PartialEq)]
pub struct StochasticPolicy(Array2<f64>);

impl StochasticPolicy {
    /// Policy where all actions are equally likely in every state.
    pub fn uniform(n_states: usize, n_actions: usize) -> Self {
        Self(Array2::from_elem(
            (n_states, n_actions),
            1.0 / n_actions as f64,
        ))
    }

    /// Constructs a policy from a table of probabilities.
    pub fn from_array(probs: Array2<f64>) -> Result<Self, FloeError> {
        for (s, row) in probs.outer_iter().enumerate() {
            check_row(s, row)?;
        }
        Ok(Self(probs))
    }

    /// The number of states.
    pub fn n_states(&self) -> usize {
        self.0.nrows()
    }

    /// The number of actions.
    pub fn n_actions(&self) -> usize {
        self.0.ncols()
    }

    /// Probability of action `a` in state `s`.
    pub fn prob(&self, s: State, a: Action) -> f64 {
        self.0[[s, a]]
    }

    /// Distribution over actions in state `s`.
    pub fn row(&self, s: State) -> ArrayView1<f64> {
        self.0.row(s)
    }

    /// Replaces the distribution in state `s`.
    pub fn set_row(&mut self, s: State, row: Array1<f64>) -> Result<(), FloeError> {
        check_state(s, self.n_states())?;
        if row.len() != self.n_actions() {
            return Err(FloeError::ShapeMismatch {
                expected: vec![self.n_actions()],
                actual: vec![row.len()],
            });
        }
        check_row(s, row.view())?;
        self.0.row_mut(s).assign(&row);
        Ok(())
    }

    /// Underlying array.
    pub fn as_array(&self) -> &Array2<f64> {
        &self.0
    }
}

impl Policy for StochasticPolicy {
    fn sample<R: Rng + ?Sized>(&self, state: State, rng: &mut R) -> Result<Action> {
        check_state(state, self.n_states())?;
        let dist = WeightedIndex::new(self.0.row(state).iter())?;
        Ok(dist.sample(rng))
    }
}

/// Deterministic policy, one action per state.
#[derive(Clone, Debug, PartialEq)]
pub struct DeterministicPolicy {
    actions: Vec<Action>,
    n_actions: usize,
}

impl DeterministicPolicy {
    /// Constructs a policy, checking every action against `n_actions`.
    pub fn new(actions: Vec<Action>, n_actions: usize) -> Result<Self, FloeError> {
        for &a in actions.iter() {
            check_action(a, n_actions)?;
        }
        Ok(Self { actions, n_actions })
    }

    /// Action taken in state `s`.
    pub fn action(&self, s: State) -> Result<Action, FloeError> {
        check_state(s, self.actions.len())?;
        Ok(self.actions[s])
    }

    /// Actions indexed by state.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// The number of states.
    pub fn n_states(&self) -> usize {
        self.actions.len()
    }

    /// The number of actions.
    pub fn n_actions(&self) -> usize {
        self.n_actions
    }
}

impl Policy for DeterministicPolicy {
    fn sample<R: Rng + ?Sized>(&self, state: State, _rng: &mut R) -> Result<Action> {
        Ok(self.action(state)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_maximizers_include_all_ties() {
        let q = QTable::from_array(arr2(&[[1.0, 3.0, 3.0, -1.0], [0.0, 0.0, 0.0, 0.0]]));
        assert_eq!(q.maximizers(0), vec![1, 2]);
        assert_eq!(q.maximizers(1), vec![0, 1, 2, 3]);
        assert_eq!(q.max_value(0), 3.0);
    }

    #[test]
    fn test_greedy_policy_draws_among_ties() {
        let q = QTable::from_array(arr2(&[[1.0, 3.0, 3.0, -1.0], [5.0, 0.0, 0.0, 0.0]]));
        let mut rng = SmallRng::seed_from_u64(42);
        let mut counts = [0usize; 4];
        for _ in 0..2000 {
            let policy = q.greedy_policy(&mut rng);
            assert_eq!(policy.action(1).unwrap(), 0);
            counts[policy.action(0).unwrap()] += 1;
        }
        assert_eq!(counts[0], 0);
        assert_eq!(counts[3], 0);
        assert!(counts[1] > 800 && counts[2] > 800, "{:?}", counts);
    }

    #[test]
    fn test_checked_access() {
        let mut q = QTable::new(2, 3);
        q.try_set(1, 2, 4.0).unwrap();
        assert_eq!(q.try_get(1, 2).unwrap(), 4.0);
        assert_eq!(
            q.try_get(2, 0),
            Err(FloeError::StateOutOfRange {
                state: 2,
                n_states: 2
            })
        );
        assert_eq!(
            q.try_set(0, 3, 1.0),
            Err(FloeError::ActionOutOfRange {
                action: 3,
                n_actions: 3
            })
        );
        assert_eq!(q.max_value(0), 0.0);
    }

    #[test]
    fn test_visit_counts_increment() {
        let mut visits = VisitCounts::new(2, 2);
        assert_eq!(visits.increment(1, 0), 1);
        assert_eq!(visits.increment(1, 0), 2);
        assert_eq!(visits.get(1, 0), 2);
        assert_eq!(visits.get(0, 0), 0);
    }

    #[test]
    fn test_stochastic_policy_rejects_invalid_rows() {
        let err = StochasticPolicy::from_array(arr2(&[[0.5, 0.5], [0.7, 0.7]])).unwrap_err();
        assert!(matches!(err, FloeError::InvalidDistribution { state: 1, .. }));

        let err = StochasticPolicy::from_array(arr2(&[[1.5, -0.5]])).unwrap_err();
        assert!(matches!(err, FloeError::InvalidDistribution { state: 0, .. }));

        let mut policy = StochasticPolicy::uniform(2, 2);
        assert!(policy.set_row(0, arr1(&[0.2, 0.2])).is_err());
        assert!(policy.set_row(0, arr1(&[1.0])).is_err());
        assert!(policy.set_row(2, arr1(&[0.5, 0.5])).is_err());
        policy.set_row(0, arr1(&[0.25, 0.75])).unwrap();
        assert_eq!(policy.prob(0, 1), 0.75);
    }

    #[test]
    fn test_stochastic_policy_sampling_follows_row() {
        let policy = StochasticPolicy::from_array(arr2(&[[0.0, 1.0, 0.0], [0.2, 0.0, 0.8]])).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        let n = 10_000;
        let mut hits = 0;
        for _ in 0..n {
            assert_eq!(policy.sample(0, &mut rng).unwrap(), 1);
            let a = policy.sample(1, &mut rng).unwrap();
            assert_ne!(a, 1);
            if a == 2 {
                hits += 1;
            }
        }
        let freq = hits as f64 / n as f64;
        assert!((freq - 0.8).abs() < 0.02, "{}", freq);
        assert!(policy.sample(2, &mut rng).is_err());
    }

    #[test]
    fn test_deterministic_policy_checks_range() {
        assert!(DeterministicPolicy::new(vec![0, 4], 4).is_err());
        let policy = DeterministicPolicy::new(vec![3, 1], 4).unwrap();
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(policy.sample(0, &mut rng).unwrap(), 3);
        assert!(policy.action(2).is_err());
    }

    #[test]
    fn test_q_table_record_value() {
        let q = QTable::from_array(arr2(&[[1.0, 2.0], [3.0, 4.0]]));
        match q.to_record_value() {
            RecordValue::Array2(v, shape) => {
                assert_eq!(v, vec![1.0, 2.0, 3.0, 4.0]);
                assert_eq!(shape, [2, 2]);
            }
            _ => panic!("Expect RecordValue::Array2"),
        }
    }
}
