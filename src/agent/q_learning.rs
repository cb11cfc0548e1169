use crate::agent::policy::EpsilonGreedy;
use crate::agent::update::bellman_update;
use crate::discretizer::Discretizer;
use crate::error::Result;
use crate::q_table::QTable;
use crate::types::{Action, DiscreteState};
use ndarray::ArrayView1;
use rand::rngs::StdRng;
use rand::Rng;

/// Tabular Q-learning agent.
///
/// Owns the discretizer, the value table and the exploration policy. The
/// table shape always matches the discretizer's bins.
///
/// # Example
///
/// ```
/// use tabula::agent::QLearningAgent;
/// use tabula::discretizer::Discretizer;
/// use tabula::types::DimensionSpec;
/// use ndarray::array;
///
/// let discretizer = Discretizer::new(vec![DimensionSpec::new(0.0, 1.0, 4)]).unwrap();
/// let mut agent = QLearningAgent::fresh(discretizer, 2, Some(1)).unwrap();
///
/// let state = agent.observe(array![0.3].view()).unwrap();
/// let next = agent.observe(array![0.9].view()).unwrap();
/// let action = agent.act(&state, 0.1);
/// agent.learn(&state, action, 1.0, &next, 0.5, 0.99);
///
/// assert_eq!(agent.table().get(&state, action), 0.5);
/// ```
#[derive(Clone, Debug)]
pub struct QLearningAgent<R: Rng = StdRng> {
    discretizer: Discretizer,
    table: QTable,
    policy: EpsilonGreedy<R>,
}

impl QLearningAgent<StdRng> {
    /// Agent with a zeroed table
    pub fn fresh(discretizer: Discretizer, num_actions: usize, seed: Option<u64>) -> Result<Self> {
        let table = QTable::new(&discretizer.bins(), num_actions)?;
        Self::new(discretizer, table, seed)
    }

    /// Agent around an existing table; fails on a shape mismatch
    pub fn new(discretizer: Discretizer, table: QTable, seed: Option<u64>) -> Result<Self> {
        Self::with_policy(discretizer, table, EpsilonGreedy::from_seed(seed))
    }
}

impl<R: Rng> QLearningAgent<R> {
    pub fn with_policy(discretizer: Discretizer, table: QTable, policy: EpsilonGreedy<R>) -> Result<Self> {
        table.check_shape(&discretizer.bins(), table.num_actions())?;
        Ok(QLearningAgent { discretizer, table, policy })
    }

    /// Discretize a raw observation
    pub fn observe(&self, observation: ArrayView1<f32>) -> Result<DiscreteState> {
        self.discretizer.discretize(observation)
    }

    /// Epsilon-greedy action
    pub fn act(&mut self, state: &DiscreteState, epsilon: f32) -> Action {
        self.policy.select_action(&self.table, state, epsilon)
    }

    pub fn greedy_action(&self, state: &DiscreteState) -> Action {
        self.table.best_action(state)
    }

    /// Apply the Bellman update and return the new `Q[state, action]`
    pub fn learn(
        &mut self,
        state: &DiscreteState,
        action: Action,
        reward: f32,
        next_state: &DiscreteState,
        alpha: f32,
        gamma: f32,
    ) -> f32 {
        bellman_update(&mut self.table, state, action, reward, next_state, alpha, gamma)
    }

    pub fn num_actions(&self) -> usize {
        self.table.num_actions()
    }

    pub fn discretizer(&self) -> &Discretizer {
        &self.discretizer
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    /// Replace the table; it must have the same shape
    pub fn set_table(&mut self, table: QTable) -> Result<()> {
        table.check_shape(self.table.bins(), self.table.num_actions())?;
        self.table = table;
        Ok(())
    }

    pub fn into_table(self) -> QTable {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TabulaError;
    use crate::types::DimensionSpec;
    use ndarray::array;

    fn discretizer() -> Discretizer {
        Discretizer::new(vec![
            DimensionSpec::new(-1.0, 1.0, 4),
            DimensionSpec::new(0.0, 1.0, 2),
        ])
        .unwrap()
    }

    #[test]
    fn test_fresh_agent_shape() {
        let agent = QLearningAgent::fresh(discretizer(), 4, Some(0)).unwrap();
        assert_eq!(agent.table().shape(), vec![4, 2, 4]);
        assert_eq!(agent.num_actions(), 4);
    }

    #[test]
    fn test_rejects_mismatched_table() {
        let table = QTable::new(&[4, 3], 4).unwrap();
        let err = QLearningAgent::new(discretizer(), table, None).unwrap_err();
        assert!(matches!(err, TabulaError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_set_table_checks_shape() {
        let mut agent = QLearningAgent::fresh(discretizer(), 4, Some(0)).unwrap();
        assert!(agent.set_table(QTable::new(&[4, 2], 3).unwrap()).is_err());
        assert!(agent.set_table(QTable::new(&[4, 2], 4).unwrap()).is_ok());
    }

    #[test]
    fn test_greedy_follows_learning() {
        let mut agent = QLearningAgent::fresh(discretizer(), 3, Some(0)).unwrap();
        let state = agent.observe(array![0.9, 0.2].view()).unwrap();
        agent.learn(&state, 2, 5.0, &state, 1.0, 0.0);
        assert_eq!(agent.greedy_action(&state), 2);
        assert_eq!(agent.act(&state, 0.0), 2);
    }
}
