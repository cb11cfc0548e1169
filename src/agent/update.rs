use crate::q_table::QTable;
use crate::types::{Action, DiscreteState};

/// Q-learning update for one transition.
///
/// `Q[s,a] <- (1 - alpha) * Q[s,a] + alpha * (reward + gamma * max_a' Q[s',a'])`
///
/// Returns the new value of `Q[s,a]`. The reward is used as given; no
/// clipping or normalization happens here.
pub fn bellman_update(
    table: &mut QTable,
    state: &DiscreteState,
    action: Action,
    reward: f32,
    next_state: &DiscreteState,
    alpha: f32,
    gamma: f32,
) -> f32 {
    let current = table.get(state, action);
    let target = reward + gamma * table.max_value(next_state);
    let updated = (1.0 - alpha) * current + alpha * target;
    table.set(state, action, updated);
    updated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (QTable, DiscreteState, DiscreteState) {
        let mut table = QTable::new(&[3], 2).unwrap();
        let s = DiscreteState::new(vec![0]);
        let next = DiscreteState::new(vec![1]);
        table.set(&s, 1, 4.0);
        table.set(&next, 0, 2.0);
        table.set(&next, 1, 6.0);
        (table, s, next)
    }

    #[test]
    fn test_full_rate_no_discount_yields_reward() {
        let (mut table, s, next) = setup();
        bellman_update(&mut table, &s, 1, -3.25, &next, 1.0, 0.0);
        assert_eq!(table.get(&s, 1), -3.25);
    }

    #[test]
    fn test_zero_rate_leaves_value() {
        let (mut table, s, next) = setup();
        bellman_update(&mut table, &s, 1, 100.0, &next, 0.0, 0.99);
        assert_eq!(table.get(&s, 1), 4.0);
    }

    #[test]
    fn test_bootstraps_from_best_next_action() {
        let (mut table, s, next) = setup();
        // 0.5 * 4 + 0.5 * (1 + 1.0 * 6)
        let updated = bellman_update(&mut table, &s, 1, 1.0, &next, 0.5, 1.0);
        assert_eq!(updated, 5.5);
        assert_eq!(table.get(&s, 1), 5.5);
        assert_eq!(table.get(&s, 0), 0.0);
    }

    #[test]
    fn test_self_transition() {
        let mut table = QTable::new(&[1], 1).unwrap();
        let s = DiscreteState::new(vec![0]);
        table.set(&s, 0, 2.0);
        // 0.5 * 2 + 0.5 * (1 + 0.5 * 2)
        bellman_update(&mut table, &s, 0, 1.0, &s, 0.5, 0.5);
        assert_eq!(table.get(&s, 0), 2.0);
    }
}
