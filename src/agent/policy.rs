use crate::q_table::QTable;
use crate::types::{Action, DiscreteState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Epsilon-greedy action selection over a value table
#[derive(Clone, Debug)]
pub struct EpsilonGreedy<R: Rng = StdRng> {
    rng: R,
}

impl EpsilonGreedy<StdRng> {
    /// Seeded when `seed` is given, otherwise seeded from entropy
    pub fn from_seed(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        EpsilonGreedy { rng }
    }
}

impl<R: Rng> EpsilonGreedy<R> {
    pub fn new(rng: R) -> Self {
        EpsilonGreedy { rng }
    }

    /// Uniform random action with probability `epsilon`, greedy otherwise
    pub fn select_action(&mut self, table: &QTable, state: &DiscreteState, epsilon: f32) -> Action {
        if self.rng.gen::<f32>() < epsilon {
            self.rng.gen_range(0..table.num_actions())
        } else {
            table.best_action(state)
        }
    }
}
