//! # Tabular Q-Learning Agent
//!
//! The agent couples three pieces:
//!
//! - **Discretizer**: continuous observation -> grid cell
//! - **Value table**: dense `(cell, action) -> return estimate` store
//! - **Policy**: epsilon-greedy selection over the table
//!
//! Value updates go through [`bellman_update`], which applies the standard
//! Q-learning rule with an explicit learning rate and discount factor per
//! call, so schedules stay outside the agent.
//!
//! ## Example Usage
//!
//! ```rust
//! use tabula::agent::QLearningAgent;
//! use tabula::discretizer::Discretizer;
//! use tabula::types::DimensionSpec;
//! use ndarray::array;
//!
//! let discretizer = Discretizer::new(vec![
//!     DimensionSpec::new(-1.0, 1.0, 6),
//!     DimensionSpec::new(-1.0, 1.0, 6),
//! ]).unwrap();
//! let mut agent = QLearningAgent::fresh(discretizer, 4, Some(42)).unwrap();
//!
//! let state = agent.observe(array![0.1, -0.4].view()).unwrap();
//! let action = agent.act(&state, 0.1);
//! assert!(action < 4);
//! ```

mod policy;
mod q_learning;
mod update;

pub use policy::EpsilonGreedy;
pub use q_learning::QLearningAgent;
pub use update::bellman_update;
