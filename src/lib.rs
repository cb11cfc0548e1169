//! # Tabula - Tabular Q-Learning for Continuous Observations
//!
//! Tabula learns control policies for environments with continuous
//! observations and a small discrete action set. Observations are binned
//! onto a fixed grid and a dense action-value table is trained with the
//! Q-learning update.
//!
//! ## Key Features
//!
//! - **Discretization**: per-dimension clipping and uniform binning
//! - **Dense value table**: flat storage with O(1) offset lookup, bincode snapshots
//! - **Schedules**: geometric, exponential-to-floor and performance-adaptive exploration
//! - **Reward shaping**: optional clipping with terminal success/failure bonuses
//! - **Top-K tracking**: best episodes retained for replay or recording
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tabula::config::TrainerConfigBuilder;
//! use tabula::schedule::ExplorationSchedule;
//! use tabula::trainer::Trainer;
//! # fn lander() -> Box<dyn tabula::env::Environment> { unimplemented!() }
//!
//! let config = TrainerConfigBuilder::new()
//!     .episodes(500)
//!     .exploration(ExplorationSchedule::exponential_to_floor(0.01, 0.01))
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! let mut trainer = Trainer::from_checkpoint(config, "q_table.bin").unwrap();
//! let mut env = lander();
//! if !trainer.has_pretrained_table() {
//!     let report = trainer.train(&mut *env).unwrap();
//!     println!("last return: {:?}", report.returns().last());
//!     trainer.save_table("q_table.bin").unwrap();
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`agent`] - Q-learning agent, epsilon-greedy policy and Bellman update
//! - [`config`] - Trainer configuration and builder
//! - [`discretizer`] - Observation binning
//! - [`env`] - Environment trait and transitions
//! - [`episode`] - Single-episode orchestration
//! - [`error`] - Error types and result handling
//! - [`metrics`] - Training history and return windows
//! - [`q_table`] - Dense action-value table
//! - [`schedule`] - Learning-rate and exploration schedules
//! - [`shaping`] - Reward shaping strategies
//! - [`top_k`] - Best-episode tracking
//! - [`trainer`] - Multi-episode training loop
//! - [`types`] - Shared data types

pub mod agent;
pub mod config;
pub mod discretizer;
pub mod env;
pub mod episode;
pub mod error;
pub mod metrics;
pub mod q_table;
pub mod schedule;
pub mod shaping;
pub mod top_k;
pub mod trainer;
pub mod types;

pub use error::{Result, TabulaError};
