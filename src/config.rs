use crate::discretizer::validate_dimensions;
use crate::error::{Result, TabulaError};
use crate::q_table::checked_table_len;
use crate::schedule::{ExplorationSchedule, LearningRateSchedule};
use crate::shaping::RewardShaping;
use crate::types::DimensionSpec;
use serde::{Serialize, Deserialize};
use std::path::Path;

/// Every option recognized by the trainer.
///
/// `Default` reproduces the lunar-lander setup: eight observation
/// dimensions, four actions, undiscounted returns and a very slowly
/// decaying geometric exploration rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Number of training episodes
    pub episodes: usize,

    /// Binning of each observation dimension
    pub dimensions: Vec<DimensionSpec>,

    /// Number of discrete actions
    pub num_actions: usize,

    /// Discount factor
    pub gamma: f32,

    pub learning_rate: LearningRateSchedule,

    pub exploration: ExplorationSchedule,

    pub reward_shaping: RewardShaping,

    /// Number of best episodes to retain
    pub top_k: usize,

    /// Emit a progress line every this many episodes; 0 disables
    pub progress_interval: usize,

    /// Size of the trailing return window used for progress and early stop
    pub progress_window: usize,

    /// Stop once the full trailing window's mean return exceeds this
    pub early_stop_threshold: Option<f32>,

    /// Bootstrap from the next-state of terminal transitions
    pub terminal_bootstrap: bool,

    /// Seed for the exploration RNG; entropy when absent
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        let bins = [4, 4, 4, 4, 4, 4, 2, 2];
        let lower = [-0.1, -0.2, -0.2, -0.2, -0.2, -0.2, 0.0, 0.0];
        let upper = [0.1, 0.2, 0.2, 0.2, 0.2, 0.2, 1.0, 1.0];
        let dimensions = (0..bins.len())
            .map(|i| DimensionSpec::new(lower[i], upper[i], bins[i]))
            .collect();

        TrainerConfig {
            episodes: 300,
            dimensions,
            num_actions: 4,
            gamma: 1.0,
            learning_rate: LearningRateSchedule::default(),
            exploration: ExplorationSchedule::default(),
            reward_shaping: RewardShaping::None,
            top_k: 10,
            progress_interval: 100,
            progress_window: 100,
            early_stop_threshold: None,
            terminal_bootstrap: true,
            seed: None,
        }
    }
}

impl TrainerConfig {
    /// Reject unusable settings before any episode runs
    pub fn validate(&self) -> Result<()> {
        validate_dimensions(&self.dimensions)?;

        if self.num_actions == 0 {
            return Err(TabulaError::invalid_configuration(
                "num_actions",
                "at least one action is required",
            ));
        }
        checked_table_len(&self.bins(), self.num_actions)?;
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(TabulaError::InvalidConfiguration {
                name: "gamma".to_string(),
                reason: format!("{} is outside [0, 1]", self.gamma),
            });
        }
        if self.top_k == 0 {
            return Err(TabulaError::invalid_configuration("top_k", "must be at least 1"));
        }
        if self.progress_window == 0 {
            return Err(TabulaError::invalid_configuration(
                "progress_window",
                "must hold at least one return",
            ));
        }
        if let Some(threshold) = self.early_stop_threshold {
            if !threshold.is_finite() {
                return Err(TabulaError::invalid_configuration(
                    "early_stop_threshold",
                    "must be finite",
                ));
            }
        }

        self.learning_rate.validate()?;
        self.exploration.validate()?;
        self.reward_shaping.validate()
    }

    /// Bin counts in dimension order
    pub fn bins(&self) -> Vec<usize> {
        self.dimensions.iter().map(|d| d.bins).collect()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: TrainerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }
}

/// Builder pattern for TrainerConfig
pub struct TrainerConfigBuilder {
    config: TrainerConfig,
}

impl TrainerConfigBuilder {
    pub fn new() -> Self {
        TrainerConfigBuilder { config: TrainerConfig::default() }
    }

    pub fn episodes(mut self, episodes: usize) -> Self {
        self.config.episodes = episodes;
        self
    }

    pub fn dimensions(mut self, dimensions: Vec<DimensionSpec>) -> Self {
        self.config.dimensions = dimensions;
        self
    }

    /// Append one observation dimension
    pub fn dimension(mut self, lower: f32, upper: f32, bins: usize) -> Self {
        self.config.dimensions.push(DimensionSpec::new(lower, upper, bins));
        self
    }

    /// Drop all dimensions, typically before chaining `dimension` calls
    pub fn clear_dimensions(mut self) -> Self {
        self.config.dimensions.clear();
        self
    }

    pub fn num_actions(mut self, num_actions: usize) -> Self {
        self.config.num_actions = num_actions;
        self
    }

    pub fn gamma(mut self, gamma: f32) -> Self {
        self.config.gamma = gamma;
        self
    }

    pub fn learning_rate(mut self, schedule: LearningRateSchedule) -> Self {
        self.config.learning_rate = schedule;
        self
    }

    pub fn exploration(mut self, schedule: ExplorationSchedule) -> Self {
        self.config.exploration = schedule;
        self
    }

    pub fn reward_shaping(mut self, shaping: RewardShaping) -> Self {
        self.config.reward_shaping = shaping;
        self
    }

    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    pub fn progress(mut self, interval: usize, window: usize) -> Self {
        self.config.progress_interval = interval;
        self.config.progress_window = window;
        self
    }

    pub fn early_stop_threshold(mut self, threshold: f32) -> Self {
        self.config.early_stop_threshold = Some(threshold);
        self
    }

    pub fn terminal_bootstrap(mut self, bootstrap: bool) -> Self {
        self.config.terminal_bootstrap = bootstrap;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<TrainerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for TrainerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = TrainerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bins(), vec![4, 4, 4, 4, 4, 4, 2, 2]);
        assert_eq!(config.top_k, 10);
        assert_eq!(config.num_actions, 4);
    }

    #[test]
    fn test_builder() {
        let config = TrainerConfigBuilder::new()
            .episodes(50)
            .clear_dimensions()
            .dimension(-1.0, 1.0, 6)
            .dimension(0.0, 2.0, 3)
            .num_actions(2)
            .gamma(0.99)
            .top_k(3)
            .seed(9)
            .build()
            .unwrap();

        assert_eq!(config.episodes, 50);
        assert_eq!(config.bins(), vec![6, 3]);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_builder_error_handling() {
        assert!(TrainerConfigBuilder::new().top_k(0).build().is_err());
        assert!(TrainerConfigBuilder::new().clear_dimensions().build().is_err());
        assert!(TrainerConfigBuilder::new().gamma(1.5).build().is_err());
        assert!(TrainerConfigBuilder::new().num_actions(0).build().is_err());
        assert!(TrainerConfigBuilder::new()
            .clear_dimensions()
            .dimension(1.0, 1.0, 4)
            .build()
            .is_err());
        assert!(TrainerConfigBuilder::new()
            .early_stop_threshold(f32::NAN)
            .build()
            .is_err());
    }

    #[test]
    fn test_oversized_grid_rejected_by_build() {
        let mut builder = TrainerConfigBuilder::new().clear_dimensions();
        for _ in 0..8 {
            builder = builder.dimension(0.0, 1.0, 300);
        }
        let err = builder.build().unwrap_err();
        assert_eq!(
            err,
            TabulaError::invalid_configuration("dimensions", "table size overflows")
        );
    }

    #[test]
    fn test_json_partial_config_uses_defaults() {
        let config = TrainerConfig::from_json_str(r#"{ "episodes": 12, "top_k": 4 }"#).unwrap();
        assert_eq!(config.episodes, 12);
        assert_eq!(config.top_k, 4);
        assert_eq!(config.dimensions.len(), 8);
    }

    #[test]
    fn test_json_rejects_invalid() {
        let err = TrainerConfig::from_json_str(r#"{ "top_k": 0 }"#).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = TrainerConfigBuilder::new()
            .exploration(ExplorationSchedule::Adaptive {
                initial: 1.0,
                min: 0.01,
                window: 20,
                threshold: 0.0,
                slow_decay: 0.999,
                fast_decay: 0.99,
            })
            .reward_shaping(RewardShaping::clip_with_terminal_bonus())
            .build()
            .unwrap();
        config.to_json_file(&path).unwrap();
        assert_eq!(TrainerConfig::from_json_file(&path).unwrap(), config);
    }
}
