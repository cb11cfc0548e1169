use crate::env::Termination;
use crate::error::{Result, TabulaError};
use serde::{Serialize, Deserialize};

/// Reward transform applied before each value update
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RewardShaping {
    /// Use the environment reward unchanged
    None,

    /// Clip into `[-clip, clip]`, then add `success_bonus` on success or
    /// subtract `failure_penalty` on failure
    ClipWithTerminalBonus {
        clip: f32,
        success_bonus: f32,
        failure_penalty: f32,
    },
}

impl RewardShaping {
    /// Clip to ±100 with a ±100 terminal bonus
    pub fn clip_with_terminal_bonus() -> Self {
        RewardShaping::ClipWithTerminalBonus {
            clip: 100.0,
            success_bonus: 100.0,
            failure_penalty: 100.0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, RewardShaping::None)
    }

    pub fn shape(&self, reward: f32, termination: Termination) -> f32 {
        match self {
            RewardShaping::None => reward,
            RewardShaping::ClipWithTerminalBonus { clip, success_bonus, failure_penalty } => {
                let clipped = reward.clamp(-clip, *clip);
                match termination {
                    Termination::Running => clipped,
                    Termination::Success => clipped + success_bonus,
                    Termination::Failure => clipped - failure_penalty,
                }
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let RewardShaping::ClipWithTerminalBonus { clip, success_bonus, failure_penalty } = self {
            if !clip.is_finite() || *clip <= 0.0 {
                return Err(TabulaError::invalid_configuration(
                    "reward_shaping.clip",
                    "must be a finite positive number",
                ));
            }
            if !success_bonus.is_finite() || !failure_penalty.is_finite() {
                return Err(TabulaError::invalid_configuration(
                    "reward_shaping",
                    "terminal bonus constants must be finite",
                ));
            }
        }
        Ok(())
    }
}

impl Default for RewardShaping {
    fn default() -> Self {
        RewardShaping::None
    }
}
