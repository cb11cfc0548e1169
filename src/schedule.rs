use crate::error::{Result, TabulaError};
use crate::metrics::ReturnWindow;
use serde::{Serialize, Deserialize};

/// `max(min, initial * (1 - decay)^episode)`
pub fn geometric_decay(initial: f32, min: f32, decay: f32, episode: usize) -> f32 {
    let exponent = episode.min(i32::MAX as usize) as i32;
    min.max(initial * (1.0 - decay).powi(exponent))
}

/// Learning-rate schedule: geometric decay floored at `min`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LearningRateSchedule {
    pub initial: f32,
    pub min: f32,
    pub decay: f32,
}

impl LearningRateSchedule {
    pub fn new(initial: f32, min: f32, decay: f32) -> Self {
        LearningRateSchedule { initial, min, decay }
    }

    /// Fixed learning rate
    pub fn constant(alpha: f32) -> Self {
        LearningRateSchedule { initial: alpha, min: alpha, decay: 0.0 }
    }

    /// Learning rate for a given episode
    pub fn value(&self, episode: usize) -> f32 {
        geometric_decay(self.initial, self.min, self.decay, episode)
    }

    pub fn validate(&self) -> Result<()> {
        check_unit("learning_rate.initial", self.initial)?;
        check_unit("learning_rate.min", self.min)?;
        check_decay("learning_rate.decay", self.decay)
    }
}

impl Default for LearningRateSchedule {
    fn default() -> Self {
        LearningRateSchedule::new(1.0, 0.0, 0.00016)
    }
}

/// Exploration (epsilon) schedule strategies
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ExplorationSchedule {
    /// epsilon = max(min, initial * (1 - decay)^episode)
    Geometric {
        initial: f32,
        min: f32,
        decay: f32,
    },

    /// epsilon = min + (1 - min) * exp(-rate * episode)
    ExponentialToFloor {
        min: f32,
        rate: f32,
    },

    /// Multiplicative decay whose factor follows recent performance.
    ///
    /// Once `window` returns have been seen and their mean exceeds
    /// `threshold`, epsilon is multiplied by `slow_decay`; otherwise by
    /// `fast_decay`. The result never drops below `min`.
    Adaptive {
        initial: f32,
        min: f32,
        window: usize,
        threshold: f32,
        slow_decay: f32,
        fast_decay: f32,
    },
}

impl ExplorationSchedule {
    pub fn geometric(initial: f32, min: f32, decay: f32) -> Self {
        ExplorationSchedule::Geometric { initial, min, decay }
    }

    pub fn exponential_to_floor(min: f32, rate: f32) -> Self {
        ExplorationSchedule::ExponentialToFloor { min, rate }
    }

    /// Pure greedy policy for every episode
    pub fn greedy() -> Self {
        ExplorationSchedule::Geometric { initial: 0.0, min: 0.0, decay: 0.0 }
    }

    /// Exploration rate of the first episode
    pub fn initial(&self) -> f32 {
        match self {
            ExplorationSchedule::Adaptive { initial, min, .. } => initial.max(*min),
            _ => self.closed_form(0),
        }
    }

    /// Exploration rate for `next_episode`.
    ///
    /// The closed-form variants ignore `current` and `window`; the adaptive
    /// variant derives the next value from both.
    pub fn next(&self, next_episode: usize, current: f32, window: &ReturnWindow) -> f32 {
        match self {
            ExplorationSchedule::Adaptive { min, threshold, slow_decay, fast_decay, .. } => {
                let factor = match window.mean() {
                    Some(mean) if window.is_full() && mean > *threshold => *slow_decay,
                    _ => *fast_decay,
                };
                min.max(current * factor)
            }
            _ => self.closed_form(next_episode),
        }
    }

    fn closed_form(&self, episode: usize) -> f32 {
        match self {
            ExplorationSchedule::Geometric { initial, min, decay } => {
                geometric_decay(*initial, *min, *decay, episode)
            }
            ExplorationSchedule::ExponentialToFloor { min, rate } => {
                min + (1.0 - min) * (-rate * episode as f32).exp()
            }
            ExplorationSchedule::Adaptive { initial, .. } => *initial,
        }
    }

    /// Size of the return window the trainer must keep, if any
    pub fn window_size(&self) -> Option<usize> {
        match self {
            ExplorationSchedule::Adaptive { window, .. } => Some(*window),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ExplorationSchedule::Geometric { initial, min, decay } => {
                check_unit("exploration.initial", *initial)?;
                check_unit("exploration.min", *min)?;
                check_decay("exploration.decay", *decay)
            }
            ExplorationSchedule::ExponentialToFloor { min, rate } => {
                check_unit("exploration.min", *min)?;
                if !rate.is_finite() || *rate < 0.0 {
                    return Err(TabulaError::invalid_configuration(
                        "exploration.rate",
                        "must be a finite non-negative number",
                    ));
                }
                Ok(())
            }
            ExplorationSchedule::Adaptive { initial, min, window, threshold, slow_decay, fast_decay } => {
                check_unit("exploration.initial", *initial)?;
                check_unit("exploration.min", *min)?;
                if *window == 0 {
                    return Err(TabulaError::invalid_configuration(
                        "exploration.window",
                        "must hold at least one return",
                    ));
                }
                if !threshold.is_finite() {
                    return Err(TabulaError::invalid_configuration(
                        "exploration.threshold",
                        "must be finite",
                    ));
                }
                check_factor("exploration.slow_decay", *slow_decay)?;
                check_factor("exploration.fast_decay", *fast_decay)?;
                if slow_decay < fast_decay {
                    return Err(TabulaError::invalid_configuration(
                        "exploration.slow_decay",
                        "must not decay faster than fast_decay",
                    ));
                }
                Ok(())
            }
        }
    }
}

impl Default for ExplorationSchedule {
    fn default() -> Self {
        ExplorationSchedule::geometric(0.005, 0.0, 1e-6)
    }
}

fn check_unit(name: &str, value: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(TabulaError::InvalidConfiguration {
            name: name.to_string(),
            reason: format!("{} is outside [0, 1]", value),
        });
    }
    Ok(())
}

fn check_decay(name: &str, value: f32) -> Result<()> {
    if !(0.0..1.0).contains(&value) {
        return Err(TabulaError::InvalidConfiguration {
            name: name.to_string(),
            reason: format!("{} is outside [0, 1)", value),
        });
    }
    Ok(())
}

fn check_factor(name: &str, value: f32) -> Result<()> {
    if !(value > 0.0 && value <= 1.0) {
        return Err(TabulaError::InvalidConfiguration {
            name: name.to_string(),
            reason: format!("{} is outside (0, 1]", value),
        });
    }
    Ok(())
}
