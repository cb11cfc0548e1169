use crate::episode::EpisodeSummary;
use crate::error::TabulaError;
use serde::{Serialize, Deserialize};
use std::io::Write;
use std::path::Path;

/// Per-episode training history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Return of every episode, in order
    pub episode_returns: Vec<f32>,

    /// Steps taken in every episode
    pub episode_lengths: Vec<usize>,

    /// Whether the episode ended in success
    pub successes: Vec<bool>,

    /// Learning rate used for each episode
    pub learning_rates: Vec<f32>,

    /// Exploration rate used for each episode
    pub epsilons: Vec<f32>,
}

impl TrainingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished episode with the rates it ran under
    pub fn record_episode(&mut self, summary: &EpisodeSummary, alpha: f32, epsilon: f32) {
        self.episode_returns.push(summary.total_return);
        self.episode_lengths.push(summary.steps);
        self.successes.push(summary.success);
        self.learning_rates.push(alpha);
        self.epsilons.push(epsilon);
    }

    pub fn episode_count(&self) -> usize {
        self.episode_returns.len()
    }

    pub fn total_steps(&self) -> usize {
        self.episode_lengths.iter().sum()
    }

    /// Fraction of episodes that ended in success
    pub fn success_rate(&self) -> Option<f32> {
        if self.successes.is_empty() {
            return None;
        }
        let wins = self.successes.iter().filter(|&&s| s).count();
        Some(wins as f32 / self.successes.len() as f32)
    }

    /// Recent average episode return
    pub fn avg_episode_return(&self, window: usize) -> Option<f32> {
        if self.episode_returns.is_empty() || window == 0 {
            return None;
        }

        let n = window.min(self.episode_returns.len());
        let sum: f32 = self.episode_returns.iter().rev().take(n).sum();
        Some(sum / n as f32)
    }

    /// Trailing mean of the returns: entry `i` averages episodes
    /// `max(0, i + 1 - window)..=i`
    pub fn moving_average(&self, window: usize) -> Vec<f32> {
        let window = window.max(1);
        let mut averages = Vec::with_capacity(self.episode_returns.len());
        let mut sum = 0.0f64;
        for (i, &value) in self.episode_returns.iter().enumerate() {
            sum += value as f64;
            if i >= window {
                sum -= self.episode_returns[i - window] as f64;
            }
            let n = (i + 1).min(window);
            averages.push((sum / n as f64) as f32);
        }
        averages
    }

    /// Save metrics to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::error::Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Load metrics from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let metrics: Self = serde_json::from_str(&data)?;
        metrics.check_columns()?;
        Ok(metrics)
    }

    /// Every per-episode column must hold one entry per episode
    fn check_columns(&self) -> crate::error::Result<()> {
        let n = self.episode_count();
        let lengths = [
            self.episode_lengths.len(),
            self.successes.len(),
            self.learning_rates.len(),
            self.epsilons.len(),
        ];
        if lengths.iter().any(|&len| len != n) {
            return Err(TabulaError::SerializationError(format!(
                "metrics columns have uneven lengths: {} returns, {:?} others",
                n, lengths
            )));
        }
        Ok(())
    }

    /// Export metrics to CSV for plotting
    pub fn export_csv<P: AsRef<Path>>(&self, path: P, window: usize) -> crate::error::Result<()> {
        self.check_columns()?;
        let mut file = std::fs::File::create(path)?;
        writeln!(file, "episode,return,moving_average,steps,success,learning_rate,epsilon")?;

        let averages = self.moving_average(window);
        let rows = self
            .episode_returns
            .iter()
            .zip(&averages)
            .zip(&self.episode_lengths)
            .zip(&self.successes)
            .zip(&self.learning_rates)
            .zip(&self.epsilons);
        for (i, (((((ret, avg), steps), success), alpha), epsilon)) in rows.enumerate() {
            writeln!(file, "{},{},{},{},{},{},{}", i, ret, avg, steps, success, alpha, epsilon)?;
        }
        Ok(())
    }
}
