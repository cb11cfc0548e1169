use crate::agent::QLearningAgent;
use crate::config::TrainerConfig;
use crate::discretizer::Discretizer;
use crate::env::Environment;
use crate::episode::{run_episode, run_greedy_episode, EpisodeParams, EpisodeSummary};
use crate::error::{Result, TabulaError};
use crate::metrics::{ReturnWindow, TrainingMetrics};
use crate::q_table::QTable;
use crate::top_k::TopKTracker;
use crate::types::EpisodeRecord;
use serde::{Serialize, Deserialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Everything a training run produces besides the table itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Per-episode history; `metrics.episode_returns` is the return series
    pub metrics: TrainingMetrics,

    /// Best episodes, highest return first
    pub top_k: Vec<EpisodeRecord>,

    pub episodes_run: usize,

    /// Episode index at which the early-stop threshold was crossed
    pub stopped_early_at: Option<usize>,
}

impl TrainingReport {
    /// Return of every episode actually run
    pub fn returns(&self) -> &[f32] {
        &self.metrics.episode_returns
    }

    /// Save the report to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }
}

/// Result of greedy evaluation episodes.
///
/// The summary fields are all zero when no episode was run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub returns: Vec<f32>,
    pub mean: f32,
    /// Population standard deviation of the returns
    pub std: f32,
    pub min: f32,
    pub max: f32,
    pub success_rate: f32,
}

impl Evaluation {
    fn from_summaries(summaries: &[EpisodeSummary]) -> Self {
        let returns: Vec<f32> = summaries.iter().map(|s| s.total_return).collect();
        if returns.is_empty() {
            return Evaluation { returns, mean: 0.0, std: 0.0, min: 0.0, max: 0.0, success_rate: 0.0 };
        }

        let n = returns.len() as f32;
        let mean = returns.iter().sum::<f32>() / n;
        let variance = returns.iter().map(|r| (r - mean) * (r - mean)).sum::<f32>() / n;
        let (min, max) = returns
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &r| (lo.min(r), hi.max(r)));
        let landed = summaries.iter().filter(|s| s.success).count();

        Evaluation {
            returns,
            mean,
            std: variance.sqrt(),
            min,
            max,
            success_rate: landed as f32 / n,
        }
    }
}

/// Runs tabular Q-learning over many episodes.
///
/// The trainer exclusively owns the agent (and thus the table), the top-K
/// list and the schedule windows for the duration of a run.
///
/// # Example
///
/// ```rust,no_run
/// use tabula::config::TrainerConfig;
/// use tabula::trainer::Trainer;
/// # fn env() -> Box<dyn tabula::env::Environment> { unimplemented!() }
///
/// let mut trainer = Trainer::new(TrainerConfig::default()).unwrap();
/// let mut env = env();
/// let report = trainer.train(&mut *env).unwrap();
/// println!("best episodes: {:?}", report.top_k);
/// trainer.save_table("q_table.bin").unwrap();
/// ```
#[derive(Debug)]
pub struct Trainer {
    config: TrainerConfig,
    agent: QLearningAgent,
    top_k: TopKTracker,
    pretrained: bool,
}

impl Trainer {
    /// Validate the configuration and start from a zeroed table
    pub fn new(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        let table = QTable::new(&config.bins(), config.num_actions)?;
        Self::assemble(config, table, false)
    }

    /// Start from an existing table; its shape must match the config
    pub fn with_table(config: TrainerConfig, table: QTable) -> Result<Self> {
        config.validate()?;
        table.check_shape(&config.bins(), config.num_actions)?;
        Self::assemble(config, table, true)
    }

    /// Resume from a saved table when `path` exists, otherwise start fresh
    pub fn from_checkpoint<P: AsRef<Path>>(config: TrainerConfig, path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            config.validate()?;
            let table = QTable::load_matching(path, &config.bins(), config.num_actions)?;
            info!(path = %path.display(), "loaded pretrained value table");
            Self::with_table(config, table)
        } else {
            Self::new(config)
        }
    }

    fn assemble(config: TrainerConfig, table: QTable, pretrained: bool) -> Result<Self> {
        let discretizer = Discretizer::new(config.dimensions.clone())?;
        let agent = QLearningAgent::new(discretizer, table, config.seed)?;
        let top_k = TopKTracker::new(config.top_k)?;
        Ok(Trainer { config, agent, top_k, pretrained })
    }

    /// True when the table came from a checkpoint, so training may be skipped
    pub fn has_pretrained_table(&self) -> bool {
        self.pretrained
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn agent(&self) -> &QLearningAgent {
        &self.agent
    }

    pub fn table(&self) -> &QTable {
        self.agent.table()
    }

    pub fn into_table(self) -> QTable {
        self.agent.into_table()
    }

    /// Best episodes of the last run
    pub fn top_k(&self) -> &[EpisodeRecord] {
        self.top_k.records()
    }

    /// Swap in another table of the same shape
    pub fn replace_table(&mut self, table: QTable) -> Result<()> {
        let visited = self.agent.table().visited_states();
        if visited > 0 {
            warn!(visited, "discarding a partially trained value table");
        }
        self.agent.set_table(table)?;
        self.pretrained = true;
        Ok(())
    }

    pub fn save_table<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.agent.table().save(path)
    }

    fn check_environment<E: Environment + ?Sized>(&self, env: &E) -> Result<()> {
        if env.num_actions() != self.config.num_actions {
            return Err(TabulaError::InvalidConfiguration {
                name: "num_actions".to_string(),
                reason: format!(
                    "environment exposes {} actions, configured {}",
                    env.num_actions(),
                    self.config.num_actions
                ),
            });
        }
        Ok(())
    }

    /// Run up to `config.episodes` learning episodes.
    ///
    /// Episode indices start at zero on every call, so the schedules restart
    /// while the table keeps what it has learned.
    pub fn train<E: Environment + ?Sized>(&mut self, env: &mut E) -> Result<TrainingReport> {
        self.check_environment(env)?;

        let config = &self.config;
        let mut metrics = TrainingMetrics::new();
        let mut trailing = ReturnWindow::new(config.progress_window);
        let mut adaptive = ReturnWindow::new(config.exploration.window_size().unwrap_or(0));
        let mut epsilon = config.exploration.initial();
        let mut stopped_early_at = None;
        self.top_k.clear();

        info!(
            episodes = config.episodes,
            states = self.agent.table().num_states(),
            actions = config.num_actions,
            "starting training"
        );

        for episode in 0..config.episodes {
            let alpha = config.learning_rate.value(episode);
            let params = EpisodeParams {
                epsilon,
                alpha,
                gamma: config.gamma,
                terminal_bootstrap: config.terminal_bootstrap,
            };
            let summary = run_episode(&mut self.agent, env, &params, &config.reward_shaping)?;
            let total_return = summary.total_return;

            metrics.record_episode(&summary, alpha, epsilon);
            trailing.push(total_return);
            adaptive.push(total_return);
            debug!(episode, total_return, steps = summary.steps, epsilon, alpha, "episode finished");

            if self.top_k.offer(episode, total_return) {
                debug!(episode, total_return, "entered top-k");
            }

            if config.progress_interval > 0 && (episode + 1) % config.progress_interval == 0 {
                info!(
                    "Episode {}/{} | mean of last {}: {:.2}",
                    episode + 1,
                    config.episodes,
                    trailing.len(),
                    trailing.mean().unwrap_or(0.0)
                );
            }

            if let Some(threshold) = config.early_stop_threshold {
                if let Some(mean) = trailing.mean().filter(|_| trailing.is_full()) {
                    if mean > threshold {
                        info!(episode, mean, threshold, "early stop threshold reached");
                        stopped_early_at = Some(episode);
                        break;
                    }
                }
            }

            epsilon = config.exploration.next(episode + 1, epsilon, &adaptive);
        }

        let episodes_run = metrics.episode_count();
        info!(
            episodes_run,
            visited_states = self.agent.table().visited_states(),
            "training finished"
        );

        Ok(TrainingReport {
            metrics,
            top_k: self.top_k.records().to_vec(),
            episodes_run,
            stopped_early_at,
        })
    }

    /// Greedy episodes without learning, scored by raw environment reward
    pub fn evaluate<E: Environment + ?Sized>(&self, env: &mut E, episodes: usize) -> Result<Evaluation> {
        self.check_environment(env)?;

        let mut summaries = Vec::with_capacity(episodes);
        for _ in 0..episodes {
            summaries.push(run_greedy_episode(&self.agent, env)?);
        }
        let evaluation = Evaluation::from_summaries(&summaries);
        info!(episodes, mean = evaluation.mean, success_rate = evaluation.success_rate, "evaluation finished");
        Ok(evaluation)
    }

    /// One greedy episode per top-K record, in rank order.
    ///
    /// Without any records (e.g. a pretrained table that was never trained
    /// here) episodes `0..k` with a zero return stand in.
    pub fn replay_top_k<E: Environment + ?Sized>(
        &self,
        env: &mut E,
    ) -> Result<Vec<(EpisodeRecord, EpisodeSummary)>> {
        self.check_environment(env)?;

        let records: Vec<EpisodeRecord> = if self.top_k.is_empty() {
            (0..self.top_k.k()).map(|i| EpisodeRecord::new(i, 0.0)).collect()
        } else {
            self.top_k.records().to_vec()
        };

        let mut replays = Vec::with_capacity(records.len());
        for record in records {
            let summary = run_greedy_episode(&self.agent, env)?;
            debug!(episode = record.episode, replay_return = summary.total_return, "replayed");
            replays.push((record, summary));
        }
        Ok(replays)
    }
}
