//! Toy Lunar Lander with tabular Q-learning
//!
//! A crude 2-D lander with the same eight-dimensional observation layout
//! and four actions as the classic lander task. Trains with the default
//! lander grid, saves the table, metrics and report, then evaluates the
//! greedy policy and replays the best training episodes.
//!
//! Run with `cargo run --example toy_lander [config.json]`. A saved table
//! in the output directory is reused instead of training again.

use ndarray::{array, Array1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::PathBuf;
use tabula::config::TrainerConfig;
use tabula::env::{Environment, Transition};
use tabula::schedule::ExplorationSchedule;
use tabula::shaping::RewardShaping;
use tabula::trainer::Trainer;
use tabula::Result;
use tracing::info;

const GRAVITY: f32 = 0.004;
const MAIN_THRUST: f32 = 0.009;
const SIDE_THRUST: f32 = 0.002;
const MAX_STEPS: usize = 400;

/// Lander state: position, velocity, tilt and leg contacts
struct ToyLander {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    angle: f32,
    angular_velocity: f32,
    steps: usize,
    rng: StdRng,
}

impl ToyLander {
    fn new(seed: u64) -> Self {
        ToyLander {
            x: 0.0,
            y: 1.0,
            vx: 0.0,
            vy: 0.0,
            angle: 0.0,
            angular_velocity: 0.0,
            steps: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Observation scaled into the ranges of the default lander grid
    fn observation(&self) -> Array1<f32> {
        let left_leg = if self.y <= 0.02 && self.angle >= -0.1 { 1.0 } else { 0.0 };
        let right_leg = if self.y <= 0.02 && self.angle <= 0.1 { 1.0 } else { 0.0 };
        array![
            self.x * 0.2,
            (self.y - 0.5) * 0.4,
            self.vx * 10.0,
            self.vy * 10.0,
            self.angle,
            self.angular_velocity * 10.0,
            left_leg,
            right_leg
        ]
    }

    /// Negative distance-and-speed cost, the same measure the lander uses
    fn potential(&self) -> f32 {
        -10.0 * (self.x.abs() + self.y.abs()) - 10.0 * (self.vx.abs() + self.vy.abs()) - self.angle.abs()
    }
}

impl Environment for ToyLander {
    fn num_actions(&self) -> usize {
        4
    }

    fn reset(&mut self) -> Result<Array1<f32>> {
        self.x = self.rng.gen_range(-0.3..0.3);
        self.y = 1.0;
        self.vx = self.rng.gen_range(-0.01..0.01);
        self.vy = 0.0;
        self.angle = 0.0;
        self.angular_velocity = 0.0;
        self.steps = 0;
        Ok(self.observation())
    }

    fn step(&mut self, action: usize) -> Result<Transition> {
        let before = self.potential();
        self.steps += 1;

        // 0: idle, 1: left engine, 2: main engine, 3: right engine
        let mut fuel = 0.0;
        match action {
            1 => {
                self.vx += SIDE_THRUST;
                self.angular_velocity -= 0.002;
                fuel = 0.03;
            }
            2 => {
                self.vx += MAIN_THRUST * self.angle.sin();
                self.vy += MAIN_THRUST * self.angle.cos();
                fuel = 0.3;
            }
            3 => {
                self.vx -= SIDE_THRUST;
                self.angular_velocity += 0.002;
                fuel = 0.03;
            }
            _ => {}
        }

        self.vy -= GRAVITY;
        self.x += self.vx;
        self.y += self.vy;
        self.angle = (self.angle + self.angular_velocity).clamp(-1.0, 1.0);

        let shaping = self.potential() - before;
        let reward = shaping - fuel;

        if self.y <= 0.0 {
            self.y = 0.0;
            let soft = self.vy.abs() < 0.03 && self.angle.abs() < 0.2;
            let on_pad = self.x.abs() < 0.2;
            if soft && on_pad {
                return Ok(Transition::success(self.observation(), reward + 100.0));
            }
            return Ok(Transition::failure(self.observation(), reward - 100.0));
        }
        if self.x.abs() > 1.0 || self.steps >= MAX_STEPS {
            return Ok(Transition::failure(self.observation(), reward - 100.0));
        }
        Ok(Transition::running(self.observation(), reward))
    }
}

fn load_config() -> Result<TrainerConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            info!(%path, "loading configuration");
            TrainerConfig::from_json_file(path)
        }
        None => Ok(TrainerConfig {
            episodes: 2000,
            exploration: ExplorationSchedule::exponential_to_floor(0.01, 0.005),
            reward_shaping: RewardShaping::clip_with_terminal_bonus(),
            progress_interval: 200,
            seed: Some(7),
            ..TrainerConfig::default()
        }),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("Toy Lander Q-Learning Example");
    println!("=============================\n");

    let output = PathBuf::from("toy_lander_output");
    fs::create_dir_all(&output)?;
    let table_path = output.join("q_table.bin");

    let config = load_config()?;
    config.to_json_file(output.join("config.json"))?;

    let mut trainer = Trainer::from_checkpoint(config, &table_path)?;
    let mut env = ToyLander::new(2024);

    if trainer.has_pretrained_table() {
        println!("Reusing table from {}", table_path.display());
    } else {
        let report = trainer.train(&mut env)?;
        trainer.save_table(&table_path)?;
        report.metrics.export_csv(output.join("metrics.csv"), 100)?;
        report.save(output.join("report.json"))?;

        println!("\nTraining finished after {} episodes", report.episodes_run);
        if let Some(avg) = report.metrics.avg_episode_return(100) {
            println!("Mean return of the last 100 episodes: {:.2}", avg);
        }
        println!("States visited: {}/{}", trainer.table().visited_states(), trainer.table().num_states());
    }

    let evaluation = trainer.evaluate(&mut env, 20)?;
    println!("\nGreedy evaluation over {} episodes", evaluation.returns.len());
    println!("  mean return: {:.2} (std {:.2})", evaluation.mean, evaluation.std);
    println!("  best/worst:  {:.2} / {:.2}", evaluation.max, evaluation.min);
    println!("  landed:      {:.0}%", evaluation.success_rate * 100.0);

    println!("\nReplaying top episodes");
    for (record, replay) in trainer.replay_top_k(&mut env)? {
        println!(
            "  episode {:>5} (training return {:>8.2}) -> replay {:>8.2} in {} steps{}",
            record.episode,
            record.total_return,
            replay.total_return,
            replay.steps,
            if replay.success { ", landed" } else { "" }
        );
    }

    Ok(())
}
