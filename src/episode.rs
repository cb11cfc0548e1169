use crate::agent::QLearningAgent;
use crate::env::{Environment, Termination};
use crate::error::{Result, TabulaError};
use crate::shaping::RewardShaping;
use crate::types::DiscreteState;
use rand::Rng;
use serde::{Serialize, Deserialize};

/// Per-episode learning parameters, fixed for the whole episode
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpisodeParams {
    pub epsilon: f32,
    pub alpha: f32,
    pub gamma: f32,
    /// Bootstrap from the terminal next-state; when false the terminal
    /// update uses a discount of zero
    pub terminal_bootstrap: bool,
}

/// Outcome of one finished episode
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub total_return: f32,
    pub steps: usize,
    pub success: bool,
}

enum Phase {
    Running(DiscreteState),
    Terminal(Termination),
}

/// Drive one learning episode until the environment terminates.
///
/// Each step: pick an action, step the environment, shape the reward,
/// discretize the next observation, update the table and accumulate the
/// shaped reward. There is no step cap; the environment owns that.
pub fn run_episode<E, R>(
    agent: &mut QLearningAgent<R>,
    env: &mut E,
    params: &EpisodeParams,
    shaping: &RewardShaping,
) -> Result<EpisodeSummary>
where
    E: Environment + ?Sized,
    R: Rng,
{
    let observation = env.reset()?;
    let mut phase = Phase::Running(agent.observe(observation.view())?);
    let mut total_return = 0.0;
    let mut steps = 0;

    loop {
        phase = match phase {
            Phase::Running(state) => {
                let action = agent.act(&state, params.epsilon);
                let transition = env.step(action)?;
                let raw = finite_reward(transition.reward, "environment")?;
                let reward = finite_reward(shaping.shape(raw, transition.termination), "shaped")?;
                let next_state = agent.observe(transition.observation.view())?;

                let gamma = if transition.is_terminal() && !params.terminal_bootstrap {
                    0.0
                } else {
                    params.gamma
                };
                agent.learn(&state, action, reward, &next_state, params.alpha, gamma);

                total_return += reward;
                steps += 1;

                if transition.is_terminal() {
                    Phase::Terminal(transition.termination)
                } else {
                    Phase::Running(next_state)
                }
            }
            Phase::Terminal(termination) => {
                return Ok(EpisodeSummary {
                    total_return,
                    steps,
                    success: termination == Termination::Success,
                });
            }
        };
    }
}

/// Rejects NaN and infinite rewards before they reach the table
fn finite_reward(reward: f32, source: &str) -> Result<f32> {
    if reward.is_finite() {
        Ok(reward)
    } else {
        Err(TabulaError::NumericalError(format!("{} reward is {}", source, reward)))
    }
}

/// Run one episode with the greedy policy and no table updates.
///
/// Returns the raw (unshaped) environment return.
pub fn run_greedy_episode<E, R>(agent: &QLearningAgent<R>, env: &mut E) -> Result<EpisodeSummary>
where
    E: Environment + ?Sized,
    R: Rng,
{
    let observation = env.reset()?;
    let mut state = agent.observe(observation.view())?;
    let mut total_return = 0.0;
    let mut steps = 0;

    loop {
        let transition = env.step(agent.greedy_action(&state))?;
        total_return += finite_reward(transition.reward, "environment")?;
        steps += 1;
        if transition.is_terminal() {
            return Ok(EpisodeSummary {
                total_return,
                steps,
                success: transition.termination == Termination::Success,
            });
        }
        state = agent.observe(transition.observation.view())?;
    }
}
