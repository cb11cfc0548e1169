use crate::error::Result;
use crate::types::Action;
use ndarray::Array1;

/// How a step ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Episode continues
    Running,
    /// Episode ended with the goal reached
    Success,
    /// Episode ended without reaching the goal (crash, timeout, ...)
    Failure,
}

impl Termination {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Termination::Running)
    }
}

/// Result of one environment step
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub observation: Array1<f32>,
    pub reward: f32,
    pub termination: Termination,
}

impl Transition {
    pub fn running(observation: Array1<f32>, reward: f32) -> Self {
        Transition { observation, reward, termination: Termination::Running }
    }

    pub fn success(observation: Array1<f32>, reward: f32) -> Self {
        Transition { observation, reward, termination: Termination::Success }
    }

    pub fn failure(observation: Array1<f32>, reward: f32) -> Self {
        Transition { observation, reward, termination: Termination::Failure }
    }

    pub fn is_terminal(&self) -> bool {
        self.termination.is_terminal()
    }
}

/// Continuous-observation, discrete-action environment.
///
/// Calls are synchronous. Any error returned here aborts the current
/// training run.
pub trait Environment {
    /// Number of discrete actions accepted by `step`
    fn num_actions(&self) -> usize;

    /// Start a new episode and return the first observation
    fn reset(&mut self) -> Result<Array1<f32>>;

    /// Apply an action and return the resulting transition
    fn step(&mut self, action: Action) -> Result<Transition>;
}

impl<E: Environment + ?Sized> Environment for &mut E {
    fn num_actions(&self) -> usize {
        (**self).num_actions()
    }

    fn reset(&mut self) -> Result<Array1<f32>> {
        (**self).reset()
    }

    fn step(&mut self, action: Action) -> Result<Transition> {
        (**self).step(action)
    }
}
