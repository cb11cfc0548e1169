use serde::{Serialize, Deserialize};
use std::fmt;

/// Discrete action index in `[0, num_actions)`
pub type Action = usize;

/// Binning parameters for one observation dimension
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DimensionSpec {
    pub lower: f32,
    pub upper: f32,
    pub bins: usize,
}

impl DimensionSpec {
    pub fn new(lower: f32, upper: f32, bins: usize) -> Self {
        DimensionSpec { lower, upper, bins }
    }

    /// Width of the clipped interval
    pub fn span(&self) -> f32 {
        self.upper - self.lower
    }
}

/// Grid cell produced by the discretizer, one bin index per dimension.
///
/// Coordinates are guaranteed to be in range for the discretizer that
/// produced them; the value table relies on this for its offset arithmetic.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiscreteState {
    indices: Vec<usize>,
}

impl DiscreteState {
    pub fn new(indices: Vec<usize>) -> Self {
        DiscreteState { indices }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn dim(&self) -> usize {
        self.indices.len()
    }
}

impl fmt::Display for DiscreteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, idx) in self.indices.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", idx)?;
        }
        write!(f, ")")
    }
}

/// One completed training episode and its cumulative return
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub episode: usize,
    pub total_return: f32,
}

impl EpisodeRecord {
    pub fn new(episode: usize, total_return: f32) -> Self {
        EpisodeRecord { episode, total_return }
    }
}
