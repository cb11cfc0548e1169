use crate::error::{Result, TabulaError};
use crate::q_table::checked_table_len;
use crate::types::{DimensionSpec, DiscreteState};
use ndarray::ArrayView1;
use serde::{Serialize, Deserialize};

/// Maps continuous observations onto a fixed grid of bins.
///
/// Each raw value is clipped into `[lower, upper]`, scaled into
/// `[0, bins]` and floored; the upper boundary folds into the last bin.
///
/// # Example
///
/// ```
/// use tabula::discretizer::Discretizer;
/// use tabula::types::DimensionSpec;
/// use ndarray::array;
///
/// let discretizer = Discretizer::new(vec![
///     DimensionSpec::new(-1.0, 1.0, 4),
///     DimensionSpec::new(0.0, 1.0, 2),
/// ]).unwrap();
///
/// let state = discretizer.discretize(array![0.1, 1.0].view()).unwrap();
/// assert_eq!(state.indices(), &[2, 1]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Discretizer {
    dimensions: Vec<DimensionSpec>,
}

impl Discretizer {
    pub fn new(dimensions: Vec<DimensionSpec>) -> Result<Self> {
        validate_dimensions(&dimensions)?;
        Ok(Discretizer { dimensions })
    }

    pub fn dimensions(&self) -> &[DimensionSpec] {
        &self.dimensions
    }

    /// Bin counts per dimension, in order
    pub fn bins(&self) -> Vec<usize> {
        self.dimensions.iter().map(|d| d.bins).collect()
    }

    /// Total number of grid cells
    pub fn num_states(&self) -> usize {
        self.dimensions.iter().map(|d| d.bins).product()
    }

    pub fn discretize(&self, observation: ArrayView1<f32>) -> Result<DiscreteState> {
        if observation.len() != self.dimensions.len() {
            return Err(TabulaError::DimensionMismatch {
                expected: self.dimensions.len(),
                actual: observation.len(),
            });
        }

        let mut indices = Vec::with_capacity(self.dimensions.len());
        for (i, (&value, spec)) in observation.iter().zip(self.dimensions.iter()).enumerate() {
            if value.is_nan() {
                return Err(TabulaError::NumericalError(format!(
                    "observation component {} is NaN",
                    i
                )));
            }
            indices.push(bin_index(value, spec));
        }
        Ok(DiscreteState::new(indices))
    }
}

fn bin_index(value: f32, spec: &DimensionSpec) -> usize {
    let clamped = value.clamp(spec.lower, spec.upper);
    let scaled = (clamped - spec.lower) / spec.span() * spec.bins as f32;
    (scaled.floor() as usize).min(spec.bins - 1)
}

pub(crate) fn validate_dimensions(dimensions: &[DimensionSpec]) -> Result<()> {
    if dimensions.is_empty() {
        return Err(TabulaError::invalid_configuration(
            "dimensions",
            "at least one observation dimension is required",
        ));
    }

    for (i, spec) in dimensions.iter().enumerate() {
        let name = format!("dimensions[{}]", i);
        if !spec.lower.is_finite() || !spec.upper.is_finite() {
            return Err(TabulaError::InvalidConfiguration {
                name,
                reason: "bounds must be finite".to_string(),
            });
        }
        if spec.lower >= spec.upper {
            return Err(TabulaError::InvalidConfiguration {
                name,
                reason: format!(
                    "lower bound {} must be below upper bound {}",
                    spec.lower, spec.upper
                ),
            });
        }
        if spec.bins == 0 {
            return Err(TabulaError::InvalidConfiguration {
                name,
                reason: "bin count must be at least 1".to_string(),
            });
        }
    }

    let bins: Vec<usize> = dimensions.iter().map(|d| d.bins).collect();
    checked_table_len(&bins, 1)?;
    Ok(())
}
