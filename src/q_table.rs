use crate::error::{Result, TabulaError};
use crate::types::{Action, DiscreteState};
use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewD, IxDyn};
use serde::{Serialize, Deserialize};
use std::path::Path;

/// Dense action-value table.
///
/// Logically shaped `(bins_0, ..., bins_{D-1}, num_actions)`; stored as a
/// `(num_states, num_actions)` matrix whose row is the row-major offset of
/// the discrete state. The shape is fixed at construction.
///
/// # Example
///
/// ```
/// use tabula::q_table::QTable;
/// use tabula::types::DiscreteState;
///
/// let mut table = QTable::new(&[4, 2], 3).unwrap();
/// let state = DiscreteState::new(vec![3, 1]);
/// table.set(&state, 2, 1.5);
///
/// assert_eq!(table.get(&state, 2), 1.5);
/// assert_eq!(table.best_action(&state), 2);
/// assert_eq!(table.shape(), vec![4, 2, 3]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    bins: Vec<usize>,
    num_actions: usize,
    values: Array2<f32>,
}

impl QTable {
    /// Create a table with every cell set to zero
    pub fn new(bins: &[usize], num_actions: usize) -> Result<Self> {
        if bins.is_empty() {
            return Err(TabulaError::invalid_configuration(
                "bins",
                "at least one state dimension is required",
            ));
        }
        if bins.iter().any(|&b| b == 0) {
            return Err(TabulaError::invalid_configuration(
                "bins",
                "every bin count must be at least 1",
            ));
        }
        if num_actions == 0 {
            return Err(TabulaError::invalid_configuration(
                "num_actions",
                "at least one action is required",
            ));
        }

        let num_states = checked_table_len(bins, 1)?;
        checked_table_len(bins, num_actions)?;
        Ok(QTable {
            bins: bins.to_vec(),
            num_actions,
            values: Array2::zeros((num_states, num_actions)),
        })
    }

    pub fn bins(&self) -> &[usize] {
        &self.bins
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    pub fn num_states(&self) -> usize {
        self.values.nrows()
    }

    /// Full logical shape: bin counts followed by the action count
    pub fn shape(&self) -> Vec<usize> {
        let mut shape = self.bins.clone();
        shape.push(self.num_actions);
        shape
    }

    /// Row-major linear offset of a state
    fn offset(&self, state: &DiscreteState) -> usize {
        assert_eq!(
            state.dim(),
            self.bins.len(),
            "state {} does not match a {}-dimensional table",
            state,
            self.bins.len()
        );
        state
            .indices()
            .iter()
            .zip(self.bins.iter())
            .fold(0, |acc, (&idx, &bins)| {
                assert!(idx < bins, "bin index {} out of range for {} bins", idx, bins);
                acc * bins + idx
            })
    }

    /// # Panics
    ///
    /// Panics if the state has the wrong dimensionality or a coordinate is
    /// out of range, or if `action >= num_actions`.
    pub fn get(&self, state: &DiscreteState, action: Action) -> f32 {
        self.values[[self.offset(state), action]]
    }

    /// # Panics
    ///
    /// Same conditions as [`QTable::get`].
    pub fn set(&mut self, state: &DiscreteState, action: Action, value: f32) {
        let row = self.offset(state);
        self.values[[row, action]] = value;
    }

    /// Value estimates of every action in a state
    pub fn action_values(&self, state: &DiscreteState) -> ArrayView1<'_, f32> {
        self.values.row(self.offset(state))
    }

    /// Arg-max over actions; ties go to the lowest action index
    pub fn best_action(&self, state: &DiscreteState) -> Action {
        let row = self.action_values(state);
        let mut best = 0;
        for (action, &value) in row.iter().enumerate().skip(1) {
            if value > row[best] {
                best = action;
            }
        }
        best
    }

    /// Highest action value in a state
    pub fn max_value(&self, state: &DiscreteState) -> f32 {
        let row = self.action_values(state);
        row.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Flat `(num_states, num_actions)` view
    pub fn values(&self) -> ArrayView2<'_, f32> {
        self.values.view()
    }

    /// View in the logical `(bins..., num_actions)` shape
    pub fn dense_view(&self) -> Result<ArrayViewD<'_, f32>> {
        self.values
            .view()
            .into_shape(IxDyn(&self.shape()))
            .map_err(|e| TabulaError::NumericalError(e.to_string()))
    }

    /// Number of states with at least one non-zero action value
    pub fn visited_states(&self) -> usize {
        self.values
            .rows()
            .into_iter()
            .filter(|row| row.iter().any(|&v| v != 0.0))
            .count()
    }

    /// Fail with `ShapeMismatch` unless the table has exactly this shape
    pub fn check_shape(&self, bins: &[usize], num_actions: usize) -> Result<()> {
        if self.bins != bins || self.num_actions != num_actions {
            let mut expected = bins.to_vec();
            expected.push(num_actions);
            return Err(TabulaError::shape_mismatch(
                format!("{:?}", expected),
                format!("{:?}", self.shape()),
            ));
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let table: QTable = bincode::deserialize(bytes)?;
        table.validate_snapshot()?;
        Ok(table)
    }

    /// Save the table to disk
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Load a table from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Load a table and require it to match the configured shape
    pub fn load_matching<P: AsRef<Path>>(path: P, bins: &[usize], num_actions: usize) -> Result<Self> {
        let table = Self::load(path)?;
        table.check_shape(bins, num_actions)?;
        Ok(table)
    }

    fn validate_snapshot(&self) -> Result<()> {
        if self.bins.is_empty() || self.num_actions == 0 {
            return Err(TabulaError::shape_mismatch(
                "at least one dimension and one action".to_string(),
                format!("{:?}", self.shape()),
            ));
        }
        let num_states = checked_table_len(&self.bins, 1)?;
        checked_table_len(&self.bins, self.num_actions)?;
        let actual = self.values.dim();
        if actual != (num_states, self.num_actions) {
            return Err(TabulaError::shape_mismatch(
                format!("({}, {})", num_states, self.num_actions),
                format!("({}, {})", actual.0, actual.1),
            ));
        }
        if self.values.iter().any(|v| !v.is_finite()) {
            return Err(TabulaError::NumericalError(
                "table snapshot contains non-finite values".to_string(),
            ));
        }
        Ok(())
    }
}

/// Number of cells in a `bins × num_actions` table, checked against
/// overflow and the largest allocation an `Array2<f32>` can hold
pub(crate) fn checked_table_len(bins: &[usize], num_actions: usize) -> Result<usize> {
    let overflow = || TabulaError::invalid_configuration("dimensions", "table size overflows");
    let len = bins
        .iter()
        .try_fold(num_actions, |acc, &b| acc.checked_mul(b))
        .ok_or_else(overflow)?;
    let bytes = len
        .checked_mul(std::mem::size_of::<f32>())
        .ok_or_else(overflow)?;
    if bytes > isize::MAX as usize {
        return Err(overflow());
    }
    Ok(len)
}
