//! Distributions over a single variable's values.

use std::fmt;
use std::sync::Arc;

use crate::engine::errors::ModelError;
use crate::engine::variable::{Value, Variable};

/// Tolerance when checking that a categorical table sums to one.
const SUM_TOLERANCE: f64 = 1e-9;

/// Probability of one value of a variable.
pub trait Distribution: fmt::Debug + Send + Sync {
    fn probability(&self, variable: &Variable, value: Value) -> Result<f64, ModelError>;
}

/// A finite distribution indexed by domain position.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalDistribution {
    table: Vec<f64>,
}

impl CategoricalDistribution {
    /// `table[i]` is the probability of the variable's `i`-th domain value.
    ///
    /// Needs at least two entries, each in `[0, 1]`, summing to one.
    pub fn new(table: Vec<f64>) -> Result<Self, ModelError> {
        if table.len() < 2 {
            return Err(ModelError::InvalidDistribution(format!(
                "categorical distribution needs at least 2 categories, got {}",
                table.len()
            )));
        }
        if let Some(bad) = table.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(ModelError::InvalidDistribution(format!(
                "probability {} outside [0, 1]",
                bad
            )));
        }
        let sum: f64 = table.iter().sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(ModelError::InvalidDistribution(format!(
                "probabilities sum to {}, expected 1",
                sum
            )));
        }
        Ok(Self { table })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.table
    }
}

impl Distribution for CategoricalDistribution {
    fn probability(&self, variable: &Variable, value: Value) -> Result<f64, ModelError> {
        let index = variable.index_of(value)?;
        self.table
            .get(index)
            .copied()
            .ok_or_else(|| ModelError::ValueOutOfDomain {
                variable: variable.name().to_string(),
                value,
            })
    }
}

/// A distribution given by an arbitrary function of the value.
#[derive(Clone)]
pub struct StaticDistribution {
    func: Arc<dyn Fn(Value) -> f64 + Send + Sync>,
}

impl StaticDistribution {
    pub fn new(func: impl Fn(Value) -> f64 + Send + Sync + 'static) -> Self {
        Self {
            func: Arc::new(func),
        }
    }
}

impl fmt::Debug for StaticDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticDistribution(<fn>)")
    }
}

impl Distribution for StaticDistribution {
    fn probability(&self, _variable: &Variable, value: Value) -> Result<f64, ModelError> {
        let p = (self.func)(value);
        if !(0.0..=1.0).contains(&p) {
            return Err(ModelError::InvalidDistribution(format!(
                "static distribution returned {} for value {}",
                p, value
            )));
        }
        Ok(p)
    }
}
