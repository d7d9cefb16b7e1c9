//! Factors: non-negative potentials over a clique of variables.
//!
//! A factor never stores an assignment; [`Factor::affinity`] is a pure function
//! of the assignment it is handed, so factors can be shared freely across
//! threads. Two concrete factors are provided:
//!
//! - [`TabularFactor`]: dense lookup table indexed by each variable's domain
//!   position, in clique order
//! - [`LinearGaussianFactor`]: Gaussian-shaped curve evaluated at a weighted sum
//!   of the clique's values

use std::f64::consts::PI;
use std::fmt;

use smallvec::SmallVec;

use crate::engine::errors::ModelError;
use crate::engine::variable::{Assignment, Clique};

/// A potential function over a fixed clique.
pub trait Factor: fmt::Debug + Send + Sync {
    /// The variables this factor reads, in table-axis order.
    fn clique(&self) -> &Clique;

    /// Non-negative affinity of the clique's values in `assignment`.
    ///
    /// The assignment may cover more variables than the clique; extra entries
    /// are ignored. Every clique variable must be present.
    fn affinity(&self, assignment: &Assignment) -> Result<f64, ModelError>;
}

/// A dense, row-major table of non-negative values.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    shape: SmallVec<[usize; 4]>,
    values: Vec<f64>,
}

impl Table {
    /// Builds a table from its shape and row-major values.
    ///
    /// Fails if the value count disagrees with the shape or any value is
    /// negative or not finite.
    pub fn new(shape: impl IntoIterator<Item = usize>, values: Vec<f64>) -> Result<Self, ModelError> {
        let shape: SmallVec<[usize; 4]> = shape.into_iter().collect();
        let expected: usize = shape.iter().product();
        if values.len() != expected {
            return Err(ModelError::InvalidParameter(format!(
                "table of shape {:?} needs {} values, got {}",
                shape.as_slice(),
                expected,
                values.len()
            )));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(ModelError::InvalidParameter(format!(
                "table values must be finite and non-negative, got {}",
                bad
            )));
        }
        Ok(Self { shape, values })
    }

    /// A zero-dimensional table holding one value.
    pub fn scalar(value: f64) -> Result<Self, ModelError> {
        Self::new(std::iter::empty(), vec![value])
    }

    /// A one-dimensional table.
    pub fn vector(values: Vec<f64>) -> Result<Self, ModelError> {
        Self::new([values.len()], values)
    }

    /// A two-dimensional table from rows; rows must have equal length.
    pub fn matrix(rows: Vec<Vec<f64>>) -> Result<Self, ModelError> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return Err(ModelError::InvalidParameter(
                "matrix rows must all have the same length".into(),
            ));
        }
        let shape = [rows.len(), cols];
        Self::new(shape, rows.into_iter().flatten().collect())
    }

    /// A table whose every cell holds `value`.
    pub fn filled(shape: impl IntoIterator<Item = usize>, value: f64) -> Result<Self, ModelError> {
        let shape: SmallVec<[usize; 4]> = shape.into_iter().collect();
        let len = shape.iter().product();
        Self::new(shape, vec![value; len])
    }

    /// Builds a table by evaluating `f` at every multi-index, in row-major order.
    pub fn from_fn(
        shape: impl IntoIterator<Item = usize>,
        mut f: impl FnMut(&[usize]) -> f64,
    ) -> Result<Self, ModelError> {
        let shape: SmallVec<[usize; 4]> = shape.into_iter().collect();
        let len: usize = shape.iter().product();
        let mut values = Vec::with_capacity(len);
        let mut index: SmallVec<[usize; 4]> = SmallVec::from_elem(0, shape.len());
        for _ in 0..len {
            values.push(f(&index));
            for axis in (0..shape.len()).rev() {
                index[axis] += 1;
                if index[axis] < shape[axis] {
                    break;
                }
                index[axis] = 0;
            }
        }
        Self::new(shape, values)
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Every cell multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Result<Self, ModelError> {
        Self::new(
            self.shape.iter().copied(),
            self.values.iter().map(|v| v * factor).collect(),
        )
    }

    /// Value at a multi-index, or `None` if the index is out of range.
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        self.offset(index).map(|i| self.values[i])
    }

    fn offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0;
        for (&i, &dim) in index.iter().zip(self.shape.iter()) {
            if i >= dim {
                return None;
            }
            offset = offset * dim + i;
        }
        Some(offset)
    }
}

/// A factor stored as a dense table over its clique.
#[derive(Debug, Clone)]
pub struct TabularFactor {
    clique: Clique,
    table: Table,
}

impl TabularFactor {
    /// Creates a tabular factor, checking that the table's shape equals the
    /// clique's domain sizes in clique order. An empty clique accepts any table
    /// and always evaluates to 1.
    pub fn new(clique: impl Into<Clique>, table: Table) -> Result<Self, ModelError> {
        let clique = clique.into();
        let expected = clique.shape();
        if !clique.is_empty() && expected.as_slice() != table.shape() {
            return Err(ModelError::TableShape {
                clique: clique.to_string(),
                expected: expected.to_vec(),
                actual: table.shape().to_vec(),
            });
        }
        Ok(Self { clique, table })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }
}

impl Factor for TabularFactor {
    fn clique(&self) -> &Clique {
        &self.clique
    }

    fn affinity(&self, assignment: &Assignment) -> Result<f64, ModelError> {
        if self.clique.is_empty() {
            return Ok(1.0);
        }
        let mut index: SmallVec<[usize; 4]> = SmallVec::with_capacity(self.clique.len());
        for var in self.clique.variables() {
            index.push(var.index_of(assignment.value_of(var)?)?);
        }
        self.table.get(&index).ok_or_else(|| {
            ModelError::Internal(format!(
                "index {:?} outside table for clique {}",
                index.as_slice(),
                self.clique
            ))
        })
    }
}

/// Normal density with mean `mu` and standard deviation `sigma`, evaluated at `x`.
pub fn gaussian_pdf(x: f64, mu: f64, sigma: f64) -> f64 {
    let z = (x - mu) / sigma;
    (-0.5 * z * z).exp() / (sigma * (2.0 * PI).sqrt())
}

/// A closed-form potential: a Gaussian curve evaluated at a weighted sum of the
/// clique's assigned values.
///
/// With no weights the sum is unweighted. The affinity is always positive and
/// at most `1 / (sigma * sqrt(2π))`.
#[derive(Debug, Clone)]
pub struct LinearGaussianFactor {
    clique: Clique,
    mean: f64,
    sigma: f64,
    weights: Option<Vec<f64>>,
}

impl LinearGaussianFactor {
    pub fn new(
        clique: impl Into<Clique>,
        mean: f64,
        sigma: f64,
        weights: Option<Vec<f64>>,
    ) -> Result<Self, ModelError> {
        let clique = clique.into();
        if !mean.is_finite() {
            return Err(ModelError::InvalidParameter(format!(
                "gaussian mean must be finite, got {}",
                mean
            )));
        }
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(ModelError::InvalidParameter(format!(
                "gaussian sigma must be finite and > 0, got {}",
                sigma
            )));
        }
        if let Some(w) = &weights {
            if w.len() != clique.len() {
                return Err(ModelError::InvalidParameter(format!(
                    "clique {} has {} variables but {} weights were given",
                    clique,
                    clique.len(),
                    w.len()
                )));
            }
            if w.iter().any(|x| !x.is_finite()) {
                return Err(ModelError::InvalidParameter(
                    "gaussian weights must be finite".into(),
                ));
            }
        }
        Ok(Self {
            clique,
            mean,
            sigma,
            weights,
        })
    }

    /// Unit Gaussian (mean 0, sigma 1) over the plain sum of the clique.
    pub fn standard(clique: impl Into<Clique>) -> Self {
        Self {
            clique: clique.into(),
            mean: 0.0,
            sigma: 1.0,
            weights: None,
        }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Scalar fed to the Gaussian: weighted sum of the clique's values.
    fn linear_input(&self, assignment: &Assignment) -> Result<f64, ModelError> {
        let mut x = 0.0;
        for (i, var) in self.clique.variables().iter().enumerate() {
            let value = assignment.value_of(var)? as f64;
            let weight = self.weights.as_ref().map_or(1.0, |w| w[i]);
            x += weight * value;
        }
        Ok(x)
    }
}

impl Factor for LinearGaussianFactor {
    fn clique(&self) -> &Clique {
        &self.clique
    }

    fn affinity(&self, assignment: &Assignment) -> Result<f64, ModelError> {
        let x = self.linear_input(assignment)?;
        Ok(gaussian_pdf(x, self.mean, self.sigma))
    }
}
