//! Conditional probability distributions.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::bayes::distribution::{CategoricalDistribution, Distribution};
use crate::engine::errors::ModelError;
use crate::engine::variable::{Assignment, Value, Variable};

type ParentKey = SmallVec<[Value; 4]>;

/// `P(variable | parents)` evaluated at a full assignment.
pub trait Cpd: fmt::Debug + Send + Sync {
    fn variable(&self) -> &Variable;

    fn parents(&self) -> &[Variable];

    fn pdf(&self, assignment: &Assignment) -> Result<f64, ModelError>;

    fn logpdf(&self, assignment: &Assignment) -> Result<f64, ModelError> {
        self.pdf(assignment).map(f64::ln)
    }
}

/// A CPD for a root variable: its distribution ignores every other variable.
#[derive(Debug, Clone)]
pub struct StaticCpd {
    variable: Variable,
    distribution: Arc<dyn Distribution>,
}

impl StaticCpd {
    pub fn new(variable: Variable, distribution: impl Distribution + 'static) -> Self {
        Self {
            variable,
            distribution: Arc::new(distribution),
        }
    }
}

impl Cpd for StaticCpd {
    fn variable(&self) -> &Variable {
        &self.variable
    }

    fn parents(&self) -> &[Variable] {
        &[]
    }

    fn pdf(&self, assignment: &Assignment) -> Result<f64, ModelError> {
        let value = assignment.value_of(&self.variable)?;
        self.distribution.probability(&self.variable, value)
    }
}

/// A discrete CPD with one categorical distribution per joint parent value.
#[derive(Debug, Clone)]
pub struct CategoricalCpd {
    variable: Variable,
    parents: Vec<Variable>,
    distributions: FxHashMap<ParentKey, CategoricalDistribution>,
}

impl CategoricalCpd {
    /// `distributions` maps each tuple of parent values (in `parents` order) to
    /// the distribution of `variable`. Tuples never listed fail at evaluation
    /// with `MissingConditional`.
    pub fn new(
        variable: Variable,
        parents: Vec<Variable>,
        distributions: impl IntoIterator<Item = (Vec<Value>, CategoricalDistribution)>,
    ) -> Result<Self, ModelError> {
        let mut table = FxHashMap::default();
        for (key, dist) in distributions {
            if key.len() != parents.len() {
                return Err(ModelError::InvalidParameter(format!(
                    "cpd for '{}' has {} parents but a key of length {}",
                    variable,
                    parents.len(),
                    key.len()
                )));
            }
            for (parent, value) in parents.iter().zip(&key) {
                parent.index_of(*value)?;
            }
            if dist.len() != variable.cardinality() {
                return Err(ModelError::InvalidDistribution(format!(
                    "'{}' has {} values but a distribution over {} categories",
                    variable,
                    variable.cardinality(),
                    dist.len()
                )));
            }
            table.insert(ParentKey::from_vec(key), dist);
        }
        Ok(Self {
            variable,
            parents,
            distributions: table,
        })
    }
}

impl Cpd for CategoricalCpd {
    fn variable(&self) -> &Variable {
        &self.variable
    }

    fn parents(&self) -> &[Variable] {
        &self.parents
    }

    fn pdf(&self, assignment: &Assignment) -> Result<f64, ModelError> {
        let key = self
            .parents
            .iter()
            .map(|p| assignment.value_of(p))
            .collect::<Result<ParentKey, _>>()?;
        let dist = self
            .distributions
            .get(&key)
            .ok_or_else(|| ModelError::MissingConditional {
                variable: self.variable.name().to_string(),
                parents: key.to_vec(),
            })?;
        let value = assignment.value_of(&self.variable)?;
        dist.probability(&self.variable, value)
    }
}
