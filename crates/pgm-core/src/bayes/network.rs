//! # Bayesian Networks
//!
//! A directed model given as a list of CPDs in topological order. The joint
//! density of a full assignment is the product of every CPD evaluated at it.

use rustc_hash::FxHashSet;

use crate::bayes::cpd::Cpd;
use crate::engine::errors::ModelError;
use crate::engine::variable::{Assignment, Variable};

#[derive(Debug)]
pub struct BayesianNetwork {
    cpds: Vec<Box<dyn Cpd>>,
}

impl BayesianNetwork {
    /// Builds a network, checking that each variable has one CPD and that every
    /// parent's CPD precedes its child's.
    pub fn new(cpds: Vec<Box<dyn Cpd>>) -> Result<Self, ModelError> {
        let all: FxHashSet<&str> = cpds.iter().map(|c| c.variable().name()).collect();
        let mut seen: FxHashSet<&str> = FxHashSet::default();

        for cpd in &cpds {
            let child = cpd.variable();
            for parent in cpd.parents() {
                if seen.contains(parent.name()) {
                    continue;
                }
                if all.contains(parent.name()) {
                    return Err(ModelError::NotTopological {
                        variable: child.name().to_string(),
                        parent: parent.name().to_string(),
                    });
                }
                return Err(ModelError::UnknownVariable {
                    variable: parent.name().to_string(),
                    context: format!("the cpd of '{}'", child),
                });
            }
            if !seen.insert(child.name()) {
                return Err(ModelError::InvalidParameter(format!(
                    "variable '{}' has more than one cpd",
                    child
                )));
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(cpds = cpds.len(), "built bayesian network");

        Ok(Self { cpds })
    }

    /// Variables in topological order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.cpds.iter().map(|c| c.variable())
    }

    pub fn cpds(&self) -> &[Box<dyn Cpd>] {
        &self.cpds
    }

    pub fn len(&self) -> usize {
        self.cpds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cpds.is_empty()
    }

    pub fn pdf(&self, assignment: &Assignment) -> Result<f64, ModelError> {
        self.cpds
            .iter()
            .try_fold(1.0, |acc, cpd| Ok(acc * cpd.pdf(assignment)?))
    }

    pub fn logpdf(&self, assignment: &Assignment) -> Result<f64, ModelError> {
        self.cpds
            .iter()
            .try_fold(0.0, |acc, cpd| Ok(acc + cpd.logpdf(assignment)?))
    }
}
