//! # Markov Network
//!
//! Composes a [`Graph`] with a set of factors into an unnormalized joint model
//!
//! ```text
//! P(x) = (1/Z) · Π_c φ_c(x_c),    Z = Σ_x Π_c φ_c(x_c)
//! ```
//!
//! Inference is exact and naive: the partition function `Z` and the most
//! likely assignment are computed by enumerating every full assignment, which
//! is exponential in the number of variables and ignores graph structure. This
//! is only suitable for small models; use [`InferenceConfig`] to cap the size.
//!
//! Conditional independence is a structural test (graph separation) and never
//! looks at factor values.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::engine::config::InferenceConfig;
use crate::engine::errors::ModelError;
use crate::engine::factor::Factor;
use crate::engine::graph::Graph;
use crate::engine::variable::{Assignment, Clique, Variable};

/// Factors keyed by the clique they cover.
///
/// Inserting a second factor over an equal clique replaces the first, keeping
/// its position.
#[derive(Debug, Clone, Default)]
pub struct FactorSet {
    factors: IndexMap<Clique, Arc<dyn Factor>>,
}

impl FactorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, factor: impl Factor + 'static) -> Self {
        self.insert(factor);
        self
    }

    /// Adds `factor`, returning the factor it replaced, if any.
    pub fn insert(&mut self, factor: impl Factor + 'static) -> Option<Arc<dyn Factor>> {
        self.insert_shared(Arc::new(factor))
    }

    pub fn insert_shared(&mut self, factor: Arc<dyn Factor>) -> Option<Arc<dyn Factor>> {
        self.factors.insert(factor.clique().clone(), factor)
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Clique, &Arc<dyn Factor>)> + '_ {
        self.factors.iter()
    }

    pub fn cliques(&self) -> impl Iterator<Item = &Clique> + '_ {
        self.factors.keys()
    }
}

impl FromIterator<Arc<dyn Factor>> for FactorSet {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Factor>>>(iter: I) -> Self {
        let mut set = Self::new();
        for factor in iter {
            set.insert_shared(factor);
        }
        set
    }
}

/// An undirected graphical model with a cached partition function.
///
/// Immutable after construction; every query is a pure function of the graph,
/// the factors and the cached partition function.
#[derive(Debug, Clone)]
pub struct MarkovNetwork {
    graph: Graph,
    factors: FactorSet,
    partition: f64,
}

impl MarkovNetwork {
    /// Builds the network and computes its partition function.
    pub fn new(graph: Graph, factors: FactorSet) -> Result<Self, ModelError> {
        Self::with_config(graph, factors, InferenceConfig::default())
    }

    /// Builds the network under explicit inference limits.
    ///
    /// Every factor's clique must be a subset of the graph's variables.
    pub fn with_config(
        graph: Graph,
        factors: FactorSet,
        config: InferenceConfig,
    ) -> Result<Self, ModelError> {
        let config = config.validate()?;
        for clique in factors.cliques() {
            if let Some(stray) = clique.variables().iter().find(|v| !graph.contains(v.name())) {
                return Err(ModelError::UnknownVariable {
                    variable: stray.name().to_string(),
                    context: format!("factor clique {}", clique),
                });
            }
        }
        config.admit(graph.assignment_count())?;

        let mut network = Self {
            graph,
            factors,
            partition: 0.0,
        };
        network.partition = network.compute_partition_function()?;

        #[cfg(feature = "tracing")]
        {
            tracing::debug!(
                variables = network.graph.len(),
                factors = network.factors.len(),
                assignments = %network.graph.assignment_count(),
                partition = network.partition,
                "markov network built"
            );
            if network.partition == 0.0 {
                tracing::warn!("every assignment has zero affinity; probabilities are undefined");
            }
        }

        Ok(network)
    }

    fn compute_partition_function(&self) -> Result<f64, ModelError> {
        let mut total = 0.0;
        for assignment in self.graph.assignments() {
            total += self.affinity(&assignment)?;
        }
        Ok(total)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn factors(&self) -> &FactorSet {
        &self.factors
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.graph.variables()
    }

    /// The normalizing constant: total affinity summed over every assignment.
    pub fn partition(&self) -> f64 {
        self.partition
    }

    /// Unnormalized product of every factor's affinity for `assignment`.
    pub fn affinity(&self, assignment: &Assignment) -> Result<f64, ModelError> {
        let mut product = 1.0;
        for (_, factor) in self.factors.iter() {
            product *= factor.affinity(assignment)?;
        }
        Ok(product)
    }

    /// Normalized probability of a full assignment.
    ///
    /// Fails with `MissingVariable` if any graph variable is unassigned and with
    /// `DegenerateModel` if the partition function is zero.
    pub fn probability(&self, assignment: &Assignment) -> Result<f64, ModelError> {
        self.require_full(assignment)?;
        let affinity = self.affinity(assignment)?;
        self.normalize(affinity)
    }

    /// Natural log of [`probability`](Self::probability); `-inf` for impossible
    /// assignments.
    pub fn log_probability(&self, assignment: &Assignment) -> Result<f64, ModelError> {
        self.probability(assignment).map(f64::ln)
    }

    /// Probability of partial `evidence`: the sum of probabilities of every full
    /// assignment that agrees with it.
    pub fn marginal(&self, evidence: &Assignment) -> Result<f64, ModelError> {
        for (var, value) in evidence.iter() {
            let known = self
                .graph
                .variable(var.name())
                .ok_or_else(|| ModelError::UnknownVariable {
                    variable: var.name().to_string(),
                    context: "evidence".into(),
                })?;
            known.index_of(value)?;
        }
        let mut total = 0.0;
        for assignment in self.graph.assignments() {
            if assignment.agrees_with(evidence) {
                total += self.affinity(&assignment)?;
            }
        }
        self.normalize(total)
    }

    /// The full assignment with the largest total affinity.
    ///
    /// Ties go to the assignment met first in Cartesian order. If every
    /// assignment has zero affinity, the first assignment is returned. Fails
    /// with `DegenerateModel` only when the graph has no assignments at all.
    pub fn most_likely_assignment(&self) -> Result<Assignment, ModelError> {
        let mut best: Option<(Assignment, f64)> = None;
        for assignment in self.graph.assignments() {
            let affinity = self.affinity(&assignment)?;
            let improves = best.as_ref().map_or(true, |(_, top)| affinity > *top);
            if improves {
                best = Some((assignment, affinity));
            }
        }

        #[cfg(feature = "tracing")]
        if let Some((assignment, affinity)) = &best {
            tracing::debug!(%assignment, affinity, "most likely assignment");
        }

        best.map(|(assignment, _)| assignment)
            .ok_or(ModelError::DegenerateModel)
    }

    /// True if no variable in `a` can reach a variable in `b` without passing
    /// through `given`.
    ///
    /// A purely structural test: separation in the graph is necessary for
    /// `a ⊥ b | given` under the network's factorization, and factor values are
    /// not inspected. Variables unknown to the graph have no neighbors.
    pub fn conditionally_independent(
        &self,
        a: &[Variable],
        b: &[Variable],
        given: &[Variable],
    ) -> bool {
        self.graph.path(a, b, given).is_none()
    }

    /// Every graph variable must be assigned a value from its own domain.
    fn require_full(&self, assignment: &Assignment) -> Result<(), ModelError> {
        for var in self.graph.variables() {
            var.index_of(assignment.value_of(var)?)?;
        }
        Ok(())
    }

    fn normalize(&self, affinity: f64) -> Result<f64, ModelError> {
        if self.partition == 0.0 {
            return Err(ModelError::DegenerateModel);
        }
        Ok(affinity / self.partition)
    }
}
