//! Error types for model construction and inference queries.

use thiserror::Error;

use crate::engine::variable::Value;

/// Errors that can occur while building a model or answering a query.
///
/// This enum is marked `#[non_exhaustive]` so variants can be added without
/// breaking downstream matches. An unreachable vertex set in a path query is
/// not an error and is reported as `None`.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// An assignment lacks a value for a variable a factor or query needs.
    #[error("assignment has no value for variable '{variable}'")]
    MissingVariable { variable: String },

    /// An assigned value is not a member of the variable's domain.
    #[error("value {value} is not in the domain of variable '{variable}'")]
    ValueOutOfDomain { variable: String, value: Value },

    /// A clique, adjacency list or evidence names a variable outside the graph.
    #[error("variable '{variable}' referenced by {context} is not in the graph")]
    UnknownVariable { variable: String, context: String },

    /// A dense table's shape disagrees with its clique's domain sizes.
    #[error("table shape {actual:?} does not match clique {clique} with domain sizes {expected:?}")]
    TableShape {
        clique: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// A numeric parameter or configuration value is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A probability table does not describe a distribution.
    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),

    /// A categorical CPD has no distribution for the observed parent values.
    #[error("no conditional distribution for '{variable}' given parent values {parents:?}")]
    MissingConditional { variable: String, parents: Vec<Value> },

    /// A Bayesian network's CPD list is not in topological order.
    #[error("cpd for '{variable}' appears before the cpd of its parent '{parent}'")]
    NotTopological { variable: String, parent: String },

    /// Exhaustive enumeration would exceed the configured assignment cap.
    #[error("model has {count} assignments, exceeding the limit of {limit}")]
    TooManyAssignments { count: u128, limit: u64 },

    /// Every assignment has zero total affinity, so probabilities are undefined.
    #[error("degenerate model: partition function is zero")]
    DegenerateModel,

    /// Internal invariant violation (programmer error, not user error).
    #[error("internal error: {0}")]
    Internal(String),
}
