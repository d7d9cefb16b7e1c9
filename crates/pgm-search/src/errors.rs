//! Error types for search failures.

use thiserror::Error;

/// Errors raised by search algorithms whose preconditions do not hold.
///
/// An unreachable goal is not an error; algorithms report it as `Ok(None)`.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// Backtracking search only works on acyclic successor relations.
    #[error("cycle detected while searching a DAG: {0}")]
    CycleDetected(String),

    /// Uniform-cost search requires non-negative edge costs.
    #[error("negative edge cost {cost} from {from}")]
    NegativeCost { from: String, cost: f64 },

    /// A successor relation produced a cost that is NaN or infinite.
    #[error("non-finite edge cost from {0}")]
    NonFiniteCost(String),
}
