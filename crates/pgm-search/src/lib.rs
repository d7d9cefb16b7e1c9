//! # pgm-search
//!
//! Generic graph search over an abstract [`SearchProblem`].
//!
//! - **bfs**: breadth-first search, including the [`shortest_path`] reachability
//!   primitive the inference engine uses for graph-separation queries
//! - **ucs**: uniform-cost search (Dijkstra) for weighted problems
//! - **backtracking**: memoized min-cost search over DAGs, negative weights allowed
//! - **problem**: the problem abstraction and two stock problems over adjacency maps

#![forbid(unsafe_code)]

pub mod backtracking;
pub mod bfs;
pub mod errors;
pub mod problem;
pub mod ucs;

pub use backtracking::BacktrackingSearch;
pub use bfs::{shortest_path, BreadthFirstSearch};
pub use errors::SearchError;
pub use problem::{DagProblem, SearchProblem, Successor, UndirectedGraphProblem};
pub use ucs::UniformCostSearch;

/// A path from the start state to a goal state, inclusive of both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<S> {
    /// States visited in order; `path[0]` is the start state.
    pub path: Vec<S>,
    /// Total edge cost along `path`.
    pub cost: f64,
}

impl<S> Solution<S> {
    /// Number of edges traversed.
    pub fn len(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.path.len() <= 1
    }

    pub fn goal(&self) -> Option<&S> {
        self.path.last()
    }
}

/// An algorithm able to solve any [`SearchProblem`].
///
/// `Ok(None)` means no goal is reachable from the start state; it is a normal
/// outcome, not an error.
pub trait SearchAlgorithm {
    fn solve<P: SearchProblem>(
        &self,
        problem: &P,
    ) -> Result<Option<Solution<P::State>>, SearchError>;
}
