//! # Markov Network Graph
//!
//! The undirected skeleton of a model: an ordered adjacency mapping from each
//! variable to its neighbors. The key set is the variable universe and its
//! insertion order fixes the Cartesian enumeration order of [`Graph::assignments`].
//!
//! ## Design
//!
//! - The adjacency must be symmetric; [`Graph::new`] checks that every neighbor
//!   is a known variable but never symmetrizes. [`Graph::undirected`] builds a
//!   symmetric adjacency from an edge list for callers that want it.
//! - Separation queries go through an injected [`PathFinder`]. The default,
//!   [`BreadthFirst`], delegates to [`pgm_search::shortest_path`].
//! - The structure is immutable after construction.

use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;

use indexmap::IndexMap;
use pgm_search::{SearchAlgorithm, SearchProblem, Successor, UniformCostSearch};
use rustc_hash::FxHashSet;

use crate::engine::errors::ModelError;
use crate::engine::variable::{Assignment, Variable};

/// Finds a path between vertices of a [`Graph`] that avoids an excluded set.
///
/// Implementations must return a path starting at `start` and ending at a member
/// of `goals`, or `None`. A `start` that is itself a goal yields `[start]`.
/// Excluded vertices are never entered; `start` itself is not filtered.
pub trait PathFinder: fmt::Debug + Send + Sync {
    fn find_path(
        &self,
        graph: &Graph,
        start: &Variable,
        goals: &FxHashSet<Variable>,
        excluded: &FxHashSet<Variable>,
    ) -> Option<Vec<Variable>>;
}

/// Fewest-edges paths via breadth-first search.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirst;

impl PathFinder for BreadthFirst {
    fn find_path(
        &self,
        graph: &Graph,
        start: &Variable,
        goals: &FxHashSet<Variable>,
        excluded: &FxHashSet<Variable>,
    ) -> Option<Vec<Variable>> {
        pgm_search::shortest_path(
            start.clone(),
            |v| goals.contains(v),
            |v| graph.open_neighbors(v, excluded),
        )
    }
}

/// Unit-cost paths via uniform-cost search; interchangeable with [`BreadthFirst`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformCost;

struct SeparationProblem<'a> {
    graph: &'a Graph,
    start: &'a Variable,
    goals: &'a FxHashSet<Variable>,
    excluded: &'a FxHashSet<Variable>,
}

impl SearchProblem for SeparationProblem<'_> {
    type State = Variable;

    fn start_state(&self) -> Variable {
        self.start.clone()
    }

    fn is_goal(&self, state: &Variable) -> bool {
        self.goals.contains(state)
    }

    fn successors(&self, state: &Variable) -> Vec<Successor<Variable>> {
        self.graph
            .open_neighbors(state, self.excluded)
            .into_iter()
            .map(Successor::unit)
            .collect()
    }
}

impl PathFinder for UniformCost {
    fn find_path(
        &self,
        graph: &Graph,
        start: &Variable,
        goals: &FxHashSet<Variable>,
        excluded: &FxHashSet<Variable>,
    ) -> Option<Vec<Variable>> {
        let problem = SeparationProblem {
            graph,
            start,
            goals,
            excluded,
        };
        // Unit costs are finite and non-negative, so the search cannot fail.
        match UniformCostSearch.solve(&problem) {
            Ok(found) => found.map(|solution| solution.path),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, "uniform-cost separation query failed");
                None
            }
        }
    }
}

/// Undirected structure of a Markov network.
#[derive(Debug, Clone)]
pub struct Graph {
    adjacency: IndexMap<Variable, Vec<Variable>>,
    path_finder: Arc<dyn PathFinder>,
}

impl Graph {
    /// Builds a graph from an adjacency mapping. The mapping's key order is the
    /// variable order used for enumeration.
    ///
    /// Fails with `UnknownVariable` if a neighbor is not itself a key, and with
    /// `InvalidParameter` if a variable is listed twice.
    pub fn new(
        adjacency: impl IntoIterator<Item = (Variable, Vec<Variable>)>,
    ) -> Result<Self, ModelError> {
        let mut map: IndexMap<Variable, Vec<Variable>> = IndexMap::new();
        for (var, neighbors) in adjacency {
            if map.contains_key(var.name()) {
                return Err(ModelError::InvalidParameter(format!(
                    "variable '{}' appears twice in the adjacency list",
                    var
                )));
            }
            map.insert(var, neighbors);
        }
        let adjacency = map;
        for (var, neighbors) in &adjacency {
            if let Some(stray) = neighbors.iter().find(|n| !adjacency.contains_key(n.name())) {
                return Err(ModelError::UnknownVariable {
                    variable: stray.name().to_string(),
                    context: format!("the adjacency list of '{}'", var),
                });
            }
        }
        Ok(Self {
            adjacency,
            path_finder: Arc::new(BreadthFirst),
        })
    }

    /// Builds a symmetric graph over `variables` from undirected `edges`.
    pub fn undirected(
        variables: impl IntoIterator<Item = Variable>,
        edges: impl IntoIterator<Item = (Variable, Variable)>,
    ) -> Result<Self, ModelError> {
        let mut adjacency: IndexMap<Variable, Vec<Variable>> = variables
            .into_iter()
            .map(|v| (v, Vec::new()))
            .collect();
        for (a, b) in edges {
            for (from, to) in [(&a, &b), (&b, &a)] {
                let neighbors = adjacency.get_mut(from.name()).ok_or_else(|| {
                    ModelError::UnknownVariable {
                        variable: from.name().to_string(),
                        context: format!("edge {}-{}", a, b),
                    }
                })?;
                if !neighbors.contains(to) {
                    neighbors.push(to.clone());
                }
            }
        }
        Self::new(adjacency)
    }

    /// Replaces the path finder used by [`path`](Self::path).
    pub fn with_path_finder(mut self, path_finder: impl PathFinder + 'static) -> Self {
        self.path_finder = Arc::new(path_finder);
        self
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.adjacency.keys()
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.adjacency.get_key_value(name).map(|(var, _)| var)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.adjacency.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Neighbors of `variable` in adjacency order; empty for unknown variables.
    pub fn neighbors(&self, variable: &Variable) -> &[Variable] {
        self.adjacency
            .get(variable.name())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn open_neighbors(&self, variable: &Variable, excluded: &FxHashSet<Variable>) -> Vec<Variable> {
        self.neighbors(variable)
            .iter()
            .filter(|n| !excluded.contains(*n))
            .cloned()
            .collect()
    }

    /// True if every edge appears in both directions.
    pub fn is_symmetric(&self) -> bool {
        self.adjacency.iter().all(|(var, neighbors)| {
            neighbors
                .iter()
                .all(|n| self.neighbors(n).iter().any(|back| back == var))
        })
    }

    /// Number of full assignments; saturates at `u128::MAX`.
    pub fn assignment_count(&self) -> u128 {
        self.adjacency
            .keys()
            .fold(1_u128, |acc, var| acc.saturating_mul(var.cardinality() as u128))
    }

    /// Every full assignment, in Cartesian order: the last variable varies
    /// fastest and each domain is walked in its own order.
    ///
    /// Each call starts a fresh enumeration.
    pub fn assignments(&self) -> Assignments<'_> {
        Assignments::new(self.adjacency.keys().collect())
    }

    /// A path from any vertex in `sources` to any vertex in `destinations` that
    /// never enters a vertex in `excluded`.
    ///
    /// Sources are tried in order and the first path found is returned; it is
    /// shortest from that source but not necessarily globally shortest.
    pub fn path(
        &self,
        sources: &[Variable],
        destinations: &[Variable],
        excluded: &[Variable],
    ) -> Option<Vec<Variable>> {
        let goals: FxHashSet<Variable> = destinations.iter().cloned().collect();
        let excluded: FxHashSet<Variable> = excluded.iter().cloned().collect();
        let found = sources
            .iter()
            .find_map(|source| self.path_finder.find_path(self, source, &goals, &excluded));

        #[cfg(feature = "tracing")]
        tracing::trace!(
            sources = ?sources,
            destinations = ?destinations,
            path = ?found,
            "graph path query"
        );

        found
    }
}

/// Lazy enumeration of a graph's full assignments (an odometer over domain
/// positions).
#[derive(Debug, Clone)]
pub struct Assignments<'g> {
    variables: Vec<&'g Variable>,
    /// Domain positions of the next assignment; `None` once exhausted.
    cursor: Option<Vec<usize>>,
}

impl<'g> Assignments<'g> {
    fn new(variables: Vec<&'g Variable>) -> Self {
        let cursor = if variables.iter().any(|v| v.cardinality() == 0) {
            None
        } else {
            Some(vec![0; variables.len()])
        };
        Self { variables, cursor }
    }

    fn advance(&mut self) {
        let Some(cursor) = self.cursor.as_mut() else {
            return;
        };
        for axis in (0..cursor.len()).rev() {
            cursor[axis] += 1;
            if cursor[axis] < self.variables[axis].cardinality() {
                return;
            }
            cursor[axis] = 0;
        }
        self.cursor = None;
    }
}

impl Iterator for Assignments<'_> {
    type Item = Assignment;

    fn next(&mut self) -> Option<Assignment> {
        let cursor = self.cursor.as_ref()?;
        let assignment = self
            .variables
            .iter()
            .zip(cursor)
            .map(|(var, &pos)| ((*var).clone(), var.domain()[pos]))
            .collect();
        self.advance();
        Some(assignment)
    }
}

impl FusedIterator for Assignments<'_> {}
