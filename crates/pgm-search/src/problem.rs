//! Search problem abstraction and stock problems over adjacency maps.

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

/// One outgoing edge of a state.
#[derive(Debug, Clone, PartialEq)]
pub struct Successor<S> {
    pub state: S,
    pub cost: f64,
}

impl<S> Successor<S> {
    pub fn new(state: S, cost: f64) -> Self {
        Self { state, cost }
    }

    /// A successor reached by a unit-cost edge.
    pub fn unit(state: S) -> Self {
        Self { state, cost: 1.0 }
    }
}

/// A state space with a single start state and a goal predicate.
pub trait SearchProblem {
    type State: Clone + Eq + Hash + Debug;

    fn start_state(&self) -> Self::State;

    fn is_goal(&self, state: &Self::State) -> bool;

    /// Outgoing edges of `state`, in the order the algorithm should expand them.
    fn successors(&self, state: &Self::State) -> Vec<Successor<Self::State>>;
}

/// Unit-cost search over an undirected adjacency map, skipping ignored vertices.
///
/// Ignored vertices are never produced as successors; the start vertex itself is
/// not filtered. Vertices missing from the adjacency map have no neighbors.
#[derive(Debug, Clone)]
pub struct UndirectedGraphProblem<'a, V: Eq + Hash> {
    adjacency: &'a FxHashMap<V, Vec<V>>,
    start: V,
    goals: FxHashSet<V>,
    ignored: FxHashSet<V>,
}

impl<'a, V> UndirectedGraphProblem<'a, V>
where
    V: Clone + Eq + Hash + Debug,
{
    pub fn new(
        adjacency: &'a FxHashMap<V, Vec<V>>,
        start: V,
        goals: impl IntoIterator<Item = V>,
        ignored: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            adjacency,
            start,
            goals: goals.into_iter().collect(),
            ignored: ignored.into_iter().collect(),
        }
    }
}

impl<V> SearchProblem for UndirectedGraphProblem<'_, V>
where
    V: Clone + Eq + Hash + Debug,
{
    type State = V;

    fn start_state(&self) -> V {
        self.start.clone()
    }

    fn is_goal(&self, state: &V) -> bool {
        self.goals.contains(state)
    }

    fn successors(&self, state: &V) -> Vec<Successor<V>> {
        self.adjacency
            .get(state)
            .map(|neighbors| {
                neighbors
                    .iter()
                    .filter(|n| !self.ignored.contains(*n))
                    .cloned()
                    .map(Successor::unit)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Weighted search over a directed adjacency map with explicit edge costs.
#[derive(Debug, Clone)]
pub struct DagProblem<'a, V: Eq + Hash> {
    adjacency: &'a FxHashMap<V, Vec<(V, f64)>>,
    start: V,
    goals: FxHashSet<V>,
}

impl<'a, V> DagProblem<'a, V>
where
    V: Clone + Eq + Hash + Debug,
{
    pub fn new(
        adjacency: &'a FxHashMap<V, Vec<(V, f64)>>,
        start: V,
        goals: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            adjacency,
            start,
            goals: goals.into_iter().collect(),
        }
    }
}

impl<V> SearchProblem for DagProblem<'_, V>
where
    V: Clone + Eq + Hash + Debug,
{
    type State = V;

    fn start_state(&self) -> V {
        self.start.clone()
    }

    fn is_goal(&self, state: &V) -> bool {
        self.goals.contains(state)
    }

    fn successors(&self, state: &V) -> Vec<Successor<V>> {
        self.adjacency
            .get(state)
            .map(|edges| {
                edges
                    .iter()
                    .map(|(next, cost)| Successor::new(next.clone(), *cost))
                    .collect()
            })
            .unwrap_or_default()
    }
}
