//! Breadth-first search.
//!
//! [`shortest_path`] is the reachability primitive: fewest-edges path from one
//! start vertex to any goal vertex. Among equal-length paths, the one discovered
//! first under the caller's neighbor order wins; only minimality is guaranteed.
//! Edge costs are ignored, so this must not be used where weights matter.

use std::collections::VecDeque;
use std::hash::Hash;

use rustc_hash::FxHashSet;

use crate::errors::SearchError;
use crate::problem::SearchProblem;
use crate::{SearchAlgorithm, Solution};

/// Frontier entry: a discovered vertex with a back-reference into the arena.
struct Discovered<N> {
    vertex: N,
    parent: Option<usize>,
    cost: f64,
}

/// Finds a fewest-edges path from `start` to the first vertex satisfying `is_goal`.
///
/// `successors` enumerates neighbors and may omit vertices that should be treated
/// as removed. Returns the path including both `start` and the goal, a single
/// element path if `start` is itself a goal, or `None` if no goal is reachable.
pub fn shortest_path<N, G, S, I>(start: N, mut is_goal: G, mut successors: S) -> Option<Vec<N>>
where
    N: Clone + Eq + Hash,
    G: FnMut(&N) -> bool,
    S: FnMut(&N) -> I,
    I: IntoIterator<Item = N>,
{
    traverse(start, &mut is_goal, |v| {
        successors(v).into_iter().map(|n| (n, 1.0)).collect()
    })
    .map(|(path, _)| path)
}

fn traverse<N, G, S>(start: N, is_goal: &mut G, mut expand: S) -> Option<(Vec<N>, f64)>
where
    N: Clone + Eq + Hash,
    G: FnMut(&N) -> bool,
    S: FnMut(&N) -> Vec<(N, f64)>,
{
    let mut arena: Vec<Discovered<N>> = Vec::new();
    let mut visited: FxHashSet<N> = FxHashSet::default();
    let mut queue: VecDeque<usize> = VecDeque::new();

    visited.insert(start.clone());
    arena.push(Discovered {
        vertex: start,
        parent: None,
        cost: 0.0,
    });
    queue.push_back(0);

    while let Some(idx) = queue.pop_front() {
        if is_goal(&arena[idx].vertex) {
            return Some(backtrack(&arena, idx));
        }
        let base_cost = arena[idx].cost;
        for (next, cost) in expand(&arena[idx].vertex) {
            if visited.insert(next.clone()) {
                arena.push(Discovered {
                    vertex: next,
                    parent: Some(idx),
                    cost: base_cost + cost,
                });
                queue.push_back(arena.len() - 1);
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(explored = arena.len(), "bfs: goal unreachable");

    None
}

fn backtrack<N: Clone>(arena: &[Discovered<N>], goal: usize) -> (Vec<N>, f64) {
    let cost = arena[goal].cost;
    let mut path = Vec::new();
    let mut cursor = Some(goal);
    while let Some(idx) = cursor {
        path.push(arena[idx].vertex.clone());
        cursor = arena[idx].parent;
    }
    path.reverse();
    (path, cost)
}

/// Breadth-first search as a [`SearchAlgorithm`].
///
/// The reported cost is the sum of the problem's edge costs along the returned
/// path, but the path itself minimizes edge count, not cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirstSearch;

impl SearchAlgorithm for BreadthFirstSearch {
    fn solve<P: SearchProblem>(
        &self,
        problem: &P,
    ) -> Result<Option<Solution<P::State>>, SearchError> {
        let found = traverse(
            problem.start_state(),
            &mut |s: &P::State| problem.is_goal(s),
            |s| {
                problem
                    .successors(s)
                    .into_iter()
                    .map(|succ| (succ.state, succ.cost))
                    .collect()
            },
        );
        Ok(found.map(|(path, cost)| Solution { path, cost }))
    }
}
