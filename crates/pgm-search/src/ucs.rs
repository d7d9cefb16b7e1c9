//! Uniform-cost search (Dijkstra).
//!
//! States are settled in order of increasing path cost using a binary heap with
//! lazy deletion: stale heap entries for already-settled states are skipped on pop.
//! The first goal popped is reached along a minimum-cost path.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::SearchError;
use crate::problem::SearchProblem;
use crate::{SearchAlgorithm, Solution};

#[derive(Debug, Clone, Copy)]
struct Frontier {
    cost: f64,
    /// Insertion counter; equal costs pop in FIFO order.
    seq: u64,
    state: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    // Reversed so the max-heap pops the cheapest entry.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Uniform-cost search as a [`SearchAlgorithm`]. Requires non-negative costs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformCostSearch;

impl SearchAlgorithm for UniformCostSearch {
    fn solve<P: SearchProblem>(
        &self,
        problem: &P,
    ) -> Result<Option<Solution<P::State>>, SearchError> {
        let mut states: Vec<P::State> = Vec::new();
        let mut index: FxHashMap<P::State, usize> = FxHashMap::default();
        // best known cost and back-pointer per interned state
        let mut best: Vec<(f64, Option<usize>)> = Vec::new();
        let mut done: FxHashSet<usize> = FxHashSet::default();
        let mut heap = BinaryHeap::new();
        let mut seq = 0_u64;

        let start = problem.start_state();
        index.insert(start.clone(), 0);
        states.push(start);
        best.push((0.0, None));
        heap.push(Frontier {
            cost: 0.0,
            seq,
            state: 0,
        });

        while let Some(Frontier { cost, state, .. }) = heap.pop() {
            if !done.insert(state) {
                continue;
            }
            if problem.is_goal(&states[state]) {
                return Ok(Some(Solution {
                    path: backtrack(&states, &best, state),
                    cost,
                }));
            }

            for succ in problem.successors(&states[state]) {
                if !succ.cost.is_finite() {
                    return Err(SearchError::NonFiniteCost(format!("{:?}", states[state])));
                }
                if succ.cost < 0.0 {
                    return Err(SearchError::NegativeCost {
                        from: format!("{:?}", states[state]),
                        cost: succ.cost,
                    });
                }
                let total = cost + succ.cost;
                let next = match index.get(&succ.state) {
                    Some(&idx) => {
                        if best[idx].0 <= total {
                            continue;
                        }
                        best[idx] = (total, Some(state));
                        idx
                    }
                    None => {
                        let idx = states.len();
                        index.insert(succ.state.clone(), idx);
                        states.push(succ.state);
                        best.push((total, Some(state)));
                        idx
                    }
                };
                seq += 1;
                heap.push(Frontier {
                    cost: total,
                    seq,
                    state: next,
                });
            }
        }

        Ok(None)
    }
}

fn backtrack<S: Clone>(states: &[S], best: &[(f64, Option<usize>)], goal: usize) -> Vec<S> {
    let mut path = Vec::new();
    let mut cursor = Some(goal);
    while let Some(idx) = cursor {
        path.push(states[idx].clone());
        cursor = best[idx].1;
    }
    path.reverse();
    path
}
