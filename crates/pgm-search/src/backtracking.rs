//! Backtracking search with memoization for DAGs.
//!
//! Each state's minimum cost-to-goal is computed once and cached, so the search
//! is O(|V| + |E|) over the reachable sub-DAG. Negative edge weights are allowed.
//! A successor relation with a cycle is rejected with [`SearchError::CycleDetected`].

use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::SearchError;
use crate::problem::SearchProblem;
use crate::{SearchAlgorithm, Solution};

#[derive(Debug, Clone, Copy, Default)]
pub struct BacktrackingSearch;

struct Memo<S> {
    /// state -> (min cost to any goal, best next state)
    cache: FxHashMap<S, (f64, Option<S>)>,
    on_stack: FxHashSet<S>,
}

impl SearchAlgorithm for BacktrackingSearch {
    fn solve<P: SearchProblem>(
        &self,
        problem: &P,
    ) -> Result<Option<Solution<P::State>>, SearchError> {
        let mut memo = Memo {
            cache: FxHashMap::default(),
            on_stack: FxHashSet::default(),
        };
        let start = problem.start_state();
        let cost = cost_to_goal(problem, &start, &mut memo)?;
        if !cost.is_finite() {
            return Ok(None);
        }

        let mut path = vec![start.clone()];
        let mut cursor = start;
        while !problem.is_goal(&cursor) {
            match memo.cache.get(&cursor).and_then(|(_, next)| next.clone()) {
                Some(next) => {
                    path.push(next.clone());
                    cursor = next;
                }
                None => break,
            }
        }
        Ok(Some(Solution { path, cost }))
    }
}

fn cost_to_goal<P: SearchProblem>(
    problem: &P,
    state: &P::State,
    memo: &mut Memo<P::State>,
) -> Result<f64, SearchError> {
    if problem.is_goal(state) {
        return Ok(0.0);
    }
    if let Some((cost, _)) = memo.cache.get(state) {
        return Ok(*cost);
    }
    if !memo.on_stack.insert(state.clone()) {
        return Err(SearchError::CycleDetected(format!("{:?}", state)));
    }

    let mut best_cost = f64::INFINITY;
    let mut best_next = None;
    for succ in problem.successors(state) {
        if !succ.cost.is_finite() {
            return Err(SearchError::NonFiniteCost(format!("{:?}", state)));
        }
        let total = succ.cost + cost_to_goal(problem, &succ.state, memo)?;
        if total < best_cost {
            best_cost = total;
            best_next = Some(succ.state);
        }
    }

    memo.on_stack.remove(state);
    memo.cache.insert(state.clone(), (best_cost, best_next));
    Ok(best_cost)
}
