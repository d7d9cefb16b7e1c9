//! Viterbi and forward passes over a homogeneous Markov chain.
//!
//! States are `0..m`; `transition[i][j]` is the probability of moving from
//! state `i` to state `j`. Neither pass needs observations.

use crate::engine::errors::ModelError;

/// The most probable state sequence of a chain and its probability.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ViterbiPath {
    pub probability: f64,
    pub states: Vec<usize>,
}

fn check_chain(initial: &[f64], transition: &[Vec<f64>], steps: usize) -> Result<(), ModelError> {
    if initial.is_empty() {
        return Err(ModelError::InvalidParameter("chain has no states".into()));
    }
    if steps == 0 {
        return Err(ModelError::InvalidParameter("chain needs at least one step".into()));
    }
    if transition.len() != initial.len() {
        return Err(ModelError::InvalidParameter(format!(
            "transition matrix has {} rows for {} states",
            transition.len(),
            initial.len()
        )));
    }
    if let Some((row, _)) = transition
        .iter()
        .enumerate()
        .find(|(_, r)| r.len() != initial.len())
    {
        return Err(ModelError::InvalidParameter(format!(
            "transition row {} does not have {} entries",
            row,
            initial.len()
        )));
    }
    let finite = |p: &f64| p.is_finite() && *p >= 0.0;
    if !initial.iter().all(finite) || !transition.iter().flatten().all(finite) {
        return Err(ModelError::InvalidParameter(
            "chain probabilities must be finite and non-negative".into(),
        ));
    }
    Ok(())
}

/// Most likely length-`steps` state sequence starting from `initial`.
///
/// Runs in `O(steps * m^2)`. Among equally probable predecessors the lowest
/// state index wins, as does the lowest final state.
pub fn viterbi(
    initial: &[f64],
    transition: &[Vec<f64>],
    steps: usize,
) -> Result<ViterbiPath, ModelError> {
    check_chain(initial, transition, steps)?;
    let m = initial.len();

    let mut probs = initial.to_vec();
    // back[t][s] = best predecessor of state s at step t (t >= 1).
    let mut back: Vec<Vec<usize>> = Vec::with_capacity(steps.saturating_sub(1));

    for _ in 1..steps {
        let mut next = vec![0.0; m];
        let mut pointers = vec![0; m];
        for s in 0..m {
            let (mut best_prev, mut best_prob) = (0, 0.0);
            for (prev, p) in probs.iter().enumerate() {
                let candidate = p * transition[prev][s];
                if candidate > best_prob {
                    best_prob = candidate;
                    best_prev = prev;
                }
            }
            next[s] = best_prob;
            pointers[s] = best_prev;
        }
        probs = next;
        back.push(pointers);
    }

    let (mut state, probability) = probs
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(bi, bp), (i, p)| {
            if p > bp {
                (i, p)
            } else {
                (bi, bp)
            }
        });

    let mut states = vec![0; steps];
    states[steps - 1] = state;
    for (t, pointers) in back.iter().enumerate().rev() {
        state = pointers[state];
        states[t] = state;
    }

    Ok(ViterbiPath { probability, states })
}

/// State marginals at each of `steps` steps, starting from `initial`.
///
/// `forward(..)[t][s]` is the probability of being in state `s` at step `t`.
pub fn forward(
    initial: &[f64],
    transition: &[Vec<f64>],
    steps: usize,
) -> Result<Vec<Vec<f64>>, ModelError> {
    check_chain(initial, transition, steps)?;
    let m = initial.len();
    let mut out = Vec::with_capacity(steps);
    out.push(initial.to_vec());
    for t in 1..steps {
        let prev = &out[t - 1];
        let row: Vec<f64> = (0..m)
            .map(|s| (0..m).map(|p| prev[p] * transition[p][s]).sum())
            .collect();
        out.push(row);
    }
    Ok(out)
}
