//! Directed models and chain algorithms.
//!
//! - **distribution** / **cpd**: single-variable and conditional distributions
//! - **network**: Bayesian networks as topologically ordered CPD lists
//! - **chain**: Viterbi and forward passes over Markov chains
//! - **skeleton**: P-map skeleton and immorality recovery from independencies

pub mod chain;
pub mod cpd;
pub mod distribution;
pub mod network;
pub mod skeleton;
