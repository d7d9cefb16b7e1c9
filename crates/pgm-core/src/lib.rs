//! # PGM Core
//!
//! Exact inference over small discrete probabilistic graphical models.
//!
//! A [`MarkovNetwork`] pairs an undirected [`Graph`] with a set of [`Factor`]s
//! and answers queries by enumerating every joint assignment, so cost grows
//! with the product of the domain sizes. Use [`InferenceConfig`] to cap that
//! enumeration. Separation queries run through the graph's [`PathFinder`],
//! which defaults to breadth-first search from `pgm-search`.
//!
//! The [`bayes`] module adds Bayesian networks built from CPDs, Viterbi and
//! forward passes over Markov chains, and P-map skeleton recovery.

#![forbid(unsafe_code)]

pub mod bayes;
pub mod engine;

// Re-export commonly used types
pub use bayes::chain::{forward, viterbi, ViterbiPath};
pub use bayes::cpd::{CategoricalCpd, Cpd, StaticCpd};
pub use bayes::distribution::{CategoricalDistribution, Distribution, StaticDistribution};
pub use bayes::network::BayesianNetwork;
pub use bayes::skeleton::{
    build_skeleton, immoralities, potential_immoralities, Independencies, Skeleton, Triple,
};
pub use engine::config::InferenceConfig;
pub use engine::errors::ModelError;
pub use engine::factor::{gaussian_pdf, Factor, LinearGaussianFactor, Table, TabularFactor};
pub use engine::graph::{Assignments, BreadthFirst, Graph, PathFinder, UniformCost};
pub use engine::markov_network::{FactorSet, MarkovNetwork};
pub use engine::variable::{Assignment, Clique, Value, Variable};
