//! The exact-inference engine for discrete Markov networks.
//!
//! This module provides:
//! - **variable**: variables, assignments and cliques
//! - **factor**: the `Factor` trait with tabular and linear-Gaussian factors
//! - **graph**: undirected graphs, assignment enumeration and separation paths
//! - **markov_network**: partition function, probabilities, MAP and independence
//! - **config**: enumeration limits
//! - **errors**: error types for construction and queries

pub mod config;
pub mod errors;
pub mod factor;
pub mod graph;
pub mod markov_network;
pub mod variable;
