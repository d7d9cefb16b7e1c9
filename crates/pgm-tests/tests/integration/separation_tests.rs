use rustc_hash::FxHashSet;

use pgm_core::{FactorSet, Graph, MarkovNetwork, PathFinder, UniformCost, Variable};

fn vars(names: &[&str]) -> Vec<Variable> {
    names.iter().copied().map(Variable::binary).collect()
}

fn path_graph(v: &[Variable]) -> Graph {
    let edges: Vec<_> = v.windows(2).map(|w| (w[0].clone(), w[1].clone())).collect();
    Graph::undirected(v.to_vec(), edges).expect("graph")
}

fn square(v: &[Variable]) -> Graph {
    let edges = [(0, 1), (1, 2), (2, 3), (3, 0)].map(|(x, y)| (v[x].clone(), v[y].clone()));
    Graph::undirected(v.to_vec(), edges).expect("graph")
}

fn names(path: &[Variable]) -> Vec<&str> {
    path.iter().map(|v| v.name()).collect()
}

#[test]
fn chain_separation() {
    let v = vars(&["A", "B", "C", "D"]);
    let mn = MarkovNetwork::new(path_graph(&v), FactorSet::new()).expect("network");
    assert!(mn.conditionally_independent(&v[..1], &v[3..], &v[1..3]));
    assert!(!mn.conditionally_independent(&v[..1], &v[3..], &[]));
    assert!(mn.conditionally_independent(&v[..1], &v[3..], &v[2..3]));
}

#[test]
fn excluding_a_cut_vertex_disconnects() {
    let v = vars(&["A", "B", "C", "D"]);
    let g = path_graph(&v);
    assert_eq!(g.path(&v[..1], &v[3..], &v[1..2]), None);
    let found = g.path(&v[..1], &v[3..], &[]).expect("path");
    assert_eq!(names(&found), vec!["A", "B", "C", "D"]);
}

#[test]
fn alternate_route_survives_exclusion() {
    let v = vars(&["A", "B", "C", "D"]);
    let g = square(&v);
    let found = g.path(&v[..1], &v[2..3], &v[1..2]).expect("path around B");
    assert_eq!(names(&found), vec!["A", "D", "C"]);
    assert_eq!(g.path(&v[..1], &v[2..3], &[v[1].clone(), v[3].clone()]), None);
}

#[test]
fn source_in_destinations_is_trivial_path() {
    let v = vars(&["A", "B"]);
    let g = path_graph(&v);
    let found = g.path(&v[..1], &v[..1], &v[..1]).expect("trivial");
    assert_eq!(names(&found), vec!["A"]);
}

#[test]
fn sources_are_tried_in_order() {
    let v = vars(&["A", "B", "C", "D", "E"]);
    // A is isolated; B - C - D - E is a chain.
    let edges: Vec<_> = v[1..].windows(2).map(|w| (w[0].clone(), w[1].clone())).collect();
    let g = Graph::undirected(v.clone(), edges).expect("graph");
    let found = g
        .path(&[v[0].clone(), v[3].clone(), v[1].clone()], &v[4..], &[])
        .expect("path");
    assert_eq!(names(&found), vec!["D", "E"]);
}

#[test]
fn uniform_cost_agrees_on_separation() {
    let v = vars(&["A", "B", "C", "D"]);
    let bfs = square(&v);
    let ucs = square(&v).with_path_finder(UniformCost);
    let cases: [(&[Variable], &[Variable], Vec<Variable>); 3] = [
        (&v[..1], &v[2..3], vec![v[1].clone()]),
        (&v[..1], &v[2..3], vec![v[1].clone(), v[3].clone()]),
        (&v[1..2], &v[3..], vec![]),
    ];
    for (a, b, given) in &cases {
        let lhs = bfs.path(a, b, given).map(|p| p.len());
        let rhs = ucs.path(a, b, given).map(|p| p.len());
        assert_eq!(lhs, rhs);
    }
}

/// Treats every pair as disconnected.
#[derive(Debug)]
struct NeverReachable;

impl PathFinder for NeverReachable {
    fn find_path(
        &self,
        _graph: &Graph,
        _start: &Variable,
        _goals: &FxHashSet<Variable>,
        _excluded: &FxHashSet<Variable>,
    ) -> Option<Vec<Variable>> {
        None
    }
}

#[test]
fn injected_path_finder_is_used() {
    let v = vars(&["A", "B"]);
    let g = path_graph(&v).with_path_finder(NeverReachable);
    let mn = MarkovNetwork::new(g, FactorSet::new()).expect("network");
    assert!(mn.conditionally_independent(&v[..1], &v[1..], &[]));
}
