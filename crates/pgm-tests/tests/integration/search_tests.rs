use rustc_hash::FxHashMap;

use pgm_search::{
    shortest_path, BacktrackingSearch, BreadthFirstSearch, DagProblem, SearchAlgorithm,
    SearchError, SearchProblem, Successor, UndirectedGraphProblem, UniformCostSearch,
};

fn square() -> FxHashMap<&'static str, Vec<&'static str>> {
    let mut adj = FxHashMap::default();
    adj.insert("A", vec!["B", "D"]);
    adj.insert("B", vec!["A", "C"]);
    adj.insert("C", vec!["B", "D"]);
    adj.insert("D", vec!["A", "C"]);
    adj
}

/// s -> a -> g is short but expensive; s -> b -> c -> g is long but cheap.
fn weighted() -> FxHashMap<&'static str, Vec<(&'static str, f64)>> {
    let mut adj = FxHashMap::default();
    adj.insert("s", vec![("a", 1.0), ("b", 1.0)]);
    adj.insert("a", vec![("g", 10.0)]);
    adj.insert("b", vec![("c", 1.0)]);
    adj.insert("c", vec![("g", 1.0)]);
    adj
}

#[test]
fn bfs_on_square_with_and_without_ignores() {
    let adj = square();
    let open = UndirectedGraphProblem::new(&adj, "A", ["C"], []);
    let solution = BreadthFirstSearch.solve(&open).expect("bfs").expect("path");
    assert_eq!(solution.path, vec!["A", "B", "C"]);
    assert_eq!(solution.cost, 2.0);

    let blocked = UndirectedGraphProblem::new(&adj, "A", ["C"], ["B", "D"]);
    assert_eq!(BreadthFirstSearch.solve(&blocked).expect("bfs"), None);
}

#[test]
fn algorithms_disagree_only_where_costs_matter() {
    let adj = weighted();
    let problem = DagProblem::new(&adj, "s", ["g"]);

    let bfs = BreadthFirstSearch.solve(&problem).expect("bfs").expect("path");
    assert_eq!(bfs.path, vec!["s", "a", "g"]);
    assert_eq!(bfs.cost, 11.0);

    let ucs = UniformCostSearch.solve(&problem).expect("ucs").expect("path");
    assert_eq!(ucs.path, vec!["s", "b", "c", "g"]);
    assert_eq!(ucs.cost, 3.0);

    let bt = BacktrackingSearch.solve(&problem).expect("backtracking").expect("path");
    assert_eq!(bt.path, ucs.path);
    assert_eq!(bt.cost, 3.0);
}

#[test]
fn negative_weights_split_ucs_and_backtracking() {
    let mut adj = weighted();
    adj.insert("a", vec![("g", -10.0)]);
    let problem = DagProblem::new(&adj, "s", ["g"]);

    assert!(matches!(
        UniformCostSearch.solve(&problem),
        Err(SearchError::NegativeCost { .. })
    ));
    let bt = BacktrackingSearch.solve(&problem).expect("backtracking").expect("path");
    assert_eq!(bt.path, vec!["s", "a", "g"]);
    assert_eq!(bt.cost, -9.0);
}

#[test]
fn backtracking_rejects_cycles() {
    let adj = square();
    let problem = UndirectedGraphProblem::new(&adj, "A", ["Z"], []);
    assert!(matches!(
        BacktrackingSearch.solve(&problem),
        Err(SearchError::CycleDetected(_))
    ));
}

/// Walk the integers from `start` to `target` with steps of +1 (cost 1) or
/// *2 (cost 1).
struct Doubling {
    start: i32,
    target: i32,
}

impl SearchProblem for Doubling {
    type State = i32;

    fn start_state(&self) -> i32 {
        self.start
    }

    fn is_goal(&self, state: &i32) -> bool {
        *state == self.target
    }

    fn successors(&self, state: &i32) -> Vec<Successor<i32>> {
        [state + 1, state * 2]
            .into_iter()
            .filter(|s| *s <= self.target)
            .map(Successor::unit)
            .collect()
    }
}

#[test]
fn custom_problem_with_every_algorithm() {
    let problem = Doubling { start: 1, target: 10 };
    let bfs = BreadthFirstSearch.solve(&problem).expect("bfs").expect("path");
    let ucs = UniformCostSearch.solve(&problem).expect("ucs").expect("path");
    let bt = BacktrackingSearch.solve(&problem).expect("bt").expect("path");
    // 1 -> 2 -> 4 -> 5 -> 10
    assert_eq!(bfs.path.len(), 5);
    assert_eq!(bfs.len(), 4);
    assert_eq!(ucs.cost, 4.0);
    assert_eq!(bt.cost, 4.0);
    assert_eq!(bfs.goal(), Some(&10));
}

#[test]
fn shortest_path_closure_interface() {
    let adj = square();
    let path = shortest_path(
        "B",
        |v| *v == "D",
        |v| adj.get(v).cloned().unwrap_or_default(),
    );
    assert_eq!(path.map(|p| p.len()), Some(3));
    assert_eq!(shortest_path("A", |v| *v == "A", |_| Vec::<&str>::new()), Some(vec!["A"]));
}
