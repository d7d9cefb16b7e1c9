use pgm_core::{
    Assignment, Factor, FactorSet, Graph, InferenceConfig, LinearGaussianFactor, MarkovNetwork,
    ModelError, Table, TabularFactor, Variable,
};

const EPS: f64 = 1e-12;

fn triangle(table: &Table) -> (Vec<Variable>, MarkovNetwork) {
    let vars: Vec<Variable> = ["A", "B", "C"].into_iter().map(Variable::binary).collect();
    let (a, b, c) = (&vars[0], &vars[1], &vars[2]);
    let graph = Graph::undirected(
        vars.clone(),
        [(a.clone(), b.clone()), (a.clone(), c.clone()), (b.clone(), c.clone())],
    )
    .expect("graph");
    let factors = FactorSet::new()
        .with(TabularFactor::new([a.clone(), b.clone()], table.clone()).expect("ab"))
        .with(TabularFactor::new([a.clone(), c.clone()], table.clone()).expect("ac"))
        .with(TabularFactor::new([b.clone(), c.clone()], table.clone()).expect("bc"));
    let mn = MarkovNetwork::new(graph, factors).expect("network");
    (vars, mn)
}

fn agree() -> Table {
    Table::matrix(vec![vec![10.0, 1.0], vec![1.0, 10.0]]).expect("table")
}

/// `D` refuses color 0 and prefers color 2 tenfold.
fn d_preference() -> Table {
    Table::vector(vec![0.0, 1.0, 10.0]).expect("table")
}

fn colors() -> [Variable; 4] {
    ["A", "B", "C", "D"].map(|n| Variable::with_cardinality(n, 3))
}

fn differ() -> Table {
    Table::from_fn([3, 3], |ix| if ix[0] == ix[1] { 0.0 } else { 1.0 }).expect("table")
}

fn color_network(edges: &[(usize, usize)]) -> ([Variable; 4], MarkovNetwork) {
    let vars = colors();
    let graph = Graph::undirected(
        vars.clone(),
        edges.iter().map(|&(x, y)| (vars[x].clone(), vars[y].clone())),
    )
    .expect("graph");
    let mut factors = FactorSet::new();
    for &(x, y) in edges {
        factors.insert(TabularFactor::new([vars[x].clone(), vars[y].clone()], differ()).expect("pair"));
    }
    factors.insert(TabularFactor::new([vars[3].clone()], d_preference()).expect("unary"));
    let mn = MarkovNetwork::new(graph, factors).expect("network");
    (vars, mn)
}

fn colored(vars: &[Variable; 4], values: [i64; 4]) -> Assignment {
    vars.iter().cloned().zip(values).collect()
}

#[test]
fn agreement_triangle_favours_equal_values() {
    let (vars, mn) = triangle(&agree());
    let zeros = colored_binary(&vars, [0, 0, 0]);
    let p_zeros = mn.probability(&zeros).expect("p");

    for x in mn.graph().assignments() {
        assert!(p_zeros >= mn.probability(&x).expect("p") - EPS);
    }
    assert!(p_zeros > mn.probability(&colored_binary(&vars, [0, 0, 1])).expect("p"));
    assert_eq!(mn.most_likely_assignment().expect("map"), zeros);
}

fn colored_binary(vars: &[Variable], values: [i64; 3]) -> Assignment {
    vars.iter().cloned().zip(values).collect()
}

#[test]
fn probabilities_sum_to_one() {
    let (_, mn) = triangle(&agree());
    let total: f64 = mn
        .graph()
        .assignments()
        .map(|x| mn.probability(&x).expect("p"))
        .sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn single_joint_factor_matches_its_table() {
    let vars: Vec<Variable> = ["A", "B", "C"].into_iter().map(Variable::binary).collect();
    let graph = Graph::undirected(vars.clone(), no_edges()).expect("graph");
    let joint = Table::new([2, 2, 2], vec![1000.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 1000.0])
        .expect("table");
    let factors = FactorSet::new().with(TabularFactor::new(vars.as_slice(), joint).expect("joint"));
    let mn = MarkovNetwork::new(graph, factors).expect("network");

    assert!((mn.partition() - 2060.0).abs() < EPS);
    let zeros = colored_binary(&vars, [0, 0, 0]);
    assert!((mn.affinity(&zeros).expect("affinity") - 1000.0).abs() < EPS);
    assert!((mn.probability(&zeros).expect("p") - 1000.0 / 2060.0).abs() < EPS);
}

#[test]
fn coloring_chain_respects_hard_constraints() {
    let (vars, mn) = color_network(&[(0, 1), (1, 2), (2, 3)]);
    assert!((mn.partition() - 88.0).abs() < EPS);

    for x in mn.graph().assignments() {
        let c = x.get("C").expect("C");
        let d = x.get("D").expect("D");
        if d == 0 || c == d {
            assert_eq!(mn.probability(&x).expect("p"), 0.0, "{}", x);
        }
    }

    let preferred = mn.probability(&colored(&vars, [0, 1, 0, 2])).expect("p");
    let neutral = mn.probability(&colored(&vars, [0, 1, 0, 1])).expect("p");
    assert!(preferred > 0.0);
    assert!(preferred > neutral);

    let log_preferred = mn.log_probability(&colored(&vars, [0, 1, 0, 2])).expect("log p");
    assert!((log_preferred - preferred.ln()).abs() < EPS);
    assert!((log_preferred - (10.0_f64 / 88.0).ln()).abs() < EPS);
    let impossible = mn.log_probability(&colored(&vars, [0, 1, 0, 0])).expect("log p");
    assert_eq!(impossible, f64::NEG_INFINITY);
}

#[test]
fn coloring_cycle_queries() {
    let (vars, mn) = color_network(&[(0, 1), (1, 2), (2, 3), (3, 0)]);
    assert!((mn.partition() - 66.0).abs() < EPS);
    assert_eq!(mn.probability(&colored(&vars, [1, 0, 1, 0])).expect("p"), 0.0);
    assert_eq!(mn.probability(&colored(&vars, [1, 0, 2, 2])).expect("p"), 0.0);
    assert!((mn.probability(&colored(&vars, [1, 0, 1, 2])).expect("p") - 10.0 / 66.0).abs() < EPS);
    assert_eq!(
        mn.most_likely_assignment().expect("map"),
        colored(&vars, [0, 1, 0, 2])
    );

    let [a, b, c, d] = vars;
    assert!(!mn.conditionally_independent(&[a.clone()], &[b.clone()], &[c.clone(), d.clone()]));
    assert!(mn.conditionally_independent(&[a], &[c], &[b, d]));
}

#[test]
fn marginals_are_consistent() {
    let (vars, mn) = color_network(&[(0, 1), (1, 2), (2, 3)]);
    let d = &vars[3];
    let total: f64 = d
        .domain()
        .iter()
        .map(|&v| mn.marginal(&Assignment::new().with(d, v)).expect("marginal"))
        .sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert_eq!(mn.marginal(&Assignment::new().with(d, 0)).expect("marginal"), 0.0);
    assert!((mn.marginal(&Assignment::new()).expect("marginal") - 1.0).abs() < 1e-9);
}

#[test]
fn linear_gaussian_prefers_zero_sum() {
    let [a, b] = ["A", "B"].map(|n| Variable::new(n, [-1, 0, 1]));
    let graph = Graph::undirected([a.clone(), b.clone()], [(a.clone(), b.clone())]).expect("graph");
    let factors = FactorSet::new().with(LinearGaussianFactor::standard([a.clone(), b.clone()]));
    let mn = MarkovNetwork::new(graph, factors).expect("network");

    assert!((mn.partition() - 2.2726916723072477).abs() < 1e-9);
    let best = mn.most_likely_assignment().expect("map");
    assert_eq!(best, Assignment::new().with(&a, -1).with(&b, 1));
}

#[test]
fn empty_clique_is_neutral() {
    let factor = TabularFactor::new(Vec::<Variable>::new().as_slice(), Table::scalar(7.0).expect("t"))
        .expect("factor");
    assert_eq!(factor.affinity(&Assignment::new()), Ok(1.0));
    let x = Assignment::new().with(&Variable::binary("Z"), 1);
    assert_eq!(factor.affinity(&x), Ok(1.0));
}

#[test]
fn partial_assignment_is_rejected() {
    let (vars, mn) = triangle(&agree());
    let partial = Assignment::new().with(&vars[0], 0);
    assert!(matches!(
        mn.probability(&partial),
        Err(ModelError::MissingVariable { .. })
    ));
}

#[test]
fn rbm_partition_counts_assignments() {
    let visible: Vec<Variable> = (0..5).map(|i| Variable::binary(format!("V{}", i))).collect();
    let hidden: Vec<Variable> = (0..5).map(|i| Variable::binary(format!("H{}", i))).collect();
    let neutral = Table::filled([2, 2], 1.0).expect("table");
    let mut edges = Vec::new();
    let mut factors = FactorSet::new();
    for v in &visible {
        for h in &hidden {
            edges.push((v.clone(), h.clone()));
            factors.insert(TabularFactor::new([h.clone(), v.clone()], neutral.clone()).expect("f"));
        }
    }
    let graph = Graph::undirected(visible.iter().chain(&hidden).cloned(), edges).expect("graph");
    let mn = MarkovNetwork::new(graph, factors).expect("network");

    assert_eq!(mn.partition(), 1024.0);
    assert!(mn.conditionally_independent(&visible[..1], &visible[1..2], &hidden));
    assert!(!mn.conditionally_independent(&visible[..1], &visible[1..2], &hidden[1..]));
}

#[test]
fn enumeration_cap_is_enforced() {
    let vars: Vec<Variable> = (0..4).map(|i| Variable::with_cardinality(format!("X{}", i), 3)).collect();
    let graph = Graph::undirected(vars, no_edges()).expect("graph");
    let err = MarkovNetwork::with_config(graph.clone(), FactorSet::new(), InferenceConfig::capped(80))
        .expect_err("81 assignments");
    assert_eq!(err, ModelError::TooManyAssignments { count: 81, limit: 80 });
    assert!(MarkovNetwork::with_config(graph, FactorSet::new(), InferenceConfig::capped(81)).is_ok());
}

fn no_edges() -> Vec<(Variable, Variable)> {
    Vec::new()
}
