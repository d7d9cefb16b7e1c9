use pgm_core::{
    build_skeleton, forward, immoralities, potential_immoralities, viterbi, Assignment,
    BayesianNetwork, CategoricalCpd, CategoricalDistribution, Cpd, Independencies, ModelError,
    StaticCpd, StaticDistribution, Variable,
};

fn dist(p: [f64; 2]) -> CategoricalDistribution {
    CategoricalDistribution::new(p.to_vec()).expect("distribution")
}

fn simple_chain() -> ([Variable; 3], BayesianNetwork) {
    let [a, b, c] = ["A", "B", "C"].map(Variable::binary);
    let cpds: Vec<Box<dyn Cpd>> = vec![
        Box::new(StaticCpd::new(a.clone(), dist([0.5, 0.5]))),
        Box::new(
            CategoricalCpd::new(
                b.clone(),
                vec![a.clone()],
                [(vec![0], dist([0.5, 0.5])), (vec![1], dist([0.1, 0.9]))],
            )
            .expect("cpd B"),
        ),
        Box::new(
            CategoricalCpd::new(
                c.clone(),
                vec![b.clone()],
                [(vec![0], dist([0.1, 0.9])), (vec![1], dist([0.8, 0.2]))],
            )
            .expect("cpd C"),
        ),
    ];
    let bn = BayesianNetwork::new(cpds).expect("network");
    ([a, b, c], bn)
}

#[test]
fn chain_rule_product() {
    let ([a, b, c], bn) = simple_chain();
    let x = |vc| Assignment::new().with(&a, 1).with(&b, 1).with(&c, vc);
    assert!((bn.pdf(&x(1)).expect("pdf") - 0.09).abs() < 1e-12);
    assert!((bn.pdf(&x(0)).expect("pdf") - 0.36).abs() < 1e-12);
    assert!((bn.logpdf(&x(0)).expect("logpdf") - 0.36_f64.ln()).abs() < 1e-12);
}

#[test]
fn joint_normalizes() {
    let ([a, b, c], bn) = simple_chain();
    let mut total = 0.0;
    for va in [0, 1] {
        for vb in [0, 1] {
            for vc in [0, 1] {
                let x = Assignment::new().with(&a, va).with(&b, vb).with(&c, vc);
                total += bn.pdf(&x).expect("pdf");
            }
        }
    }
    assert!((total - 1.0).abs() < 1e-12);
}

#[test]
fn static_distribution_as_root() {
    let coin = Variable::binary("Coin");
    let cpds: Vec<Box<dyn Cpd>> = vec![Box::new(StaticCpd::new(
        coin.clone(),
        StaticDistribution::new(|v| if v == 1 { 0.7 } else { 0.3 }),
    ))];
    let bn = BayesianNetwork::new(cpds).expect("network");
    assert_eq!(bn.pdf(&Assignment::new().with(&coin, 1)), Ok(0.7));
}

#[test]
fn value_outside_domain_is_reported() {
    let ([a, b, c], bn) = simple_chain();
    let x = Assignment::new().with(&a, 1).with(&b, 1).with(&c, 5);
    assert_eq!(
        bn.pdf(&x),
        Err(ModelError::ValueOutOfDomain {
            variable: "C".into(),
            value: 5
        })
    );
}

#[test]
fn viterbi_long_chain_cycles() {
    let initial = [1.0 / 3.0; 3];
    let transition = vec![
        vec![0.0, 0.2, 0.8],
        vec![0.8, 0.0, 0.2],
        vec![0.2, 0.8, 0.0],
    ];
    let path = viterbi(&initial, &transition, 100).expect("viterbi");
    assert_eq!(path.states.len(), 100);
    for (t, s) in path.states.iter().enumerate() {
        assert_eq!(*s, [0, 2, 1][t % 3], "step {}", t);
    }
    let expected = (1.0 / 3.0) * 0.8_f64.powi(99);
    assert!((path.probability - expected).abs() / expected < 1e-9);

    let rows = forward(&initial, &transition, 100).expect("forward");
    assert!(rows.iter().all(|r| (r.iter().sum::<f64>() - 1.0).abs() < 1e-9));
}

#[test]
fn p_map_recovers_v_structure() {
    let none: [&str; 0] = [];
    let mut indps = Independencies::new();
    indps
        .add("A", "C", ["B"])
        .add("A", "C", ["B", "D"])
        .add("A", "D", none)
        .add("A", "D", ["B"])
        .add("A", "D", ["B", "C"])
        .add("B", "D", none)
        .add("B", "D", ["A"]);
    let skeleton = build_skeleton(&["A", "B", "C", "D"], &indps).expect("skeleton");
    assert!(skeleton.adjacent("A", "B"));
    assert!(skeleton.adjacent("C", "B"));
    assert!(!skeleton.adjacent("A", "C"));

    let potential = potential_immoralities(&skeleton);
    assert_eq!(potential.len(), 2);
    let found: Vec<_> = immoralities(&potential, &skeleton.witnesses)
        .into_iter()
        .map(|t| (t.left, t.center, t.right))
        .collect();
    assert_eq!(found, vec![("B".to_string(), "C".to_string(), "D".to_string())]);
}
