//! pgm CLI - runs the built-in demonstration models
//!
//! Usage:
//!   pgm <model>                 # Print a summary of the model's queries
//!   pgm <model> -o json         # Output results as JSON
//!   pgm <model> --verbose       # Log construction details to stderr

use std::error::Error;
use std::fmt;
use std::process;

use clap::{Parser, ValueEnum};
use rustc_hash::FxHashMap;
use serde::Serialize;

use pgm_core::{
    build_skeleton, immoralities, potential_immoralities, viterbi, Assignment, BayesianNetwork,
    CategoricalCpd, CategoricalDistribution, Cpd, FactorSet, Graph, Independencies,
    LinearGaussianFactor, MarkovNetwork, StaticCpd, Table, TabularFactor, Triple, Variable,
};
use pgm_search::{BreadthFirstSearch, SearchAlgorithm, UndirectedGraphProblem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Model {
    /// Three binary variables with pairwise agreement factors
    Binary,
    /// Four-cycle graph coloring with a preference on D
    Haircolor,
    /// Two variables under a unit Gaussian of their sum
    LinearGaussian,
    /// 5x5 restricted Boltzmann machine with neutral factors
    Rbm,
    /// Breadth-first search around a four-cycle
    Bfs,
    /// Three-variable Bayesian chain A -> B -> C
    BayesChain,
    /// Most likely path of a three-state Markov chain
    Viterbi,
    /// Skeleton and immoralities from independence statements
    PMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Summary,
    Json,
    Debug,
}

#[derive(Parser)]
#[command(name = "pgm")]
#[command(version)]
#[command(about = "pgm - exact inference over small graphical models")]
#[command(long_about = "Run built-in Markov network, Bayesian network and graph search demonstrations")]
struct Cli {
    /// Demonstration model to run
    #[arg(value_enum, value_name = "MODEL")]
    model: Model,

    /// Output format: summary, json, or debug
    #[arg(short, long, value_enum, default_value = "summary", value_name = "FORMAT")]
    output: OutputFormat,

    /// Log model construction and queries to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    model: String,
    queries: Vec<Query>,
}

#[derive(Debug, Serialize)]
struct Query {
    name: String,
    answer: Answer,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Answer {
    Number(f64),
    Flag(bool),
    Assignment(Assignment),
    Path(Option<Vec<String>>),
    States(Vec<usize>),
    Edges(Vec<(String, String)>),
    Triples(Vec<Triple>),
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Number(x) => write!(f, "{:.6}", x),
            Answer::Flag(b) => write!(f, "{}", b),
            Answer::Assignment(a) => write!(f, "{}", a),
            Answer::Path(None) => f.write_str("no path"),
            Answer::Path(Some(p)) => f.write_str(&p.join(" -> ")),
            Answer::States(s) => write!(f, "{:?}", s),
            Answer::Edges(e) => {
                let parts: Vec<String> = e.iter().map(|(a, b)| format!("{}-{}", a, b)).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Answer::Triples(t) => {
                let parts: Vec<String> = t
                    .iter()
                    .map(|t| format!("{} -> {} <- {}", t.left, t.center, t.right))
                    .collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl Report {
    fn new(model: Model) -> Self {
        let model = model
            .to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default();
        Self {
            model,
            queries: Vec::new(),
        }
    }

    fn push(&mut self, name: impl Into<String>, answer: Answer) {
        self.queries.push(Query {
            name: name.into(),
            answer,
        });
    }
}

type DemoResult = Result<Report, Box<dyn Error>>;

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pgm_core=trace,pgm_search=trace"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let report = match run(cli.model) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error running model: {}", e);
            process::exit(1);
        }
    };

    match cli.output {
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing to JSON: {}", e);
                process::exit(1);
            }
        },
        OutputFormat::Debug => println!("{:#?}", report),
        OutputFormat::Summary => print_summary(&report),
    }
}

fn print_summary(report: &Report) {
    println!("✓ Model '{}' evaluated\n", report.model);
    for query in &report.queries {
        println!("  {} = {}", query.name, query.answer);
    }
}

fn run(model: Model) -> DemoResult {
    match model {
        Model::Binary => binary(),
        Model::Haircolor => haircolor(),
        Model::LinearGaussian => linear_gaussian(),
        Model::Rbm => rbm(),
        Model::Bfs => bfs(),
        Model::BayesChain => bayes_chain(),
        Model::Viterbi => markov_chain(),
        Model::PMap => p_map(),
    }
}

fn binary() -> DemoResult {
    let [a, b, c] = ["A", "B", "C"].map(Variable::binary);
    let graph = Graph::undirected(
        [a.clone(), b.clone(), c.clone()],
        [(a.clone(), b.clone()), (a.clone(), c.clone()), (b.clone(), c.clone())],
    )?;
    let agree = Table::matrix(vec![vec![10.0, 1.0], vec![1.0, 10.0]])?;

    let pairwise = FactorSet::new()
        .with(TabularFactor::new([a.clone(), b.clone()], agree.clone())?)
        .with(TabularFactor::new([a.clone(), c.clone()], agree.clone())?)
        .with(TabularFactor::new([b.clone(), c.clone()], agree.clone())?);
    let mn_pairwise = MarkovNetwork::new(graph.clone(), pairwise.clone())?;

    // Same model with the A-B factor ten times stronger.
    let scaled = pairwise.with(TabularFactor::new([a.clone(), b.clone()], agree.scaled(10.0)?)?);
    let mn_scaled = MarkovNetwork::new(graph.clone(), scaled)?;

    let joint = Table::new(
        [2, 2, 2],
        vec![1000.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 1000.0],
    )?;
    let single = FactorSet::new().with(TabularFactor::new([a.clone(), b.clone(), c.clone()], joint)?);
    let mn_single = MarkovNetwork::new(graph, single)?;

    let zeros = Assignment::new().with(&a, 0).with(&b, 0).with(&c, 0);
    let mut report = Report::new(Model::Binary);
    report.push("pairwise p(A=0, B=0, C=0)", Answer::Number(mn_pairwise.probability(&zeros)?));
    report.push("pairwise affinity(A=0, B=0, C=0)", Answer::Number(mn_pairwise.affinity(&zeros)?));
    report.push("scaled p(A=0, B=0, C=0)", Answer::Number(mn_scaled.probability(&zeros)?));
    report.push("single p(A=0, B=0, C=0)", Answer::Number(mn_single.probability(&zeros)?));
    report.push("single affinity(A=0, B=0, C=0)", Answer::Number(mn_single.affinity(&zeros)?));
    Ok(report)
}

fn haircolor() -> DemoResult {
    let [a, b, c, d] = ["A", "B", "C", "D"].map(|n| Variable::with_cardinality(n, 3));
    let graph = Graph::new([
        (a.clone(), vec![b.clone(), d.clone()]),
        (b.clone(), vec![a.clone(), c.clone()]),
        (c.clone(), vec![b.clone(), d.clone()]),
        (d.clone(), vec![a.clone(), c.clone()]),
    ])?;

    let differ = Table::from_fn([3, 3], |ix| if ix[0] == ix[1] { 0.0 } else { 1.0 })?;
    let neutral = Table::vector(vec![1.0; 3])?;
    let mut factors = FactorSet::new();
    for (x, y) in [(&a, &b), (&b, &c), (&c, &d), (&d, &a)] {
        factors.insert(TabularFactor::new([x.clone(), y.clone()], differ.clone())?);
    }
    for x in [&a, &b, &c] {
        factors.insert(TabularFactor::new([x.clone()], neutral.clone())?);
    }
    // D never takes color 0 and strongly prefers color 2.
    factors.insert(TabularFactor::new([d.clone()], Table::vector(vec![0.0, 1.0, 10.0])?)?);
    let mn = MarkovNetwork::new(graph, factors)?;

    let colored = |va, vb, vc, vd| {
        Assignment::new()
            .with(&a, va)
            .with(&b, vb)
            .with(&c, vc)
            .with(&d, vd)
    };

    let mut report = Report::new(Model::Haircolor);
    report.push("partition", Answer::Number(mn.partition()));
    report.push("p(A=1, B=0, C=1, D=0)", Answer::Number(mn.probability(&colored(1, 0, 1, 0))?));
    report.push("p(A=1, B=0, C=1, D=2)", Answer::Number(mn.probability(&colored(1, 0, 1, 2))?));
    report.push("p(A=1, B=0, C=2, D=2)", Answer::Number(mn.probability(&colored(1, 0, 2, 2))?));
    report.push("most likely", Answer::Assignment(mn.most_likely_assignment()?));
    report.push(
        "A _|_ B | C, D",
        Answer::Flag(mn.conditionally_independent(&[a.clone()], &[b.clone()], &[c.clone(), d.clone()])),
    );
    report.push(
        "A _|_ C | B, D",
        Answer::Flag(mn.conditionally_independent(&[a.clone()], &[c.clone()], &[b, d])),
    );
    Ok(report)
}

fn linear_gaussian() -> DemoResult {
    let [a, b] = ["A", "B"].map(|n| Variable::new(n, [-1, 0, 1]));
    let graph = Graph::undirected([a.clone(), b.clone()], [(a.clone(), b.clone())])?;
    let factors = FactorSet::new().with(LinearGaussianFactor::standard([a, b]));
    let mn = MarkovNetwork::new(graph, factors)?;

    let best = mn.most_likely_assignment()?;
    let mut report = Report::new(Model::LinearGaussian);
    report.push("partition", Answer::Number(mn.partition()));
    report.push("p(most likely)", Answer::Number(mn.probability(&best)?));
    report.push("most likely", Answer::Assignment(best));
    Ok(report)
}

fn rbm() -> DemoResult {
    const UNITS: usize = 5;
    let visible: Vec<Variable> = (0..UNITS).map(|i| Variable::binary(format!("V{}", i))).collect();
    let hidden: Vec<Variable> = (0..UNITS).map(|i| Variable::binary(format!("H{}", i))).collect();

    let mut edges = Vec::with_capacity(UNITS * UNITS);
    let mut factors = FactorSet::new();
    let neutral = Table::filled([2, 2], 1.0)?;
    for v in &visible {
        for h in &hidden {
            edges.push((v.clone(), h.clone()));
            factors.insert(TabularFactor::new([h.clone(), v.clone()], neutral.clone())?);
        }
    }
    let graph = Graph::undirected(visible.iter().chain(&hidden).cloned(), edges)?;
    let mn = MarkovNetwork::new(graph, factors)?;

    let mut report = Report::new(Model::Rbm);
    report.push("partition", Answer::Number(mn.partition()));
    report.push(
        "V0 _|_ V1 | H*",
        Answer::Flag(mn.conditionally_independent(&visible[..1], &visible[1..2], &hidden)),
    );
    Ok(report)
}

fn bfs() -> DemoResult {
    let mut adjacency: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    adjacency.insert("A", vec!["B", "D"]);
    adjacency.insert("B", vec!["A", "C"]);
    adjacency.insert("C", vec!["B", "D"]);
    adjacency.insert("D", vec!["A", "C"]);

    let to_names = |path: Vec<&str>| -> Vec<String> { path.into_iter().map(String::from).collect() };
    let mut report = Report::new(Model::Bfs);
    for (label, ignored) in [("A to C", vec![]), ("A to C avoiding B, D", vec!["B", "D"])] {
        let problem = UndirectedGraphProblem::new(&adjacency, "A", ["C"], ignored);
        let solution = BreadthFirstSearch.solve(&problem)?;
        report.push(label, Answer::Path(solution.map(|s| to_names(s.path))));
    }
    Ok(report)
}

fn bayes_chain() -> DemoResult {
    let [a, b, c] = ["A", "B", "C"].map(Variable::binary);
    let dist = |p: [f64; 2]| CategoricalDistribution::new(p.to_vec());
    let cpds: Vec<Box<dyn Cpd>> = vec![
        Box::new(StaticCpd::new(a.clone(), dist([0.5, 0.5])?)),
        Box::new(CategoricalCpd::new(
            b.clone(),
            vec![a.clone()],
            [(vec![0], dist([0.5, 0.5])?), (vec![1], dist([0.1, 0.9])?)],
        )?),
        Box::new(CategoricalCpd::new(
            c.clone(),
            vec![b.clone()],
            [(vec![0], dist([0.1, 0.9])?), (vec![1], dist([0.8, 0.2])?)],
        )?),
    ];
    let bn = BayesianNetwork::new(cpds)?;

    let mut report = Report::new(Model::BayesChain);
    for vc in [1, 0] {
        let x = Assignment::new().with(&a, 1).with(&b, 1).with(&c, vc);
        report.push(format!("p({})", x), Answer::Number(bn.pdf(&x)?));
    }
    Ok(report)
}

fn markov_chain() -> DemoResult {
    let initial = [1.0 / 3.0; 3];
    let transition = vec![
        vec![0.0, 0.2, 0.8],
        vec![0.8, 0.0, 0.2],
        vec![0.2, 0.8, 0.0],
    ];
    let path = viterbi(&initial, &transition, 100)?;

    let mut report = Report::new(Model::Viterbi);
    report.push("probability", Answer::Number(path.probability));
    report.push("states", Answer::States(path.states));
    Ok(report)
}

fn p_map() -> DemoResult {
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

    let skeleton = build_skeleton(&["A", "B", "C", "D"], &indps)?;
    let potential = potential_immoralities(&skeleton);
    let found = immoralities(&potential, &skeleton.witnesses);

    let mut report = Report::new(Model::PMap);
    report.push("skeleton", Answer::Edges(skeleton.edges()));
    report.push("potential immoralities", Answer::Triples(potential.into_iter().collect()));
    report.push("immoralities", Answer::Triples(found.into_iter().collect()));
    Ok(report)
}
