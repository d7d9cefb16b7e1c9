//! # P-map Skeletons
//!
//! Recovers the undirected skeleton and immoralities of a perfect map from a
//! list of conditional independencies. Everything here is keyed by variable
//! name and stored in ordered collections, so results are deterministic.

use std::collections::{BTreeMap, BTreeSet};

use crate::engine::errors::ModelError;

/// A set of variable names conditioned on; the empty set is marginal independence.
pub type Witness = BTreeSet<String>;

/// An unordered variable pair, stored with the smaller name first.
pub type Pair = (String, String);

/// Observed witnesses per pair.
pub type Witnesses = BTreeMap<Pair, BTreeSet<Witness>>;

fn pair(x: &str, y: &str) -> Pair {
    if x <= y {
        (x.to_string(), y.to_string())
    } else {
        (y.to_string(), x.to_string())
    }
}

/// Known statements of the form `X ⊥ Y | W`.
#[derive(Debug, Clone, Default)]
pub struct Independencies {
    statements: BTreeMap<Pair, BTreeSet<Witness>>,
}

impl Independencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `x ⊥ y | given`. Order of `x` and `y` is irrelevant.
    pub fn add<S: Into<String>>(
        &mut self,
        x: &str,
        y: &str,
        given: impl IntoIterator<Item = S>,
    ) -> &mut Self {
        self.statements
            .entry(pair(x, y))
            .or_default()
            .insert(given.into_iter().map(Into::into).collect());
        self
    }

    pub fn holds(&self, x: &str, y: &str, given: &Witness) -> bool {
        self.statements
            .get(&pair(x, y))
            .map_or(false, |ws| ws.contains(given))
    }

    pub fn len(&self) -> usize {
        self.statements.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Undirected skeleton plus the witnesses that removed each missing edge.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Skeleton {
    pub adjacency: BTreeMap<String, BTreeSet<String>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub witnesses: Witnesses,
}

impl Skeleton {
    pub fn adjacent(&self, x: &str, y: &str) -> bool {
        self.adjacency.get(x).map_or(false, |n| n.contains(y))
    }

    pub fn neighbors(&self, x: &str) -> impl Iterator<Item = &str> + '_ {
        self.adjacency
            .get(x)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Edges as ordered pairs, each listed once.
    pub fn edges(&self) -> Vec<Pair> {
        self.adjacency
            .iter()
            .flat_map(|(x, ns)| ns.iter().filter(move |y| x < *y).map(move |y| (x.clone(), y.clone())))
            .collect()
    }
}

/// Starts from the complete graph over `variables` and removes every edge
/// `X - Y` for which some subset of the remaining variables is a recorded
/// witness of `X ⊥ Y`.
pub fn build_skeleton(
    variables: &[&str],
    independencies: &Independencies,
) -> Result<Skeleton, ModelError> {
    let names: BTreeSet<&str> = variables.iter().copied().collect();
    if names.len() > 65 {
        return Err(ModelError::InvalidParameter(format!(
            "{} variables is too many for witness enumeration",
            names.len()
        )));
    }

    let mut adjacency: BTreeMap<String, BTreeSet<String>> = names
        .iter()
        .map(|x| {
            let others = names.iter().filter(|y| *y != x).map(|y| y.to_string());
            (x.to_string(), others.collect())
        })
        .collect();
    let mut witnesses = Witnesses::new();

    for (i, x) in names.iter().enumerate() {
        for y in names.iter().skip(i + 1) {
            let rest: Vec<&str> = names.iter().copied().filter(|v| v != x && v != y).collect();
            for mask in 0..(1u64 << rest.len()) {
                let witness: Witness = rest
                    .iter()
                    .enumerate()
                    .filter(|(bit, _)| mask & (1 << bit) != 0)
                    .map(|(_, v)| v.to_string())
                    .collect();
                if independencies.holds(x, y, &witness) {
                    witnesses.entry(pair(x, y)).or_default().insert(witness);
                }
            }
            if witnesses.contains_key(&pair(x, y)) {
                if let Some(n) = adjacency.get_mut(*x) {
                    n.remove(*y);
                }
                if let Some(n) = adjacency.get_mut(*y) {
                    n.remove(*x);
                }
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        variables = names.len(),
        separated = witnesses.len(),
        "built p-map skeleton"
    );

    Ok(Skeleton {
        adjacency,
        witnesses,
    })
}

/// A `left - center - right` v-structure candidate, `left < right`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Triple {
    pub left: String,
    pub center: String,
    pub right: String,
}

/// Every path `X - Z - Y` in the skeleton whose endpoints are not adjacent.
pub fn potential_immoralities(skeleton: &Skeleton) -> BTreeSet<Triple> {
    let mut out = BTreeSet::new();
    for (x, zs) in &skeleton.adjacency {
        for z in zs {
            for y in skeleton.neighbors(z) {
                if y != x.as_str() && !skeleton.adjacent(y, x) {
                    let (left, right) = pair(x, y);
                    out.insert(Triple {
                        left,
                        center: z.clone(),
                        right,
                    });
                }
            }
        }
    }
    out
}

/// Candidates whose center is absent from every witness separating the ends.
pub fn immoralities(potential: &BTreeSet<Triple>, witnesses: &Witnesses) -> BTreeSet<Triple> {
    potential
        .iter()
        .filter(|t| {
            witnesses
                .get(&pair(&t.left, &t.right))
                .map_or(true, |ws| ws.iter().all(|w| !w.contains(&t.center)))
        })
        .cloned()
        .collect()
}
