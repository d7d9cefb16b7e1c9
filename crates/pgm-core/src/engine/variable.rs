//! Variables, assignments and cliques.
//!
//! A [`Variable`] is identified by its name alone: two variables with the same
//! name are equal and hash identically, whatever domain they carry. This lets
//! many factors refer to the same variable without sharing storage, and lets
//! assignments be queried by name.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::engine::errors::ModelError;

/// A concrete value drawn from a variable's domain.
pub type Value = i64;

/// Inline capacity for cliques; pairwise and unary factors dominate in practice.
const INLINE_CLIQUE: usize = 4;

/// A named discrete quantity with a finite, ordered domain.
#[derive(Clone)]
pub struct Variable {
    name: Arc<str>,
    domain: Arc<[Value]>,
}

impl Variable {
    pub fn new(name: impl Into<Arc<str>>, domain: impl IntoIterator<Item = Value>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into_iter().collect(),
        }
    }

    /// A variable over `{0, 1}`.
    pub fn binary(name: impl Into<Arc<str>>) -> Self {
        Self::new(name, [0, 1])
    }

    /// A variable over `{0, 1, ..., cardinality - 1}`.
    pub fn with_cardinality(name: impl Into<Arc<str>>, cardinality: usize) -> Self {
        Self::new(name, (0..cardinality as Value).collect::<Vec<_>>())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &[Value] {
        &self.domain
    }

    pub fn cardinality(&self) -> usize {
        self.domain.len()
    }

    /// Position of `value` within the domain, used to index dense tables.
    pub fn position(&self, value: Value) -> Option<usize> {
        self.domain.iter().position(|v| *v == value)
    }

    /// Like [`position`](Self::position), failing with `ValueOutOfDomain`.
    pub fn index_of(&self, value: Value) -> Result<usize, ModelError> {
        self.position(value)
            .ok_or_else(|| ModelError::ValueOutOfDomain {
                variable: self.name().to_string(),
                value,
            })
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    // Must agree with `str`'s hash for the `Borrow<str>` lookups below.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Borrow<str> for Variable {
    fn borrow(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Variable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

/// A mapping from variables to concrete values.
///
/// Iteration follows insertion order. Equality ignores order.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    values: IndexMap<Variable, Value>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, variable: &Variable, value: Value) -> Self {
        self.values.insert(variable.clone(), value);
        self
    }

    /// Sets `variable` to `value`, returning the previous value if any.
    pub fn insert(&mut self, variable: Variable, value: Value) -> Option<Value> {
        self.values.insert(variable, value)
    }

    /// Looks up a value by variable name.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.values.get(name).copied()
    }

    /// Looks up the value of `variable`, failing with `MissingVariable`.
    pub fn value_of(&self, variable: &Variable) -> Result<Value, ModelError> {
        self.get(variable.name())
            .ok_or_else(|| ModelError::MissingVariable {
                variable: variable.name().to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, Value)> + '_ {
        self.values.iter().map(|(var, value)| (var, *value))
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.values.keys()
    }

    /// True if every entry of `evidence` is present here with the same value.
    pub fn agrees_with(&self, evidence: &Assignment) -> bool {
        evidence
            .iter()
            .all(|(var, value)| self.get(var.name()) == Some(value))
    }

    /// Restricts the assignment to `variables`, in their order.
    pub fn project<'a>(
        &self,
        variables: impl IntoIterator<Item = &'a Variable>,
    ) -> Result<Assignment, ModelError> {
        variables
            .into_iter()
            .map(|var| Ok((var.clone(), self.value_of(var)?)))
            .collect()
    }
}

impl FromIterator<(Variable, Value)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (Variable, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.values.iter()).finish()
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (var, value)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", var, value)?;
        }
        f.write_str("}")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Assignment {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (var, value) in &self.values {
            map.serialize_entry(var.name(), value)?;
        }
        map.end()
    }
}

/// An ordered tuple of variables over which one factor is defined.
///
/// Order is significant: it fixes the axis order of a dense table.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Clique(SmallVec<[Variable; INLINE_CLIQUE]>);

impl Clique {
    pub fn new(variables: impl IntoIterator<Item = Variable>) -> Self {
        Self(variables.into_iter().collect())
    }

    /// The clique with no variables; factors over it are neutral.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|v| v.name() == name)
    }

    /// Domain size of each variable, in clique order.
    pub fn shape(&self) -> SmallVec<[usize; INLINE_CLIQUE]> {
        self.0.iter().map(Variable::cardinality).collect()
    }
}

impl FromIterator<Variable> for Clique {
    fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<&[Variable]> for Clique {
    fn from(variables: &[Variable]) -> Self {
        Self::new(variables.iter().cloned())
    }
}

impl<const N: usize> From<[Variable; N]> for Clique {
    fn from(variables: [Variable; N]) -> Self {
        Self::new(variables)
    }
}

impl fmt::Debug for Clique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Clique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, var) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(var.name())?;
        }
        f.write_str(")")
    }
}
