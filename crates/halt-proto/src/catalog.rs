use serde::{Deserialize, Serialize};

use crate::PredicateKind;

/// One legal predicate name published by the engine.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredicateMapping {
    pub name: String,
    pub kind: PredicateKind,
}

impl PredicateMapping {
    pub fn new(name: impl Into<String>, kind: PredicateKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// The catalog of predicate names the engine understands.
///
/// Lookups are first-match-by-name, so a duplicated name resolves to its
/// earliest entry.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct PredicateCatalog {
    mappings: Vec<PredicateMapping>,
}

impl PredicateCatalog {
    pub fn new(mappings: Vec<PredicateMapping>) -> Self {
        Self { mappings }
    }

    /// Predicates understood by the reference engine.
    pub fn builtin() -> Self {
        [
            ("EVENT_SELECTED", PredicateKind::Flat),
            ("EVENT_REQUESTED", PredicateKind::Flat),
            ("EVENT_BLOCKED", PredicateKind::Flat),
            ("EVENT_NUMBER", PredicateKind::Flat),
            ("AND", PredicateKind::Compound),
            ("OR", PredicateKind::Compound),
        ]
        .into_iter()
        .map(|(name, kind)| PredicateMapping::new(name, kind))
        .collect()
    }

    /// Kind of the predicate called `name`, or `None` while the name is not a
    /// legal predicate (yet).
    pub fn kind_of(&self, name: &str) -> Option<PredicateKind> {
        self.mappings
            .iter()
            .find(|mapping| mapping.name == name)
            .map(|mapping| mapping.kind)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kind_of(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PredicateMapping> {
        self.mappings.iter()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl FromIterator<PredicateMapping> for PredicateCatalog {
    fn from_iter<I: IntoIterator<Item = PredicateMapping>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
