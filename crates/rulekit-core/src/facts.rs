//! Fact namespace
//!
//! A [`Facts`] value is the mutable working memory rules are evaluated
//! against. Facts are unique by name: putting a fact whose name is already
//! present replaces the previous one.

use std::any::Any;
use std::collections::hash_set;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::{require_name, Result};
use crate::fact::{Fact, FactRef, FactValue};

const BLANK_NAME: &str = "fact name must not be blank";

/// A set of facts with unique names.
///
/// Iteration order is unspecified.
#[derive(Debug, Clone, Default)]
pub struct Facts {
    facts: HashSet<Fact>,
}

impl Facts {
    /// Create an empty namespace
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fact, replacing any fact with the same name
    pub fn put<T: FactValue>(&mut self, name: impl Into<String>, value: T) -> Result<()> {
        self.add(Fact::new(name, value)?);
        Ok(())
    }

    /// Add a pre-built fact, replacing any fact with the same name.
    ///
    /// Returns the replaced fact, if there was one.
    pub fn add(&mut self, fact: Fact) -> Option<Fact> {
        self.facts.replace(fact)
    }

    /// Remove a fact by name. Returns the removed fact, if any.
    pub fn remove(&mut self, name: &str) -> Result<Option<Fact>> {
        require_name(name, BLANK_NAME)?;
        Ok(self.facts.take(name))
    }

    /// Remove a fact. Only the fact's name is considered.
    pub fn remove_fact(&mut self, fact: &Fact) -> Option<Fact> {
        self.facts.take(fact.name())
    }

    /// Get the value of a fact downcast to `T`.
    ///
    /// Returns `None` both when no fact has this name and when the stored
    /// value is not a `T`.
    pub fn get<T: Any>(&self, name: &str) -> Result<Option<&T>> {
        require_name(name, BLANK_NAME)?;
        Ok(self.facts.get(name).and_then(|fact| fact.value_as::<T>()))
    }

    /// Get a fact by name
    pub fn get_fact(&self, name: &str) -> Result<Option<&Fact>> {
        require_name(name, BLANK_NAME)?;
        Ok(self.facts.get(name))
    }

    /// Whether a fact with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.facts.contains(name)
    }

    /// Snapshot of the current facts as a map.
    ///
    /// The map is detached from the namespace: inserting into or removing
    /// from it has no effect on `self`.
    pub fn as_map(&self) -> HashMap<String, FactRef> {
        self.facts
            .iter()
            .map(|fact| (fact.name().to_string(), fact.shared_value()))
            .collect()
    }

    /// Iterate over the current facts
    pub fn iter(&self) -> hash_set::Iter<'_, Fact> {
        self.facts.iter()
    }

    /// Number of facts
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Whether the namespace is empty
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Remove all facts
    pub fn clear(&mut self) {
        self.facts.clear();
    }
}

impl<'a> IntoIterator for &'a Facts {
    type Item = &'a Fact;
    type IntoIter = hash_set::Iter<'a, Fact>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<Fact> for Facts {
    fn extend<I: IntoIterator<Item = Fact>>(&mut self, iter: I) {
        for fact in iter {
            self.add(fact);
        }
    }
}

impl FromIterator<Fact> for Facts {
    fn from_iter<I: IntoIterator<Item = Fact>>(iter: I) -> Self {
        let mut facts = Facts::new();
        facts.extend(iter);
        facts
    }
}

impl fmt::Display for Facts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (index, fact) in self.facts.iter().enumerate() {
            if index > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", fact)?;
        }
        write!(f, "]")
    }
}
