//! Scheduling requirements: label key → admissible values.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A mapping from label key to the set of values a node may carry for it.
///
/// An empty value set means "no admissible value", not "any value". This
/// is what a machine type with no offerings produces for its zone and
/// capacity-type keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Requirements(BTreeMap<String, BTreeSet<String>>);

impl Requirements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to exactly the given values, replacing anything present.
    pub fn insert<I, V>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.0
            .insert(key.into(), values.into_iter().map(Into::into).collect());
    }

    /// Set `key` to a single value.
    pub fn insert_single(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key, [value.into()]);
    }

    /// Merge `other` into `self`, taking the union of values per key.
    pub fn add(&mut self, other: Requirements) {
        for (key, values) in other.0 {
            self.0.entry(key).or_default().extend(values);
        }
    }

    pub fn get(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.0.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Whether `value` is admissible for `key`. Unknown keys admit nothing.
    pub fn allows(&self, key: &str, value: &str) -> bool {
        self.0.get(key).is_some_and(|values| values.contains(value))
    }

    /// The value of a single-valued key.
    pub fn single(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(values) if values.len() == 1 => values.iter().next().map(String::as_str),
            _ => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
