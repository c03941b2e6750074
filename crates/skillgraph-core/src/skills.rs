// crates/skillgraph-core/src/skills.rs
//
// Skill vectors: skill tag -> proficiency in [0, 1].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A sparse skill profile. Keys are unique skill tags; a missing key reads
/// as 0.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillVector(BTreeMap<String, f64>);

impl SkillVector {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Set (or replace) the value for a skill.
    pub fn set(&mut self, skill: impl Into<String>, value: f64) {
        self.0.insert(skill.into(), value);
    }

    /// Value for `skill`, or 0.0 if absent.
    pub fn get(&self, skill: &str) -> f64 {
        self.0.get(skill).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Euclidean distance over the union of both key sets.
    pub fn euclidean_distance(&self, other: &SkillVector) -> f64 {
        let keys: BTreeSet<&String> = self.0.keys().chain(other.0.keys()).collect();
        keys.into_iter()
            .map(|k| {
                let d = self.get(k) - other.get(k);
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for SkillVector {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
