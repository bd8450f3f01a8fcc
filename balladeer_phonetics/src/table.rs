// Explicit rhyme table: a hand-written `word -> candidates` map.
//
// Stands in for a full pronouncing dictionary when the rhyme sets are known
// up front, e.g. a curated list for a themed corpus or a fixture in tests.
// Serialized as a plain JSON object (`{"cat": ["mat", "hat"]}`).

use crate::RhymeSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RhymeTable {
    rhymes: BTreeMap<String, Vec<String>>,
}

impl RhymeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from a JSON object of word -> candidate list.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Build a table where every word of each group rhymes with every other
    /// word of the same group.
    pub fn from_groups(groups: &[&[&str]]) -> Self {
        let mut table = RhymeTable::new();
        for group in groups {
            for &word in group.iter() {
                let others = group
                    .iter()
                    .filter(|&&other| other != word)
                    .map(|other| other.to_string());
                table
                    .rhymes
                    .entry(word.to_string())
                    .or_default()
                    .extend(others);
            }
        }
        table
    }

    /// Set the candidate list for one word, replacing any previous entry.
    pub fn insert(&mut self, word: &str, candidates: Vec<String>) {
        self.rhymes.insert(word.to_string(), candidates);
    }

    pub fn len(&self) -> usize {
        self.rhymes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rhymes.is_empty()
    }
}

impl RhymeSource for RhymeTable {
    fn rhymes(&self, word: &str) -> Vec<String> {
        self.rhymes.get(word).cloned().unwrap_or_default()
    }
}
