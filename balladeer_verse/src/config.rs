// Data-driven generator configuration.
//
// Everything tunable about a run lives in `VerseConfig`, loaded from JSON.
// Every field has a default (`#[serde(default)]`), so a config file only
// needs the keys it changes:
//
//     { "poems": 5, "shape": { "lines": 6, "words_per_line": 5 } }
//
// CLI flags override individual fields after loading; see `main.rs`.

use crate::corpus::CleaningRules;
use crate::error::VerseError;
use crate::poem::PoemShape;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerseConfig {
    /// How many poems the CLI prints per run.
    pub poems: usize,
    /// Line count, words per line, and the rhyme retry ceiling.
    pub shape: PoemShape,
    /// Cleaning rules applied to a user-supplied corpus file.
    pub cleaning: CleaningRules,
    /// Base seed for the run. `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for VerseConfig {
    fn default() -> Self {
        VerseConfig {
            poems: 20,
            shape: PoemShape::default(),
            cleaning: CleaningRules::default(),
            seed: None,
        }
    }
}

impl VerseConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, VerseError> {
        serde_json::from_str(json).map_err(|e| VerseError::Config(e.to_string()))
    }

    /// Load a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self, VerseError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| VerseError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&data)
    }

    pub fn to_json_pretty(&self) -> Result<String, VerseError> {
        serde_json::to_string_pretty(self).map_err(|e| VerseError::Config(e.to_string()))
    }
}
