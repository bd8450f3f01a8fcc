// Backward trigram frequency index.
//
// Every sentence is read right-to-left. For each position `i >= 2` the
// triple `(s[i], s[i-1], s[i-2])` is recorded: the first two tokens are the
// context and the third is the word that follows that context when reading
// backward. The model is therefore a two-level trie:
//
//     first -> second -> (next word -> count)
//
// For "the cat sat on the mat" the entries are
// (mat, the) -> on, (the, on) -> sat, (on, sat) -> cat, (sat, cat) -> the.
//
// Reading backward lets a line be grown from its final (rhyme) word toward
// its start; see `line.rs`. Repeated triples are counted, not deduplicated,
// and the counts become sampling weights.
//
// Construction goes through `TrigramIndexBuilder`, the only type with
// get-or-create access to trie nodes. `TrigramIndex` itself exposes
// read-only queries, so a built index can be shared by reference across
// threads for the lifetime of a generation session.
//
// All maps are `BTreeMap` so that iteration order, and with it every seeded
// draw, is reproducible.

use crate::error::VerseError;
use balladeer_prng::VerseRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A tokenized, normalized sentence.
pub type Sentence = Vec<String>;

/// Continuation counts keyed by second context word.
type SecondLevel = BTreeMap<String, Continuations>;

/// One backward trigram, borrowed from its sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigram<'a> {
    pub first: &'a str,
    pub second: &'a str,
    pub next: &'a str,
}

/// Extract the backward trigrams of a sentence, last position first.
///
/// Yields exactly `max(n - 2, 0)` trigrams for a sentence of length `n`.
pub fn backward_trigrams(sentence: &[String]) -> impl Iterator<Item = Trigram<'_>> {
    (2..sentence.len()).rev().map(move |i| Trigram {
        first: &sentence[i],
        second: &sentence[i - 1],
        next: &sentence[i - 2],
    })
}

/// The words recorded after one `(first, second)` context, with counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Continuations {
    counts: BTreeMap<String, u32>,
}

impl Continuations {
    /// How many times `word` followed this context.
    pub fn count(&self, word: &str) -> u32 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Total number of recorded continuations, repeats included.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    /// Number of distinct continuation words.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(w, &c)| (w.as_str(), c))
    }

    /// Draw a continuation with probability proportional to its count.
    ///
    /// A word seen k times is k times as likely as a word seen once. Returns
    /// `None` only for an empty table.
    pub fn sample(&self, rng: &mut VerseRng) -> Option<&str> {
        rng.choose_weighted(self.counts.iter().map(|(w, &c)| (w.as_str(), u64::from(c))))
    }
}

/// Accumulates trigram counts. Consumed by `build()`.
#[derive(Debug, Default)]
pub struct TrigramIndexBuilder {
    contexts: BTreeMap<String, SecondLevel>,
}

impl TrigramIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every backward trigram of `sentence`. Returns how many were added.
    pub fn add_sentence(&mut self, sentence: &[String]) -> usize {
        let mut added = 0;
        for trigram in backward_trigrams(sentence) {
            self.add_trigram(trigram);
            added += 1;
        }
        added
    }

    pub fn add_trigram(&mut self, trigram: Trigram<'_>) {
        *self
            .node(trigram.first, trigram.second)
            .counts
            .entry(trigram.next.to_string())
            .or_insert(0) += 1;
    }

    /// Get or create the continuation table for `(first, second)`.
    fn node(&mut self, first: &str, second: &str) -> &mut Continuations {
        self.contexts
            .entry(first.to_string())
            .or_default()
            .entry(second.to_string())
            .or_default()
    }

    /// Freeze the counts into a read-only index.
    ///
    /// Fails with `EmptyModel` if nothing was recorded.
    pub fn build(self) -> Result<TrigramIndex, VerseError> {
        TrigramIndex::from_contexts(self.contexts)
    }
}

/// Immutable backward trigram model.
#[derive(Debug, Clone)]
pub struct TrigramIndex {
    contexts: BTreeMap<String, SecondLevel>,
    /// Cached first-level keys: the fallback universe and seed pool.
    first_contexts: Vec<String>,
    trigram_count: u64,
}

/// On-disk layout of a saved index.
#[derive(Serialize)]
struct IndexFileRef<'a> {
    contexts: &'a BTreeMap<String, SecondLevel>,
}

#[derive(Deserialize)]
struct IndexFile {
    contexts: BTreeMap<String, SecondLevel>,
}

impl TrigramIndex {
    /// Build an index from a whole corpus.
    pub fn build(corpus: &[Sentence]) -> Result<Self, VerseError> {
        let mut builder = TrigramIndexBuilder::new();
        for sentence in corpus {
            builder.add_sentence(sentence);
        }
        builder.build()
    }

    /// Drop empty branches and zero counts, then check the index is non-empty.
    fn from_contexts(mut contexts: BTreeMap<String, SecondLevel>) -> Result<Self, VerseError> {
        for seconds in contexts.values_mut() {
            for conts in seconds.values_mut() {
                conts.counts.retain(|_, c| *c > 0);
            }
            seconds.retain(|_, conts| !conts.is_empty());
        }
        contexts.retain(|_, seconds| !seconds.is_empty());

        let trigram_count: u64 = contexts
            .values()
            .flat_map(|seconds| seconds.values())
            .map(Continuations::total)
            .sum();
        if trigram_count == 0 {
            return Err(VerseError::EmptyModel);
        }

        let first_contexts: Vec<String> = contexts.keys().cloned().collect();
        log::info!(
            "trigram index: {} trigrams, {} first contexts",
            trigram_count,
            first_contexts.len()
        );
        Ok(TrigramIndex {
            contexts,
            first_contexts,
            trigram_count,
        })
    }

    /// Whether `first` starts any recorded trigram.
    pub fn has_context(&self, first: &str) -> bool {
        self.contexts.contains_key(first)
    }

    /// Whether `(first, second)` has any recorded continuation.
    pub fn has_context_pair(&self, first: &str, second: &str) -> bool {
        self.continuations(first, second).is_some()
    }

    /// Continuations of `(first, second)`, or `None` for an unseen context.
    pub fn continuations(&self, first: &str, second: &str) -> Option<&Continuations> {
        self.contexts.get(first)?.get(second)
    }

    /// The distinct second context words recorded after `first`.
    /// Empty if `first` is not a first context.
    pub fn second_contexts(&self, first: &str) -> Vec<&str> {
        self.contexts
            .get(first)
            .map(|seconds| seconds.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Every token that starts some trigram, in sorted order.
    pub fn first_contexts(&self) -> &[String] {
        &self.first_contexts
    }

    /// Look up `word` among the first contexts, returning the index's own copy.
    pub fn first_context(&self, word: &str) -> Option<&str> {
        self.contexts.get_key_value(word).map(|(k, _)| k.as_str())
    }

    /// Uniformly draw one first context.
    pub fn random_first_context(&self, rng: &mut VerseRng) -> &str {
        // Non-empty by construction: both `build` and `from_json` reject empty models.
        let i = rng.range_usize(0, self.first_contexts.len());
        &self.first_contexts[i]
    }

    /// Total number of trigrams recorded, repeats included.
    pub fn trigram_count(&self) -> u64 {
        self.trigram_count
    }

    /// Number of distinct `(first, second)` contexts.
    pub fn context_count(&self) -> usize {
        self.contexts.values().map(BTreeMap::len).sum()
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, VerseError> {
        serde_json::to_string(&IndexFileRef {
            contexts: &self.contexts,
        })
        .map_err(|e| VerseError::Index(e.to_string()))
    }

    /// Parse an index saved by `to_json`. Rejects an empty model.
    pub fn from_json(json: &str) -> Result<Self, VerseError> {
        let file: IndexFile =
            serde_json::from_str(json).map_err(|e| VerseError::Index(e.to_string()))?;
        Self::from_contexts(file.contexts)
    }

    /// Load a saved index from a JSON file.
    pub fn load(path: &Path) -> Result<Self, VerseError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| VerseError::Index(format!("{}: {e}", path.display())))?;
        Self::from_json(&data)
    }

    /// Write the index to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), VerseError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| VerseError::Index(format!("{}: {e}", path.display())))
    }
}
