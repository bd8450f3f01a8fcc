// Phonetic rhyme source for Balladeer.
//
// Provides a pronouncing dictionary (CMU Pronouncing Dictionary format) and
// answers "which words rhyme with this one?" for the verse generator's rhyme
// resolver. The generator only sees the `RhymeSource` trait; it treats the
// returned list as an unordered candidate pool.
//
// Architecture:
// - `types.rs`: `Pronunciation`, `Stress`, rhyming-part extraction, `ParseError`
// - `table.rs`: `RhymeTable`, an explicit word -> candidates map
// - `lib.rs` (this file): `RhymeSource` trait and `PronouncingDictionary`
//
// The dictionary is parsed from text via `PronouncingDictionary::from_cmudict()`.
// `default_dictionary()` embeds `data/sample.dict` at compile time; it covers
// the vocabulary of the bundled sample corpus. Point the CLI at a full
// `cmudict.dict` for real corpora.
//
// Determinism constraint: rhyme lists come back in dictionary file order, and
// all maps are ordered, so a seeded generator draws the same candidates on
// every run.

pub mod table;
pub mod types;

pub use table::RhymeTable;
pub use types::{ParseError, Pronunciation, Stress};

use std::collections::BTreeMap;

/// Anything that can list rhymes for a word.
///
/// Implementations return every known rhyme of `word`, excluding `word`
/// itself, or an empty list when the word is unknown.
pub trait RhymeSource {
    fn rhymes(&self, word: &str) -> Vec<String>;
}

impl<T: RhymeSource + ?Sized> RhymeSource for &T {
    fn rhymes(&self, word: &str) -> Vec<String> {
        (**self).rhymes(word)
    }
}

/// A loaded pronouncing dictionary with a rhyme index.
#[derive(Debug, Clone, Default)]
pub struct PronouncingDictionary {
    /// Word -> every pronunciation listed for it, in file order.
    entries: BTreeMap<String, Vec<Pronunciation>>,
    /// Rhyme key -> words having a pronunciation with that rhyming part, in
    /// file order without repeats.
    by_rhyme: BTreeMap<String, Vec<String>>,
}

impl PronouncingDictionary {
    /// Parse a dictionary in CMU Pronouncing Dictionary format.
    ///
    /// Accepts both the classic upper-case file (`;;;` comments, `WORD(1)`
    /// alternates) and the lower-case `cmudict.dict` layout with trailing
    /// `# comment` annotations. Words are stored lowercased.
    pub fn from_cmudict(text: &str) -> Result<Self, ParseError> {
        let mut dict = PronouncingDictionary::default();

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }

            let mut fields = line.split_whitespace();
            let Some(head) = fields.next() else {
                continue;
            };
            let word = strip_variant(head).to_lowercase();
            let phones: Vec<String> = fields
                .take_while(|f| !f.starts_with('#'))
                .map(str::to_string)
                .collect();
            if phones.is_empty() {
                return Err(ParseError {
                    line: idx + 1,
                    message: format!("entry '{head}' has no phones"),
                });
            }

            dict.insert(word, Pronunciation::new(phones));
        }

        log::debug!(
            "parsed pronouncing dictionary: {} words, {} rhyme classes",
            dict.entries.len(),
            dict.by_rhyme.len()
        );
        Ok(dict)
    }

    fn insert(&mut self, word: String, pronunciation: Pronunciation) {
        let members = self.by_rhyme.entry(pronunciation.rhyme_key()).or_default();
        if !members.contains(&word) {
            members.push(word.clone());
        }
        self.entries.entry(word).or_default().push(pronunciation);
    }

    /// All pronunciations of `word`, or an empty slice if unknown.
    pub fn pronunciations(&self, word: &str) -> &[Pronunciation] {
        self.entries.get(word).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RhymeSource for PronouncingDictionary {
    /// Words sharing a rhyming part with any pronunciation of `word`.
    fn rhymes(&self, word: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for pron in self.pronunciations(word) {
            let Some(members) = self.by_rhyme.get(&pron.rhyme_key()) else {
                continue;
            };
            for candidate in members {
                if candidate != word && !out.contains(candidate) {
                    out.push(candidate.clone());
                }
            }
        }
        out
    }
}

/// Strip a CMUdict alternate-pronunciation marker: `READ(1)` -> `READ`.
fn strip_variant(head: &str) -> &str {
    match head.find('(') {
        Some(pos) if pos > 0 && head.ends_with(')') => &head[..pos],
        _ => head,
    }
}

/// Load the sample dictionary embedded at compile time.
///
/// Panics if the embedded file is malformed (should never happen in a
/// released build).
pub fn default_dictionary() -> PronouncingDictionary {
    let text = include_str!("../data/sample.dict");
    PronouncingDictionary::from_cmudict(text).expect("embedded sample.dict is malformed")
}
