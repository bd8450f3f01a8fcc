// Rhyme resolution against the trigram index.
//
// A rhyme is only useful if a line can be grown backward from it, i.e. if
// the word is a first context of the index. `find_rhyme` intersects the
// rhyme source's candidates with that set by drawing candidates without
// replacement, so it terminates after at most one probe per candidate.
//
// `find_second` picks the second word of a line seed. When the anchor word
// has no recorded second context it falls back to any first context: the
// pair may then be unrelated, which is accepted when data is sparse.

use crate::index::TrigramIndex;
use balladeer_phonetics::RhymeSource;
use balladeer_prng::VerseRng;
use std::collections::BTreeSet;

/// Find a rhyme of `word` that the index can seed a line from.
///
/// Returns the index's own copy of the matching word, or `None` when the
/// source has no candidates or none of them is a first context.
pub fn find_rhyme<'a, S: RhymeSource + ?Sized>(
    word: &str,
    index: &'a TrigramIndex,
    source: &S,
    rng: &mut VerseRng,
) -> Option<&'a str> {
    // Deduplicate so every candidate is probed at most once.
    let mut pool: Vec<String> = source
        .rhymes(word)
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    while let Some(candidate) = rng.take_random(&mut pool) {
        if let Some(found) = index.first_context(&candidate) {
            return Some(found);
        }
    }
    None
}

/// Pick the word that precedes `first` at the end of a line.
///
/// Uniform over the distinct second contexts recorded after `first`; falls
/// back to a uniform draw from all first contexts if there are none.
pub fn find_second<'a>(first: &str, index: &'a TrigramIndex, rng: &mut VerseRng) -> &'a str {
    let seconds = index.second_contexts(first);
    match rng.choose(&seconds) {
        Some(&second) => second,
        None => {
            log::debug!("no second context after '{first}'; drawing from all first contexts");
            index.random_first_context(rng)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::sentence;
    use balladeer_phonetics::RhymeTable;

    fn index() -> TrigramIndex {
        TrigramIndex::build(&[
            sentence("the old cat sat on a mat"),
            sentence("a wide hat fell near the cat"),
            sentence("i see the tree by the sea"),
        ])
        .unwrap()
    }

    #[test]
    fn test_find_rhyme_returns_indexed_candidate() {
        let index = index();
        let table = RhymeTable::from_groups(&[&["cat", "mat", "hat", "bat"]]);
        let mut rng = VerseRng::new(3);
        for _ in 0..50 {
            let found = find_rhyme("cat", &index, &table, &mut rng).unwrap();
            // "bat" is not in the corpus; "cat" itself is never a candidate.
            assert!(found == "mat" || found == "hat", "unexpected rhyme {found}");
        }
    }

    #[test]
    fn test_find_rhyme_empty_pool() {
        let index = index();
        let table = RhymeTable::new();
        let mut rng = VerseRng::new(3);
        assert_eq!(find_rhyme("cat", &index, &table, &mut rng), None);
    }

    #[test]
    fn test_find_rhyme_exhausts_pool_without_match() {
        let index = index();
        // Duplicates in the pool must not cause extra probes or a hang.
        let mut table = RhymeTable::new();
        table.insert(
            "cat",
            ["bat", "rat", "bat", "gnat", "rat"].iter().map(|w| w.to_string()).collect(),
        );
        let mut rng = VerseRng::new(11);
        assert_eq!(find_rhyme("cat", &index, &table, &mut rng), None);
    }

    #[test]
    fn test_find_rhyme_single_candidate() {
        let index = index();
        let table = RhymeTable::from_groups(&[&["sea", "tree"]]);
        let mut rng = VerseRng::new(5);
        assert_eq!(find_rhyme("tree", &index, &table, &mut rng), Some("sea"));
    }

    #[test]
    fn test_find_second_uses_recorded_contexts() {
        let index = index();
        let mut rng = VerseRng::new(17);
        // Backward, "cat" is followed by "old" and by "the".
        let mut seen = BTreeSet::new();
        for _ in 0..100 {
            seen.insert(find_second("cat", &index, &mut rng));
        }
        assert_eq!(seen.into_iter().collect::<Vec<_>>(), vec!["old", "the"]);
    }

    #[test]
    fn test_find_second_falls_back_to_first_contexts() {
        let index = index();
        let mut rng = VerseRng::new(23);
        for _ in 0..100 {
            let w = find_second("unknown", &index, &mut rng);
            assert!(index.has_context(w), "fallback '{w}' is not a first context");
        }
    }
}
