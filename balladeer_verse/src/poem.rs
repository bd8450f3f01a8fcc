// Poem assembly: rhymed line pairs, rendering, and batch generation.
//
// Lines come in consecutive pairs. Each pair is driven by a small state
// machine:
//
//   SeekRhymeSeed      draw w1 from the first contexts and ask the rhyme
//                      resolver for an indexed rhyme w2; retry with a new w1
//                      up to `max_rhyme_attempts` times.
//   BuildFirstOfPair   grow a line backward from (w1, find_second(w1)).
//   BuildSecondOfPair  grow a line backward from (w2, find_second(w2)).
//
// Both lines of a pair therefore end, in reading order, on w1 and w2. With an
// odd line count the last line is the first half of a pair whose partner is
// never built.
//
// The retry ceiling bounds the one loop that has no natural end: a corpus
// where no first context has an indexed rhyme would otherwise spin forever.
//
// `generate_poems` runs several poems in parallel with rayon. The index is
// only read, and each poem owns its `VerseRng`, so no locking is needed and
// the output is identical to generating the same seeds one by one.

use crate::error::VerseError;
use crate::index::TrigramIndex;
use crate::line::{Line, build_line};
use crate::rhyme::{find_rhyme, find_second};
use balladeer_phonetics::RhymeSource;
use balladeer_prng::VerseRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Requested poem dimensions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoemShape {
    /// Total number of lines (>= 1).
    pub lines: usize,
    /// Words in every line (>= 2).
    pub words_per_line: usize,
    /// Ceiling on rhyme seed attempts per pair before giving up.
    pub max_rhyme_attempts: usize,
}

impl Default for PoemShape {
    fn default() -> Self {
        PoemShape {
            lines: 4,
            words_per_line: 7,
            max_rhyme_attempts: 1000,
        }
    }
}

impl PoemShape {
    pub fn new(lines: usize, words_per_line: usize) -> Self {
        PoemShape {
            lines,
            words_per_line,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), VerseError> {
        if self.words_per_line < 2 {
            return Err(VerseError::InvalidLineLength {
                words_per_line: self.words_per_line,
            });
        }
        if self.lines == 0 {
            return Err(VerseError::InvalidLineCount);
        }
        Ok(())
    }
}

/// A generated poem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poem {
    lines: Vec<Line>,
}

impl Poem {
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// One rendered line per `\n`-terminated row.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.render());
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Poem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

enum PairState<'a> {
    SeekRhymeSeed,
    BuildFirstOfPair { w1: &'a str, w2: &'a str },
    BuildSecondOfPair { w2: &'a str },
}

/// Find a first context `w1` with an indexed rhyme `w2`.
pub fn seek_rhyme_seed<'a, S: RhymeSource + ?Sized>(
    index: &'a TrigramIndex,
    source: &S,
    max_attempts: usize,
    rng: &mut VerseRng,
) -> Result<(&'a str, &'a str), VerseError> {
    for _ in 0..max_attempts {
        let w1 = index.random_first_context(rng);
        if let Some(w2) = find_rhyme(w1, index, source, rng) {
            return Ok((w1, w2));
        }
    }
    log::warn!("no rhyme seed after {max_attempts} attempts");
    Err(VerseError::RhymeUnsatisfiable {
        attempts: max_attempts,
    })
}

fn build_anchored_line(
    anchor: &str,
    words_per_line: usize,
    index: &TrigramIndex,
    rng: &mut VerseRng,
) -> Result<Line, VerseError> {
    let second = find_second(anchor, index, rng);
    build_line(anchor, second, words_per_line, index, rng)
}

/// Generate a poem of `shape.lines` lines rhymed in consecutive pairs.
pub fn generate_poem<S: RhymeSource + ?Sized>(
    index: &TrigramIndex,
    source: &S,
    shape: &PoemShape,
    rng: &mut VerseRng,
) -> Result<Poem, VerseError> {
    shape.validate()?;

    let mut lines = Vec::with_capacity(shape.lines);
    let mut state = PairState::SeekRhymeSeed;
    while lines.len() < shape.lines {
        state = match state {
            PairState::SeekRhymeSeed => {
                let (w1, w2) = seek_rhyme_seed(index, source, shape.max_rhyme_attempts, rng)?;
                log::debug!("pair {}: '{w1}' / '{w2}'", lines.len() / 2);
                PairState::BuildFirstOfPair { w1, w2 }
            }
            PairState::BuildFirstOfPair { w1, w2 } => {
                lines.push(build_anchored_line(w1, shape.words_per_line, index, rng)?);
                PairState::BuildSecondOfPair { w2 }
            }
            PairState::BuildSecondOfPair { w2 } => {
                lines.push(build_anchored_line(w2, shape.words_per_line, index, rng)?);
                PairState::SeekRhymeSeed
            }
        };
    }

    Ok(Poem { lines })
}

/// Generate and render a poem in one step.
pub fn generate_poem_text<S: RhymeSource + ?Sized>(
    index: &TrigramIndex,
    source: &S,
    shape: &PoemShape,
    rng: &mut VerseRng,
) -> Result<String, VerseError> {
    generate_poem(index, source, shape, rng).map(|poem| poem.render())
}

/// Generate one poem per seed in parallel. Results keep the order of `seeds`.
pub fn generate_poems<S: RhymeSource + Sync + ?Sized>(
    index: &TrigramIndex,
    source: &S,
    shape: &PoemShape,
    seeds: &[u64],
) -> Vec<Result<Poem, VerseError>> {
    seeds
        .par_iter()
        .map(|&seed| {
            let mut rng = VerseRng::new(seed);
            generate_poem(index, source, shape, &mut rng)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::sentence;
    use balladeer_phonetics::RhymeTable;

    fn index() -> TrigramIndex {
        TrigramIndex::build(&[
            sentence("the old cat sat upon the mat"),
            sentence("a wide hat fell near the cat"),
            sentence("she wore the hat"),
            sentence("i see the tree beside the sea"),
            sentence("the wind bends the tree"),
        ])
        .unwrap()
    }

    fn table() -> RhymeTable {
        RhymeTable::from_groups(&[&["cat", "mat", "hat"], &["tree", "sea", "see"]])
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            PoemShape::new(4, 1).validate(),
            Err(VerseError::InvalidLineLength { words_per_line: 1 })
        );
        assert_eq!(PoemShape::new(0, 5).validate(), Err(VerseError::InvalidLineCount));
        assert_eq!(PoemShape::new(1, 2).validate(), Ok(()));
    }

    #[test]
    fn test_invalid_line_length_surfaces() {
        let index = index();
        let mut rng = VerseRng::new(1);
        let err = generate_poem_text(&index, &table(), &PoemShape::new(4, 1), &mut rng).unwrap_err();
        assert_eq!(err, VerseError::InvalidLineLength { words_per_line: 1 });
    }

    #[test]
    fn test_shape_and_pair_rhymes() {
        let index = index();
        let table = table();
        for seed in 0..30 {
            let mut rng = VerseRng::new(seed);
            let poem = generate_poem(&index, &table, &PoemShape::new(6, 5), &mut rng).unwrap();
            assert_eq!(poem.lines().len(), 6);
            for line in poem.lines() {
                assert_eq!(line.len(), 5);
            }
            for pair in poem.lines().chunks(2) {
                let a = pair[0].last_word().unwrap();
                let b = pair[1].last_word().unwrap();
                assert!(
                    table.rhymes(a).iter().any(|r| r == b),
                    "seed {seed}: '{a}' and '{b}' do not rhyme"
                );
            }
        }
    }

    #[test]
    fn test_odd_line_count() {
        let index = index();
        let mut rng = VerseRng::new(12);
        let poem = generate_poem(&index, &table(), &PoemShape::new(3, 4), &mut rng).unwrap();
        assert_eq!(poem.lines().len(), 3);
        assert_eq!(poem.render().lines().count(), 3);
    }

    #[test]
    fn test_no_rhymes_is_unsatisfiable() {
        let index = index();
        let mut rng = VerseRng::new(2);
        let shape = PoemShape {
            max_rhyme_attempts: 25,
            ..PoemShape::new(2, 4)
        };
        let err = generate_poem(&index, &RhymeTable::new(), &shape, &mut rng).unwrap_err();
        assert_eq!(err, VerseError::RhymeUnsatisfiable { attempts: 25 });
    }

    #[test]
    fn test_same_seed_same_poem() {
        let index = index();
        let table = table();
        let shape = PoemShape::new(4, 6);
        let a = generate_poem_text(&index, &table, &shape, &mut VerseRng::new(77)).unwrap();
        let b = generate_poem_text(&index, &table, &shape, &mut VerseRng::new(77)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_render_format() {
        let index = index();
        let mut rng = VerseRng::new(5);
        let poem = generate_poem(&index, &table(), &PoemShape::new(2, 3), &mut rng).unwrap();
        let text = poem.render();
        assert!(text.ends_with('\n'));
        assert_eq!(text, poem.render());
        assert_eq!(text, poem.to_string());
        for row in text.lines() {
            assert_eq!(row.split(' ').count(), 3);
            assert!(row.starts_with(|c: char| c.is_uppercase()), "row '{row}' not capitalized");
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let index = index();
        let table = table();
        let shape = PoemShape::new(4, 5);
        let seeds: Vec<u64> = (100..116).collect();
        let parallel = generate_poems(&index, &table, &shape, &seeds);
        assert_eq!(parallel.len(), seeds.len());
        for (&seed, result) in seeds.iter().zip(parallel) {
            let expected = generate_poem(&index, &table, &shape, &mut VerseRng::new(seed));
            assert_eq!(result, expected);
        }
    }
}
