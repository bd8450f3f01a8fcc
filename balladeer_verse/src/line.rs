// Backward line generation.
//
// A line is grown from its last word toward its first. The two seed words
// (the line-final rhyme word and the word before it) form the first
// context; each step samples the next word to the left from the trigram
// index and slides the context one word along:
//
//     [bright, burning] -> tyger -> tyger      =>  "Tyger tyger burning bright"
//
// When a context was never seen, `extend_line` backs off to `find_second`
// on the newer context word alone. The result may read less naturally, but
// the line always reaches its target length; this trade-off is intended.

use crate::error::VerseError;
use crate::index::TrigramIndex;
use crate::rhyme::find_second;
use balladeer_prng::VerseRng;
use std::fmt;

/// A finished line in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    words: Vec<String>,
}

impl Line {
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The line-final word, which carries the rhyme.
    pub fn last_word(&self) -> Option<&str> {
        self.words.last().map(String::as_str)
    }

    /// Space-joined with the first word capitalized. No trailing newline.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, word) in self.words.iter().enumerate() {
            if i == 0 {
                out.push_str(&capitalize(word));
            } else {
                out.push(' ');
                out.push_str(word);
            }
        }
        out
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Append one word to a reversed line and return the new rolling context.
///
/// `line` holds words in reverse reading order. Samples a continuation of
/// `(first, second)` weighted by frequency; an unseen context backs off to
/// `find_second(second)`. Either way the new context is `(second, word)`.
pub fn extend_line<'a>(
    line: &mut Vec<&'a str>,
    first: &str,
    second: &'a str,
    index: &'a TrigramIndex,
    rng: &mut VerseRng,
) -> (&'a str, &'a str) {
    let sampled = match index.continuations(first, second) {
        Some(conts) => conts.sample(rng),
        None => None,
    };
    let word = match sampled {
        Some(word) => word,
        None => {
            log::debug!("unseen context ({first}, {second}); backing off on '{second}'");
            find_second(second, index, rng)
        }
    };
    line.push(word);
    (second, word)
}

/// Grow a line of exactly `target_words` words ending in `seed_first`.
///
/// `seed_first` is the line's last word and `seed_second` the one before it.
pub fn build_line<'a>(
    seed_first: &'a str,
    seed_second: &'a str,
    target_words: usize,
    index: &'a TrigramIndex,
    rng: &mut VerseRng,
) -> Result<Line, VerseError> {
    if target_words < 2 {
        return Err(VerseError::InvalidLineLength {
            words_per_line: target_words,
        });
    }

    let mut reversed: Vec<&'a str> = Vec::with_capacity(target_words);
    reversed.push(seed_first);
    reversed.push(seed_second);

    let (mut first, mut second) = (seed_first, seed_second);
    while reversed.len() < target_words {
        (first, second) = extend_line(&mut reversed, first, second, index, rng);
    }

    Ok(Line {
        words: reversed.into_iter().rev().map(str::to_string).collect(),
    })
}

/// Capitalize the first character of a string.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => {
            let upper: String = c.to_uppercase().collect();
            format!("{}{}", upper, chars.as_str())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::sentence;

    fn tyger_index() -> TrigramIndex {
        TrigramIndex::build(&[
            sentence("tyger tyger burning bright"),
            sentence("in the forests of the night"),
        ])
        .unwrap()
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("tyger"), "Tyger");
        assert_eq!(capitalize("o'er"), "O'er");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("émile"), "Émile");
    }

    #[test]
    fn test_follows_the_only_path() {
        let index = tyger_index();
        let mut rng = VerseRng::new(1);
        let line = build_line("bright", "burning", 4, &index, &mut rng).unwrap();
        assert_eq!(line.words(), ["tyger", "tyger", "burning", "bright"]);
        assert_eq!(line.render(), "Tyger tyger burning bright");
        assert_eq!(line.last_word(), Some("bright"));
    }

    #[test]
    fn test_extend_line_returns_rolling_context() {
        let index = tyger_index();
        let mut rng = VerseRng::new(1);
        let mut reversed = vec!["night", "the"];
        let ctx = extend_line(&mut reversed, "night", "the", &index, &mut rng);
        assert_eq!(ctx, ("the", "of"));
        assert_eq!(reversed, ["night", "the", "of"]);
    }

    #[test]
    fn test_unseen_context_backs_off() {
        let index = tyger_index();
        let mut rng = VerseRng::new(9);
        let mut reversed = vec!["bright", "night"];
        let (first, word) = extend_line(&mut reversed, "bright", "night", &index, &mut rng);
        assert_eq!(first, "night");
        // "night" starts a trigram with second context "the" only.
        assert_eq!(word, "the");
        assert_eq!(reversed.len(), 3);
    }

    #[test]
    fn test_line_length_invariant() {
        let index = tyger_index();
        for k in 2..12 {
            for seed in 0..20 {
                let mut rng = VerseRng::new(seed);
                // An unrelated seed pair forces fallback on the first step.
                let line = build_line("night", "tyger", k, &index, &mut rng).unwrap();
                assert_eq!(line.len(), k, "seed {seed}");
                assert_eq!(line.last_word(), Some("night"));
            }
        }
    }

    #[test]
    fn test_two_word_line_is_just_the_seed() {
        let index = tyger_index();
        let mut rng = VerseRng::new(0);
        let line = build_line("bright", "burning", 2, &index, &mut rng).unwrap();
        assert_eq!(line.words(), ["burning", "bright"]);
    }

    #[test]
    fn test_too_short_is_rejected() {
        let index = tyger_index();
        let mut rng = VerseRng::new(0);
        for k in [0, 1] {
            assert_eq!(
                build_line("bright", "burning", k, &index, &mut rng).unwrap_err(),
                VerseError::InvalidLineLength { words_per_line: k }
            );
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let index = tyger_index();
        let mut rng = VerseRng::new(4);
        let line = build_line("night", "the", 6, &index, &mut rng).unwrap();
        assert_eq!(line.render(), line.render());
        assert_eq!(line.to_string(), line.render());
    }
}
