// Corpus provider: raw poem text in, cleaned token sentences out.
//
// The generator core never looks at raw text. This module turns a plain-text
// poetry file into `Sentence`s of lowercase tokens:
//
// 1. `split_sentences` cuts at `.`, `!`, `?` and at blank lines (stanza
//    breaks), so title lines standing alone become their own sentence.
// 2. `tokenize` keeps maximal runs of alphanumeric characters; punctuation
//    and apostrophes split words ("shepherd's" -> "shepherd", "s").
// 3. `clean_sentence` applies the cleaning rules: title/author lines are
//    dropped whole, numbers vanish, clitics are reattached or expanded, and
//    the elided archaisms "ne'er", "o'er", "o're" are restored.
//
// `default_corpus()` embeds a small public-domain William Blake sample
// (`data/blake_sample.txt`) used by the CLI when no corpus is given, and by
// the integration tests.

use crate::index::Sentence;
use serde::{Deserialize, Serialize};

/// Corpus-specific cleaning switches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningRules {
    /// Tokens (compared case-insensitively) that mark a title or byline;
    /// any sentence containing one is dropped. All-caps words always do.
    pub title_markers: Vec<String>,
}

/// The bundled Blake sample text.
pub const SAMPLE_CORPUS: &str = include_str!("../data/blake_sample.txt");

/// Split raw text into sentence strings.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    let mut flush = |current: &mut String| {
        let trimmed = current.trim();
        if !trimmed.is_empty() {
            sentences.push(trimmed.to_string());
        }
        current.clear();
    };

    for line in text.lines() {
        if line.trim().is_empty() {
            flush(&mut current);
            continue;
        }
        for c in line.chars() {
            if matches!(c, '.' | '!' | '?') {
                flush(&mut current);
            } else {
                current.push(c);
            }
        }
        current.push(' ');
    }
    flush(&mut current);
    sentences
}

/// Split a sentence into alphanumeric tokens.
pub fn tokenize(sentence: &str) -> Vec<&str> {
    sentence
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect()
}

/// An all-caps word longer than one letter ("TYGER"), as used in titles.
fn is_shouted(token: &str) -> bool {
    token.chars().count() > 1
        && token.chars().any(char::is_uppercase)
        && !token.chars().any(char::is_lowercase)
}

/// Apply the cleaning rules to one tokenized sentence.
///
/// Returns `None` if the sentence is a title line or nothing survives.
pub fn clean_sentence(raw: &[&str], rules: &CleaningRules) -> Option<Sentence> {
    let mut out: Sentence = Vec::new();

    for &token in raw {
        if is_shouted(token) || rules.title_markers.iter().any(|m| m.eq_ignore_ascii_case(token)) {
            return None;
        }
        if token.chars().all(char::is_numeric) {
            continue;
        }

        let word = token.to_lowercase();
        match word.as_str() {
            // Possessive or past-tense clitic split off by the tokenizer.
            "s" | "d" => {
                if let Some(prev) = out.last_mut() {
                    prev.push('\'');
                    prev.push_str(&word);
                }
            }
            "ve" => out.push("have".to_string()),
            "ll" => out.push("will".to_string()),
            "er" | "re" => {
                let restored = match (out.last().map(String::as_str), word.as_str()) {
                    (Some("ne"), "er") => Some("never"),
                    (Some("o"), _) => Some("over"),
                    _ => None,
                };
                if let (Some(restored), Some(prev)) = (restored, out.last_mut()) {
                    *prev = restored.to_string();
                }
            }
            _ => out.push(word),
        }
    }

    if out.is_empty() { None } else { Some(out) }
}

/// Split, tokenize and clean a whole text.
pub fn load_corpus(text: &str, rules: &CleaningRules) -> Vec<Sentence> {
    let sentences: Vec<Sentence> = split_sentences(text)
        .iter()
        .filter_map(|s| clean_sentence(&tokenize(s), rules))
        .collect();
    log::debug!("loaded corpus: {} sentences", sentences.len());
    sentences
}

/// The bundled Blake sample, cleaned. The byline "William Blake" is treated
/// as a title marker.
pub fn default_corpus() -> Vec<Sentence> {
    let rules = CleaningRules {
        title_markers: vec!["Blake".to_string()],
    };
    load_corpus(SAMPLE_CORPUS, &rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(text: &str) -> Option<Sentence> {
        clean_sentence(&tokenize(text), &CleaningRules::default())
    }

    #[test]
    fn test_split_on_terminators_and_blank_lines() {
        let text = "Little Lamb, who made thee?\nDost thou know who made thee?\n\nTHE TYGER\n\nTyger Tyger, burning bright,\nIn the forests of the night;";
        let sentences = split_sentences(text);
        assert_eq!(
            sentences,
            vec![
                "Little Lamb, who made thee",
                "Dost thou know who made thee",
                "THE TYGER",
                "Tyger Tyger, burning bright, In the forests of the night;",
            ]
        );
    }

    #[test]
    fn test_tokenize_drops_punctuation() {
        assert_eq!(
            tokenize("\"Pipe a song about a Lamb!\""),
            vec!["Pipe", "a", "song", "about", "a", "Lamb"]
        );
        assert_eq!(tokenize("water'd"), vec!["water", "d"]);
    }

    #[test]
    fn test_lowercases() {
        assert_eq!(clean("Little Lamb who made thee").unwrap(), ["little", "lamb", "who", "made", "thee"]);
    }

    #[test]
    fn test_title_line_dropped() {
        assert_eq!(clean("THE SICK ROSE"), None);
        assert_eq!(clean("A POISON TREE"), None);
        // A lone capital "I" or "O" is not a title.
        assert!(clean("O Rose thou art sick").is_some());
    }

    #[test]
    fn test_title_markers() {
        let rules = CleaningRules {
            title_markers: vec!["Blake".to_string()],
        };
        assert_eq!(clean_sentence(&tokenize("William Blake, 1794"), &rules), None);
        assert!(clean("William Blake").is_some());
    }

    #[test]
    fn test_numbers_skipped() {
        assert_eq!(clean("Songs of 1789 and more").unwrap(), ["songs", "of", "and", "more"]);
        assert_eq!(clean("1794"), None);
    }

    #[test]
    fn test_clitics_reattached() {
        assert_eq!(clean("And water'd heaven").unwrap(), ["and", "water'd", "heaven"]);
        assert_eq!(clean("the shepherd's song").unwrap(), ["the", "shepherd's", "song"]);
        // Nothing to attach to: the stray clitic is dropped.
        assert_eq!(clean("'s cold").unwrap(), ["cold"]);
    }

    #[test]
    fn test_contractions_expanded() {
        assert_eq!(clean("I'll tell thee").unwrap(), ["i", "will", "tell", "thee"]);
        assert_eq!(clean("we've sung").unwrap(), ["we", "have", "sung"]);
    }

    #[test]
    fn test_archaisms_restored() {
        assert_eq!(clean("o'er the mead").unwrap(), ["over", "the", "mead"]);
        assert_eq!(clean("o're the hill").unwrap(), ["over", "the", "hill"]);
        assert_eq!(clean("ne'er to rise").unwrap(), ["never", "to", "rise"]);
        // Stray elision after an unrelated word is dropped.
        assert_eq!(clean("the er road").unwrap(), ["the", "road"]);
    }

    #[test]
    fn test_default_corpus() {
        let corpus = default_corpus();
        assert!(corpus.len() > 30, "expected >30 sentences, got {}", corpus.len());
        for sentence in &corpus {
            for word in sentence {
                assert_eq!(word, &word.to_lowercase());
                assert_ne!(word, "blake");
            }
        }
        assert!(corpus.iter().any(|s| s.iter().any(|w| w == "over")));
        assert!(corpus.iter().any(|s| s.iter().any(|w| w == "water'd")));
        assert!(!corpus.iter().any(|s| s.iter().any(|w| w == "innocence")));
    }
}
