// Error taxonomy for index construction and poem generation.
//
// Unseen trigram contexts are deliberately absent from this list: line
// extension and second-word lookup back off to a looser choice instead of
// failing (see `line.rs` and `rhyme.rs`). Every variant here is call-scoped;
// the index is never mutated by generation, so a failed poem leaves no
// partial state behind.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerseError {
    /// The corpus (or a loaded index file) contains no trigrams.
    EmptyModel,
    /// A line must hold at least the two seed words.
    InvalidLineLength { words_per_line: usize },
    /// A poem must have at least one line.
    InvalidLineCount,
    /// No rhyming seed pair was found within the retry ceiling.
    RhymeUnsatisfiable { attempts: usize },
    /// A configuration file could not be parsed.
    Config(String),
    /// A saved index file could not be parsed or written.
    Index(String),
}

impl fmt::Display for VerseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerseError::EmptyModel => {
                write!(f, "corpus produced no trigrams; need sentences of 3+ words")
            }
            VerseError::InvalidLineLength { words_per_line } => {
                write!(f, "words per line must be at least 2, got {words_per_line}")
            }
            VerseError::InvalidLineCount => write!(f, "a poem needs at least one line"),
            VerseError::RhymeUnsatisfiable { attempts } => {
                write!(f, "no rhyming word pair found after {attempts} attempts")
            }
            VerseError::Config(msg) => write!(f, "invalid config: {msg}"),
            VerseError::Index(msg) => write!(f, "invalid trigram index: {msg}"),
        }
    }
}

impl std::error::Error for VerseError {}
