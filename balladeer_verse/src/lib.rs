// Balladeer verse generator
//
// Produces short rhymed poems from a plain-text poetry corpus. A backward
// trigram model is trained on the corpus: for every three consecutive words
// it records which word came *before* a pair, so lines can be grown from
// their last word toward their first. Picking the last words of two lines
// from a rhyme source first, then filling each line in backward, yields
// rhymed couplets without any look-ahead.
//
// Architecture:
// - corpus.rs: Sentence splitting, tokenizing, and cleaning of raw text;
//   the bundled Blake sample corpus
// - index.rs: Backward trigram index (context -> continuation counts),
//   JSON save/load
// - rhyme.rs: Rhyme resolution against the index and second-word lookup
// - line.rs: Backward line growth with context backoff, line rendering
// - poem.rs: Pair state machine, poem rendering, parallel batch generation
// - config.rs: JSON run configuration (poem count, shape, cleaning, seed)
// - error.rs: `VerseError`
// - main.rs: `balladeer` CLI
//
// Rhymes come from the `balladeer_phonetics` crate through the
// `RhymeSource` trait, and all randomness from `balladeer_prng::VerseRng`.
// Given the same index, rhyme source, shape and seed, output is identical
// across runs and platforms.

pub mod config;
pub mod corpus;
pub mod error;
pub mod index;
pub mod line;
pub mod poem;
pub mod rhyme;

pub use config::VerseConfig;
pub use error::VerseError;
pub use index::{Sentence, TrigramIndex};
pub use poem::{Poem, PoemShape, generate_poem, generate_poem_text, generate_poems};
