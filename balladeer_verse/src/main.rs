// Balladeer CLI: batch-generate rhymed poems.
//
// Pipeline: load config → build (or load) the trigram index → load the
// pronouncing dictionary → derive one seed per poem → generate in parallel →
// print each poem followed by a blank line.
//
// Usage:
//   cargo run -p balladeer_verse -- [--corpus PATH] [--dict PATH]
//     [--config PATH] [--poems N] [--lines N] [--words N] [--seed N]
//     [--save-index PATH] [--load-index PATH]
//
// Without --corpus the bundled Blake sample is used; without --dict the
// bundled sample dictionary. Set RUST_LOG=info (or debug) for progress.

use anyhow::{Context, Result, bail};
use balladeer_phonetics::{PronouncingDictionary, default_dictionary};
use balladeer_prng::VerseRng;
use balladeer_verse::config::VerseConfig;
use balladeer_verse::corpus::{default_corpus, load_corpus};
use balladeer_verse::error::VerseError;
use balladeer_verse::index::TrigramIndex;
use balladeer_verse::poem::generate_poems;
use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(name = "balladeer", version, about = "Rhymed verse from a backward trigram model")]
struct Args {
    /// Plain-text poetry corpus (defaults to the bundled Blake sample)
    #[arg(long, value_name = "PATH")]
    corpus: Option<PathBuf>,

    /// Pronouncing dictionary in CMUdict format
    #[arg(long, value_name = "PATH")]
    dict: Option<PathBuf>,

    /// JSON config file; flags below override its values
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of poems to print
    #[arg(long, value_name = "N")]
    poems: Option<usize>,

    /// Lines per poem
    #[arg(long, value_name = "N")]
    lines: Option<usize>,

    /// Words per line
    #[arg(long, value_name = "N")]
    words: Option<usize>,

    /// Base seed; omit for a clock-derived seed
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Write the trained index as JSON
    #[arg(long, value_name = "PATH")]
    save_index: Option<PathBuf>,

    /// Load a previously saved index instead of training one
    #[arg(long, value_name = "PATH", conflicts_with = "corpus")]
    load_index: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => VerseConfig::load(path)?,
        None => VerseConfig::default(),
    };
    if let Some(poems) = args.poems {
        config.poems = poems;
    }
    if let Some(lines) = args.lines {
        config.shape.lines = lines;
    }
    if let Some(words) = args.words {
        config.shape.words_per_line = words;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.shape.validate()?;

    let index = match &args.load_index {
        Some(path) => TrigramIndex::load(path)?,
        None => {
            let sentences = match &args.corpus {
                Some(path) => {
                    let text = std::fs::read_to_string(path)
                        .with_context(|| format!("reading corpus {}", path.display()))?;
                    load_corpus(&text, &config.cleaning)
                }
                None => default_corpus(),
            };
            TrigramIndex::build(&sentences)?
        }
    };
    if let Some(path) = &args.save_index {
        index.save(path)?;
        log::info!("saved index to {}", path.display());
    }

    let dictionary = match &args.dict {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading dictionary {}", path.display()))?;
            PronouncingDictionary::from_cmudict(&text)
                .with_context(|| format!("parsing dictionary {}", path.display()))?
        }
        None => default_dictionary(),
    };
    log::info!("dictionary: {} words", dictionary.len());

    let base_seed = config.seed.unwrap_or_else(clock_seed);
    log::info!("base seed {base_seed}");
    let mut seeder = VerseRng::new(base_seed);
    let seeds: Vec<u64> = (0..config.poems).map(|_| seeder.next_u64()).collect();

    let mut printed = 0;
    for (i, result) in generate_poems(&index, &dictionary, &config.shape, &seeds)
        .into_iter()
        .enumerate()
    {
        match result {
            Ok(poem) => {
                println!("{poem}");
                printed += 1;
            }
            Err(e @ VerseError::RhymeUnsatisfiable { .. }) => {
                eprintln!("poem {}: {e}", i + 1);
            }
            Err(e) => return Err(e.into()),
        }
    }

    if printed == 0 && config.poems > 0 {
        bail!("no poems could be generated; is the dictionary missing the corpus vocabulary?");
    }
    Ok(())
}

/// Seed from the wall clock when none is given.
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
