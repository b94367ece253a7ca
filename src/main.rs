//! wordlevel: normalize a text corpus, train a word-level vocabulary.

mod corpus;
mod normalize;
mod vocab;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::{debug, info};

use crate::corpus::Corpus;
use crate::normalize::Normalizer;
use crate::vocab::{VocabBuilder, Vocabulary};

const DEFAULT_VOCAB_PATH: &str = "vocab.json";

#[derive(Parser)]
#[command(name = "wordlevel")]
#[command(about = "Normalize a text corpus and train a word-level vocabulary")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize corpus files and train a vocabulary (saves to file).
    Train {
        /// Corpus files, one document per line, read in the order given.
        #[arg(long, short, num_args = 1.., required = true)]
        input: Vec<PathBuf>,

        /// Output vocabulary file path.
        #[arg(long, short, default_value = DEFAULT_VOCAB_PATH)]
        output: PathBuf,

        /// Max vocabulary size, unknown token included.
        #[arg(long, default_value_t = vocab::DEFAULT_VOCAB_SIZE)]
        vocab_size: usize,

        /// Documents per training batch.
        #[arg(long, default_value_t = corpus::DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Drop tokens seen fewer than this many times.
        #[arg(long, short = 'f', default_value_t = 0)]
        min_freq: u64,

        /// Stopword and stemmer language.
        #[arg(long, default_value = "english")]
        lang: String,

        /// Keep original casing instead of lowercasing before stemming.
        #[arg(long)]
        keep_case: bool,
    },

    /// Load a trained vocabulary and encode text to token ids.
    Encode {
        /// Vocabulary file path.
        #[arg(long, short, default_value = DEFAULT_VOCAB_PATH)]
        vocab: PathBuf,

        /// Text to encode.
        #[arg(long, short)]
        text: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();
    match cli.command {
        Command::Train {
            input,
            output,
            vocab_size,
            batch_size,
            min_freq,
            lang,
            keep_case,
        } => {
            run_train(
                &input, &output, vocab_size, batch_size, min_freq, &lang, !keep_case,
            )?;
        }
        Command::Encode { vocab, text } => {
            run_encode(&vocab, &text)?;
        }
    }
    Ok(())
}

fn run_train(
    inputs: &[PathBuf],
    output: &Path,
    vocab_size: usize,
    batch_size: usize,
    min_freq: u64,
    lang: &str,
    lowercase: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let normalizer = Normalizer::new(lang)?.with_lowercase(lowercase);
    let corpus = Corpus::new(inputs.to_vec());
    let total = corpus.doc_count()?;
    info!("training on {} documents from {} file(s)", total, inputs.len());

    let mut builder = VocabBuilder::new();
    for batch in corpus.batches(batch_size) {
        let batch = batch?;
        let normalized: Vec<String> = batch.iter().map(|doc| normalizer.normalize(doc)).collect();
        builder.feed(&normalized);
        debug!(
            "fed {}/{} documents, {} distinct tokens",
            builder.docs(),
            total,
            builder.distinct()
        );
    }

    let vocabulary = builder.build(vocab_size, min_freq, lang, lowercase);
    vocabulary.save(output)?;
    println!(
        "Trained vocabulary of {} tokens from {} documents, saved to {:?}",
        vocabulary.len(),
        total,
        output
    );
    Ok(())
}

fn run_encode(
    vocab_path: &Path,
    text: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let vocabulary = Vocabulary::load(vocab_path)?;
    let normalizer = Normalizer::new(&vocabulary.lang)?.with_lowercase(vocabulary.lowercase);
    let ids = vocabulary.encode(&normalizer.normalize(text));
    println!("{}", serde_json::to_string(&ids)?);
    Ok(())
}
