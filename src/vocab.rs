//! Word-level vocabulary: frequency accumulation, ranking, JSON artifact.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

pub const DEFAULT_VOCAB_SIZE: usize = 500_000;
pub const UNK_TOKEN: &str = "[UNK]";

/// Id reserved for tokens missing from the trained vocabulary.
pub const UNK_ID: u32 = 0;

#[derive(Debug, Clone, Copy)]
struct TokenStat {
    freq: u64,
    first_seen: usize,
}

/// Accumulates token frequencies across batches of normalized documents.
#[derive(Default)]
pub struct VocabBuilder {
    stats: HashMap<String, TokenStat>,
    docs: usize,
}

impl VocabBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count whitespace-delimited tokens from a batch of normalized documents.
    /// Empty documents contribute nothing but still count as documents.
    pub fn feed(&mut self, batch: &[String]) {
        for doc in batch {
            for token in doc.split_ascii_whitespace() {
                let next_seen = self.stats.len();
                let stat = self.stats.entry(token.to_string()).or_insert(TokenStat {
                    freq: 0,
                    first_seen: next_seen,
                });
                stat.freq += 1;
            }
            self.docs += 1;
        }
    }

    /// Documents fed so far.
    pub fn docs(&self) -> usize {
        self.docs
    }

    /// Distinct tokens seen so far.
    pub fn distinct(&self) -> usize {
        self.stats.len()
    }

    /// Rank tokens by frequency (ties broken by first-seen order), keep at
    /// most `vocab_size - 1` with frequency at least `min_freq`, and assign
    /// ids: the unknown token is 0, then rank order.
    pub fn build(self, vocab_size: usize, min_freq: u64, lang: &str, lowercase: bool) -> Vocabulary {
        let total = self.stats.len();
        let mut ranked: Vec<(String, TokenStat)> = self
            .stats
            .into_iter()
            .filter(|(_, stat)| stat.freq >= min_freq)
            .collect();
        ranked.sort_by(|a, b| {
            b.1.freq
                .cmp(&a.1.freq)
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });
        ranked.truncate(vocab_size.saturating_sub(1));

        let mut vocab = HashMap::with_capacity(ranked.len() + 1);
        vocab.insert(UNK_TOKEN.to_string(), UNK_ID);
        for (rank, (token, _)) in ranked.into_iter().enumerate() {
            vocab.insert(token, (rank + 1) as u32);
        }
        info!("kept {} of {} distinct tokens", vocab.len() - 1, total);

        Vocabulary {
            unk_token: UNK_TOKEN.to_string(),
            lang: lang.to_string(),
            lowercase,
            vocab,
        }
    }
}

/// Trained word-level vocabulary with a reserved unknown token at id 0.
/// The normalization settings used at training time are recorded so encoding
/// can reproduce them.
#[derive(Debug, Serialize, Deserialize)]
pub struct Vocabulary {
    pub unk_token: String,
    pub lang: String,
    pub lowercase: bool,
    pub vocab: HashMap<String, u32>,
}

impl Vocabulary {
    /// Id for a single token, falling back to the unknown id.
    pub fn id(&self, token: &str) -> u32 {
        self.vocab.get(token).copied().unwrap_or(UNK_ID)
    }

    /// Encode normalized text: split on whitespace, map each token to its id.
    pub fn encode(&self, normalized: &str) -> Vec<u32> {
        normalized
            .split_ascii_whitespace()
            .map(|token| self.id(token))
            .collect()
    }

    /// Total entries, unknown token included.
    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }

    /// Save as compact JSON; the map can hold hundreds of thousands of entries.
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a vocabulary saved by `save`.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let json = fs::read_to_string(path)?;
        let vocabulary = serde_json::from_str(&json)?;
        Ok(vocabulary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(docs: &[&str]) -> Vec<String> {
        docs.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn ids_follow_frequency_rank() {
        let mut builder = VocabBuilder::new();
        builder.feed(&batch(&["aa bb aa", "cc bb aa"]));
        let vocabulary = builder.build(10, 0, "english", true);

        assert_eq!(vocabulary.len(), 4);
        assert_eq!(vocabulary.id(UNK_TOKEN), 0);
        assert_eq!(vocabulary.id("aa"), 1);
        assert_eq!(vocabulary.id("bb"), 2);
        assert_eq!(vocabulary.id("cc"), 3);
    }

    #[test]
    fn frequency_ties_break_by_first_seen() {
        let mut builder = VocabBuilder::new();
        builder.feed(&batch(&["xx yy", "yy xx"]));
        let vocabulary = builder.build(10, 0, "english", true);

        assert_eq!(vocabulary.id("xx"), 1);
        assert_eq!(vocabulary.id("yy"), 2);
    }

    #[test]
    fn first_seen_order_spans_batches() {
        let mut builder = VocabBuilder::new();
        builder.feed(&batch(&["early"]));
        builder.feed(&batch(&["late"]));
        let vocabulary = builder.build(10, 0, "english", true);

        assert_eq!(vocabulary.id("early"), 1);
        assert_eq!(vocabulary.id("late"), 2);
    }

    #[test]
    fn vocab_size_bounds_the_table() {
        let mut builder = VocabBuilder::new();
        builder.feed(&batch(&["aa aa bb bb cc"]));
        let vocabulary = builder.build(2, 0, "english", true);

        // Room for one real token next to [UNK]; "aa" outranks the rest.
        assert_eq!(vocabulary.len(), 2);
        assert_eq!(vocabulary.id("aa"), 1);
        assert_eq!(vocabulary.id("bb"), UNK_ID);
    }

    #[test]
    fn min_freq_drops_rare_tokens() {
        let mut builder = VocabBuilder::new();
        builder.feed(&batch(&["aa aa bb"]));
        let vocabulary = builder.build(10, 2, "english", true);

        assert_eq!(vocabulary.len(), 2);
        assert_eq!(vocabulary.id("aa"), 1);
        assert_eq!(vocabulary.id("bb"), UNK_ID);
    }

    #[test]
    fn empty_documents_count_but_add_no_tokens() {
        let mut builder = VocabBuilder::new();
        builder.feed(&batch(&["", "aa", ""]));
        assert_eq!(builder.docs(), 3);
        assert_eq!(builder.distinct(), 1);
    }

    #[test]
    fn encode_maps_unknown_tokens_to_unk() {
        let mut builder = VocabBuilder::new();
        builder.feed(&batch(&["aa bb aa"]));
        let vocabulary = builder.build(10, 0, "english", true);

        assert_eq!(vocabulary.encode("aa zz bb"), vec![1, UNK_ID, 2]);
        assert_eq!(vocabulary.encode(""), Vec::<u32>::new());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let mut builder = VocabBuilder::new();
        builder.feed(&batch(&["aa bb aa"]));
        let vocabulary = builder.build(10, 0, "english", false);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.json");
        vocabulary.save(&path).unwrap();
        let loaded = Vocabulary::load(&path).unwrap();

        assert_eq!(loaded.unk_token, UNK_TOKEN);
        assert_eq!(loaded.lang, "english");
        assert!(!loaded.lowercase);
        assert_eq!(loaded.vocab, vocabulary.vocab);
    }

    #[test]
    fn load_rejects_malformed_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.json");
        fs::write(&path, "not json").unwrap();
        assert!(Vocabulary::load(&path).is_err());
    }
}
