//! Document normalization: word extraction, stemming, stopword filtering.

use std::collections::HashSet;

use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use stop_words::LANGUAGE;

/// Maps raw document text to a cleaned, space-joined token string.
///
/// Tokens are maximal runs of two or more word characters. Stopwords are
/// removed after stemming, by stemmed form: a token whose stem collides with
/// a stopword is dropped even when its surface form is not a stopword, and a
/// surface-form stopword whose stem leaves the list survives.
pub struct Normalizer {
    word_re: Regex,
    stemmer: Stemmer,
    stopwords: HashSet<String>,
    lowercase: bool,
}

impl Normalizer {
    /// Build a normalizer with the stemmer and stopword list for `lang`.
    pub fn new(lang: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let (algorithm, stop_lang) = language(lang)?;
        let stopwords = stop_words::get(stop_lang).into_iter().collect();
        Ok(Self::custom(algorithm, stopwords))
    }

    /// Build a normalizer from an explicit stemmer algorithm and stopword set.
    pub fn custom(algorithm: Algorithm, stopwords: HashSet<String>) -> Self {
        Self {
            word_re: Regex::new(r"\b\w\w+\b").unwrap(),
            stemmer: Stemmer::create(algorithm),
            stopwords,
            lowercase: true,
        }
    }

    /// Set whether tokens are lowercased before stemming (default true).
    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    /// Normalize one document: extract words, optionally lowercase, stem the
    /// ordered token list, drop stems found in the stopword set, join with
    /// single spaces. Empty or all-punctuation input yields an empty string.
    pub fn normalize(&self, text: &str) -> String {
        let tokens: Vec<String> = self
            .word_re
            .find_iter(text)
            .map(|m| {
                if self.lowercase {
                    m.as_str().to_lowercase()
                } else {
                    m.as_str().to_string()
                }
            })
            .collect();
        let stems: Vec<_> = tokens.iter().map(|token| self.stemmer.stem(token)).collect();
        let kept: Vec<&str> = stems
            .iter()
            .map(|stem| stem.as_ref())
            .filter(|stem| !self.stopwords.contains(*stem))
            .collect();
        kept.join(" ")
    }
}

/// Resolve a language name to its stemmer algorithm and stopword list.
fn language(
    lang: &str,
) -> Result<(Algorithm, LANGUAGE), Box<dyn std::error::Error + Send + Sync>> {
    let pair = match lang.to_lowercase().as_str() {
        "en" | "english" => (Algorithm::English, LANGUAGE::English),
        "de" | "german" => (Algorithm::German, LANGUAGE::German),
        "fr" | "french" => (Algorithm::French, LANGUAGE::French),
        "es" | "spanish" => (Algorithm::Spanish, LANGUAGE::Spanish),
        "it" | "italian" => (Algorithm::Italian, LANGUAGE::Italian),
        "pt" | "portuguese" => (Algorithm::Portuguese, LANGUAGE::Portuguese),
        "nl" | "dutch" => (Algorithm::Dutch, LANGUAGE::Dutch),
        "ru" | "russian" => (Algorithm::Russian, LANGUAGE::Russian),
        "sv" | "swedish" => (Algorithm::Swedish, LANGUAGE::Swedish),
        "fi" | "finnish" => (Algorithm::Finnish, LANGUAGE::Finnish),
        other => return Err(format!("unsupported language: {}", other).into()),
    };
    Ok(pair)
}
