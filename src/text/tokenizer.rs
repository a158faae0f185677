// Tokenizer/normalizer for raw plot text.
//
// Normalization runs in a fixed order: lowercase, delete punctuation and
// digits, collapse whitespace, split, then drop stop words. Punctuation is
// deleted rather than replaced, so "don't" becomes "dont" and "sci-fi"
// becomes "scifi".

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex_lite::Regex;
use stop_words::{get, LANGUAGE};

/// Turns raw document text into normalized tokens.
pub struct Tokenizer {
    stop_words: HashSet<String>,
    strip: Regex,
    whitespace: Regex,
}

impl Default for Tokenizer {
    /// English stop words from the `stop-words` crate.
    fn default() -> Self {
        Self::with_stop_words(get(LANGUAGE::English))
    }
}

impl Tokenizer {
    /// Build a tokenizer with a custom stop-word set. Words are lowercased.
    pub fn with_stop_words<I, S>(stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stop_words = stop_words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        Self {
            stop_words,
            strip: Regex::new(r"[[:punct:][:digit:]]+").expect("constant pattern"),
            whitespace: Regex::new(r"\s+").expect("constant pattern"),
        }
    }

    /// Load stop words from a newline-separated file. Blank lines and
    /// lines starting with `#` are skipped.
    pub fn from_stop_word_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading stop-word list {}", path.display()))?;
        let words = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'));
        Ok(Self::with_stop_words(words))
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    pub fn stop_word_count(&self) -> usize {
        self.stop_words.len()
    }

    /// The intermediate normalized string, before splitting and stop-word removal.
    pub fn normalize(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        let stripped = self.strip.replace_all(&lower, "");
        let collapsed = self.whitespace.replace_all(&stripped, " ");
        collapsed.trim().to_string()
    }

    /// Normalize a document. The returned stream can be iterated any number of times.
    pub fn tokenize(&self, text: &str) -> TokenStream<'_> {
        TokenStream {
            normalized: self.normalize(text),
            tokenizer: self,
        }
    }
}

/// The tokens of one normalized document, in original order.
pub struct TokenStream<'a> {
    normalized: String,
    tokenizer: &'a Tokenizer,
}

impl<'a> TokenStream<'a> {
    /// Iterate the tokens. Each call restarts from the first token.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.normalized
            .split_whitespace()
            .filter(move |tok| !self.tokenizer.is_stop_word(tok))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(str::to_string).collect()
    }
}
