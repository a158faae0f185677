// Corpus ingestion — documents loaded from a tabular file.

pub mod loader;
pub mod stats;

use serde::{Deserialize, Serialize};

/// A single document: an identifier (movie name or row number) and its raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Build documents from bare texts, numbering them from 1.
pub fn from_texts<S: AsRef<str>>(texts: &[S]) -> Vec<Document> {
    texts
        .iter()
        .enumerate()
        .map(|(i, t)| Document::new((i + 1).to_string(), t.as_ref()))
        .collect()
}
