// Corpus statistics — document, token and vocabulary counts for a loaded corpus.

use std::path::Path;

use serde::Serialize;

use crate::text::dtm::DocumentTermMatrix;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusStats {
    pub documents: usize,
    pub total_tokens: usize,
    pub vocabulary_size: usize,
    /// Documents with no tokens left after normalization
    pub empty_documents: usize,
    pub mean_tokens: f64,
    /// Size of the input file, when known
    pub input_bytes: Option<u64>,
}

impl CorpusStats {
    pub fn from_dtm(dtm: &DocumentTermMatrix) -> Self {
        let documents = dtm.n_docs();
        let total_tokens = dtm.total_tokens();
        Self {
            documents,
            total_tokens,
            vocabulary_size: dtm.n_terms(),
            empty_documents: dtm.empty_rows(),
            mean_tokens: if documents > 0 {
                total_tokens as f64 / documents as f64
            } else {
                0.0
            },
            input_bytes: None,
        }
    }

    /// Record the on-disk size of the input (left unset if unreadable).
    pub fn with_input_file(mut self, path: &Path) -> Self {
        self.input_bytes = std::fs::metadata(path).map(|m| m.len()).ok();
        self
    }
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
