// Vocabulary and document-term matrix.
//
// The vocabulary assigns indices in first-occurrence order (documents in
// order, tokens in order). That order is fixed for the life of the matrix
// and reused by the topic model's beta rows and every term lookup.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::corpus::Document;
use crate::error::{Result, TopicModelError};

use super::tokenizer::Tokenizer;

/// Distinct normalized terms with a stable term -> index mapping.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Vocabulary {
    terms: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Index of `term`, inserting it at the end if unseen.
    fn intern(&mut self, term: &str) -> usize {
        if let Some(&id) = self.index.get(term) {
            return id;
        }
        let id = self.terms.len();
        self.terms.push(term.to_string());
        self.index.insert(term.to_string(), id);
        id
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Sparse documents x terms count matrix.
///
/// Each row holds `(term_index, count)` pairs in ascending term order;
/// terms absent from a document are not stored.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentTermMatrix {
    document_ids: Vec<String>,
    vocabulary: Vocabulary,
    rows: Vec<Vec<(usize, u32)>>,
}

impl DocumentTermMatrix {
    /// Tokenize every document and count terms.
    pub fn build(documents: &[Document], tokenizer: &Tokenizer) -> Result<Self> {
        // Streams must outlive the borrowed iterators handed to from_tokens.
        let streams: Vec<_> = documents
            .iter()
            .map(|doc| tokenizer.tokenize(&doc.text))
            .collect();
        Self::from_tokens(
            documents
                .iter()
                .zip(&streams)
                .map(|(doc, stream)| (doc.id.clone(), stream.iter())),
        )
    }

    /// Build from already-normalized token sequences, one per document.
    ///
    /// Fails with `EmptyCorpus` when there are no documents or no terms.
    /// Documents with no tokens keep an all-zero row.
    pub fn from_tokens<I, D, T>(documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, D)>,
        D: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut vocabulary = Vocabulary::default();
        let mut document_ids = Vec::new();
        let mut rows = Vec::new();

        for (id, tokens) in documents {
            let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
            for token in tokens {
                let term = vocabulary.intern(token.as_ref());
                *counts.entry(term).or_insert(0) += 1;
            }
            document_ids.push(id);
            rows.push(counts.into_iter().collect());
        }

        if document_ids.is_empty() {
            return Err(TopicModelError::EmptyCorpus("no documents".to_string()));
        }
        if vocabulary.is_empty() {
            return Err(TopicModelError::EmptyCorpus(format!(
                "vocabulary is empty after normalizing {} documents",
                document_ids.len()
            )));
        }

        debug!(
            documents = document_ids.len(),
            terms = vocabulary.len(),
            "Built document-term matrix"
        );

        Ok(Self {
            document_ids,
            vocabulary,
            rows,
        })
    }

    pub fn n_docs(&self) -> usize {
        self.rows.len()
    }

    pub fn n_terms(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn document_ids(&self) -> &[String] {
        &self.document_ids
    }

    /// Non-zero `(term_index, count)` entries of one document.
    pub fn row(&self, doc: usize) -> &[(usize, u32)] {
        &self.rows[doc]
    }

    pub fn get(&self, doc: usize, term: usize) -> u32 {
        self.rows[doc]
            .binary_search_by_key(&term, |&(t, _)| t)
            .map(|pos| self.rows[doc][pos].1)
            .unwrap_or(0)
    }

    pub fn row_dense(&self, doc: usize) -> Vec<u32> {
        let mut dense = vec![0u32; self.n_terms()];
        for &(term, count) in &self.rows[doc] {
            dense[term] = count;
        }
        dense
    }

    /// Total token count of one document.
    pub fn row_len(&self, doc: usize) -> usize {
        self.rows[doc].iter().map(|&(_, c)| c as usize).sum()
    }

    pub fn total_tokens(&self) -> usize {
        (0..self.n_docs()).map(|d| self.row_len(d)).sum()
    }

    /// Number of documents with no tokens at all.
    pub fn empty_rows(&self) -> usize {
        self.rows.iter().filter(|r| r.is_empty()).count()
    }

    /// Expand a row into one term index per token occurrence, in term order.
    pub(crate) fn row_tokens(&self, doc: usize) -> Vec<usize> {
        self.rows[doc]
            .iter()
            .flat_map(|&(term, count)| std::iter::repeat(term).take(count as usize))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dtm(docs: &[&[&str]]) -> Result<DocumentTermMatrix> {
        DocumentTermMatrix::from_tokens(
            docs.iter()
                .enumerate()
                .map(|(i, toks)| (i.to_string(), toks.iter().copied())),
        )
    }

    #[test]
    fn test_first_occurrence_order() {
        let m = dtm(&[&["b", "a", "b"], &["c", "a"]]).unwrap();
        assert_eq!(m.vocabulary().terms(), &["b", "a", "c"]);
        assert_eq!(m.row_dense(0), vec![2, 1, 0]);
        assert_eq!(m.row_dense(1), vec![0, 1, 1]);
        assert_eq!(m.get(0, 0), 2);
        assert_eq!(m.get(1, 0), 0);
        assert_eq!(m.row_len(0), 3);
        assert_eq!(m.total_tokens(), 5);
    }

    #[test]
    fn test_empty_document_keeps_zero_row() {
        let m = dtm(&[&["a"], &[]]).unwrap();
        assert_eq!(m.n_docs(), 2);
        assert_eq!(m.row_dense(1), vec![0]);
        assert_eq!(m.empty_rows(), 1);
    }

    #[test]
    fn test_no_documents_is_empty_corpus() {
        let err = dtm(&[]).unwrap_err();
        assert!(matches!(err, TopicModelError::EmptyCorpus(_)));
    }

    #[test]
    fn test_no_terms_is_empty_corpus() {
        let err = dtm(&[&[], &[]]).unwrap_err();
        assert!(matches!(err, TopicModelError::EmptyCorpus(_)));
    }

    #[test]
    fn test_row_tokens_expands_counts() {
        let m = dtm(&[&["x", "y", "x"]]).unwrap();
        assert_eq!(m.row_tokens(0), vec![0, 0, 1]);
    }

    #[test]
    fn test_vocabulary_lookup() {
        let m = dtm(&[&["cat", "mat"]]).unwrap();
        assert_eq!(m.vocabulary().index_of("mat"), Some(1));
        assert_eq!(m.vocabulary().term(0), Some("cat"));
        assert_eq!(m.vocabulary().index_of("dog"), None);
    }
}
