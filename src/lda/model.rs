// A fitted topic model: document-topic (gamma) and topic-term (beta) matrices.

use serde::Serialize;

use crate::error::{Result, TopicModelError};
use crate::summary::{self, TopTerm};
use crate::text::dtm::{DocumentTermMatrix, Vocabulary};

/// Tolerance for row-sum checks on probability matrices.
pub const ROW_SUM_TOLERANCE: f64 = 1e-6;

/// Output of one LDA fit.
#[derive(Debug, Clone, Serialize)]
pub struct TopicModel {
    k: usize,
    /// documents x k, each row sums to 1
    gamma: Vec<Vec<f64>>,
    /// k x vocabulary, each row sums to 1
    beta: Vec<Vec<f64>>,
    vocabulary: Vocabulary,
    document_ids: Vec<String>,
    document_lengths: Vec<usize>,
    /// Sampled complete-data log-likelihoods (after burn-in)
    log_likelihoods: Vec<f64>,
}

impl TopicModel {
    /// Assemble a model from a backend's raw output.
    ///
    /// Checks shapes against the DTM and rejects non-finite or
    /// non-normalized rows with `Inference`.
    pub fn from_parts(
        dtm: &DocumentTermMatrix,
        gamma: Vec<Vec<f64>>,
        beta: Vec<Vec<f64>>,
        log_likelihoods: Vec<f64>,
    ) -> Result<Self> {
        let k = beta.len();
        if gamma.len() != dtm.n_docs() {
            return Err(TopicModelError::Inference(format!(
                "gamma has {} rows for {} documents",
                gamma.len(),
                dtm.n_docs()
            )));
        }
        check_rows("gamma", &gamma, k)?;
        check_rows("beta", &beta, dtm.n_terms())?;
        if log_likelihoods.iter().any(|ll| !ll.is_finite()) {
            return Err(TopicModelError::Inference(
                "log-likelihood is not finite".to_string(),
            ));
        }

        Ok(Self {
            k,
            gamma,
            beta,
            vocabulary: dtm.vocabulary().clone(),
            document_ids: dtm.document_ids().to_vec(),
            document_lengths: (0..dtm.n_docs()).map(|d| dtm.row_len(d)).collect(),
            log_likelihoods,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn gamma(&self) -> &[Vec<f64>] {
        &self.gamma
    }

    pub fn beta(&self) -> &[Vec<f64>] {
        &self.beta
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn document_ids(&self) -> &[String] {
        &self.document_ids
    }

    pub fn document_lengths(&self) -> &[usize] {
        &self.document_lengths
    }

    pub fn log_likelihoods(&self) -> &[f64] {
        &self.log_likelihoods
    }

    /// Top `top_n` terms per topic by descending beta (ties in vocabulary order).
    pub fn terms(&self, top_n: usize) -> Vec<Vec<TopTerm>> {
        summary::top_terms(&self.beta, &self.vocabulary, top_n)
    }
}

fn check_rows(name: &str, rows: &[Vec<f64>], width: usize) -> Result<()> {
    for (i, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(TopicModelError::Inference(format!(
                "{name} row {i} has {} columns, expected {width}",
                row.len()
            )));
        }
        if row.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(TopicModelError::Inference(format!(
                "{name} row {i} contains a non-finite or negative probability"
            )));
        }
        let sum: f64 = row.iter().sum();
        if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
            return Err(TopicModelError::Inference(format!(
                "{name} row {i} sums to {sum}, not 1"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_dtm() -> DocumentTermMatrix {
        DocumentTermMatrix::from_tokens(vec![
            ("a".to_string(), vec!["x", "y"]),
            ("b".to_string(), vec!["z"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_parts_accepts_valid_matrices() {
        let dtm = tiny_dtm();
        let model = TopicModel::from_parts(
            &dtm,
            vec![vec![0.5, 0.5], vec![0.9, 0.1]],
            vec![vec![0.2, 0.3, 0.5], vec![0.6, 0.2, 0.2]],
            vec![-10.0],
        )
        .unwrap();
        assert_eq!(model.k(), 2);
        assert_eq!(model.document_lengths(), &[2, 1]);
        assert_eq!(model.document_ids(), &["a", "b"]);
    }

    #[test]
    fn test_from_parts_rejects_unnormalized_rows() {
        let dtm = tiny_dtm();
        let err = TopicModel::from_parts(
            &dtm,
            vec![vec![0.5, 0.4], vec![0.9, 0.1]],
            vec![vec![0.2, 0.3, 0.5], vec![0.6, 0.2, 0.2]],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, TopicModelError::Inference(_)));
    }

    #[test]
    fn test_from_parts_rejects_nan() {
        let dtm = tiny_dtm();
        let err = TopicModel::from_parts(
            &dtm,
            vec![vec![f64::NAN, 0.5], vec![0.9, 0.1]],
            vec![vec![0.2, 0.3, 0.5], vec![0.6, 0.2, 0.2]],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, TopicModelError::Inference(_)));
    }

    #[test]
    fn test_terms_orders_by_beta() {
        let dtm = tiny_dtm();
        let model = TopicModel::from_parts(
            &dtm,
            vec![vec![0.5, 0.5], vec![0.9, 0.1]],
            vec![vec![0.2, 0.3, 0.5], vec![0.6, 0.2, 0.2]],
            vec![],
        )
        .unwrap();
        let terms = model.terms(2);
        assert_eq!(terms[0][0].term, "z");
        assert_eq!(terms[0][1].term, "y");
        // Tie between y and z at 0.2 resolves in vocabulary order
        assert_eq!(terms[1][0].term, "x");
        assert_eq!(terms[1][1].term, "y");
    }
}
