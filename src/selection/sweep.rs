// Topic-count sweep: one independent LDA fit per candidate k.
//
// Fits share nothing mutable. The DTM is read-only behind an Arc and each
// fit seeds its own RNG from the shared seed, so running them concurrently
// gives the same table as running them one after another. A failed
// candidate is recorded and the sweep carries on.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::error::{Result, TopicModelError};
use crate::lda::{LdaBackend, TopicModel};
use crate::text::dtm::DocumentTermMatrix;

use super::metrics::Metric;
use super::{CandidateResult, SelectionTable};

/// Runs the per-k fits and scores them.
pub struct TopicCountSelector {
    backend: Arc<dyn LdaBackend>,
    metrics: Vec<Metric>,
    seed: u64,
    concurrency: usize,
    show_progress: bool,
}

impl TopicCountSelector {
    /// All four metrics, one fit at a time, no progress bar.
    pub fn new(backend: Arc<dyn LdaBackend>, seed: u64) -> Self {
        Self {
            backend,
            metrics: Metric::ALL.to_vec(),
            seed,
            concurrency: 1,
            show_progress: false,
        }
    }

    pub fn with_metrics(mut self, metrics: Vec<Metric>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Maximum number of fits running at once.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Fit every candidate on the calling thread, in order.
    pub fn evaluate_sequential(
        &self,
        dtm: &DocumentTermMatrix,
        candidates: &[usize],
    ) -> SelectionTable {
        let pb = self.progress_bar(candidates.len());
        let mut results = Vec::with_capacity(candidates.len());
        for &k in candidates {
            let outcome = self.backend.fit(dtm, k, self.seed);
            results.push(self.candidate_result(k, outcome));
            pb.inc(1);
        }
        pb.finish_and_clear();
        self.table(results)
    }

    /// Fit candidates on tokio's blocking pool, at most `concurrency` at a time.
    pub async fn evaluate(
        &self,
        dtm: Arc<DocumentTermMatrix>,
        candidates: &[usize],
    ) -> SelectionTable {
        info!(
            candidates = candidates.len(),
            concurrency = self.concurrency,
            backend = self.backend.name(),
            "Starting topic-count sweep"
        );
        let pb = self.progress_bar(candidates.len());

        let results: Vec<CandidateResult> = stream::iter(candidates.iter().copied().map(|k| {
            let backend = Arc::clone(&self.backend);
            let dtm = Arc::clone(&dtm);
            let seed = self.seed;
            async move {
                let joined = tokio::task::spawn_blocking(move || backend.fit(&dtm, k, seed)).await;
                let outcome = joined.unwrap_or_else(|e| {
                    Err(TopicModelError::Inference(format!(
                        "fit task for k={k} aborted: {e}"
                    )))
                });
                (k, outcome)
            }
        }))
        .buffer_unordered(self.concurrency)
        .map(|(k, outcome)| {
            let result = self.candidate_result(k, outcome);
            pb.inc(1);
            result
        })
        .collect()
        .await;

        pb.finish_and_clear();
        self.table(results)
    }

    fn candidate_result(&self, k: usize, outcome: Result<TopicModel>) -> CandidateResult {
        match outcome {
            Ok(model) => {
                let scores = self
                    .metrics
                    .iter()
                    .filter_map(|&m| m.score(&model).map(|s| (m, s)))
                    .collect();
                info!(k, "Candidate fitted");
                CandidateResult {
                    k,
                    scores,
                    error: None,
                }
            }
            Err(e) => {
                warn!(k, error = %e, "Candidate fit failed, skipping");
                CandidateResult {
                    k,
                    scores: Default::default(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    fn table(&self, mut candidates: Vec<CandidateResult>) -> SelectionTable {
        candidates.sort_by_key(|c| c.k);
        SelectionTable {
            metrics: self.metrics.clone(),
            candidates,
        }
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  Fitting [{bar:30}] {pos}/{len} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lda::GibbsSampler;

    fn dtm() -> DocumentTermMatrix {
        DocumentTermMatrix::from_tokens(vec![
            ("1".to_string(), vec!["cat", "sat", "mat"]),
            ("2".to_string(), vec!["dogs", "run", "park"]),
            ("3".to_string(), vec!["dogs", "cats", "play"]),
        ])
        .unwrap()
    }

    fn selector() -> TopicCountSelector {
        let backend = GibbsSampler {
            iterations: 40,
            burn_in: 10,
            thin: 10,
            ..Default::default()
        };
        TopicCountSelector::new(Arc::new(backend), 42)
    }

    #[test]
    fn test_sequential_isolates_failures() {
        // Vocabulary has 8 terms, so k=9 is invalid
        let table = selector().evaluate_sequential(&dtm(), &[2, 9, 3]);
        assert_eq!(
            table.candidates.iter().map(|c| c.k).collect::<Vec<_>>(),
            vec![2, 3, 9]
        );
        assert!(table.score(Metric::CaoJuan2009, 2).is_some());
        assert!(table.score(Metric::CaoJuan2009, 3).is_some());
        let failed: Vec<usize> = table.failed().map(|c| c.k).collect();
        assert_eq!(failed, vec![9]);
        assert!(table.candidates[2].scores.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_matches_sequential() {
        let dtm = dtm();
        let candidates = [2, 3, 4, 5];
        let sequential = selector().evaluate_sequential(&dtm, &candidates);
        let concurrent = selector()
            .with_concurrency(3)
            .evaluate(Arc::new(dtm), &candidates)
            .await;
        assert_eq!(sequential, concurrent);
    }

    #[test]
    fn test_metric_subset() {
        let table = selector()
            .with_metrics(vec![Metric::Deveaud2014])
            .evaluate_sequential(&dtm(), &[2]);
        assert_eq!(table.metrics, vec![Metric::Deveaud2014]);
        assert_eq!(table.candidates[0].scores.len(), 1);
    }
}
