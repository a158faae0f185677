// Tune pipeline: sweep candidate topic counts and tabulate the metrics.
//
// The table is advisory. It goes to the terminal and to selection.json for
// plotting; picking k stays with the person reading the curves.

use std::sync::Arc;

use tracing::{info, warn};

use crate::lda::LdaBackend;
use crate::selection::{Metric, SelectionTable, TopicCountRange, TopicCountSelector};
use crate::text::dtm::DocumentTermMatrix;

/// Settings for one sweep.
#[derive(Debug, Clone)]
pub struct TuneOptions {
    pub range: TopicCountRange,
    pub metrics: Vec<Metric>,
    pub seed: u64,
    pub concurrency: usize,
    pub show_progress: bool,
}

impl Default for TuneOptions {
    fn default() -> Self {
        Self {
            range: TopicCountRange::default(),
            metrics: Metric::ALL.to_vec(),
            seed: 1234,
            concurrency: 1,
            show_progress: false,
        }
    }
}

/// Run the sweep. Candidates above the vocabulary size still appear in the
/// table, marked as failed.
pub async fn run(
    dtm: Arc<DocumentTermMatrix>,
    backend: Arc<dyn LdaBackend>,
    options: &TuneOptions,
) -> SelectionTable {
    let candidates = options.range.candidates();
    if let Some(&max_k) = candidates.last() {
        if max_k > dtm.n_terms() {
            warn!(
                max_k,
                vocabulary = dtm.n_terms(),
                "Some candidates exceed the vocabulary size and will fail"
            );
        }
    }

    let selector = TopicCountSelector::new(backend, options.seed)
        .with_metrics(options.metrics.clone())
        .with_concurrency(options.concurrency)
        .with_progress(options.show_progress);
    let table = selector.evaluate(dtm, &candidates).await;

    info!(
        candidates = table.candidates.len(),
        failed = table.failed().count(),
        "Topic-count sweep complete"
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lda::GibbsSampler;

    #[tokio::test]
    async fn test_sweep_covers_range() {
        let dtm = DocumentTermMatrix::from_tokens(vec![
            ("1".to_string(), vec!["cat", "sat", "mat"]),
            ("2".to_string(), vec!["dogs", "run", "park"]),
        ])
        .unwrap();
        let backend = GibbsSampler {
            iterations: 20,
            burn_in: 5,
            thin: 5,
            ..Default::default()
        };
        let options = TuneOptions {
            range: TopicCountRange::new(2, 8, 2).unwrap(),
            concurrency: 2,
            ..Default::default()
        };
        let table = run(Arc::new(dtm), Arc::new(backend), &options).await;
        let ks: Vec<usize> = table.candidates.iter().map(|c| c.k).collect();
        assert_eq!(ks, vec![2, 4, 6, 8]);
        // Vocabulary has 6 terms
        let failed: Vec<usize> = table.failed().map(|c| c.k).collect();
        assert_eq!(failed, vec![8]);
    }
}
