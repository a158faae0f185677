// Unit tests for the LDA engine and the topic-count selector.
//
// Exercises the GibbsSampler through the LdaBackend trait: probability
// invariants, seeded determinism, validation errors, and a custom backend
// plugged into the selector to check partial-failure handling.

use std::sync::Arc;

use plotweave::corpus::from_texts;
use plotweave::error::Result;
use plotweave::lda::{GibbsSampler, LdaBackend, TopicModel};
use plotweave::selection::{Metric, TopicCountSelector};
use plotweave::text::dtm::DocumentTermMatrix;
use plotweave::text::tokenizer::Tokenizer;
use plotweave::TopicModelError;

const PLOTS: &[&str] = &[
    "A starship crew explores a distant planet and meets an alien race",
    "Pirates sail the ocean searching for buried treasure on an island",
    "An alien invasion threatens the planet as the starship fleet regroups",
    "The pirate captain hides the treasure map aboard his ship at sea",
    "Astronauts repair the starship while orbiting an alien moon",
    "A young sailor joins the pirates and learns to read the ocean",
];

fn dtm() -> DocumentTermMatrix {
    DocumentTermMatrix::build(&from_texts(PLOTS), &Tokenizer::default()).unwrap()
}

fn sampler() -> GibbsSampler {
    GibbsSampler {
        iterations: 200,
        burn_in: 100,
        thin: 20,
        ..Default::default()
    }
}

// ============================================================
// GibbsSampler — probability invariants
// ============================================================

#[test]
fn gamma_and_beta_rows_sum_to_one_for_every_k() {
    let dtm = dtm();
    for k in 2..=5 {
        let model = sampler().fit(&dtm, k, 11).unwrap();
        assert_eq!(model.gamma().len(), dtm.n_docs());
        assert_eq!(model.beta().len(), k);
        for row in model.gamma() {
            assert_eq!(row.len(), k);
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-6);
        }
        for row in model.beta() {
            assert_eq!(row.len(), dtm.n_terms());
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-6);
        }
    }
}

#[test]
fn same_seed_same_model_different_seed_different_model() {
    let dtm = dtm();
    let a = sampler().fit(&dtm, 2, 3).unwrap();
    let b = sampler().fit(&dtm, 2, 3).unwrap();
    let c = sampler().fit(&dtm, 2, 4).unwrap();
    assert_eq!(a.gamma(), b.gamma());
    assert_eq!(a.beta(), b.beta());
    assert_ne!(a.gamma(), c.gamma());
}

#[test]
fn terms_returns_min_of_n_and_vocabulary() {
    let dtm = dtm();
    let model = sampler().fit(&dtm, 2, 1).unwrap();
    for topic in model.terms(10) {
        assert_eq!(topic.len(), 10.min(dtm.n_terms()));
        for pair in topic.windows(2) {
            assert!(pair[0].beta >= pair[1].beta);
        }
    }
    for topic in model.terms(10_000) {
        assert_eq!(topic.len(), dtm.n_terms());
    }
}

#[test]
fn invalid_k_is_invalid_topic_count() {
    let dtm = dtm();
    for k in [0, 1, dtm.n_terms() + 1] {
        match sampler().fit(&dtm, k, 1) {
            Err(TopicModelError::InvalidTopicCount { k: got, vocabulary_size }) => {
                assert_eq!(got, k);
                assert_eq!(vocabulary_size, dtm.n_terms());
            }
            other => panic!("k={k}: expected InvalidTopicCount, got {other:?}"),
        }
    }
}

#[test]
fn k_equal_to_vocabulary_size_is_allowed() {
    let dtm = DocumentTermMatrix::from_tokens(vec![
        ("a".to_string(), vec!["x", "y"]),
        ("b".to_string(), vec!["y", "z"]),
    ])
    .unwrap();
    let model = sampler().fit(&dtm, 3, 1).unwrap();
    assert_eq!(model.k(), 3);
}

// ============================================================
// TopicCountSelector — partial failures with a custom backend
// ============================================================

/// Delegates to Gibbs but fails on one chosen k.
struct FlakyBackend {
    inner: GibbsSampler,
    fail_on: usize,
}

impl LdaBackend for FlakyBackend {
    fn name(&self) -> &str {
        "flaky"
    }

    fn fit(&self, dtm: &DocumentTermMatrix, k: usize, seed: u64) -> Result<TopicModel> {
        if k == self.fail_on {
            return Err(TopicModelError::Inference("did not converge".to_string()));
        }
        self.inner.fit(dtm, k, seed)
    }
}

#[tokio::test]
async fn selector_keeps_going_after_a_failed_candidate() {
    let backend = FlakyBackend {
        inner: sampler(),
        fail_on: 3,
    };
    let selector = TopicCountSelector::new(Arc::new(backend), 42).with_concurrency(2);
    let table = selector.evaluate(Arc::new(dtm()), &[2, 3, 4]).await;

    assert_eq!(table.candidates.len(), 3);
    let failed = &table.candidates[1];
    assert_eq!(failed.k, 3);
    assert!(failed.scores.is_empty());
    assert!(failed.error.as_deref().unwrap().contains("did not converge"));

    for k in [2, 4] {
        for metric in Metric::ALL {
            assert!(
                table.score(metric, k).is_some(),
                "{metric} missing for k={k}"
            );
        }
    }
}

#[test]
fn selector_uses_the_same_seed_for_every_candidate() {
    // A candidate's scores don't depend on which other candidates ran
    let dtm = dtm();
    let selector = TopicCountSelector::new(Arc::new(sampler()), 9);
    let alone = selector.evaluate_sequential(&dtm, &[3]);
    let together = selector.evaluate_sequential(&dtm, &[2, 3, 4]);
    assert_eq!(alone.candidates[0], together.candidates[1]);
}
