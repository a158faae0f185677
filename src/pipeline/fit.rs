// Fit pipeline: one LDA model with a chosen k, then every summary view.
//
// The resulting FitReport is what the presentation side consumes: matrices
// for scatter plots, per-topic gamma histograms, top-terms bar charts and
// word-cloud weights.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::lda::{LdaBackend, TopicModel};
use crate::summary::distribution::{gamma_histogram, GammaHistogram};
use crate::summary::projection::{project_gamma, Projection};
use crate::summary::{self, TopTerm};
use crate::text::dtm::DocumentTermMatrix;

/// Knobs for the summary views.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryOptions {
    /// Terms per topic in the top-terms table
    pub top_n: usize,
    /// Word-cloud cutoff on aggregate term importance
    pub min_weight: f64,
    /// Word-cloud size cap
    pub max_words: usize,
    pub histogram_bins: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            top_n: 10,
            min_weight: 0.0,
            max_words: 100,
            histogram_bins: 20,
        }
    }
}

/// A document's dominant topic and its weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentTopic {
    pub document: String,
    pub topic: usize,
    pub gamma: f64,
}

/// Everything derived from one fit.
#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    pub generated_at: DateTime<Utc>,
    pub k: usize,
    pub seed: u64,
    pub backend: String,
    pub model: TopicModel,
    pub dominant_topics: Vec<DocumentTopic>,
    pub topic_sizes: Vec<usize>,
    pub top_terms: Vec<Vec<TopTerm>>,
    pub term_importance: BTreeMap<String, f64>,
    pub word_cloud: Vec<(String, f64)>,
    pub gamma_histogram: GammaHistogram,
    pub projection: Projection,
}

/// Fit one model and derive all summary views from it.
pub fn run(
    dtm: &DocumentTermMatrix,
    backend: &dyn LdaBackend,
    k: usize,
    seed: u64,
    options: &SummaryOptions,
) -> Result<FitReport> {
    info!(
        k,
        seed,
        backend = backend.name(),
        documents = dtm.n_docs(),
        terms = dtm.n_terms(),
        "Fitting topic model"
    );
    let model = backend.fit(dtm, k, seed)?;
    let report = summarize(model, seed, backend.name(), options);

    info!(
        k,
        word_cloud_terms = report.word_cloud.len(),
        "Topic model fitted"
    );
    Ok(report)
}

/// Derive the summary views from an already fitted model.
pub fn summarize(
    model: TopicModel,
    seed: u64,
    backend: &str,
    options: &SummaryOptions,
) -> FitReport {
    let k = model.k();
    let dominant = summary::dominant_topics(model.gamma());
    let dominant_topics = dominant
        .iter()
        .zip(model.gamma())
        .zip(model.document_ids())
        .map(|((&topic, row), id)| DocumentTopic {
            document: id.clone(),
            topic,
            gamma: row[topic],
        })
        .collect();
    let topic_sizes = summary::topic_sizes(&dominant, k);
    let top_terms = model.terms(options.top_n);
    let term_importance = summary::term_importance(&top_terms);
    let word_cloud = summary::word_cloud(&term_importance, options.min_weight, options.max_words);
    let gamma_histogram = gamma_histogram(model.gamma(), options.histogram_bins);
    let projection = project_gamma(model.gamma());

    FitReport {
        generated_at: Utc::now(),
        k,
        seed,
        backend: backend.to_string(),
        model,
        dominant_topics,
        topic_sizes,
        top_terms,
        term_importance,
        word_cloud,
        gamma_histogram,
        projection,
    }
}
