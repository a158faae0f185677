// Collapsed Gibbs sampler for LDA.
//
// Every token carries a topic assignment. One sweep resamples each token's
// topic from its full conditional
//
//   p(t) ∝ (n_dt + alpha) * (n_tw + eta) / (n_t + V * eta)
//
// with the token's own assignment removed from the counts. After the last
// sweep the counts are turned into point estimates:
//
//   gamma[d][t] = (n_dt + alpha) / (N_d + K * alpha)
//   beta[t][w]  = (n_tw + eta)   / (n_t + V * eta)

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{validate_topic_count, Result, TopicModelError};
use crate::math::ln_gamma;
use crate::text::dtm::DocumentTermMatrix;

use super::model::TopicModel;
use super::traits::LdaBackend;

/// Gibbs sampler settings. Each `fit` call seeds its own RNG.
#[derive(Debug, Clone, PartialEq)]
pub struct GibbsSampler {
    /// Symmetric Dirichlet prior on document-topic mixtures
    pub alpha: f64,
    /// Symmetric Dirichlet prior on topic-term distributions
    pub eta: f64,
    /// Total sweeps over the corpus
    pub iterations: usize,
    /// Sweeps before log-likelihood samples are kept
    pub burn_in: usize,
    /// Keep one log-likelihood sample every `thin` sweeps after burn-in
    pub thin: usize,
}

impl Default for GibbsSampler {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            eta: 0.01,
            iterations: 1000,
            burn_in: 500,
            thin: 50,
        }
    }
}

impl LdaBackend for GibbsSampler {
    fn name(&self) -> &str {
        "gibbs"
    }

    fn fit(&self, dtm: &DocumentTermMatrix, k: usize, seed: u64) -> Result<TopicModel> {
        if dtm.n_docs() == 0 || dtm.n_terms() == 0 {
            return Err(TopicModelError::EmptyCorpus(
                "document-term matrix has no documents or terms".to_string(),
            ));
        }
        validate_topic_count(k, dtm.n_terms())?;
        self.validate()?;

        let mut state = SamplerState::init(dtm, k, seed);
        let mut log_likelihoods = Vec::new();
        let thin = self.thin.max(1);

        for it in 1..=self.iterations {
            state.sweep(self.alpha, self.eta)?;

            if it > self.burn_in && (it - self.burn_in) % thin == 0 {
                log_likelihoods.push(state.log_likelihood(self.eta));
            }
            if it % 50 == 0 {
                debug!(k, iteration = it, total = self.iterations, "Gibbs sweep");
            }
        }

        // Too few sweeps to pass burn-in still yields one sample
        if log_likelihoods.is_empty() {
            log_likelihoods.push(state.log_likelihood(self.eta));
        }

        TopicModel::from_parts(
            dtm,
            state.gamma(self.alpha),
            state.beta(self.eta),
            log_likelihoods,
        )
    }
}

impl GibbsSampler {
    fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(TopicModelError::Inference(
                "no sampling iterations requested".to_string(),
            ));
        }
        for (name, value) in [("alpha", self.alpha), ("eta", self.eta)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TopicModelError::Inference(format!(
                    "prior {name} must be positive and finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Count tables and assignments for one fit.
struct SamplerState {
    k: usize,
    n_terms: usize,
    /// Term index of every token, per document
    docs: Vec<Vec<usize>>,
    /// Topic of every token, per document
    z: Vec<Vec<usize>>,
    /// [doc][topic]
    ndk: Vec<Vec<u32>>,
    /// [topic][term]
    nkw: Vec<Vec<u32>>,
    /// [topic]
    nk: Vec<u32>,
    rng: StdRng,
    weights: Vec<f64>,
}

impl SamplerState {
    fn init(dtm: &DocumentTermMatrix, k: usize, seed: u64) -> Self {
        let n_terms = dtm.n_terms();
        let docs: Vec<Vec<usize>> = (0..dtm.n_docs()).map(|d| dtm.row_tokens(d)).collect();
        let mut rng = StdRng::seed_from_u64(seed);

        let mut ndk = vec![vec![0u32; k]; docs.len()];
        let mut nkw = vec![vec![0u32; n_terms]; k];
        let mut nk = vec![0u32; k];
        let mut z = Vec::with_capacity(docs.len());

        for (d, doc) in docs.iter().enumerate() {
            let mut assignments = Vec::with_capacity(doc.len());
            for &w in doc {
                let t = rng.random_range(0..k);
                assignments.push(t);
                ndk[d][t] += 1;
                nkw[t][w] += 1;
                nk[t] += 1;
            }
            z.push(assignments);
        }

        Self {
            k,
            n_terms,
            docs,
            z,
            ndk,
            nkw,
            nk,
            rng,
            weights: vec![0.0; k],
        }
    }

    fn sweep(&mut self, alpha: f64, eta: f64) -> Result<()> {
        let v_eta = self.n_terms as f64 * eta;

        for d in 0..self.docs.len() {
            for i in 0..self.docs[d].len() {
                let w = self.docs[d][i];
                let old = self.z[d][i];

                self.ndk[d][old] -= 1;
                self.nkw[old][w] -= 1;
                self.nk[old] -= 1;

                let mut total = 0.0;
                for t in 0..self.k {
                    let left = self.ndk[d][t] as f64 + alpha;
                    let right = (self.nkw[t][w] as f64 + eta) / (self.nk[t] as f64 + v_eta);
                    total += left * right;
                    self.weights[t] = total;
                }
                if !total.is_finite() || total <= 0.0 {
                    return Err(TopicModelError::Inference(format!(
                        "degenerate conditional distribution (total weight {total}) in document {d}"
                    )));
                }

                // Inverse-CDF draw over the cumulative weights
                let u = self.rng.random::<f64>() * total;
                let new = self
                    .weights
                    .iter()
                    .position(|&c| u < c)
                    .unwrap_or(self.k - 1);

                self.z[d][i] = new;
                self.ndk[d][new] += 1;
                self.nkw[new][w] += 1;
                self.nk[new] += 1;
            }
        }
        Ok(())
    }

    /// log p(w | z) with the topic-term distributions integrated out.
    fn log_likelihood(&self, eta: f64) -> f64 {
        let v = self.n_terms as f64;
        let per_topic_const = ln_gamma(v * eta) - v * ln_gamma(eta);
        let ln_gamma_eta = ln_gamma(eta);

        let mut ll = self.k as f64 * per_topic_const;
        for t in 0..self.k {
            for &count in &self.nkw[t] {
                ll += if count > 0 {
                    ln_gamma(count as f64 + eta)
                } else {
                    ln_gamma_eta
                };
            }
            ll -= ln_gamma(self.nk[t] as f64 + v * eta);
        }
        ll
    }

    fn gamma(&self, alpha: f64) -> Vec<Vec<f64>> {
        let k_alpha = self.k as f64 * alpha;
        self.ndk
            .iter()
            .zip(&self.docs)
            .map(|(counts, doc)| {
                let denom = doc.len() as f64 + k_alpha;
                counts.iter().map(|&c| (c as f64 + alpha) / denom).collect()
            })
            .collect()
    }

    fn beta(&self, eta: f64) -> Vec<Vec<f64>> {
        let v_eta = self.n_terms as f64 * eta;
        self.nkw
            .iter()
            .zip(&self.nk)
            .map(|(counts, &total)| {
                let denom = total as f64 + v_eta;
                counts.iter().map(|&c| (c as f64 + eta) / denom).collect()
            })
            .collect()
    }
}
