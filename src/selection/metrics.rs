// Model-selection metrics for choosing the number of topics.
//
// Each metric scores one fitted model. Curves across candidate k are meant
// for a person to read; nothing here picks k.
//
//   Griffiths2004  harmonic mean of sampled likelihoods     (higher is better)
//   CaoJuan2009    mean pairwise cosine between topics      (lower is better)
//   Arun2010       KL between beta spectrum and topic mass  (lower is better)
//   Deveaud2014    mean pairwise divergence between topics  (higher is better)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::lda::TopicModel;
use crate::math::{cosine, singular_values};

/// Which way a metric's curve should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Minimize,
    Maximize,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Metric {
    Griffiths2004,
    CaoJuan2009,
    Arun2010,
    Deveaud2014,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Griffiths2004,
        Metric::CaoJuan2009,
        Metric::Arun2010,
        Metric::Deveaud2014,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Griffiths2004 => "Griffiths2004",
            Metric::CaoJuan2009 => "CaoJuan2009",
            Metric::Arun2010 => "Arun2010",
            Metric::Deveaud2014 => "Deveaud2014",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Metric::Griffiths2004 | Metric::Deveaud2014 => Direction::Maximize,
            Metric::CaoJuan2009 | Metric::Arun2010 => Direction::Minimize,
        }
    }

    /// Score a fitted model. Returns `None` when the value is not finite.
    pub fn score(&self, model: &TopicModel) -> Option<f64> {
        let value = match self {
            Metric::Griffiths2004 => griffiths2004(model.log_likelihoods()),
            Metric::CaoJuan2009 => cao_juan2009(model.beta()),
            Metric::Arun2010 => arun2010(model.beta(), model.gamma(), model.document_lengths()),
            Metric::Deveaud2014 => deveaud2014(model.beta()),
        };
        value.is_finite().then_some(value)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown metric `{s}` (expected one of: {})",
                    Metric::ALL.map(|m| m.name()).join(", ")
                )
            })
    }
}

/// Harmonic mean of the sampled likelihoods, computed in log space:
/// -log(mean(exp(-ll))).
pub fn griffiths2004(log_likelihoods: &[f64]) -> f64 {
    if log_likelihoods.is_empty() {
        return f64::NAN;
    }
    let max_neg = log_likelihoods
        .iter()
        .map(|ll| -ll)
        .fold(f64::NEG_INFINITY, f64::max);
    let sum: f64 = log_likelihoods
        .iter()
        .map(|ll| (-ll - max_neg).exp())
        .sum();
    let log_mean = max_neg + sum.ln() - (log_likelihoods.len() as f64).ln();
    -log_mean
}

/// Average cosine similarity over all unordered topic pairs.
pub fn cao_juan2009(beta: &[Vec<f64>]) -> f64 {
    let k = beta.len();
    if k < 2 {
        return f64::NAN;
    }
    let mut total = 0.0;
    for i in 0..k {
        for j in (i + 1)..k {
            total += cosine(&beta[i], &beta[j]);
        }
    }
    total / (k * (k - 1) / 2) as f64
}

/// Symmetric KL divergence between the singular values of beta and the
/// document-length-weighted topic mass (scaled by the longest document).
pub fn arun2010(beta: &[Vec<f64>], gamma: &[Vec<f64>], lengths: &[usize]) -> f64 {
    let k = beta.len();
    let max_len = lengths.iter().copied().max().unwrap_or(0) as f64;
    if k == 0 || max_len == 0.0 {
        return f64::NAN;
    }

    let cm1: Vec<f64> = singular_values(beta)
        .into_iter()
        .map(|s| s.max(f64::MIN_POSITIVE))
        .collect();
    let cm2: Vec<f64> = (0..k)
        .map(|t| {
            let mass: f64 = gamma
                .iter()
                .zip(lengths)
                .map(|(row, &len)| row[t] * len as f64)
                .sum();
            (mass / max_len).max(f64::MIN_POSITIVE)
        })
        .collect();

    cm1.iter()
        .zip(&cm2)
        .map(|(a, b)| a * (a / b).ln() + b * (b / a).ln())
        .sum()
}

/// Sum of pairwise symmetric divergences between topic rows, over k(k-1).
pub fn deveaud2014(beta: &[Vec<f64>]) -> f64 {
    let k = beta.len();
    if k < 2 {
        return f64::NAN;
    }
    let floored: Vec<Vec<f64>> = beta
        .iter()
        .map(|row| row.iter().map(|p| p.max(f64::MIN_POSITIVE)).collect())
        .collect();

    let mut total = 0.0;
    for i in 0..k {
        for j in (i + 1)..k {
            let (x, y) = (&floored[i], &floored[j]);
            let kl_xy: f64 = x.iter().zip(y).map(|(a, b)| a * (a / b).ln()).sum();
            let kl_yx: f64 = y.iter().zip(x).map(|(a, b)| a * (a / b).ln()).sum();
            total += 0.5 * kl_xy + 0.5 * kl_yx;
        }
    }
    total / (k * (k - 1)) as f64
}
