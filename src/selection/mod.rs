// Topic-count selection — fit one model per candidate k and score each fit.
//
// The output is a metric table for plotting. Choosing k from the curves is
// left to whoever reads them.

pub mod metrics;
pub mod sweep;

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use serde::Serialize;

pub use metrics::Metric;
pub use sweep::TopicCountSelector;

/// Inclusive range of candidate topic counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicCountRange {
    pub from: usize,
    pub to: usize,
    pub step: usize,
}

impl Default for TopicCountRange {
    fn default() -> Self {
        Self {
            from: 2,
            to: 15,
            step: 1,
        }
    }
}

impl TopicCountRange {
    pub fn new(from: usize, to: usize, step: usize) -> Result<Self> {
        if step == 0 {
            bail!("step must be at least 1");
        }
        if from > to {
            bail!("empty topic range {from}..={to}");
        }
        Ok(Self { from, to, step })
    }

    /// Parse `"2..=15"` or `"2..=15:2"` (with a step).
    pub fn parse(s: &str) -> Result<Self> {
        let (range, step) = match s.split_once(':') {
            Some((range, step)) => (range, step.trim().parse::<usize>().context("invalid step")?),
            None => (s, 1),
        };
        let (from, to) = range
            .split_once("..=")
            .with_context(|| format!("expected FROM..=TO, got `{s}`"))?;
        let from = from.trim().parse::<usize>().context("invalid range start")?;
        let to = to.trim().parse::<usize>().context("invalid range end")?;
        Self::new(from, to, step)
    }

    pub fn candidates(&self) -> Vec<usize> {
        (self.from..=self.to).step_by(self.step).collect()
    }
}

/// Scores for one candidate k. `error` is set when the fit failed, in
/// which case `scores` is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateResult {
    pub k: usize,
    pub scores: BTreeMap<Metric, f64>,
    pub error: Option<String>,
}

/// The (metric, k) -> score table produced by a sweep, sorted by k.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionTable {
    pub metrics: Vec<Metric>,
    pub candidates: Vec<CandidateResult>,
}

impl SelectionTable {
    pub fn score(&self, metric: Metric, k: usize) -> Option<f64> {
        self.candidates
            .iter()
            .find(|c| c.k == k)
            .and_then(|c| c.scores.get(&metric).copied())
    }

    pub fn failed(&self) -> impl Iterator<Item = &CandidateResult> {
        self.candidates.iter().filter(|c| c.error.is_some())
    }

    /// Each metric's curve rescaled to [0, 1] over the candidates that
    /// produced a score. A flat curve maps to 0.
    pub fn normalized(&self) -> BTreeMap<Metric, Vec<(usize, f64)>> {
        let mut curves = BTreeMap::new();
        for &metric in &self.metrics {
            let points: Vec<(usize, f64)> = self
                .candidates
                .iter()
                .filter_map(|c| c.scores.get(&metric).map(|&s| (c.k, s)))
                .collect();
            let min = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
            let max = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
            let span = max - min;
            let scaled = points
                .into_iter()
                .map(|(k, s)| (k, if span > 0.0 { (s - min) / span } else { 0.0 }))
                .collect();
            curves.insert(metric, scaled);
        }
        curves
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_range_is_2_to_15() {
        let c = TopicCountRange::default().candidates();
        assert_eq!(c.first(), Some(&2));
        assert_eq!(c.last(), Some(&15));
        assert_eq!(c.len(), 14);
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(
            TopicCountRange::parse("2..=15").unwrap(),
            TopicCountRange::default()
        );
        let r = TopicCountRange::parse("4..=12:4").unwrap();
        assert_eq!(r.candidates(), vec![4, 8, 12]);
        assert!(TopicCountRange::parse("5..=2").is_err());
        assert!(TopicCountRange::parse("2-15").is_err());
        assert!(TopicCountRange::parse("2..=6:0").is_err());
    }

    fn table() -> SelectionTable {
        let mk = |k, v: Option<f64>| CandidateResult {
            k,
            scores: v
                .map(|v| [(Metric::CaoJuan2009, v)].into_iter().collect())
                .unwrap_or_default(),
            error: v.is_none().then(|| "inference failed".to_string()),
        };
        SelectionTable {
            metrics: vec![Metric::CaoJuan2009],
            candidates: vec![mk(2, Some(0.4)), mk(3, None), mk(4, Some(0.2)), mk(5, Some(0.3))],
        }
    }

    #[test]
    fn test_lookup_and_failures() {
        let t = table();
        assert_eq!(t.score(Metric::CaoJuan2009, 4), Some(0.2));
        assert_eq!(t.score(Metric::CaoJuan2009, 3), None);
        assert_eq!(t.score(Metric::Arun2010, 2), None);
        assert_eq!(t.failed().map(|c| c.k).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_normalized_curve() {
        let curves = table().normalized();
        let curve = &curves[&Metric::CaoJuan2009];
        assert_eq!(curve.len(), 3);
        assert!((curve[0].1 - 1.0).abs() < 1e-12);
        assert!(curve[1].1.abs() < 1e-12);
        assert!((curve[2].1 - 0.5).abs() < 1e-9);
    }
}
