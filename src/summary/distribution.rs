// Per-topic distribution of gamma values, for histogram plots.

use serde::Serialize;

/// Counts of documents per gamma bin, for every topic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GammaHistogram {
    /// Bin edges over [0, 1]; `bins + 1` values
    pub edges: Vec<f64>,
    /// [topic][bin] document counts
    pub counts: Vec<Vec<usize>>,
}

/// Bucket each topic's gamma column into `bins` equal-width bins over [0, 1].
///
/// A value of exactly 1.0 lands in the last bin. `bins` of zero is treated as one.
pub fn gamma_histogram(gamma: &[Vec<f64>], bins: usize) -> GammaHistogram {
    let bins = bins.max(1);
    let k = gamma.first().map_or(0, Vec::len);
    let mut counts = vec![vec![0usize; bins]; k];

    for row in gamma {
        for (topic, &p) in row.iter().enumerate().take(k) {
            let bin = ((p.clamp(0.0, 1.0) * bins as f64) as usize).min(bins - 1);
            counts[topic][bin] += 1;
        }
    }

    let edges = (0..=bins).map(|i| i as f64 / bins as f64).collect();
    GammaHistogram { edges, counts }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_per_topic() {
        let gamma = vec![vec![0.05, 0.95], vec![0.5, 0.5], vec![1.0, 0.0]];
        let h = gamma_histogram(&gamma, 4);
        assert_eq!(h.edges, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(h.counts[0], vec![1, 0, 1, 1]);
        assert_eq!(h.counts[1], vec![1, 0, 1, 1]);
    }

    #[test]
    fn test_every_document_counted_once_per_topic() {
        let gamma = vec![vec![0.3, 0.7]; 5];
        let h = gamma_histogram(&gamma, 10);
        for topic in &h.counts {
            assert_eq!(topic.iter().sum::<usize>(), 5);
        }
    }

    #[test]
    fn test_empty_gamma() {
        let h = gamma_histogram(&[], 3);
        assert!(h.counts.is_empty());
        assert_eq!(h.edges.len(), 4);
    }
}
