// 2-D projection of document-topic mixtures for scatter plots.
//
// Principal component analysis on the gamma rows: center each topic
// column, eigen-decompose the k x k covariance, and project onto the two
// leading components.

use serde::Serialize;

use crate::math::symmetric_eigen;

/// Gamma rows projected onto the first two principal components.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub points: Vec<[f64; 2]>,
    /// Share of total variance captured by each component
    pub explained_variance: [f64; 2],
}

pub fn project_gamma(gamma: &[Vec<f64>]) -> Projection {
    let n = gamma.len();
    let k = gamma.first().map_or(0, Vec::len);
    if n == 0 || k == 0 {
        return Projection {
            points: Vec::new(),
            explained_variance: [0.0, 0.0],
        };
    }

    let means: Vec<f64> = (0..k)
        .map(|t| gamma.iter().map(|row| row[t]).sum::<f64>() / n as f64)
        .collect();
    let centered: Vec<Vec<f64>> = gamma
        .iter()
        .map(|row| row.iter().zip(&means).map(|(x, m)| x - m).collect())
        .collect();

    let denom = if n > 1 { (n - 1) as f64 } else { 1.0 };
    let covariance: Vec<Vec<f64>> = (0..k)
        .map(|i| {
            (0..k)
                .map(|j| centered.iter().map(|r| r[i] * r[j]).sum::<f64>() / denom)
                .collect()
        })
        .collect();

    let components = symmetric_eigen(&covariance);
    let total: f64 = components.iter().map(|(l, _)| l.max(0.0)).sum();

    let mut explained_variance = [0.0, 0.0];
    for (slot, (lambda, _)) in explained_variance.iter_mut().zip(&components) {
        if total > 0.0 {
            *slot = lambda.max(0.0) / total;
        }
    }

    let points = centered
        .iter()
        .map(|row| {
            let mut point = [0.0, 0.0];
            for (slot, (_, vector)) in point.iter_mut().zip(&components) {
                *slot = row.iter().zip(vector).map(|(x, v)| x * v).sum();
            }
            point
        })
        .collect();

    Projection {
        points,
        explained_variance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_clusters_separate_on_first_axis() {
        let gamma = vec![
            vec![0.9, 0.05, 0.05],
            vec![0.85, 0.1, 0.05],
            vec![0.05, 0.9, 0.05],
            vec![0.1, 0.85, 0.05],
        ];
        let p = project_gamma(&gamma);
        assert_eq!(p.points.len(), 4);
        let (a, b) = (p.points[0][0], p.points[2][0]);
        assert!(a * b < 0.0, "clusters should fall on opposite sides: {a} vs {b}");
        assert!(p.explained_variance[0] > 0.9);
    }

    #[test]
    fn test_points_are_centered() {
        let gamma = vec![vec![0.7, 0.3], vec![0.2, 0.8], vec![0.5, 0.5]];
        let p = project_gamma(&gamma);
        let sum_x: f64 = p.points.iter().map(|pt| pt[0]).sum();
        let sum_y: f64 = p.points.iter().map(|pt| pt[1]).sum();
        assert!(sum_x.abs() < 1e-9);
        assert!(sum_y.abs() < 1e-9);
    }

    #[test]
    fn test_empty_input() {
        let p = project_gamma(&[]);
        assert!(p.points.is_empty());
    }
}
