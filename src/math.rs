// Small numerical helpers shared by the sampler, the selection metrics and
// the gamma projection. Matrices here are tiny (k x k with k in the tens),
// so plain Vec<Vec<f64>> and a cyclic Jacobi sweep are plenty.

use std::f64::consts::PI;

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEF: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural log of the gamma function for positive `x` (Lanczos approximation).
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // Reflection formula
        (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x)
    } else {
        let x = x - 1.0;
        let t = x + LANCZOS_G + 0.5;
        let mut a = LANCZOS_COEF[0];
        for (i, c) in LANCZOS_COEF.iter().enumerate().skip(1) {
            a += c / (x + i as f64);
        }
        0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + a.ln()
    }
}

/// Cosine similarity of two equal-length vectors (0.0 if either is all zero).
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let nb: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

/// Eigen-decomposition of a symmetric matrix by cyclic Jacobi rotations.
///
/// Returns `(eigenvalue, eigenvector)` pairs sorted by descending eigenvalue.
/// Each eigenvector is unit length with its largest-magnitude component
/// positive, so results are deterministic.
pub fn symmetric_eigen(matrix: &[Vec<f64>]) -> Vec<(f64, Vec<f64>)> {
    let n = matrix.len();
    let mut a: Vec<Vec<f64>> = matrix.to_vec();
    let mut v: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for _sweep in 0..100 {
        let off: f64 = (0..n)
            .flat_map(|p| ((p + 1)..n).map(move |q| (p, q)))
            .map(|(p, q)| a[p][q] * a[p][q])
            .sum();
        if off < 1e-24 {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                if a[p][q].abs() < 1e-300 {
                    continue;
                }
                let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for row in a.iter_mut() {
                    let (akp, akq) = (row[p], row[q]);
                    row[p] = c * akp - s * akq;
                    row[q] = s * akp + c * akq;
                }
                for k in 0..n {
                    let (apk, aqk) = (a[p][k], a[q][k]);
                    a[p][k] = c * apk - s * aqk;
                    a[q][k] = s * apk + c * aqk;
                }
                for row in v.iter_mut() {
                    let (vkp, vkq) = (row[p], row[q]);
                    row[p] = c * vkp - s * vkq;
                    row[q] = s * vkp + c * vkq;
                }
            }
        }
    }

    let mut pairs: Vec<(f64, Vec<f64>)> = (0..n)
        .map(|i| {
            let mut vec: Vec<f64> = v.iter().map(|row| row[i]).collect();
            let pivot = vec
                .iter()
                .copied()
                .fold(0.0f64, |best, x| if x.abs() > best.abs() { x } else { best });
            if pivot < 0.0 {
                vec.iter_mut().for_each(|x| *x = -*x);
            }
            (a[i][i], vec)
        })
        .collect();
    pairs.sort_by(|x, y| y.0.total_cmp(&x.0));
    pairs
}

/// Singular values of a (rows x cols) matrix with few rows, descending.
pub fn singular_values(matrix: &[Vec<f64>]) -> Vec<f64> {
    let gram: Vec<Vec<f64>> = matrix
        .iter()
        .map(|ri| {
            matrix
                .iter()
                .map(|rj| ri.iter().zip(rj).map(|(x, y)| x * y).sum())
                .collect()
        })
        .collect();
    symmetric_eigen(&gram)
        .into_iter()
        .map(|(lambda, _)| lambda.max(0.0).sqrt())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ln_gamma_known_values() {
        assert!(ln_gamma(1.0).abs() < 1e-10);
        assert!(ln_gamma(2.0).abs() < 1e-10);
        assert!((ln_gamma(5.0) - 24.0f64.ln()).abs() < 1e-10);
        // Gamma(0.5) = sqrt(pi)
        assert!((ln_gamma(0.5) - PI.sqrt().ln()).abs() < 1e-10);
        // Small priors go through the reflection branch
        assert!((ln_gamma(0.01) - 4.599_479_878_042_022).abs() < 1e-8);
    }

    #[test]
    fn test_cosine() {
        assert!((cosine(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-12);
        assert!(cosine(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-12);
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_symmetric_eigen_2x2() {
        // Eigenvalues 3 and 1, eigenvectors (1,1)/sqrt2 and (1,-1)/sqrt2
        let m = vec![vec![2.0, 1.0], vec![1.0, 2.0]];
        let pairs = symmetric_eigen(&m);
        assert!((pairs[0].0 - 3.0).abs() < 1e-10);
        assert!((pairs[1].0 - 1.0).abs() < 1e-10);
        let s = 1.0 / 2.0f64.sqrt();
        assert!((pairs[0].1[0] - s).abs() < 1e-10);
        assert!((pairs[0].1[1] - s).abs() < 1e-10);
    }

    #[test]
    fn test_symmetric_eigen_diagonal() {
        let m = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 5.0, 0.0],
            vec![0.0, 0.0, 3.0],
        ];
        let values: Vec<f64> = symmetric_eigen(&m).into_iter().map(|p| p.0).collect();
        assert_eq!(values, vec![5.0, 3.0, 1.0]);
    }

    #[test]
    fn test_singular_values() {
        // Rows orthogonal with norms 2 and 1
        let m = vec![vec![2.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]];
        let sv = singular_values(&m);
        assert!((sv[0] - 2.0).abs() < 1e-10);
        assert!((sv[1] - 1.0).abs() < 1e-10);
    }
}
