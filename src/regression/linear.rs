// src/regression/linear.rs
use serde::{Deserialize, Serialize};

use super::RegressionError;

/// Eigenvalues below this fraction of the largest are treated as zero.
const RELATIVE_RANK_TOLERANCE: f64 = 1e-10;

/// Ordinary least squares with an intercept over two predictors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: [f64; 2],
}

impl LinearModel {
    /// Fit on centered data. Rank-deficient designs (collinear columns, a
    /// single row) get the minimum-norm coefficients instead of a singular
    /// solve.
    pub fn fit(features: &[[f64; 2]], targets: &[f64]) -> Result<Self, RegressionError> {
        if features.is_empty() {
            return Err(RegressionError::InsufficientSamples {
                required: 1,
                got: 0,
            });
        }
        if features.len() != targets.len() {
            return Err(RegressionError::LengthMismatch {
                weights: features.len(),
                heights: features.len(),
                calories: targets.len(),
            });
        }

        let n = features.len() as f64;
        let mean_x = [
            features.iter().map(|x| x[0]).sum::<f64>() / n,
            features.iter().map(|x| x[1]).sum::<f64>() / n,
        ];
        let mean_y = targets.iter().sum::<f64>() / n;

        // Centered scatter matrix [[s00, s01], [s01, s11]] and X'y.
        let (mut s00, mut s01, mut s11) = (0.0, 0.0, 0.0);
        let (mut t0, mut t1) = (0.0, 0.0);
        for (x, y) in features.iter().zip(targets) {
            let dx0 = x[0] - mean_x[0];
            let dx1 = x[1] - mean_x[1];
            let dy = y - mean_y;
            s00 += dx0 * dx0;
            s01 += dx0 * dx1;
            s11 += dx1 * dx1;
            t0 += dx0 * dy;
            t1 += dx1 * dy;
        }

        let inv = symmetric_pseudo_inverse(s00, s01, s11);
        let coefficients = [
            inv[0][0] * t0 + inv[0][1] * t1,
            inv[1][0] * t0 + inv[1][1] * t1,
        ];
        let intercept = mean_y - coefficients[0] * mean_x[0] - coefficients[1] * mean_x[1];

        Ok(Self {
            intercept,
            coefficients,
        })
    }

    pub fn predict(&self, x: [f64; 2]) -> f64 {
        self.intercept + self.coefficients[0] * x[0] + self.coefficients[1] * x[1]
    }
}

/// Moore-Penrose inverse of the symmetric positive semi-definite matrix
/// `[[a, b], [b, c]]`, via its eigen-decomposition.
fn symmetric_pseudo_inverse(a: f64, b: f64, c: f64) -> [[f64; 2]; 2] {
    let half_trace = (a + c) / 2.0;
    let spread = (((a - c) / 2.0).powi(2) + b * b).sqrt();
    let large = half_trace + spread;
    let small = half_trace - spread;

    let mut inv = [[0.0; 2]; 2];
    if !(large > 0.0) {
        return inv;
    }
    let tolerance = large * RELATIVE_RANK_TOLERANCE;

    // Eigenvector of `large`; the one for `small` is its perpendicular.
    let candidate_a = [large - c, b];
    let candidate_b = [b, large - a];
    let v = if norm(candidate_a) >= norm(candidate_b) {
        candidate_a
    } else {
        candidate_b
    };
    let len = norm(v);
    let v1 = if len > 0.0 {
        [v[0] / len, v[1] / len]
    } else {
        [1.0, 0.0]
    };
    let v2 = [-v1[1], v1[0]];

    for (lambda, vec) in [(large, v1), (small, v2)] {
        if lambda > tolerance {
            for i in 0..2 {
                for j in 0..2 {
                    inv[i][j] += vec[i] * vec[j] / lambda;
                }
            }
        }
    }
    inv
}

fn norm(v: [f64; 2]) -> f64 {
    (v[0] * v[0] + v[1] * v[1]).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovers_exact_plane() {
        let features = [[1.0, 0.0], [0.0, 1.0], [2.0, 3.0], [4.0, 1.0]];
        let targets: Vec<f64> = features.iter().map(|x| 3.0 + 2.0 * x[0] - 1.5 * x[1]).collect();

        let model = LinearModel::fit(&features, &targets).unwrap();

        assert!((model.intercept - 3.0).abs() < 1e-9);
        assert!((model.coefficients[0] - 2.0).abs() < 1e-9);
        assert!((model.coefficients[1] + 1.5).abs() < 1e-9);
        assert!((model.predict([10.0, 10.0]) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_collinear_columns_get_minimum_norm_solution() {
        // second column is exactly half the first
        let features = [[2.0, 1.0], [4.0, 2.0], [6.0, 3.0]];
        let targets = [5.0, 9.0, 13.0]; // 2 * x0 + 1

        let model = LinearModel::fit(&features, &targets).unwrap();

        assert!(model.coefficients.iter().all(|c| c.is_finite()));
        // minimum-norm split of slope 2 along (1, 0.5): (1.6, 0.8)
        assert!((model.coefficients[0] - 1.6).abs() < 1e-9);
        assert!((model.coefficients[1] - 0.8).abs() < 1e-9);
        assert!((model.predict([8.0, 4.0]) - 17.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_row_predicts_its_target() {
        let model = LinearModel::fit(&[[70.0, 1.75]], &[2100.0]).unwrap();
        assert_eq!(model.coefficients, [0.0, 0.0]);
        assert_eq!(model.predict([90.0, 1.9]), 2100.0);
    }

    #[test]
    fn test_pseudo_inverse_of_diagonal_matrix() {
        let inv = symmetric_pseudo_inverse(4.0, 0.0, 0.0);
        assert!((inv[0][0] - 0.25).abs() < 1e-12);
        assert_eq!(inv[1][1], 0.0);
        assert_eq!(inv[0][1], 0.0);
    }
}
